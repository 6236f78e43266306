//! Test suites for the job module.

mod domain_tests;
mod service_tests;
mod stage_tests;
mod status_page_tests;
mod support;
