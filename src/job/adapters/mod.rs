//! Adapter implementations of the job ports.

pub mod csv;
pub mod imgbb;
pub mod memory;
mod row;
pub mod sheets;
pub mod smtp;

pub use csv::CsvJobStore;
pub use imgbb::ImgBbPublisher;
pub use memory::InMemoryJobStore;
pub use sheets::{SheetsClient, SheetsJobStore};
pub use smtp::{SmtpJobNotifier, SmtpSettings};
