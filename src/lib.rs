//! Presstrack: print-shop job tracking with QR status links.
//!
//! Staff create a job record for each print order; the crate generates a QR
//! code encoding a public tracking URL, optionally publishes the QR image to
//! an external host, and renders a client-facing status page that looks up
//! one job by id (or all jobs under a client email).
//!
//! # Architecture
//!
//! Presstrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (CSV file, spreadsheet
//!   REST, image host, SMTP)
//!
//! # Modules
//!
//! - [`job`]: Job records, the record store, and the status workflow
//! - [`qr`]: QR code rendering (plain and branded styles)
//! - [`config`]: Startup configuration with enumerated missing keys
//! - [`auth`]: Session-scoped admin authentication

pub mod auth;
pub mod config;
pub mod job;
pub mod qr;
