//! Job tracking for Presstrack.
//!
//! This module covers the full lifecycle of a print job: creation with QR
//! generation, status updates by staff, and client-facing status lookup.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
