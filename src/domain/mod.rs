//! Core domain types
//!
//! Pure types with no I/O dependencies: waveform and direction codes,
//! device constants, saved profiles and the crate error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
