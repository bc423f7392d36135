//! Port traits (interfaces)
//!
//! These traits define the boundary between frame encoding and the serial
//! hardware. Adapters implement them for the real port and for a mock device.

pub mod serial;

pub use serial::*;
