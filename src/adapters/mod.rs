//! Adapters: implementations of the port traits
//!
//! - `serial_port` — real hardware through the `serialport` crate
//! - `mock_device` — in-memory generator that decodes and logs frames

pub mod mock_device;
pub mod serial_port;
