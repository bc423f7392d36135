//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory` — static methods for listing and opening ports
//! - `SerialConnection` — instance methods for reading/writing data

use crate::domain::{FuncGenResult, SerialPortInfo};

/// Factory for creating serial connections.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports() -> FuncGenResult<Vec<SerialPortInfo>>;

    /// Open a serial port at the given baud rate, returning a boxed connection
    fn open(port: &str, baud_rate: u32) -> FuncGenResult<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
pub trait SerialConnection: Send {
    /// Write all of `data`, blocking until the port accepts it.
    /// Returns the number of bytes written.
    fn write(&mut self, data: &[u8]) -> FuncGenResult<usize>;

    /// Read up to `buffer.len()` bytes from the port
    fn read(&mut self, buffer: &mut [u8]) -> FuncGenResult<usize>;

    /// Number of received bytes waiting in the input buffer. Never blocks.
    fn bytes_to_read(&self) -> FuncGenResult<usize>;

    /// Close the connection, releasing the OS handle
    fn close(&mut self) -> FuncGenResult<()>;

    /// Check if the port is still open
    fn is_connected(&self) -> bool;
}
