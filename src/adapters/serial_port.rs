//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.
//! `SerialPortFactory` has no instance data, just static methods for
//! listing and opening ports.

use std::io::{Read, Write};
use std::time::Duration;

use crate::domain::{FuncGenError, FuncGenResult, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

/// Per-call read/write timeout on the OS handle
const PORT_TIMEOUT_MS: u64 = 100;

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialPortFactory {
    /// Ports that look like USB-serial adapters, in the order the OS lists them.
    pub fn usb_ports() -> FuncGenResult<Vec<SerialPortInfo>> {
        Ok(Self::list_ports()?
            .into_iter()
            .filter(SerialPortInfo::is_usb)
            .collect())
    }
}

impl SerialFactory for SerialPortFactory {
    fn list_ports() -> FuncGenResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| FuncGenError::Transport(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn open(port: &str, baud_rate: u32) -> FuncGenResult<Box<dyn SerialConnection>> {
        let serial = serialport::new(port, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(PORT_TIMEOUT_MS))
            .open()
            .map_err(|e| FuncGenError::Transport(format!("Failed to open {port}: {e}")))?;

        log::info!("Opened {port} at {baud_rate} baud");

        Ok(Box::new(SerialPortConnection {
            name: port.to_string(),
            port: Some(serial),
        }))
    }
}

/// An open serial port connection wrapping the `serialport` crate.
///
/// The OS handle is dropped on `close()`; later calls fail with a
/// transport error instead of touching a stale descriptor.
pub struct SerialPortConnection {
    name: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialPortConnection {
    fn port_mut(&mut self) -> FuncGenResult<&mut Box<dyn serialport::SerialPort>> {
        let name = &self.name;
        self.port
            .as_mut()
            .ok_or_else(|| FuncGenError::Transport(format!("{name} is closed")))
    }
}

impl SerialConnection for SerialPortConnection {
    fn write(&mut self, data: &[u8]) -> FuncGenResult<usize> {
        let port = self.port_mut()?;
        port.write_all(data)
            .and_then(|()| port.flush())
            .map_err(|e| FuncGenError::Transport(format!("Write failed: {e}")))?;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> FuncGenResult<usize> {
        self.port_mut()?
            .read(buffer)
            .map_err(|e| FuncGenError::Transport(format!("Read failed: {e}")))
    }

    fn bytes_to_read(&self) -> FuncGenResult<usize> {
        let port = self
            .port
            .as_ref()
            .ok_or_else(|| FuncGenError::Transport(format!("{} is closed", self.name)))?;
        port.bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| FuncGenError::Transport(format!("Failed to query input buffer: {e}")))
    }

    fn close(&mut self) -> FuncGenResult<()> {
        if self.port.take().is_some() {
            log::info!("Closed {}", self.name);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}
