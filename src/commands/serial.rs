//! Serial port commands — list ports, pick one, connect

use crate::adapters::mock_device::{MockDeviceFactory, MOCK_PORT_NAME};
use crate::adapters::serial_port::SerialPortFactory;
use crate::domain::{DeviceConfig, FuncGenError, FuncGenResult, SerialPortInfo};
use crate::generator::FunctionGenerator;
use crate::ports::SerialFactory;

pub fn list_serial_ports(mock: bool) -> FuncGenResult<Vec<SerialPortInfo>> {
    if mock {
        MockDeviceFactory::list_ports()
    } else {
        SerialPortFactory::list_ports()
    }
}

/// Pick the port to open: an explicit name wins, then the first USB
/// adapter the OS reports.
pub fn resolve_port(explicit: Option<&str>, mock: bool) -> FuncGenResult<String> {
    if let Some(port) = explicit {
        return Ok(port.to_string());
    }
    if mock {
        return Ok(MOCK_PORT_NAME.to_string());
    }
    let usb = SerialPortFactory::usb_ports()?;
    let first = usb.into_iter().next().ok_or_else(|| {
        FuncGenError::Transport("No USB serial port found; pass --port".into())
    })?;
    log::info!("Using first USB serial port {}", first.name);
    Ok(first.name)
}

pub fn connect(port: &str, config: DeviceConfig, mock: bool) -> FuncGenResult<FunctionGenerator> {
    if mock {
        FunctionGenerator::open_with::<MockDeviceFactory>(port, config)
    } else {
        FunctionGenerator::open(port, config)
    }
}
