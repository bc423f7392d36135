//! Mock generator for development and testing without hardware.
//!
//! Activate from the command line with `--mock`:
//!
//!   RUST_LOG=funcgen_lib=info funcgen --mock frequency 1000
//!
//! Every frame written is decoded and logged at INFO level so you can verify
//! exactly what a real generator would receive.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{FuncGenError, FuncGenResult, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};
use crate::protocol::{decode, hex, Frame, Instruction, FRAME_LEN};

/// Port name reported by `MockDeviceFactory::list_ports`
pub const MOCK_PORT_NAME: &str = "mock";

/// Everything the mock has seen, shared with whoever holds a handle.
#[derive(Debug, Default)]
pub struct MockDeviceState {
    /// Complete frames in the order they were written
    pub frames: Vec<Frame>,
    /// Decoded form of each frame; `None` where decoding failed
    pub instructions: Vec<Option<Instruction>>,
    /// Bytes the device will hand back on the next drain
    pub inbound: VecDeque<u8>,
    pub closed: bool,
    partial: Vec<u8>,
}

/// Cloneable view onto a mock device's state.
#[derive(Debug, Clone, Default)]
pub struct MockDeviceHandle(Arc<Mutex<MockDeviceState>>);

impl MockDeviceHandle {
    pub fn state(&self) -> MutexGuard<'_, MockDeviceState> {
        // A panicked test thread must not hide the log from the others
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue bytes for the host to drain, as if the firmware had replied.
    pub fn queue_response(&self, bytes: &[u8]) {
        self.state().inbound.extend(bytes.iter().copied());
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.state().frames.clone()
    }

    pub fn last_instruction(&self) -> Option<Instruction> {
        self.state().instructions.last().copied().flatten()
    }
}

pub struct MockDevice {
    handle: MockDeviceHandle,
}

impl MockDevice {
    pub fn new() -> Self {
        log::info!("[MOCK DEVICE] Initialized");
        Self {
            handle: MockDeviceHandle::default(),
        }
    }

    pub fn handle(&self) -> MockDeviceHandle {
        self.handle.clone()
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialConnection for MockDevice {
    fn write(&mut self, data: &[u8]) -> FuncGenResult<usize> {
        let mut state = self.handle.state();
        if state.closed {
            return Err(FuncGenError::Transport("mock device is closed".into()));
        }

        state.partial.extend_from_slice(data);
        while state.partial.len() >= FRAME_LEN {
            let mut frame: Frame = [0; FRAME_LEN];
            frame.copy_from_slice(&state.partial[..FRAME_LEN]);
            state.partial.drain(..FRAME_LEN);

            let instruction = match decode(&frame) {
                Ok(instruction) => {
                    log::info!("[MOCK DEVICE] {} → {instruction}", hex(&frame));
                    Some(instruction)
                }
                Err(e) => {
                    log::warn!("[MOCK DEVICE] {} → undecodable: {e}", hex(&frame));
                    None
                }
            };
            state.frames.push(frame);
            state.instructions.push(instruction);
        }
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> FuncGenResult<usize> {
        let mut state = self.handle.state();
        let n = buffer.len().min(state.inbound.len());
        for (slot, byte) in buffer.iter_mut().zip(state.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn bytes_to_read(&self) -> FuncGenResult<usize> {
        Ok(self.handle.state().inbound.len())
    }

    fn close(&mut self) -> FuncGenResult<()> {
        let mut state = self.handle.state();
        if !state.closed {
            log::info!("[MOCK DEVICE] Closed after {} frames", state.frames.len());
            state.closed = true;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.handle.state().closed
    }
}

/// Factory that hands out fresh mock devices.
pub struct MockDeviceFactory;

impl SerialFactory for MockDeviceFactory {
    fn list_ports() -> FuncGenResult<Vec<SerialPortInfo>> {
        Ok(vec![SerialPortInfo {
            name: MOCK_PORT_NAME.to_string(),
            port_type: "Mock".to_string(),
        }])
    }

    fn open(port: &str, baud_rate: u32) -> FuncGenResult<Box<dyn SerialConnection>> {
        log::info!("[MOCK DEVICE] Opening {port} at {baud_rate} baud");
        Ok(Box::new(MockDevice::new()))
    }
}
