//! DeviceConnection: owns a serial connection and moves frames over it.
//!
//! The generator firmware interprets raw 4-byte frames; there is no
//! acknowledgement, so `send` is a blocking write and `drain` is a poll of
//! whatever bytes the device happened to queue.

use crate::domain::{FuncGenError, FuncGenResult};
use crate::ports::SerialConnection;

use super::{hex, Frame, FRAME_LEN};

/// Exclusive owner of the serial handle. The handle is closed on drop.
pub struct DeviceConnection {
    serial: Box<dyn SerialConnection>,
}

impl DeviceConnection {
    pub fn new(serial: Box<dyn SerialConnection>) -> Self {
        Self { serial }
    }

    /// Write one frame, blocking until the transport accepts all of it.
    pub fn send(&mut self, frame: &Frame) -> FuncGenResult<()> {
        log::debug!("TX: {}", hex(frame));

        let written = self.serial.write(frame)?;
        if written != FRAME_LEN {
            return Err(FuncGenError::Transport(format!(
                "short write: {written} of {FRAME_LEN} bytes of frame [{}]",
                hex(frame)
            )));
        }
        Ok(())
    }

    /// Read every byte currently queued by the device. Never blocks; returns
    /// an empty vector when nothing is waiting.
    pub fn drain(&mut self) -> FuncGenResult<Vec<u8>> {
        let pending = self.serial.bytes_to_read()?;
        if pending == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; pending];
        let mut filled = 0;
        while filled < pending {
            match self.serial.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        buf.truncate(filled);

        log::debug!("RX: {}", hex(&buf));
        Ok(buf)
    }

    pub fn is_connected(&self) -> bool {
        self.serial.is_connected()
    }

    /// Release the serial handle now instead of waiting for drop.
    pub fn close(&mut self) -> FuncGenResult<()> {
        self.serial.close()
    }
}

impl Drop for DeviceConnection {
    fn drop(&mut self) {
        if let Err(e) = self.serial.close() {
            log::error!("Failed to close serial connection: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // ---------------------------------------------------------------------------
    // MockSerial for DeviceConnection tests
    // ---------------------------------------------------------------------------

    #[derive(Default)]
    struct Shared {
        written: Vec<Vec<u8>>,
        inbound: VecDeque<u8>,
        closed: bool,
    }

    struct MockSerial {
        shared: Arc<Mutex<Shared>>,
        /// Bytes handed out per read() call
        read_chunk: usize,
        short_write: bool,
    }

    impl SerialConnection for MockSerial {
        fn write(&mut self, data: &[u8]) -> FuncGenResult<usize> {
            let n = if self.short_write { data.len() - 1 } else { data.len() };
            self.shared.lock().unwrap().written.push(data[..n].to_vec());
            Ok(n)
        }
        fn read(&mut self, buf: &mut [u8]) -> FuncGenResult<usize> {
            let mut shared = self.shared.lock().unwrap();
            let n = buf.len().min(self.read_chunk).min(shared.inbound.len());
            for slot in &mut buf[..n] {
                *slot = shared.inbound.pop_front().unwrap();
            }
            Ok(n)
        }
        fn bytes_to_read(&self) -> FuncGenResult<usize> {
            Ok(self.shared.lock().unwrap().inbound.len())
        }
        fn close(&mut self) -> FuncGenResult<()> {
            self.shared.lock().unwrap().closed = true;
            Ok(())
        }
        fn is_connected(&self) -> bool {
            !self.shared.lock().unwrap().closed
        }
    }

    fn make_connection(inbound: &[u8], read_chunk: usize) -> (DeviceConnection, Arc<Mutex<Shared>>) {
        let shared = Arc::new(Mutex::new(Shared {
            inbound: inbound.iter().copied().collect(),
            ..Shared::default()
        }));
        let mock = MockSerial {
            shared: Arc::clone(&shared),
            read_chunk,
            short_write: false,
        };
        (DeviceConnection::new(Box::new(mock)), shared)
    }

    #[test]
    fn send_writes_whole_frame() {
        let (mut conn, shared) = make_connection(&[], 64);
        conn.send(&[5, 0, 0, 2]).unwrap();
        assert_eq!(shared.lock().unwrap().written, vec![vec![5, 0, 0, 2]]);
    }

    #[test]
    fn short_write_is_transport_error() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let mock = MockSerial {
            shared: Arc::clone(&shared),
            read_chunk: 64,
            short_write: true,
        };
        let mut conn = DeviceConnection::new(Box::new(mock));
        assert!(matches!(
            conn.send(&[1, 0, 0, 1]),
            Err(FuncGenError::Transport(_))
        ));
    }

    #[test]
    fn drain_empty_returns_immediately() {
        let (mut conn, _) = make_connection(&[], 64);
        assert!(conn.drain().unwrap().is_empty());
    }

    #[test]
    fn drain_returns_all_queued_bytes() {
        let (mut conn, shared) = make_connection(&[0xAA, 0xBB, 0xCC], 64);
        assert_eq!(conn.drain().unwrap(), vec![0xAA, 0xBB, 0xCC]);
        assert!(shared.lock().unwrap().inbound.is_empty());
        assert!(conn.drain().unwrap().is_empty());
    }

    #[test]
    fn drain_accumulates_across_partial_reads() {
        let (mut conn, _) = make_connection(&[1, 2, 3, 4, 5], 1);
        assert_eq!(conn.drain().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn drop_closes_serial() {
        let (conn, shared) = make_connection(&[], 64);
        assert!(conn.is_connected());
        drop(conn);
        assert!(shared.lock().unwrap().closed);
    }
}
