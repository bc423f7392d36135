//! UART Function Generator Client
//!
//! Host-side control of an FPGA function generator that accepts 4-byte
//! binary instruction frames over a serial link.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions (interfaces) for the serial transport
//! - `protocol/` - Frame encoding/decoding and the device connection
//! - `generator` - Physical-unit setters on top of the protocol
//! - `adapters/` - Implementations of ports (serialport, mock device)
//! - `commands/` - Command line handlers and profile persistence

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;
pub mod protocol;

pub mod generator;

// Adapters (external I/O)
pub mod adapters;

// CLI integration
pub mod commands;

use clap::Parser;

pub use domain::{FuncGenError, FuncGenResult};
pub use generator::FunctionGenerator;

/// Entry point of the `funcgen` binary. Returns the process exit code.
pub fn run() -> i32 {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = commands::Cli::parse();
    match commands::execute(cli) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            1
        }
    }
}
