//! Command line handlers
//!
//! `Cli` is the clap definition of the `funcgen` binary; `execute` opens the
//! generator (real or mock) and dispatches to the matching setter.

pub mod config;
pub mod serial;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    DeviceConfig, Direction, FuncGenResult, OutputSettings, Profile, Waveform,
};
use crate::generator::FunctionGenerator;
use crate::protocol::hex;

#[derive(Debug, Parser)]
#[command(name = "funcgen", version, about = "Control a UART function generator")]
pub struct Cli {
    /// Serial port of the generator (default: first USB serial port)
    #[arg(long, global = true)]
    pub port: Option<String>,

    /// Talk to an in-memory mock device instead of real hardware
    #[arg(long, global = true)]
    pub mock: bool,

    /// Directory holding saved profiles
    #[arg(long, global = true, default_value = "profiles")]
    pub profile_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List serial ports
    Ports,
    /// Send the reset frame
    Clear,
    /// Set the output frequency in Hz
    Frequency { hz: f64 },
    /// Set the waveform: const, pwm, zigzag, ramp (or 0-3)
    Waveform { kind: Waveform },
    /// Set the duty cycle (clamped to 0-255)
    Duty {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Set the high level in volts
    High {
        #[arg(allow_negative_numbers = true)]
        volts: f64,
    },
    /// Set the low level in volts
    Low {
        #[arg(allow_negative_numbers = true)]
        volts: f64,
    },
    /// Set the sweep direction: up, down (or 0-1)
    Direction { direction: Direction },
    /// Print bytes queued by the device
    Drain,
    /// Apply every setting stored in a profile
    Apply { name: String },
    /// Save output settings as a named profile
    SaveProfile {
        name: String,
        #[arg(long)]
        waveform: Option<Waveform>,
        #[arg(long)]
        frequency: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        duty: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        high: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        low: Option<f64>,
        #[arg(long)]
        direction: Option<Direction>,
    },
    /// List saved profiles
    Profiles,
    /// Delete a saved profile
    DeleteProfile { name: String },
}

fn open(cli: &Cli, port: Option<&str>, device: DeviceConfig) -> FuncGenResult<FunctionGenerator> {
    let port = serial::resolve_port(port, cli.mock)?;
    serial::connect(&port, device, cli.mock)
}

/// Print whatever the device queued in reply.
fn report_drain(generator: &mut FunctionGenerator) -> FuncGenResult<()> {
    let bytes = generator.drain()?;
    if !bytes.is_empty() {
        println!("device: {}", hex(&bytes));
    }
    Ok(())
}

pub fn execute(cli: Cli) -> FuncGenResult<()> {
    match &cli.command {
        Command::Ports => {
            for port in serial::list_serial_ports(cli.mock)? {
                println!("{}\t{}", port.name, port.port_type);
            }
            return Ok(());
        }
        Command::Profiles => {
            for name in config::list_profiles(&cli.profile_dir)? {
                println!("{name}");
            }
            return Ok(());
        }
        Command::DeleteProfile { name } => {
            return config::delete_profile(&cli.profile_dir, name);
        }
        Command::SaveProfile {
            name,
            waveform,
            frequency,
            duty,
            high,
            low,
            direction,
        } => {
            let profile = Profile {
                name: name.clone(),
                serial_port: cli.port.clone(),
                device: DeviceConfig::default(),
                output: OutputSettings {
                    waveform: *waveform,
                    frequency_hz: *frequency,
                    duty_cycle: *duty,
                    high_volts: *high,
                    low_volts: *low,
                    direction: *direction,
                },
            };
            let path = config::save_profile(&cli.profile_dir, &profile)?;
            println!("saved {}", path.display());
            return Ok(());
        }
        Command::Apply { name } => {
            let profile = config::load_profile(&cli.profile_dir, name)?;
            let port = cli.port.as_deref().or(profile.serial_port.as_deref());
            let mut generator = open(&cli, port, profile.device.clone())?;
            let applied = generator.apply(&profile.output)?;
            println!("{applied:?}");
            return report_drain(&mut generator);
        }
        _ => {}
    }

    let mut generator = open(&cli, cli.port.as_deref(), DeviceConfig::default())?;
    match &cli.command {
        Command::Clear => {
            generator.clear()?;
            println!("cleared");
        }
        Command::Frequency { hz } => {
            let ct = generator.set_frequency(*hz)?;
            let actual = generator.config().fmax() / f64::from(ct);
            println!("cyc_ticks={ct} ({actual:.3} Hz)");
        }
        Command::Waveform { kind } => {
            let wv = generator.set_waveform(i64::from(kind.code()))?;
            println!("waveform={wv}");
        }
        Command::Duty { value } => {
            println!("duty_cycle={}", generator.set_dutycycle(*value)?);
        }
        Command::High { volts } => {
            println!("high={}", generator.set_high(*volts)?);
        }
        Command::Low { volts } => {
            println!("low={}", generator.set_low(*volts)?);
        }
        Command::Direction { direction } => {
            let d = generator.set_direction(i64::from(direction.code()))?;
            println!("direction={d:?}");
        }
        Command::Drain => {}
        Command::Ports
        | Command::Profiles
        | Command::DeleteProfile { .. }
        | Command::SaveProfile { .. }
        | Command::Apply { .. } => unreachable!("handled without a connection"),
    }
    report_drain(&mut generator)?;
    generator.close()
}
