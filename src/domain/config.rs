//! Device constants and saved profiles
//!
//! `DeviceConfig` gathers every hardware constant (baud rate, clock tree,
//! DAC scaling) into one immutable value built at startup. A `Profile` is a
//! named bundle of a port, a device config and the output settings to apply.

use serde::{Deserialize, Serialize};

use super::{Direction, FuncGenError, FuncGenResult, Waveform};

/// Width of the argument field in an instruction frame
pub const ARGUMENT_BITS: u32 = 24;

/// Largest value that fits in a 3-byte argument
pub const MAX_ARGUMENT: u32 = (1 << ARGUMENT_BITS) - 1;

/// Hardware constants of the function generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial baud rate
    pub baud_rate: u32,
    /// FPGA system clock in Hz
    pub system_clock_hz: f64,
    /// Clock prescaler in front of the cycle-tick counter
    pub prescale: u32,
    /// Width of the cycle-tick register
    pub counter_bits: u32,
    /// Full-scale output voltage of the DAC
    pub vref_volts: f64,
    /// DAC resolution
    pub dac_bits: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            system_clock_hz: 100e6,
            prescale: 4 * 17,
            counter_bits: 24,
            vref_volts: 3.3,
            dac_bits: 12,
        }
    }
}

impl DeviceConfig {
    /// Highest output frequency (one cycle tick per period)
    pub fn fmax(&self) -> f64 {
        self.system_clock_hz / f64::from(self.prescale)
    }

    /// Exclusive lower frequency bound, set by the cycle-tick register width
    pub fn fmin(&self) -> f64 {
        self.fmax() / 2f64.powi(self.counter_bits as i32)
    }

    /// DAC code for a full-scale output
    pub fn dac_full_scale(&self) -> u32 {
        (1 << self.dac_bits) - 1
    }

    /// Reject configs that could not produce a valid frame.
    pub fn validate(&self) -> FuncGenResult<()> {
        if self.baud_rate == 0 {
            return Err(FuncGenError::Config("baud rate must be non-zero".into()));
        }
        if self.prescale == 0 {
            return Err(FuncGenError::Config("prescale must be non-zero".into()));
        }
        if !(self.system_clock_hz.is_finite() && self.system_clock_hz > 0.0) {
            return Err(FuncGenError::Config(format!(
                "system clock must be positive, got {}",
                self.system_clock_hz
            )));
        }
        if !(self.vref_volts.is_finite() && self.vref_volts > 0.0) {
            return Err(FuncGenError::Config(format!(
                "reference voltage must be positive, got {}",
                self.vref_volts
            )));
        }
        if !(1..=ARGUMENT_BITS).contains(&self.counter_bits) {
            return Err(FuncGenError::Config(format!(
                "counter width must be 1..={ARGUMENT_BITS} bits, got {}",
                self.counter_bits
            )));
        }
        if !(1..=ARGUMENT_BITS).contains(&self.dac_bits) {
            return Err(FuncGenError::Config(format!(
                "DAC width must be 1..={ARGUMENT_BITS} bits, got {}",
                self.dac_bits
            )));
        }
        Ok(())
    }
}

/// Output parameters to push to the generator. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub waveform: Option<Waveform>,
    pub frequency_hz: Option<f64>,
    pub duty_cycle: Option<i64>,
    pub high_volts: Option<f64>,
    pub low_volts: Option<f64>,
    pub direction: Option<Direction>,
}

/// A saved profile
///
/// A profile is a host-side preset: what the operator *wants* pushed to the
/// generator. Nothing is ever read back from the device into a profile, and
/// opening a connection never consults one unless `apply` is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name, also the file stem on disk
    pub name: String,
    /// Serial port to open, e.g. "/dev/ttyUSB1"
    #[serde(default)]
    pub serial_port: Option<String>,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            serial_port: None,
            device: DeviceConfig::default(),
            output: OutputSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_device_config_matches_hardware() {
        let config = DeviceConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.prescale, 68);
        assert_eq!(config.dac_full_scale(), 4095);
        assert!((config.fmax() - 1_470_588.235).abs() < 1e-2);
        assert_eq!(config.fmin(), config.fmax() / 16_777_216.0);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_zero_prescale() {
        let config = DeviceConfig {
            prescale: 0,
            ..DeviceConfig::default()
        };
        assert!(matches!(config.validate(), Err(FuncGenError::Config(_))));
    }

    #[test]
    fn validate_rejects_oversized_counter() {
        let config = DeviceConfig {
            counter_bits: 32,
            ..DeviceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn profile_serializes_to_json() {
        let profile = Profile::default();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"name\":\"Default\""));
        assert!(json.contains("\"baud_rate\":115200"));
    }

    #[test]
    fn profile_fills_missing_fields_with_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{"name":"bench","output":{"waveform":"ramp"}}"#).unwrap();
        assert_eq!(profile.device, DeviceConfig::default());
        assert_eq!(profile.output.waveform, Some(Waveform::Ramp));
        assert_eq!(profile.output.frequency_hz, None);
    }
}
