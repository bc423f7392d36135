//! Function generator controller
//!
//! `FunctionGenerator` turns physical parameters into device units, builds
//! frames and hands them to its `DeviceConnection`. Every setter validates
//! before writing, so a rejected value never reaches the wire, and returns
//! the device value that was actually transmitted.

use crate::adapters::serial_port::SerialPortFactory;
use crate::domain::{
    DeviceConfig, Direction, FuncGenError, FuncGenResult, OutputSettings, Waveform,
};
use crate::ports::{SerialConnection, SerialFactory};
use crate::protocol::{encode, DeviceConnection, Instruction};

/// Cycle-tick count for an output frequency: `floor(FMAX / f)`.
///
/// `f` must lie in `(FMIN, FMAX]`.
pub fn cyc_ticks(config: &DeviceConfig, f: f64) -> FuncGenResult<u32> {
    let (fmin, fmax) = (config.fmin(), config.fmax());
    // Written so NaN falls into the error branch
    if !(f > fmin && f <= fmax) {
        return Err(FuncGenError::InvalidArgument(format!(
            "f must be greater than {fmin:.6} and less than / equal to {fmax:.2} but was {f}"
        )));
    }
    Ok((fmax / f).floor() as u32)
}

/// DAC code for an output level. `|volts|` saturates at the reference voltage.
pub fn dac_code(config: &DeviceConfig, volts: f64) -> FuncGenResult<u32> {
    if volts.is_nan() {
        return Err(FuncGenError::InvalidArgument("voltage is NaN".into()));
    }
    let vref = config.vref_volts;
    let magnitude = volts.abs();
    if magnitude > vref {
        log::warn!("{volts} V exceeds {vref} V, clamping");
    }
    let clamped = magnitude.min(vref);
    Ok(((clamped / vref) * f64::from(config.dac_full_scale())).round() as u32)
}

/// Saturate a duty cycle to the 8-bit range.
pub fn clamp_duty_cycle(dc: i64) -> u8 {
    let clamped = dc.clamp(0, i64::from(u8::MAX));
    if clamped != dc {
        log::warn!("duty cycle {dc} out of range, clamping to {clamped}");
    }
    clamped as u8
}

/// Values the generator ended up with after `apply`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedSettings {
    pub waveform: Option<Waveform>,
    pub cyc_ticks: Option<u32>,
    pub duty_cycle: Option<u8>,
    pub high_code: Option<u32>,
    pub low_code: Option<u32>,
    pub direction: Option<Direction>,
}

/// A connected function generator.
pub struct FunctionGenerator {
    config: DeviceConfig,
    connection: DeviceConnection,
}

impl FunctionGenerator {
    /// Wrap an already-open serial connection.
    ///
    /// The handle is owned by the connection before the config is checked,
    /// so a rejected config still closes it.
    pub fn new(serial: Box<dyn SerialConnection>, config: DeviceConfig) -> FuncGenResult<Self> {
        let connection = DeviceConnection::new(serial);
        config.validate()?;
        Ok(Self { config, connection })
    }

    /// Open `port` through the given factory at the configured baud rate.
    pub fn open_with<F: SerialFactory>(port: &str, config: DeviceConfig) -> FuncGenResult<Self> {
        config.validate()?;
        let serial = F::open(port, config.baud_rate)?;
        Self::new(serial, config)
    }

    /// Open a real serial port.
    pub fn open(port: &str, config: DeviceConfig) -> FuncGenResult<Self> {
        Self::open_with::<SerialPortFactory>(port, config)
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Encode and transmit one instruction.
    pub fn send(&mut self, instruction: Instruction) -> FuncGenResult<()> {
        let frame = encode(&instruction)?;
        log::debug!("send {instruction}");
        self.connection.send(&frame)
    }

    /// Bytes the device has queued since the last drain.
    pub fn drain(&mut self) -> FuncGenResult<Vec<u8>> {
        self.connection.drain()
    }

    /// Send the all-0xFF reset frame.
    pub fn clear(&mut self) -> FuncGenResult<()> {
        self.send(Instruction::Clear)
    }

    /// Set the output frequency in Hz. Returns the cycle-tick count sent.
    pub fn set_frequency(&mut self, f: f64) -> FuncGenResult<u32> {
        let ct = cyc_ticks(&self.config, f)?;
        self.send(Instruction::CycTicks(ct))?;
        Ok(ct)
    }

    pub fn set_waveform(&mut self, wv: i64) -> FuncGenResult<Waveform> {
        let waveform = Waveform::try_from(wv)?;
        self.send(Instruction::Waveform(waveform))?;
        Ok(waveform)
    }

    /// Set the duty cycle, saturated to `0..=255`. Returns the value sent.
    pub fn set_dutycycle(&mut self, dc: i64) -> FuncGenResult<u8> {
        let dc = clamp_duty_cycle(dc);
        self.send(Instruction::DutyCycle(dc))?;
        Ok(dc)
    }

    /// Set the high output level in volts. Returns the DAC code sent.
    pub fn set_high(&mut self, volts: f64) -> FuncGenResult<u32> {
        let code = dac_code(&self.config, volts)?;
        self.send(Instruction::High(code))?;
        Ok(code)
    }

    /// Set the low output level in volts. Returns the DAC code sent.
    pub fn set_low(&mut self, volts: f64) -> FuncGenResult<u32> {
        let code = dac_code(&self.config, volts)?;
        self.send(Instruction::Low(code))?;
        Ok(code)
    }

    pub fn set_direction(&mut self, d: i64) -> FuncGenResult<Direction> {
        let direction = Direction::try_from(d)?;
        self.send(Instruction::Direction(direction))?;
        Ok(direction)
    }

    /// Push every set field of `settings`, stopping at the first failure.
    ///
    /// The shape goes first so the firmware interprets the remaining
    /// parameters against the new waveform.
    pub fn apply(&mut self, settings: &OutputSettings) -> FuncGenResult<AppliedSettings> {
        let mut applied = AppliedSettings::default();
        if let Some(wv) = settings.waveform {
            applied.waveform = Some(self.set_waveform(i64::from(wv.code()))?);
        }
        if let Some(f) = settings.frequency_hz {
            applied.cyc_ticks = Some(self.set_frequency(f)?);
        }
        if let Some(dc) = settings.duty_cycle {
            applied.duty_cycle = Some(self.set_dutycycle(dc)?);
        }
        if let Some(h) = settings.high_volts {
            applied.high_code = Some(self.set_high(h)?);
        }
        if let Some(l) = settings.low_volts {
            applied.low_code = Some(self.set_low(l)?);
        }
        if let Some(d) = settings.direction {
            applied.direction = Some(self.set_direction(i64::from(d.code()))?);
        }
        Ok(applied)
    }

    /// Release the serial handle.
    pub fn close(mut self) -> FuncGenResult<()> {
        self.connection.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyc_ticks_at_fmax_is_one() {
        let config = DeviceConfig::default();
        assert_eq!(cyc_ticks(&config, config.fmax()).unwrap(), 1);
    }

    #[test]
    fn cyc_ticks_floors() {
        let config = DeviceConfig::default();
        // 1.47 MHz / 1 kHz = 1470.588...
        assert_eq!(cyc_ticks(&config, 1000.0).unwrap(), 1470);
    }

    #[test]
    fn cyc_ticks_bounds() {
        let config = DeviceConfig::default();
        assert!(cyc_ticks(&config, config.fmax() * 1.000_001).is_err());
        assert!(cyc_ticks(&config, config.fmin()).is_err());
        assert!(cyc_ticks(&config, 0.0).is_err());
        assert!(cyc_ticks(&config, -1000.0).is_err());
        assert!(cyc_ticks(&config, f64::NAN).is_err());
        assert!(cyc_ticks(&config, f64::INFINITY).is_err());
    }

    #[test]
    fn cyc_ticks_just_above_fmin_fits_24_bits() {
        let config = DeviceConfig::default();
        let ct = cyc_ticks(&config, config.fmin() * 1.000_001).unwrap();
        assert!(ct <= 0xFF_FF_FF);
    }

    #[test]
    fn dac_code_scales_and_clamps() {
        let config = DeviceConfig::default();
        assert_eq!(dac_code(&config, 0.0).unwrap(), 0);
        assert_eq!(dac_code(&config, 3.3).unwrap(), 4095);
        assert_eq!(dac_code(&config, 5.0).unwrap(), 4095);
        assert_eq!(dac_code(&config, -5.0).unwrap(), 4095);
        assert_eq!(dac_code(&config, 1.65).unwrap(), 2048);
        assert_eq!(dac_code(&config, -1.65).unwrap(), 2048);
        assert!(dac_code(&config, f64::NAN).is_err());
    }

    #[test]
    fn duty_cycle_clamps() {
        assert_eq!(clamp_duty_cycle(300), 255);
        assert_eq!(clamp_duty_cycle(-5), 0);
        assert_eq!(clamp_duty_cycle(128), 128);
    }
}
