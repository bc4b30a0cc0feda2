//! Mock implementations for testing
//!
//! Scripted implementations of every façade trait, with call counters so
//! tests can assert that a rejected command left peripheral state untouched.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // test instrumentation counters
#![allow(clippy::unwrap_used)]

use crate::error::DriverError;
use crate::peripheral::{AdcReader, FanController, LedDriver, LedMode, Synthesizer, UartPort};
use crate::pps::PpsControl;
use crate::signal::{PinState, SignalBank, SignalDef};

/// Mock ADC with scripted channel readings.
pub struct MockAdc {
    /// Millivolt reading returned per channel.
    pub millivolts: heapless::Vec<u16, 8>,
    /// Kelvin reading returned by the temperature channel.
    pub kelvin: u16,
    /// Channel that fails with `Timeout`, if any.
    pub failing_channel: Option<u8>,
    /// Total reads issued (voltage + temperature).
    pub reads: usize,
}

impl MockAdc {
    /// Mock with `readings` as the per-channel millivolt script.
    pub fn new(readings: &[u16]) -> Self {
        Self {
            millivolts: heapless::Vec::from_slice(readings).unwrap(),
            kelvin: 296,
            failing_channel: None,
            reads: 0,
        }
    }
}

impl AdcReader for MockAdc {
    fn channel_count(&self) -> usize {
        self.millivolts.len()
    }

    async fn read_millivolts(&mut self, channel: u8) -> Result<u16, DriverError> {
        self.reads += 1;
        if self.failing_channel == Some(channel) {
            return Err(DriverError::Timeout);
        }
        self.millivolts
            .get(usize::from(channel))
            .copied()
            .ok_or(DriverError::BadIndex)
    }

    async fn read_kelvin(&mut self) -> Result<u16, DriverError> {
        self.reads += 1;
        Ok(self.kelvin)
    }
}

/// Mock LED driver recording the last index/mode written.
#[derive(Default)]
pub struct MockLed {
    /// Last index written by `set_index`.
    pub last_index: Option<u8>,
    /// Last mode written by `set_mode`.
    pub last_mode: Option<LedMode>,
    /// Total driver calls.
    pub calls: usize,
}

impl LedDriver for MockLed {
    async fn set_index(&mut self, index: u8) -> Result<(), DriverError> {
        self.calls += 1;
        self.last_index = Some(index);
        Ok(())
    }

    async fn set_mode(&mut self, mode: LedMode) -> Result<(), DriverError> {
        self.calls += 1;
        self.last_mode = Some(mode);
        Ok(())
    }
}

/// Mock synthesizer with a configurable lock range.
pub struct MockSynth {
    /// Accepted frequency range in MHz, inclusive.
    pub range_mhz: (u32, u32),
    /// Last locked frequency.
    pub locked_mhz: Option<u32>,
    /// Register writes as (register, value) pairs.
    pub writes: heapless::Vec<(u8, u32), 16>,
    /// Total driver calls.
    pub calls: usize,
}

impl MockSynth {
    /// Mock accepting frequencies in `[lo, hi]` MHz.
    pub fn new(lo: u32, hi: u32) -> Self {
        Self {
            range_mhz: (lo, hi),
            locked_mhz: None,
            writes: heapless::Vec::new(),
            calls: 0,
        }
    }
}

impl Synthesizer for MockSynth {
    async fn set_frequency_mhz(&mut self, mhz: u32) -> Result<(), DriverError> {
        self.calls += 1;
        if mhz < self.range_mhz.0 || mhz > self.range_mhz.1 {
            return Err(DriverError::OutOfRange);
        }
        self.locked_mhz = Some(mhz);
        Ok(())
    }

    async fn write_register(&mut self, register: u8, value: u32) -> Result<(), DriverError> {
        self.calls += 1;
        self.writes.push((register, value)).ok();
        Ok(())
    }
}

/// Mock fan controller.
#[derive(Default)]
pub struct MockFan {
    /// Last pushed temperature in °C.
    pub last_temperature: Option<i16>,
    /// Scripted RPM reading.
    pub rpm: u16,
    /// When set, every call fails with `Nack`.
    pub failing: bool,
    /// Total driver calls.
    pub calls: usize,
}

impl FanController for MockFan {
    async fn push_temperature(&mut self, celsius: i16) -> Result<(), DriverError> {
        self.calls += 1;
        if self.failing {
            return Err(DriverError::Nack);
        }
        self.last_temperature = Some(celsius);
        Ok(())
    }

    async fn read_speed_rpm(&mut self) -> Result<u16, DriverError> {
        self.calls += 1;
        if self.failing {
            return Err(DriverError::Nack);
        }
        Ok(self.rpm)
    }
}

/// Mock signal bank over an in-memory state array.
pub struct MockSignalBank {
    defs: &'static [SignalDef],
    states: heapless::Vec<bool, 16>,
    /// Total writes (including toggles).
    pub writes: usize,
}

impl MockSignalBank {
    /// Bank with every signal initially low.
    pub fn new(defs: &'static [SignalDef]) -> Self {
        let mut states = heapless::Vec::new();
        for _ in defs {
            states.push(false).unwrap();
        }
        Self {
            defs,
            states,
            writes: 0,
        }
    }
}

impl SignalBank for MockSignalBank {
    fn defs(&self) -> &'static [SignalDef] {
        self.defs
    }

    fn write(&mut self, index: usize, state: PinState) -> Result<(), DriverError> {
        self.writes += 1;
        let slot = self.states.get_mut(index).ok_or(DriverError::BadIndex)?;
        *slot = state.into();
        Ok(())
    }

    fn read(&self, index: usize) -> Result<PinState, DriverError> {
        self.states
            .get(index)
            .copied()
            .map(PinState::from)
            .ok_or(DriverError::BadIndex)
    }
}

/// Mock PPS control.
#[derive(Default)]
pub struct MockPps {
    enabled: bool,
    /// Total enable/disable calls.
    pub calls: usize,
}

impl PpsControl for MockPps {
    fn enable(&mut self) -> Result<(), DriverError> {
        self.calls += 1;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), DriverError> {
        self.calls += 1;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Mock UART port recording transmit bursts.
pub struct MockUartPort {
    /// When false, the buffer task must not issue a burst.
    pub idle: bool,
    /// Each issued burst, in order.
    pub bursts: std::vec::Vec<std::vec::Vec<u8>>,
    /// Times `arm_receive` was called.
    pub arms: usize,
}

impl MockUartPort {
    /// Idle port with no recorded traffic.
    pub fn new() -> Self {
        Self {
            idle: true,
            bursts: std::vec::Vec::new(),
            arms: 0,
        }
    }

    /// All transmitted bytes, bursts concatenated in order.
    pub fn transmitted(&self) -> std::vec::Vec<u8> {
        self.bursts.iter().flatten().copied().collect()
    }
}

impl Default for MockUartPort {
    fn default() -> Self {
        Self::new()
    }
}

impl UartPort for MockUartPort {
    fn tx_idle(&self) -> bool {
        self.idle
    }

    async fn write_burst(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        self.bursts.push(bytes.to_vec());
        Ok(())
    }

    fn arm_receive(&mut self) {
        self.arms += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DEFS: [SignalDef; 2] = [
        SignalDef {
            name: "PWR OFF",
            port: 0,
            pin: 4,
        },
        SignalDef {
            name: "RADIO RST",
            port: 1,
            pin: 2,
        },
    ];

    #[test]
    fn signal_toggle_returns_new_state() {
        let mut bank = MockSignalBank::new(&DEFS);
        assert_eq!(bank.toggle(0), Ok(PinState::High));
        assert_eq!(bank.toggle(0), Ok(PinState::Low));
    }

    #[test]
    fn signal_bad_index_is_error_not_panic() {
        let mut bank = MockSignalBank::new(&DEFS);
        assert_eq!(bank.write(7, PinState::High), Err(DriverError::BadIndex));
    }

    #[tokio::test]
    async fn adc_failing_channel_times_out() {
        let mut adc = MockAdc::new(&[3300, 1250]);
        adc.failing_channel = Some(1);
        assert_eq!(adc.read_millivolts(0).await, Ok(3300));
        assert_eq!(adc.read_millivolts(1).await, Err(DriverError::Timeout));
    }

    #[tokio::test]
    async fn synth_rejects_out_of_range_without_locking() {
        let mut synth = MockSynth::new(400, 6000);
        assert_eq!(
            synth.set_frequency_mhz(9999).await,
            Err(DriverError::OutOfRange)
        );
        assert_eq!(synth.locked_mhz, None);
    }

    // Shapes an init sequence the way a hardware driver issues one, through
    // the trait rather than the concrete mock.
    async fn program_registers<S: Synthesizer>(
        synth: &mut S,
        words: &[(u8, u32)],
    ) -> Result<(), DriverError> {
        for &(register, value) in words {
            synth.write_register(register, value).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn synth_register_writes_recorded_in_order() {
        let mut synth = MockSynth::new(400, 6000);
        let sequence = [(5u8, 0x0058_0005u32), (4, 0x008C_803C), (0, 0x002C_8018)];
        assert_eq!(program_registers(&mut synth, &sequence).await, Ok(()));
        assert_eq!(synth.writes.as_slice(), &sequence);
        assert_eq!(synth.calls, sequence.len());
    }
}
