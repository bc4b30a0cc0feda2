//! Serial command engine: framing, dispatch, and response formatting.
//!
//! The engine consumes bytes from its UART's rx queue one at a time. Each
//! byte advances the dialect framer; a completed frame is parsed against the
//! board's command set and dispatched to [`BoardOps`]. Responses go into the
//! tx handoff channel byte-by-byte, best-effort — a stalled buffer task costs
//! response bytes (counted), never protocol-task liveness.
//!
//! Error discipline, end to end:
//! - parse/validation failure → `?` response, no peripheral touched;
//! - peripheral failure on a set command → `?` response;
//! - peripheral failure on a query → `?` substituted for that field;
//! - command-buffer overflow → `?` response, buffer reset;
//! - nothing here ever panics or retries.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use platform::LedMode;
use protocol::board::BoardProfile;
use protocol::command::{self, Command};
use protocol::framer::{Dialect, Framer, FramerEvent};
use protocol::hwconfig::HardwareConfigInfo;
use protocol::response::{toggle_status, ResponseBytes, ResponseError, ResponseWriter};

use crate::facade::BoardOps;
use crate::{InitError, RX_QUEUE_DEPTH, TX_INBOX_DEPTH};

/// Running telemetry for the command task.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandStats {
    /// Frames parsed and dispatched successfully.
    pub dispatched: u32,
    /// Frames rejected by the parser.
    pub parse_errors: u32,
    /// Command-buffer overflows.
    pub overflows: u32,
    /// Escape toggles executed.
    pub toggles: u32,
    /// Escape letters with no binding, silently ignored.
    pub ignored_escapes: u32,
    /// Response bytes lost to a full tx handoff channel.
    pub tx_dropped: u32,
}

/// The serial command task's engine.
pub struct SerialCommandEngine<'a, M: RawMutex, B: BoardOps> {
    profile: &'static BoardProfile,
    framer: Framer,
    hwconfig: HardwareConfigInfo,
    board: B,
    rx: Receiver<'a, M, u8, RX_QUEUE_DEPTH>,
    tx: Sender<'a, M, u8, TX_INBOX_DEPTH>,
    stats: CommandStats,
}

impl<'a, M: RawMutex, B: BoardOps> SerialCommandEngine<'a, M, B> {
    /// Bind the engine to a board profile and its UART queues.
    pub fn new(
        profile: &'static BoardProfile,
        board: B,
        rx: Receiver<'a, M, u8, RX_QUEUE_DEPTH>,
        tx: Sender<'a, M, u8, TX_INBOX_DEPTH>,
    ) -> Result<Self, InitError> {
        match profile.dialect {
            Dialect::Keyword if profile.commands.is_empty() => {
                return Err(InitError::EmptyCommandSet)
            }
            Dialect::EscapeToggle if profile.toggles.is_empty() => {
                return Err(InitError::EmptyToggleTable)
            }
            _ => {}
        }
        Ok(Self {
            profile,
            framer: Framer::new(profile.dialect),
            hwconfig: HardwareConfigInfo::new(&profile.hwconfig),
            board,
            rx,
            tx,
            stats: CommandStats::default(),
        })
    }

    /// Command task body: block on the rx queue, feed the engine, repeat.
    pub async fn run(mut self) -> ! {
        loop {
            let byte = self.rx.receive().await;
            self.feed(byte).await;
        }
    }

    /// Process one received byte.
    pub async fn feed(&mut self, byte: u8) {
        match self.framer.push(byte) {
            FramerEvent::Pending => {}
            FramerEvent::Frame => {
                let parsed = command::parse(self.profile.commands, self.framer.line());
                self.framer.reset();
                match parsed {
                    Ok(cmd) => {
                        self.stats.dispatched = self.stats.dispatched.saturating_add(1);
                        let response = self.dispatch(cmd).await;
                        self.send(&response);
                    }
                    Err(_) => {
                        self.stats.parse_errors = self.stats.parse_errors.saturating_add(1);
                        self.send(&ResponseWriter::error_token());
                    }
                }
            }
            FramerEvent::Overflow => {
                self.stats.overflows = self.stats.overflows.saturating_add(1);
                self.send(&ResponseWriter::error_token());
            }
            FramerEvent::Escape(letter) => self.handle_escape(letter),
            FramerEvent::Echo(byte) => {
                if self.profile.echo {
                    self.send(&[byte]);
                }
            }
        }
    }

    /// Telemetry snapshot.
    pub fn stats(&self) -> CommandStats {
        self.stats
    }

    /// The live identity block (host bench assertions).
    pub fn hwconfig(&self) -> &HardwareConfigInfo {
        &self.hwconfig
    }

    /// The board operations bundle (mock inspection in tests).
    pub fn board(&self) -> &B {
        &self.board
    }

    fn handle_escape(&mut self, letter: u8) {
        let Some(toggle) = self.profile.toggle_for(letter) else {
            // Unbound letters are ignored by design; host scripts send
            // free-running text between commands.
            self.stats.ignored_escapes = self.stats.ignored_escapes.saturating_add(1);
            return;
        };
        let line = match self.board.toggle(toggle.target) {
            Ok(asserted) => {
                self.stats.toggles = self.stats.toggles.saturating_add(1);
                toggle_status(toggle.label, asserted).unwrap_or_else(|_| ResponseWriter::error_token())
            }
            Err(_) => ResponseWriter::error_token(),
        };
        self.send(&line);
    }

    async fn dispatch(&mut self, cmd: Command) -> ResponseBytes {
        self.try_dispatch(cmd)
            .await
            .unwrap_or_else(|_| ResponseWriter::error_token())
    }

    #[allow(clippy::too_many_lines)] // one arm per command family, flat on purpose
    async fn try_dispatch(&mut self, cmd: Command) -> Result<ResponseBytes, ResponseError> {
        match cmd {
            Command::GetHwConfig => {
                let mut w = ResponseWriter::query("$HCI")?;
                for field in self.hwconfig.fields() {
                    w.field_str(field)?;
                }
                w.finish()
            }
            Command::ResetHwConfig => {
                self.hwconfig.reset();
                ResponseWriter::ack("#RHCI")?.finish()
            }
            Command::SetHwConfig { index, value } => {
                if self.hwconfig.set_field(index, &value).is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#SHCI")?.finish()
            }
            Command::ReadButtons => {
                let mut w = ResponseWriter::query("$BTN")?;
                match self.board.button_mask() {
                    Ok(mask) => w.field_u32(mask)?,
                    Err(_) => w.field_failed()?,
                }
                w.finish()
            }
            Command::SetBuzzer(on) => {
                if self.board.set_buzzer(on).is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#BZR")?.finish()
            }
            Command::SetExtReset(asserted) => {
                if self.board.set_ext_reset(asserted).is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#XRST")?.finish()
            }
            Command::SetLedIndex(index) => {
                if self.board.set_led_index(index).await.is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#LDC")?.finish()
            }
            Command::SetLedMode(mode) => {
                let Ok(mode) = LedMode::try_from(mode) else {
                    return Ok(ResponseWriter::error_token());
                };
                if self.board.set_led_mode(mode).await.is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#LDM")?.finish()
            }
            Command::ReadAdc => {
                let mut w = ResponseWriter::query("$ADC")?;
                let channels = self.board.adc_channel_count();
                for channel in 0..channels {
                    let channel = u8::try_from(channel).unwrap_or(u8::MAX);
                    match self.board.read_adc_millivolts(channel).await {
                        Ok(mv) => w.field_u32(u32::from(mv))?,
                        Err(_) => w.field_failed()?,
                    }
                }
                w.finish()
            }
            Command::ReadTemperature => {
                let mut w = ResponseWriter::query("$TMP")?;
                match self.board.read_temperature_kelvin().await {
                    Ok(kelvin) => w.field_u32(u32::from(kelvin))?,
                    Err(_) => w.field_failed()?,
                }
                w.finish()
            }
            Command::SetSynthMhz(mhz) => {
                if self.board.set_synth_mhz(mhz).await.is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#SYN")?.finish()
            }
            Command::ReadFanSpeed => {
                let mut w = ResponseWriter::query("$FAN")?;
                match self.board.read_fan_rpm().await {
                    Ok(rpm) => w.field_u32(u32::from(rpm))?,
                    Err(_) => w.field_failed()?,
                }
                w.finish()
            }
            Command::PushFanTemperature(celsius) => {
                if self.board.push_fan_temperature(celsius).await.is_err() {
                    return Ok(ResponseWriter::error_token());
                }
                ResponseWriter::ack("#FAN")?.finish()
            }
        }
    }

    /// Best-effort byte-at-a-time enqueue toward the buffer task.
    fn send(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.tx.try_send(byte).is_err() {
                self.stats.tx_dropped = self.stats.tx_dropped.saturating_add(1);
            }
        }
    }
}
