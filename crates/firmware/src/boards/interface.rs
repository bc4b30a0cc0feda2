//! Interface CCA jig profile — keyword dialect, full peripheral set.
//!
//! # Signal assignments
//!
//! These constants document the jig PCB assignment; change them to match a
//! respun board before flashing.
//!
//! | Signal | MCU pin | Notes                              |
//! |--------|---------|------------------------------------|
//! | BZR    | PB5     | Sounder drive, active high         |
//! | XRST   | PB4     | External reset to the UUT          |
//! | BTN1   | PC13    | Front-panel button, reads high when pressed |
//! | BTN2   | PC12    | Front-panel button, reads high when pressed |

use platform::signal::SignalDef;
use protocol::board::BoardProfile;
use protocol::command::ALL_COMMANDS;
use protocol::framer::Dialect;
use protocol::hwconfig::HwConfigDefaults;

/// Named signals, ports numbered A=0 onward.
pub static SIGNALS: [SignalDef; 4] = [
    SignalDef {
        name: "BZR",
        port: 1,
        pin: 5,
    },
    SignalDef {
        name: "XRST",
        port: 1,
        pin: 4,
    },
    SignalDef {
        name: "BTN1",
        port: 2,
        pin: 13,
    },
    SignalDef {
        name: "BTN2",
        port: 2,
        pin: 12,
    },
];

/// Signal-table index of the buzzer output.
pub const BUZZER_SIGNAL: usize = 0;

/// Signal-table index of the external reset output.
pub const EXT_RESET_SIGNAL: usize = 1;

/// Signal-table indices composing the `$BTN` bitmask, bit 0 first.
pub static BUTTONS: [usize; 2] = [2, 3];

/// The interface jig speaks the full keyword grammar.
pub static PROFILE: BoardProfile = BoardProfile {
    name: "interface",
    dialect: Dialect::Keyword,
    commands: ALL_COMMANDS,
    toggles: &[],
    signals: &SIGNALS,
    buttons: &BUTTONS,
    hwconfig: HwConfigDefaults {
        part_no: "KT-956-0225-00",
        rev_no: "B",
        serial_no: "0000",
        build_batch_no: "1",
    },
    echo: false,
};
