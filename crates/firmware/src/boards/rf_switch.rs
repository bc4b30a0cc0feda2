//! RF switch CCA jig profile — escape-toggle dialect, signal-only board.
//!
//! The RF switch jig is driven by operator keystrokes through a dumb
//! terminal: `^` followed by a letter flips one control line and the jig
//! prints the line's new state. Plain characters are echoed so the operator
//! sees what they type.
//!
//! # Signal assignments
//!
//! | Signal    | MCU pin | Escape | Notes                       |
//! |-----------|---------|--------|-----------------------------|
//! | PWR OFF   | PA4     | `^o`   | UUT supply interrupt relay  |
//! | RADIO RST | PA5     | `^r`   | Radio module reset          |
//! | ANT SEL   | PA6     | `^u`   | Antenna changeover relay    |
//! | PPS       | PA8     | `^p`   | 1 Hz timing pulse output    |

use platform::signal::SignalDef;
use protocol::board::{BoardProfile, ToggleDef, ToggleTarget};
use protocol::framer::Dialect;
use protocol::hwconfig::HwConfigDefaults;

/// Named signals, ports numbered A=0 onward.
pub static SIGNALS: [SignalDef; 3] = [
    SignalDef {
        name: "PWR OFF",
        port: 0,
        pin: 4,
    },
    SignalDef {
        name: "RADIO RST",
        port: 0,
        pin: 5,
    },
    SignalDef {
        name: "ANT SEL",
        port: 0,
        pin: 6,
    },
];

/// Escape-letter bindings. Letters match case-insensitively.
pub static TOGGLES: [ToggleDef; 4] = [
    ToggleDef {
        trigger: b'o',
        target: ToggleTarget::Signal(0),
        label: "PWR OFF",
    },
    ToggleDef {
        trigger: b'r',
        target: ToggleTarget::Signal(1),
        label: "RADIO RST",
    },
    ToggleDef {
        trigger: b'u',
        target: ToggleTarget::Signal(2),
        label: "ANT SEL",
    },
    ToggleDef {
        trigger: b'p',
        target: ToggleTarget::Pps,
        label: "PPS",
    },
];

/// The RF switch jig speaks escapes only and echoes everything else.
pub static PROFILE: BoardProfile = BoardProfile {
    name: "rf-switch",
    dialect: Dialect::EscapeToggle,
    commands: &[],
    toggles: &TOGGLES,
    signals: &SIGNALS,
    buttons: &[],
    hwconfig: HwConfigDefaults {
        part_no: "KT-956-0311-00",
        rev_no: "A",
        serial_no: "0000",
        build_batch_no: "1",
    },
    echo: true,
};
