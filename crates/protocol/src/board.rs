//! Per-board protocol profiles.
//!
//! A [`BoardProfile`] is the only thing that differs between board variants
//! at the protocol level: the framing dialect, the accepted command subset,
//! the escape-letter toggle table, the named-signal table, and the identity
//! defaults. Profiles are static data built at compile time; the engines
//! never special-case a board.

use platform::signal::SignalDef;

use crate::command::CommandSet;
use crate::framer::Dialect;
use crate::hwconfig::HwConfigDefaults;

/// What an escape-toggle letter acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    /// Toggle a named GPIO signal (index into the profile's signal table).
    Signal(usize),
    /// Toggle the PPS timer output.
    Pps,
}

/// One escape-dialect binding: `^` + `trigger` toggles `target`.
#[derive(Debug, Clone, Copy)]
pub struct ToggleDef {
    /// Command letter; matching is case-insensitive.
    pub trigger: u8,
    /// What the letter toggles.
    pub target: ToggleTarget,
    /// Label printed in the status line.
    pub label: &'static str,
}

/// Static description of one board variant's protocol surface.
pub struct BoardProfile {
    /// Variant name for logs and the host bench tool.
    pub name: &'static str,
    /// Framing dialect on the primary UART.
    pub dialect: Dialect,
    /// Accepted keyword commands (empty for pure escape-toggle boards).
    pub commands: CommandSet,
    /// Escape-letter bindings (empty for keyword boards).
    pub toggles: &'static [ToggleDef],
    /// Named signal table.
    pub signals: &'static [SignalDef],
    /// Signal-table indices whose states compose the `$BTN` bitmask,
    /// bit N = `buttons[N]`.
    pub buttons: &'static [usize],
    /// Identity block factory defaults.
    pub hwconfig: HwConfigDefaults,
    /// Echo non-command bytes back out (escape dialect only).
    pub echo: bool,
}

impl BoardProfile {
    /// Look up an escape letter, case-insensitively.
    ///
    /// `None` for unbound letters — the command task ignores those silently,
    /// which production host scripts rely on.
    #[must_use]
    pub fn toggle_for(&self, letter: u8) -> Option<&ToggleDef> {
        self.toggles
            .iter()
            .find(|t| t.trigger.eq_ignore_ascii_case(&letter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ALL_COMMANDS;

    static SIGNALS: [SignalDef; 1] = [SignalDef {
        name: "PWR OFF",
        port: 0,
        pin: 4,
    }];

    static TOGGLES: [ToggleDef; 2] = [
        ToggleDef {
            trigger: b'o',
            target: ToggleTarget::Signal(0),
            label: "PWR OFF",
        },
        ToggleDef {
            trigger: b'p',
            target: ToggleTarget::Pps,
            label: "PPS",
        },
    ];

    fn profile() -> BoardProfile {
        BoardProfile {
            name: "test",
            dialect: Dialect::EscapeToggle,
            commands: ALL_COMMANDS,
            toggles: &TOGGLES,
            signals: &SIGNALS,
            buttons: &[],
            hwconfig: HwConfigDefaults {
                part_no: "KT-000-0000-00",
                rev_no: "A",
                serial_no: "0001",
                build_batch_no: "1",
            },
            echo: false,
        }
    }

    #[test]
    fn toggle_lookup_is_case_insensitive() {
        let p = profile();
        assert_eq!(p.toggle_for(b'o').map(|t| t.label), Some("PWR OFF"));
        assert_eq!(p.toggle_for(b'O').map(|t| t.label), Some("PWR OFF"));
        assert_eq!(p.toggle_for(b'P').map(|t| t.label), Some("PPS"));
    }

    #[test]
    fn unbound_letter_is_none() {
        assert!(profile().toggle_for(b'z').is_none());
    }
}
