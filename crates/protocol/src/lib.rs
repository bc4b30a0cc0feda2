//! Line-oriented serial command grammar for the CCA test jigs.
//!
//! The host PC talks to every board variant through the same ASCII protocol
//! engine; what differs per board is a static [`BoardProfile`]: which
//! [`Dialect`] frames the input, which [`CommandDescriptor`]s are accepted,
//! and which named signals the escape-toggle letters drive.
//!
//! Wire format, keyword dialect:
//!
//! ```text
//! host → jig   $HCI\r                         query, '$' prefix
//! jig  → host  !HCI KT-956-0225-00 B 0042 7\r\n
//! host → jig   #BZR 1\r                       set, '#' prefix
//! jig  → host  >BZR\r\n                       ack
//! host → jig   #BZR maybe\r
//! jig  → host  ?\r\n                          any parse/validation failure
//! ```
//!
//! Escape-toggle dialect: the lead byte `^` followed by one letter toggles a
//! named signal and prints a status line (`PWR OFF ON\r\n`); anything else is
//! echoed when the board enables echo mode.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod board;
pub mod command;
pub mod framer;
pub mod hwconfig;
pub mod response;

pub use board::{BoardProfile, ToggleDef, ToggleTarget};
pub use command::{parse, Command, CommandDescriptor, CommandSet, ParseError, ALL_COMMANDS};
pub use framer::{Dialect, Framer, FramerEvent, COMMAND_BUFFER_CAPACITY};
pub use hwconfig::{HardwareConfigInfo, HwConfigDefaults, HwConfigError, HWCONFIG_FIELDS};
pub use response::{
    toggle_status, ResponseBytes, ResponseError, ResponseWriter, RESPONSE_CAPACITY,
};
