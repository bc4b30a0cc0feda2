//! CCA test-jig firmware.
//!
//! One binary per jig flavour, all built from the same task set:
//!
//! ```text
//! Board image (main.rs, bin/*.rs)
//!         ↓
//! Serial engines (serial crate) + board profiles (boards module)
//!         ↓
//! Peripheral drivers (hal module)
//!         ↓
//! Platform HAL (Embassy, STM32L4)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for the STM32L476RG target (embassy, defmt-rtt)
//! - `std` - Enable the standard library (host tests)
//!
//! # Building a jig image
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf \
//!     --features hardware --bin interface-jig
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod boards;

#[cfg(feature = "hardware")]
pub mod hal;

#[cfg(feature = "hardware")]
pub mod tasks;
