//! Board profiles for every jig flavour this firmware ships on.
//!
//! A profile is static data: the command grammar, the escape-toggle table,
//! the named-signal table, and the factory-default identity block. The serial
//! engines take a `&'static BoardProfile` at init and never consult anything
//! else, so adding a jig flavour means adding a module here and a binary that
//! wires its pins.

pub mod interface;
pub mod rf_switch;
