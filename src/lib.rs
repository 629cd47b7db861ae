//! Encoder for the IBIS (VDV 300) serial telegrams used to drive destination signs and
//! passenger displays on transit vehicles.
//!
//! A telegram is built by [`telegram::Telegram`], sealed with a carriage return and an XOR
//! checksum by [`telegram::frame::seal`] and written to any [`transport::ByteSink`]. The protocol
//! is transmit only, nothing here parses telegrams coming back from a display.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod charset;
pub mod telegram;
pub mod transport;
pub mod vdv_hex;

// include defmt::Format implementations
// we don't want them derive()d in the modules unless defmt-impl feature is set
#[cfg(feature = "defmt-impl")]
pub mod defmt;

// reexport heapless
pub use heapless;
