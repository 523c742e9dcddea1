// Licensed under the Apache-2.0 license

//! CMSIS-SVD descriptor reader.
//!
//! This crate turns a vendor SVD file into a [`Device`] model that the
//! register generator can lay out and render.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let device = mcu_registers_svd::parse_file(Path::new("nrf52.svd")).unwrap();
//! mcu_registers_svd::validate(&device).unwrap();
//! for peripheral in &device.peripherals {
//!     println!("{} @ 0x{:x}", peripheral.name, peripheral.base_address);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`model`]: Device, peripheral, register, field and interrupt types
//! - [`text`]: Whitespace normalization for comment blocks
//! - [`error`]: Error kinds raised while reading a descriptor
//! - `parse`: XML traversal producing the raw [`Device`]
//! - `validate`: Checks applied before a device is handed to a generator

pub mod error;
pub mod model;
pub mod text;

mod parse;
mod validate;
mod value;

pub use error::{Error, Result};
pub use model::{
    Arch, Bitfield, BitfieldValue, Device, EnumValue, Field, Interrupt, Interrupts, Peripheral,
    Register, DEFAULT_SOURCE_URL,
};
pub use parse::{parse_file, parse_str};
pub use validate::validate;
