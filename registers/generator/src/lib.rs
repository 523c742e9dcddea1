// Licensed under the Apache-2.0 license

//! SVD to register bindings generator.
//!
//! Reads CMSIS-SVD descriptors through [`mcu_registers_svd`] and emits one
//! source unit per device: device constants, interrupt numbers, padded
//! register overlay types, peripheral instances and bitfield constants.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use mcu_registers_generator::{generate_dir, GeneratorConfig, OutputFormat};
//!
//! let config = GeneratorConfig::new()
//!     .with_format(OutputFormat::Go)
//!     .with_package("device");
//! let summary = generate_dir(
//!     Path::new("lib/nrfx/mdk"),
//!     Path::new("src/device/nrf"),
//!     &config,
//!     false,
//! ).unwrap();
//! assert!(summary.is_success());
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Output format, package name and peripheral filtering
//! - [`layout`]: Address cursor walk producing padded overlays
//! - [`output`]: Section ordering and the Go / tock-registers backends
//! - [`driver`]: Descriptor discovery and per-file generation
//! - [`util`]: Identifier and hex formatting helpers

pub mod config;
pub mod driver;
pub mod layout;
pub mod output;
pub mod util;

pub use config::{FilterConfig, GeneratorConfig, OutputFormat};
pub use driver::{discover, generate_dir, generate_file, GeneratedUnit, Summary};
pub use layout::{compute_overlay, LayoutItem, Overlay};
pub use output::{emit, render, Backend};

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
