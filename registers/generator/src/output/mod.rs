// Licensed under the Apache-2.0 license

//! Rendering of a validated device into source bindings.
//!
//! The section order and layout decisions live here; the concrete syntax
//! is supplied by a [`Backend`].
//!
//! ## Generated Unit Structure
//!
//! ```text
//! Device ──► file header           (provenance, description, license)
//!        ├─► device constants      DEVICE / ARCH / FAMILY
//!        ├─► interrupt constants   IRQ_<name>, IRQ_max
//!        ├─► overlay types         <PERIPH>_Type, padded to hardware offsets
//!        ├─► instances             <PERIPH> bound to its base address
//!        └─► bitfield constants    one namespace per peripheral with fields
//! ```

mod go;
mod tock;

pub use go::GoBackend;
pub use tock::TockRegistersBackend;

use crate::config::GeneratorConfig;
use crate::layout::{compute_overlay, Overlay};
use anyhow::Context;
use mcu_registers_svd::text::collapse_whitespace;
use mcu_registers_svd::Device;
use std::fmt;

/// Provenance and device details for the top of a generated unit.
#[derive(Clone, Copy, Debug)]
pub struct FileHeader<'a> {
    pub device: &'a Device,
    pub source_url: &'a str,
}

/// What a namespace groups, so backends can pick the right boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NamespaceKind {
    Constants,
    /// Per-peripheral field constants, named after the peripheral.
    Bitfields,
    Overlays,
    Instances,
}

/// A module/namespace boundary.
#[derive(Clone, Copy, Debug)]
pub struct Namespace<'a> {
    pub kind: NamespaceKind,
    /// Descriptor-level name; backends derive their identifier from it.
    pub name: &'a str,
    pub comment: &'a str,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstValue<'a> {
    Str(&'a str),
    /// Integer rendered in decimal.
    Dec(u64),
    /// Integer rendered in hexadecimal.
    Hex(u64),
}

/// A named constant with an optional trailing comment.
#[derive(Clone, Copy, Debug)]
pub struct Constant<'a> {
    pub name: &'a str,
    pub value: ConstValue<'a>,
    /// Empty for no comment.
    pub comment: &'a str,
}

/// Output syntax for one target language.
///
/// Backends only decide spelling. Offsets, padding and ordering come from
/// [`render`] and [`compute_overlay`].
pub trait Backend {
    /// File extension of generated units, without the dot.
    fn extension(&self) -> &'static str;

    fn file_header(&self, out: &mut String, header: &FileHeader<'_>) -> fmt::Result;

    fn begin_namespace(&self, out: &mut String, ns: &Namespace<'_>) -> fmt::Result;

    fn end_namespace(&self, out: &mut String, ns: &Namespace<'_>) -> fmt::Result;

    /// Comment introducing a group of constants inside a namespace.
    fn group_comment(&self, out: &mut String, text: &str) -> fmt::Result;

    fn constant(&self, out: &mut String, constant: &Constant<'_>) -> fmt::Result;

    /// Overlay type made of register cells and padding cells.
    fn overlay(&self, out: &mut String, overlay: &Overlay) -> fmt::Result;

    /// Binding of a peripheral's overlay type to its base address.
    fn instance(&self, out: &mut String, overlay: &Overlay) -> fmt::Result;
}

/// Renders `device` with the backend selected by `config`.
///
/// The device must have passed [`mcu_registers_svd::validate`].
pub fn render(device: &Device, config: &GeneratorConfig) -> anyhow::Result<String> {
    let backend = config.backend();
    let backend = backend.as_ref();
    let source_url = config
        .descriptor_source
        .as_deref()
        .unwrap_or(&device.source_url);
    let peripherals: Vec<_> = device
        .peripherals
        .iter()
        .filter(|p| config.filter.should_include(&p.name))
        .collect();

    let mut out = String::new();
    backend.file_header(&mut out, &FileHeader { device, source_url })?;

    // Device information
    let info = Namespace {
        kind: NamespaceKind::Constants,
        name: "device",
        comment: "Some information about this device.",
    };
    backend.begin_namespace(&mut out, &info)?;
    for (name, value) in [
        ("DEVICE", device.name.as_str()),
        ("ARCH", device.arch.as_str()),
        ("FAMILY", device.family.as_str()),
    ] {
        backend.constant(
            &mut out,
            &Constant {
                name,
                value: ConstValue::Str(value),
                comment: "",
            },
        )?;
    }
    backend.end_namespace(&mut out, &info)?;

    // Interrupts
    if let Some(max) = device.interrupts.max_index() {
        let irqs = Namespace {
            kind: NamespaceKind::Constants,
            name: "interrupts",
            comment: "Interrupts",
        };
        backend.begin_namespace(&mut out, &irqs)?;
        for intr in &device.interrupts {
            let name = format!("IRQ_{}", intr.name);
            let comment = collapse_whitespace(&intr.description);
            backend.constant(
                &mut out,
                &Constant {
                    name: &name,
                    value: ConstValue::Dec(intr.index.into()),
                    comment: &comment,
                },
            )?;
        }
        backend.constant(
            &mut out,
            &Constant {
                name: "IRQ_max",
                value: ConstValue::Dec(max.into()),
                comment: "Highest interrupt number on this device.",
            },
        )?;
        backend.end_namespace(&mut out, &irqs)?;
    }

    // Overlay types and their instances
    let overlays: Vec<Overlay> = peripherals.iter().map(|p| compute_overlay(p)).collect();
    let types = Namespace {
        kind: NamespaceKind::Overlays,
        name: "regs",
        comment: "Types that represent peripheral register blocks.",
    };
    backend.begin_namespace(&mut out, &types)?;
    for overlay in &overlays {
        backend.overlay(&mut out, overlay)?;
    }
    backend.end_namespace(&mut out, &types)?;

    let instances = Namespace {
        kind: NamespaceKind::Instances,
        name: "peripherals",
        comment: "Peripherals.",
    };
    backend.begin_namespace(&mut out, &instances)?;
    for overlay in &overlays {
        backend.instance(&mut out, overlay)?;
    }
    backend.end_namespace(&mut out, &instances)?;

    // Bitfield constants
    for peripheral in peripherals.iter().filter(|p| p.has_bitfields()) {
        let comment = format!(
            "Bitfields for {}: {}",
            peripheral.name,
            collapse_whitespace(&peripheral.description)
        );
        let ns = Namespace {
            kind: NamespaceKind::Bitfields,
            name: &peripheral.name,
            comment: &comment,
        };
        backend.begin_namespace(&mut out, &ns)?;
        for register in peripheral.registers.iter().filter(|r| !r.fields.is_empty()) {
            let name = register.full_name();
            if register.description.is_empty() {
                backend.group_comment(&mut out, &name)?;
            } else {
                backend.group_comment(&mut out, &format!("{name}: {}", register.description))?;
            }
            let bitfields = register
                .bitfields(&peripheral.name)
                .with_context(|| format!("{}.{name}", peripheral.name))?;
            for bitfield in &bitfields {
                backend.constant(
                    &mut out,
                    &Constant {
                        name: &bitfield.name,
                        value: ConstValue::Hex(bitfield.value.as_u64()),
                        comment: &bitfield.description,
                    },
                )?;
            }
        }
        backend.end_namespace(&mut out, &ns)?;
    }

    Ok(out)
}

/// Renders `device` and writes the result to `writer`.
pub fn emit(
    device: &Device,
    config: &GeneratorConfig,
    writer: &mut impl std::io::Write,
) -> anyhow::Result<()> {
    let code = render(device, config)?;
    writer
        .write_all(code.as_bytes())
        .with_context(|| format!("failed to write bindings for {}", device.name))?;
    Ok(())
}
