// Licensed under the Apache-2.0 license

//! Device model produced by the SVD parser.
//!
//! ```text
//! Device
//! ├── peripherals: Vec<Peripheral>       # descriptor order
//! │   └── registers: Vec<Register>       # descriptor order, aliases included
//! │       └── fields: Vec<Field>         # expand into Pos/Msk/enum constants
//! │           └── enum_values: Vec<EnumValue>
//! └── interrupts: Interrupts             # keyed by name, insertion order
//! ```
//!
//! A model is built for one descriptor, consumed by one generator run and then
//! dropped; nothing in here is shared across files.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Repository the Nordic descriptors are published from.
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/NordicSemiconductor/nrfx/tree/master/mdk";

/// Size in bytes of one register cell.
pub const REGISTER_BYTES: u64 = 4;

/// Target architecture, derived from the descriptor's CPU name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arch {
    Armv6m,
    Armv7m,
    Armv7em,
    Armv8mBase,
    Armv8mMain,
}

impl Arch {
    /// Looks up the architecture for an SVD `cpu/name` value.
    pub fn from_cpu_name(cpu: &str) -> Option<Arch> {
        match cpu {
            "CM0" | "CM0PLUS" | "CM0+" => Some(Arch::Armv6m),
            "CM3" => Some(Arch::Armv7m),
            "CM4" | "CM7" => Some(Arch::Armv7em),
            "CM23" => Some(Arch::Armv8mBase),
            "CM33" => Some(Arch::Armv8mMain),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Armv6m => "armv6m",
            Arch::Armv7m => "armv7m",
            Arch::Armv7em => "armv7em",
            Arch::Armv8mBase => "armv8m.base",
            Arch::Armv8mMain => "armv8m.main",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One microcontroller variant.
#[derive(Clone, Debug)]
pub struct Device {
    /// Canonical device name.
    pub name: String,
    /// Lowercase device name, used for output file names.
    pub name_lower: String,
    pub description: String,
    /// License text as written in the descriptor; see [`crate::text::normalize`].
    pub license: String,
    /// File name of the descriptor this device was read from.
    pub file: String,
    /// Where the descriptor was obtained from.
    pub source_url: String,
    pub cpu_name: String,
    pub arch: Arch,
    /// Device series (`series` element).
    pub family: String,
    pub peripherals: Vec<Peripheral>,
    pub interrupts: Interrupts,
}

/// A block of registers with one base address.
#[derive(Clone, Debug, Default)]
pub struct Peripheral {
    pub name: String,
    pub description: String,
    /// Absolute base address.
    pub base_address: u64,
    /// Registers in descriptor order. Not sorted by address.
    pub registers: Vec<Register>,
}

impl Peripheral {
    /// Whether any register in this peripheral has fields.
    pub fn has_bitfields(&self) -> bool {
        self.registers.iter().any(|r| !r.fields.is_empty())
    }
}

/// One addressable register, possibly an array.
#[derive(Clone, Debug, Default)]
pub struct Register {
    /// Register name with any `[%s]` placeholder removed.
    pub name: String,
    /// Prefix of the enclosing cluster, including the trailing `_`.
    pub cluster_prefix: Option<String>,
    /// Absolute address.
    pub address: u64,
    pub description: String,
    /// Number of elements for array registers, `None` for a scalar.
    pub array: Option<u32>,
    pub fields: Vec<Field>,
}

impl Register {
    /// Register name including the cluster prefix.
    pub fn full_name(&self) -> String {
        match &self.cluster_prefix {
            Some(prefix) => format!("{prefix}{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Number of bytes of address space this register occupies.
    pub fn size(&self) -> u64 {
        REGISTER_BYTES * u64::from(self.array.unwrap_or(1))
    }

    /// Expands every field into its named constants.
    ///
    /// Constants are named `{peripheral}_{clusterPrefix}{register}_{field}_{suffix}`.
    pub fn bitfields(&self, peripheral: &str) -> Result<Vec<Bitfield>> {
        let prefix = format!("{peripheral}_{}", self.full_name());
        let mut bitfields = Vec::new();
        for field in &self.fields {
            let mask = field.mask().ok_or_else(|| {
                Error::malformed(
                    format!("{prefix}_{}", field.name),
                    format!("invalid bit range [{}:{}]", field.msb, field.lsb),
                )
            })?;
            bitfields.push(Bitfield {
                name: format!("{prefix}_{}_Pos", field.name),
                description: format!("Position of {} field.", field.name),
                value: BitfieldValue::Position(field.position()),
            });
            bitfields.push(Bitfield {
                name: format!("{prefix}_{}_Msk", field.name),
                description: format!("Bit mask of {} field.", field.name),
                value: BitfieldValue::Mask(mask),
            });
            for enum_value in &field.enum_values {
                bitfields.push(Bitfield {
                    name: format!("{prefix}_{}_{}", field.name, enum_value.name),
                    description: enum_value.description.clone(),
                    value: BitfieldValue::Enum(enum_value.value),
                });
            }
        }
        Ok(bitfields)
    }
}

/// A bit range within a register.
#[derive(Clone, Debug, Default)]
pub struct Field {
    pub name: String,
    pub description: String,
    /// Lowest bit, inclusive.
    pub lsb: u32,
    /// Highest bit, inclusive.
    pub msb: u32,
    pub enum_values: Vec<EnumValue>,
}

impl Field {
    pub fn position(&self) -> u32 {
        self.lsb
    }

    /// Mask with bits `lsb..=msb` set.
    ///
    /// Returns `None` when the range is inverted, wider than 32 bits or does
    /// not fit in 64 bits.
    pub fn mask(&self) -> Option<u64> {
        let span = self.msb.checked_sub(self.lsb)?;
        if span > 31 || self.msb > 63 {
            return None;
        }
        Some((0xffff_ffff_u64 >> (31 - span)) << self.lsb)
    }
}

/// A named value a field may take.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: u64,
    pub description: String,
}

/// A named constant derived from a field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bitfield {
    pub name: String,
    pub description: String,
    pub value: BitfieldValue,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BitfieldValue {
    Position(u32),
    Mask(u64),
    Enum(u64),
}

impl BitfieldValue {
    pub fn as_u64(&self) -> u64 {
        match *self {
            BitfieldValue::Position(v) => u64::from(v),
            BitfieldValue::Mask(v) | BitfieldValue::Enum(v) => v,
        }
    }
}

/// An interrupt vector, possibly shared by several peripherals.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interrupt {
    pub name: String,
    pub index: u32,
    /// Descriptions of every declaring peripheral, joined with `" // "`.
    pub description: String,
}

/// Interrupts keyed by name, iterated in the order they were first declared.
#[derive(Clone, Debug, Default)]
pub struct Interrupts {
    entries: Vec<Interrupt>,
    by_name: HashMap<String, usize>,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration of `name` at `index`.
    ///
    /// The first declaration fixes the index. Later declarations must agree
    /// and append their description.
    pub fn declare(&mut self, name: &str, index: u32, description: &str) -> Result<()> {
        match self.by_name.get(name) {
            Some(&pos) => {
                let existing = &mut self.entries[pos];
                if existing.index != index {
                    return Err(Error::InterruptIndexConflict {
                        name: name.to_string(),
                        expected: existing.index,
                        found: index,
                    });
                }
                existing.description.push_str(" // ");
                existing.description.push_str(description);
            }
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push(Interrupt {
                    name: name.to_string(),
                    index,
                    description: description.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Interrupt> {
        self.by_name.get(name).map(|&pos| &self.entries[pos])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interrupt> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest interrupt index, if any interrupt is declared.
    pub fn max_index(&self) -> Option<u32> {
        self.entries.iter().map(|i| i.index).max()
    }

    pub(crate) fn position_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}

impl<'a> IntoIterator for &'a Interrupts {
    type Item = &'a Interrupt;
    type IntoIter = std::slice::Iter<'a, Interrupt>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
