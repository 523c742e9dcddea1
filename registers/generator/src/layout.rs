// Licensed under the Apache-2.0 license

//! Memory overlay layout for one peripheral.
//!
//! Registers are walked in descriptor order with a running address cursor.
//! Gaps become padding cells; registers that start below the cursor are
//! aliases of storage already laid out and are dropped.
//!
//! ```text
//! base ─┬─ STATUS        (0x00, 4 bytes)
//!       ├─ _padding0     (0x04, 1 cell)
//!       ├─ RXBUF[4]      (0x08, 16 bytes)
//!       └─ end           (0x18)
//! ```

use log::{debug, warn};
use mcu_registers_svd::model::REGISTER_BYTES;
use mcu_registers_svd::Peripheral;

/// One entry of an overlay, with its offset from the peripheral base.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LayoutItem {
    /// Filler covering an address gap.
    Padding {
        /// Per-peripheral padding counter.
        index: usize,
        offset: u64,
        bytes: u64,
    },
    Register {
        name: String,
        offset: u64,
        /// Element count for array registers.
        array: Option<u32>,
    },
}

impl LayoutItem {
    pub fn offset(&self) -> u64 {
        match self {
            LayoutItem::Padding { offset, .. } | LayoutItem::Register { offset, .. } => *offset,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        match self {
            LayoutItem::Padding { bytes, .. } => *bytes,
            LayoutItem::Register { array, .. } => REGISTER_BYTES * u64::from(array.unwrap_or(1)),
        }
    }
}

/// Layout of one peripheral's memory overlay type.
#[derive(Clone, Debug)]
pub struct Overlay {
    /// Peripheral name.
    pub name: String,
    pub description: String,
    pub base_address: u64,
    pub items: Vec<LayoutItem>,
    /// Total size in bytes.
    pub size: u64,
}

impl Overlay {
    /// Register entries, skipping padding.
    pub fn registers(&self) -> impl Iterator<Item = &LayoutItem> {
        self.items
            .iter()
            .filter(|item| matches!(item, LayoutItem::Register { .. }))
    }
}

/// Number of whole cells needed to cover `bytes`.
pub fn padding_cells(bytes: u64) -> u64 {
    bytes / REGISTER_BYTES
}

/// Lays out `peripheral` as a padded overlay.
///
/// The peripheral must come from a validated device, which guarantees that
/// every register ends inside the address space.
pub fn compute_overlay(peripheral: &Peripheral) -> Overlay {
    let base = peripheral.base_address;
    let mut address = base;
    let mut items = Vec::new();
    let mut padding = 0;

    for register in &peripheral.registers {
        if register.address < address {
            // Deprecated or duplicate register sharing storage with an
            // earlier one.
            debug!(
                "{}: skipping {} at 0x{:x}, already covered up to 0x{address:x}",
                peripheral.name,
                register.full_name(),
                register.address
            );
            continue;
        }

        if register.address > address {
            let bytes = register.address - address;
            if bytes % REGISTER_BYTES != 0 {
                warn!(
                    "{}: gap of {bytes} bytes before {} is not a whole number of registers",
                    peripheral.name,
                    register.full_name()
                );
            }
            items.push(LayoutItem::Padding {
                index: padding,
                offset: address - base,
                bytes,
            });
            padding += 1;
            address = register.address;
        }

        items.push(LayoutItem::Register {
            name: register.full_name(),
            offset: address - base,
            array: register.array,
        });
        address += register.size();
    }

    Overlay {
        name: peripheral.name.clone(),
        description: peripheral.description.clone(),
        base_address: base,
        items,
        size: address - base,
    }
}
