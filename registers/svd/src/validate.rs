// Licensed under the Apache-2.0 license

//! Checks a parsed [`Device`] before it is handed to a generator.
//!
//! The parser already merges interrupts and records bit ranges; this pass
//! re-checks the guarantees a generator depends on so that a model built by
//! other means is held to the same rules.

use crate::error::{Error, Result};
use crate::model::Device;
use log::debug;
use std::collections::HashMap;

/// Validates `device`.
///
/// Guarantees on success:
/// - every interrupt name maps to exactly one index,
/// - every field has a usable bit range, so both its position and mask
///   constants exist,
/// - every array register has at least one element,
/// - every register ends inside the 64-bit address space, so layout
///   arithmetic cannot overflow.
///
/// Register order is left untouched: generators rely on descriptor order to
/// recognize aliased registers.
pub fn validate(device: &Device) -> Result<()> {
    let mut indices: HashMap<&str, u32> = HashMap::new();
    for (pos, interrupt) in device.interrupts.iter().enumerate() {
        if let Some(&expected) = indices.get(interrupt.name.as_str()) {
            if expected != interrupt.index {
                return Err(Error::InterruptIndexConflict {
                    name: interrupt.name.clone(),
                    expected,
                    found: interrupt.index,
                });
            }
        }
        if device.interrupts.position_of(&interrupt.name) != Some(pos) {
            return Err(Error::malformed(
                format!("device/interrupt[{}]", interrupt.name),
                "interrupt declared more than once",
            ));
        }
        indices.insert(interrupt.name.as_str(), interrupt.index);
    }

    for peripheral in &device.peripherals {
        for register in &peripheral.registers {
            let path = format!(
                "device/peripheral[{}]/register[{}]",
                peripheral.name,
                register.full_name()
            );
            if register.array == Some(0) {
                return Err(Error::malformed(&path, "array dimension must be at least 1"));
            }
            if register.address.checked_add(register.size()).is_none() {
                return Err(Error::malformed(&path, "register extends past the address space"));
            }
            for field in &register.fields {
                if field.mask().is_none() {
                    return Err(Error::malformed(
                        format!("{path}/field[{}]", field.name),
                        format!("invalid bit range [{}:{}]", field.msb, field.lsb),
                    ));
                }
            }
        }
    }

    debug!("{}: model validated", device.name);
    Ok(())
}
