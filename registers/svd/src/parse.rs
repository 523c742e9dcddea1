// Licensed under the Apache-2.0 license

//! SVD traversal producing the raw [`Device`] model.
//!
//! Interrupt merging happens inline while peripherals are read, so an index
//! conflict aborts the parse before any later peripheral is looked at.

use crate::error::{Error, Result};
use crate::model::{
    Arch, Device, EnumValue, Field, Interrupts, Peripheral, Register, DEFAULT_SOURCE_URL,
};
use crate::text::collapse_whitespace;
use crate::value::{parse_bit_range, parse_number};
use log::{debug, warn};
use roxmltree::Node;
use std::fmt;
use std::path::Path;

/// Location of an element inside the descriptor, used in error messages.
#[derive(Clone, Debug)]
struct ElementPath(String);

impl ElementPath {
    fn root() -> Self {
        ElementPath("device".to_string())
    }

    fn child(&self, tag: &str, name: &str) -> Self {
        ElementPath(format!("{}/{tag}[{name}]", self.0))
    }

    fn tag(&self, tag: &str) -> Self {
        ElementPath(format!("{}/{tag}", self.0))
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses the SVD file at `path`.
pub fn parse_file(path: &Path) -> Result<Device> {
    let xml = std::fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_str(&xml, &file_name)
}

/// Parses an SVD document held in memory. `file_name` is recorded as the
/// device's source file.
pub fn parse_str(xml: &str, file_name: &str) -> Result<Device> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    let path = ElementPath::root();
    if !root.has_tag_name("device") {
        return Err(Error::malformed(
            &path,
            format!("expected root element 'device', found '{}'", root.tag_name().name()),
        ));
    }

    let name = required_text(root, "name", &path)?;
    let cpu = child(root, "cpu").ok_or_else(|| Error::malformed(&path, "missing 'cpu'"))?;
    let cpu_name = required_text(cpu, "name", &path.tag("cpu"))?;
    let arch =
        Arch::from_cpu_name(&cpu_name).ok_or_else(|| Error::UnsupportedCpu(cpu_name.clone()))?;

    let mut device = Device {
        name_lower: name.to_lowercase(),
        name,
        description: optional_text(root, "description").unwrap_or_default(),
        license: optional_text(root, "licenseText").unwrap_or_default(),
        file: file_name.to_string(),
        source_url: DEFAULT_SOURCE_URL.to_string(),
        cpu_name,
        arch,
        family: optional_text(root, "series").unwrap_or_default(),
        peripherals: Vec::new(),
        interrupts: Interrupts::new(),
    };

    if let Some(peripherals) = child(root, "peripherals") {
        for el in children(peripherals, "peripheral") {
            let peripheral =
                parse_peripheral(el, &device.peripherals, &mut device.interrupts, &path)?;
            device.peripherals.push(peripheral);
        }
    }

    debug!(
        "{}: {} peripherals, {} interrupts",
        device.name,
        device.peripherals.len(),
        device.interrupts.len()
    );
    Ok(device)
}

fn parse_peripheral(
    el: Node,
    previous: &[Peripheral],
    interrupts: &mut Interrupts,
    parent: &ElementPath,
) -> Result<Peripheral> {
    let name = required_text(el, "name", &parent.tag("peripheral"))?;
    let path = parent.child("peripheral", &name);
    let base_address = required_number(el, "baseAddress", &path)?;

    let derived_from = match el.attribute("derivedFrom") {
        Some(base) => Some(previous.iter().find(|p| p.name == base).ok_or_else(|| {
            Error::malformed(&path, format!("derivedFrom unknown peripheral '{base}'"))
        })?),
        None => None,
    };

    let description = match (optional_text(el, "description"), derived_from) {
        (Some(description), _) => description,
        (None, Some(base)) => base.description.clone(),
        (None, None) => String::new(),
    };

    for intr in children(el, "interrupt") {
        let intr_name = required_text(intr, "name", &path.tag("interrupt"))?;
        let intr_path = path.child("interrupt", &intr_name);
        let index = required_number(intr, "value", &intr_path)?;
        let index = u32::try_from(index).map_err(|_| {
            Error::malformed(&intr_path, format!("interrupt index {index} out of range"))
        })?;
        interrupts.declare(&intr_name, index, &description)?;
    }

    let mut peripheral = Peripheral {
        name,
        description,
        base_address,
        registers: Vec::new(),
    };

    match child(el, "registers") {
        Some(registers) => {
            for reg_el in registers.children().filter(|n| n.is_element()) {
                match reg_el.tag_name().name() {
                    "register" => {
                        let register =
                            parse_register(&peripheral.name, reg_el, base_address, None, &path)?;
                        peripheral.registers.push(register);
                    }
                    "cluster" => parse_cluster(&mut peripheral, reg_el, &path)?,
                    _ => {}
                }
            }
        }
        None => {
            if let Some(base) = derived_from {
                // Rebase the parent's registers onto this peripheral.
                peripheral.registers = base
                    .registers
                    .iter()
                    .map(|r| {
                        let address = (r.address - base.base_address)
                            .checked_add(base_address)
                            .ok_or_else(|| {
                                Error::malformed(
                                    path.child("register", &r.full_name()),
                                    "address out of range",
                                )
                            })?;
                        Ok(Register {
                            address,
                            ..r.clone()
                        })
                    })
                    .collect::<Result<_>>()?;
            }
        }
    }

    Ok(peripheral)
}

fn parse_cluster(peripheral: &mut Peripheral, el: Node, path: &ElementPath) -> Result<()> {
    let cluster_name = required_text(el, "name", &path.tag("cluster"))?;
    if child(el, "dim").is_some() {
        warn!(
            "{}: skipping cluster {} (dimensioned clusters are not supported)",
            peripheral.name, cluster_name
        );
        return Ok(());
    }
    let cluster_path = path.child("cluster", &cluster_name);
    let offset = required_number(el, "addressOffset", &cluster_path)?;
    let cluster_base = peripheral
        .base_address
        .checked_add(offset)
        .ok_or_else(|| Error::malformed(&cluster_path, "address out of range"))?;
    let prefix = format!("{cluster_name}_");
    for reg_el in children(el, "register") {
        let register = parse_register(
            &peripheral.name,
            reg_el,
            cluster_base,
            Some(&prefix),
            &cluster_path,
        )?;
        peripheral.registers.push(register);
    }
    Ok(())
}

fn parse_register(
    peripheral: &str,
    el: Node,
    base_address: u64,
    cluster_prefix: Option<&str>,
    parent: &ElementPath,
) -> Result<Register> {
    let mut name = required_text(el, "name", &parent.tag("register"))?;
    let path = parent.child("register", &name);

    // `offset` is the spelling used by older descriptors.
    let offset_tag = if child(el, "offset").is_some() {
        "offset"
    } else {
        "addressOffset"
    };
    let address = base_address
        .checked_add(required_number(el, offset_tag, &path)?)
        .ok_or_else(|| Error::malformed(&path, "address out of range"))?;

    let array = match child(el, "dim") {
        Some(_) => {
            let dim = required_number(el, "dim", &path)?;
            let dim = u32::try_from(dim).map_err(|_| {
                Error::malformed(&path, format!("array dimension {dim} out of range"))
            })?;
            name = name.replace("[%s]", "");
            Some(dim)
        }
        None => None,
    };

    let mut fields = Vec::new();
    if let Some(fields_el) = child(el, "fields") {
        for field_el in children(fields_el, "field") {
            fields.push(parse_field(field_el, &path)?);
        }
    }

    let register = Register {
        name,
        cluster_prefix: cluster_prefix.map(str::to_string),
        address,
        description: optional_text(el, "description")
            .map(|d| collapse_whitespace(&d))
            .unwrap_or_default(),
        array,
        fields,
    };
    debug!(
        "{peripheral}: register {} at 0x{:x}",
        register.full_name(),
        register.address
    );
    Ok(register)
}

fn parse_field(el: Node, parent: &ElementPath) -> Result<Field> {
    let name = required_text(el, "name", &parent.tag("field"))?;
    let path = parent.child("field", &name);

    let (lsb, msb) = if child(el, "lsb").is_some() || child(el, "msb").is_some() {
        (
            required_number(el, "lsb", &path)?,
            required_number(el, "msb", &path)?,
        )
    } else if child(el, "bitOffset").is_some() {
        let offset = required_number(el, "bitOffset", &path)?;
        let width = required_number(el, "bitWidth", &path)?;
        if width == 0 {
            return Err(Error::malformed(&path, "bitWidth must be at least 1"));
        }
        let msb = offset
            .checked_add(width - 1)
            .ok_or_else(|| Error::malformed(&path, "bitOffset + bitWidth overflows"))?;
        (offset, msb)
    } else if let Some(range) = optional_text(el, "bitRange") {
        parse_bit_range(&range).ok_or_else(|| {
            Error::malformed(path.tag("bitRange"), format!("invalid bit range {range:?}"))
        })?
    } else {
        return Err(Error::malformed(
            &path,
            "missing bit range (lsb/msb, bitOffset/bitWidth or bitRange)",
        ));
    };
    let (lsb, msb) = match (u32::try_from(lsb), u32::try_from(msb)) {
        (Ok(lsb), Ok(msb)) => (lsb, msb),
        _ => return Err(Error::malformed(&path, format!("bit range [{msb}:{lsb}] out of range"))),
    };

    let mut enum_values = Vec::new();
    for enum_el in el.descendants().filter(|n| n.has_tag_name("enumeratedValue")) {
        let enum_name = required_text(enum_el, "name", &path.tag("enumeratedValue"))?;
        let enum_path = path.child("enumeratedValue", &enum_name);
        if child(enum_el, "value").is_none() && child(enum_el, "isDefault").is_some() {
            debug!("{enum_path}: skipping default enumerated value");
            continue;
        }
        enum_values.push(EnumValue {
            value: required_number(enum_el, "value", &enum_path)?,
            description: optional_text(enum_el, "description")
                .map(|d| collapse_whitespace(&d))
                .unwrap_or_default(),
            name: enum_name,
        });
    }

    Ok(Field {
        name,
        description: optional_text(el, "description")
            .map(|d| collapse_whitespace(&d))
            .unwrap_or_default(),
        lsb,
        msb,
        enum_values,
    })
}

/// First child element with the given tag name.
fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.tag_name().name() == tag)
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Concatenated text directly inside `node`, ignoring nested elements.
fn text_of(node: Node) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn optional_text(node: Node, tag: &str) -> Option<String> {
    child(node, tag).map(text_of)
}

fn required_text(node: Node, tag: &str, path: &ElementPath) -> Result<String> {
    let text = optional_text(node, tag)
        .ok_or_else(|| Error::malformed(path, format!("missing '{tag}'")))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::malformed(path, format!("empty '{tag}'")));
    }
    Ok(text.to_string())
}

fn required_number(node: Node, tag: &str, path: &ElementPath) -> Result<u64> {
    let text = required_text(node, tag, path)?;
    parse_number(&text)
        .ok_or_else(|| Error::malformed(path.tag(tag), format!("invalid number {text:?}")))
}
