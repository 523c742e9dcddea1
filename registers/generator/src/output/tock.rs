// Licensed under the Apache-2.0 license

//! Rust bindings built on `tock-registers`.
//!
//! ```text
//! pub mod device { pub const DEVICE: &str = "nrf51"; ... }
//! pub mod interrupts { pub const IRQ_UART0: u32 = 2; ... }
//! pub mod regs {
//!     register_structs! {
//!         pub UART0_Type {
//!             (0x0 => pub STATUS: ReadWrite<u32>),
//!             (0x4 => _padding0),
//!             (0x8 => pub RXBUF: [ReadWrite<u32>; 4]),
//!             (0x18 => @END),
//!         }
//!     }
//! }
//! pub const UART0: *const regs::UART0_Type = 0x4000_2000 as *const regs::UART0_Type;
//! pub mod uart0_bits { pub const UART0_STATUS_READY_Pos: u32 = 0; ... }
//! ```

use super::{Backend, ConstValue, Constant, FileHeader, Namespace, NamespaceKind};
use crate::layout::{LayoutItem, Overlay};
use crate::util::{hex_const, identifier, snake_case};
use mcu_registers_svd::text::{collapse_whitespace, normalize};
use std::fmt::{self, Write};

#[derive(Clone, Copy, Debug, Default)]
pub struct TockRegistersBackend;

fn doc_comment(out: &mut String, indent: &str, text: &str) -> fmt::Result {
    let text = collapse_whitespace(text);
    if !text.is_empty() {
        writeln!(out, "{indent}/// {text}")?;
    }
    Ok(())
}

/// Module name for a namespace.
///
/// Bitfield modules carry a `_bits` suffix so that a peripheral named like one
/// of the fixed modules (`device`, `interrupts`, `regs`) cannot clash with it.
fn module_name(ns: &Namespace<'_>) -> String {
    match ns.kind {
        NamespaceKind::Bitfields => format!("{}_bits", snake_case(ns.name)),
        _ => snake_case(ns.name),
    }
}

impl Backend for TockRegistersBackend {
    fn extension(&self) -> &'static str {
        "rs"
    }

    fn file_header(&self, out: &mut String, header: &FileHeader<'_>) -> fmt::Result {
        let device = header.device;
        writeln!(out, "// Licensed under the Apache-2.0 license")?;
        writeln!(out, "//")?;
        writeln!(
            out,
            "// Automatically generated from {}, see {}. DO NOT EDIT.",
            device.file, header.source_url
        )?;
        let description = collapse_whitespace(&device.description);
        if !description.is_empty() {
            writeln!(out, "//")?;
            writeln!(out, "// {description}")?;
        }
        let license = normalize(&device.license, "//     ");
        if !license.is_empty() {
            writeln!(out, "//")?;
            writeln!(out, "//     {license}")?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]"
        )
    }

    fn begin_namespace(&self, out: &mut String, ns: &Namespace<'_>) -> fmt::Result {
        writeln!(out)?;
        match ns.kind {
            NamespaceKind::Constants | NamespaceKind::Bitfields | NamespaceKind::Overlays => {
                writeln!(out, "pub mod {} {{", module_name(ns))?;
                writeln!(out, "    //! {}", ns.comment)?;
                if ns.kind == NamespaceKind::Overlays {
                    writeln!(out, "    use tock_registers::register_structs;")?;
                    writeln!(out, "    use tock_registers::registers::ReadWrite;")?;
                }
                Ok(())
            }
            NamespaceKind::Instances => writeln!(out, "// {}", ns.comment),
        }
    }

    fn end_namespace(&self, out: &mut String, ns: &Namespace<'_>) -> fmt::Result {
        match ns.kind {
            NamespaceKind::Constants | NamespaceKind::Bitfields | NamespaceKind::Overlays => {
                writeln!(out, "}}")
            }
            NamespaceKind::Instances => Ok(()),
        }
    }

    fn group_comment(&self, out: &mut String, text: &str) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "    // {text}")
    }

    fn constant(&self, out: &mut String, constant: &Constant<'_>) -> fmt::Result {
        doc_comment(out, "    ", constant.comment)?;
        let name = identifier(constant.name);
        match constant.value {
            ConstValue::Str(s) => writeln!(out, "    pub const {name}: &str = {s:?};"),
            ConstValue::Dec(v) if v <= u32::MAX.into() => {
                writeln!(out, "    pub const {name}: u32 = {v};")
            }
            ConstValue::Dec(v) => writeln!(out, "    pub const {name}: u64 = {v};"),
            ConstValue::Hex(v) if v <= u32::MAX.into() => {
                writeln!(out, "    pub const {name}: u32 = {};", hex_const(v))
            }
            ConstValue::Hex(v) => writeln!(out, "    pub const {name}: u64 = {};", hex_const(v)),
        }
    }

    fn overlay(&self, out: &mut String, overlay: &Overlay) -> fmt::Result {
        let type_name = format!("{}_Type", identifier(&overlay.name));
        if overlay.items.is_empty() {
            doc_comment(out, "    ", &overlay.description)?;
            writeln!(out, "    #[repr(C)]")?;
            return writeln!(out, "    pub struct {type_name} {{}}");
        }

        writeln!(out, "    register_structs! {{")?;
        doc_comment(out, "        ", &overlay.description)?;
        writeln!(out, "        pub {type_name} {{")?;
        for item in &overlay.items {
            match item {
                LayoutItem::Padding { index, offset, .. } => {
                    writeln!(out, "            (0x{offset:x} => _padding{index}),")?;
                }
                LayoutItem::Register {
                    name,
                    offset,
                    array,
                } => {
                    let cell = match array {
                        Some(n) => format!("[ReadWrite<u32>; {n}]"),
                        None => "ReadWrite<u32>".to_string(),
                    };
                    writeln!(
                        out,
                        "            (0x{offset:x} => pub {}: {cell}),",
                        identifier(name)
                    )?;
                }
            }
        }
        writeln!(out, "            (0x{:x} => @END),", overlay.size)?;
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")
    }

    fn instance(&self, out: &mut String, overlay: &Overlay) -> fmt::Result {
        let name = identifier(&overlay.name);
        doc_comment(out, "", &overlay.description)?;
        writeln!(
            out,
            "pub const {name}: *const regs::{name}_Type = {} as *const regs::{name}_Type;",
            hex_const(overlay.base_address)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_register_structs() {
        let overlay = Overlay {
            name: "UART0".into(),
            description: "Universal Asynchronous Receiver/Transmitter".into(),
            base_address: 0x4000_2000,
            items: vec![
                LayoutItem::Register {
                    name: "STATUS".into(),
                    offset: 0,
                    array: None,
                },
                LayoutItem::Padding {
                    index: 0,
                    offset: 4,
                    bytes: 4,
                },
                LayoutItem::Register {
                    name: "RXBUF".into(),
                    offset: 8,
                    array: Some(4),
                },
            ],
            size: 0x18,
        };
        let mut out = String::new();
        TockRegistersBackend.overlay(&mut out, &overlay).unwrap();
        assert!(out.contains("        pub UART0_Type {\n"));
        assert!(out.contains("(0x0 => pub STATUS: ReadWrite<u32>),"));
        assert!(out.contains("(0x4 => _padding0),"));
        assert!(out.contains("(0x8 => pub RXBUF: [ReadWrite<u32>; 4]),"));
        assert!(out.contains("(0x18 => @END),"));

        let mut out = String::new();
        TockRegistersBackend.instance(&mut out, &overlay).unwrap();
        assert!(out.ends_with(
            "pub const UART0: *const regs::UART0_Type = 0x4000_2000 as *const regs::UART0_Type;\n"
        ));
    }

    #[test]
    fn test_empty_overlay() {
        let overlay = Overlay {
            name: "FICR".into(),
            description: String::new(),
            base_address: 0x1000_0000,
            items: vec![],
            size: 0,
        };
        let mut out = String::new();
        TockRegistersBackend.overlay(&mut out, &overlay).unwrap();
        assert_eq!(out, "    #[repr(C)]\n    pub struct FICR_Type {}\n");
    }

    #[test]
    fn test_constant_types() {
        let mut out = String::new();
        for value in [
            ConstValue::Str("armv6m"),
            ConstValue::Dec(31),
            ConstValue::Hex(0x8000_0000),
            ConstValue::Hex(0x1_0000_0000),
        ] {
            TockRegistersBackend
                .constant(
                    &mut out,
                    &Constant {
                        name: "X",
                        value,
                        comment: "",
                    },
                )
                .unwrap();
        }
        assert_eq!(
            out,
            "    pub const X: &str = \"armv6m\";\n    pub const X: u32 = 31;\n    pub const X: u32 = 0x8000_0000;\n    pub const X: u64 = 0x1_0000_0000;\n"
        );
    }
}
