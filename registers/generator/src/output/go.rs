// Licensed under the Apache-2.0 license

//! Go bindings: one package file per device, overlays reached through
//! `unsafe.Pointer`.

use super::{Backend, ConstValue, Constant, FileHeader, Namespace, NamespaceKind};
use crate::layout::{padding_cells, LayoutItem, Overlay};
use mcu_registers_svd::text::{collapse_whitespace, normalize};
use std::fmt::{self, Write};

const CELL: &str = "__volatile";
const LICENSE_PREFIX: &str = "//     ";

#[derive(Clone, Debug)]
pub struct GoBackend {
    package: String,
}

impl GoBackend {
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
        }
    }
}

/// Quotes `s` as a Go interpreted string literal.
fn go_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_ascii_control() => quoted.push_str(&format!("\\x{:02x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn cells(count: u64) -> String {
    if count == 1 {
        CELL.to_string()
    } else {
        format!("[{count}]{CELL}")
    }
}

impl Backend for GoBackend {
    fn extension(&self) -> &'static str {
        "go"
    }

    fn file_header(&self, out: &mut String, header: &FileHeader<'_>) -> fmt::Result {
        let device = header.device;
        writeln!(out, "// Automatically generated file. DO NOT EDIT.")?;
        writeln!(
            out,
            "// Generated by svd-gen from {}, see {}",
            device.file, header.source_url
        )?;
        writeln!(out)?;
        writeln!(out, "// +build {},{}", self.package, device.name_lower)?;
        writeln!(out)?;
        writeln!(out, "// {}", collapse_whitespace(&device.description))?;
        let license = normalize(&device.license, LICENSE_PREFIX);
        if !license.is_empty() {
            writeln!(out, "//")?;
            writeln!(out, "{LICENSE_PREFIX}{license}")?;
        }
        writeln!(out, "package {}", self.package)?;
        writeln!(out)?;
        writeln!(out, "import \"unsafe\"")?;
        writeln!(out)?;
        writeln!(out, "// Magic type name for the compiler.")?;
        writeln!(out, "type {CELL} uint32")?;
        writeln!(out)?;
        writeln!(out, "// Export this magic type name.")?;
        writeln!(out, "type RegValue = {CELL}")
    }

    fn begin_namespace(&self, out: &mut String, ns: &Namespace<'_>) -> fmt::Result {
        // Go has no block for type declarations.
        let keyword = match ns.kind {
            NamespaceKind::Constants | NamespaceKind::Bitfields => "const",
            NamespaceKind::Instances => "var",
            NamespaceKind::Overlays => return Ok(()),
        };
        writeln!(out)?;
        writeln!(out, "// {}", ns.comment)?;
        writeln!(out, "{keyword} (")
    }

    fn end_namespace(&self, out: &mut String, ns: &Namespace<'_>) -> fmt::Result {
        if ns.kind == NamespaceKind::Overlays {
            return Ok(());
        }
        writeln!(out, ")")
    }

    fn group_comment(&self, out: &mut String, text: &str) -> fmt::Result {
        if !out.ends_with("(\n") {
            writeln!(out)?;
        }
        writeln!(out, "\t// {text}")
    }

    fn constant(&self, out: &mut String, constant: &Constant<'_>) -> fmt::Result {
        write!(out, "\t{} = ", constant.name)?;
        match constant.value {
            ConstValue::Str(s) => write!(out, "{}", go_string(s))?,
            ConstValue::Dec(v) => write!(out, "{v}")?,
            ConstValue::Hex(v) => write!(out, "0x{v:x}")?,
        }
        if !constant.comment.is_empty() {
            write!(out, " // {}", constant.comment)?;
        }
        writeln!(out)
    }

    fn overlay(&self, out: &mut String, overlay: &Overlay) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "// {}", collapse_whitespace(&overlay.description))?;
        writeln!(out, "type {}_Type struct {{", overlay.name)?;
        for item in &overlay.items {
            match item {
                LayoutItem::Padding { index, bytes, .. } => {
                    let count = padding_cells(*bytes);
                    if count > 0 {
                        writeln!(out, "\t_padding{index} {}", cells(count))?;
                    }
                }
                LayoutItem::Register { name, array, .. } => match array {
                    Some(n) => writeln!(out, "\t{name} [{n}]{CELL}")?,
                    None => writeln!(out, "\t{name} {CELL}")?,
                },
            }
        }
        writeln!(out, "}}")
    }

    fn instance(&self, out: &mut String, overlay: &Overlay) -> fmt::Result {
        writeln!(
            out,
            "\t{0} = (*{0}_Type)(unsafe.Pointer(uintptr(0x{1:x}))) // {2}",
            overlay.name,
            overlay.base_address,
            collapse_whitespace(&overlay.description)
        )
    }
}
