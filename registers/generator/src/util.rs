// Licensed under the Apache-2.0 license

//! Utility functions for name conversion and formatting.

/// Converts a name to snake_case.
///
/// - Leading digits get underscore prefix
/// - Punctuation and whitespace become underscores
/// - CamelCase transitions get underscore separators
/// - Rust keywords get underscore suffix
///
/// # Examples
/// ```
/// use mcu_registers_generator::util::snake_case;
/// assert_eq!(snake_case("UARTE0"), "uarte0");
/// assert_eq!(snake_case("PwmSequence"), "pwm_sequence");
/// ```
pub fn snake_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut prev = None;
    for c in name.chars() {
        if c.is_ascii_whitespace() || c.is_ascii_punctuation() {
            if prev != Some('_') {
                result.push('_');
            }
            prev = Some('_');
            continue;
        }
        if let Some(prev) = prev {
            if (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && c.is_ascii_uppercase() {
                result.push('_');
            }
        }
        prev = Some(c);
        result.push(c.to_ascii_lowercase());
    }
    tweak_keywords(result.trim_end_matches('_')).to_string()
}

/// Turns a descriptor name into a Rust identifier, keeping its case.
///
/// Characters that cannot appear in an identifier become underscores.
///
/// # Examples
/// ```
/// use mcu_registers_generator::util::identifier;
/// assert_eq!(identifier("EVENTS_RXDRDY"), "EVENTS_RXDRDY");
/// assert_eq!(identifier("CH[%s]"), "CH__s_");
/// assert_eq!(identifier("type"), "type_");
/// ```
pub fn identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if result.starts_with(|c: char| c.is_ascii_digit()) || result.is_empty() {
        result.insert(0, '_');
    }
    tweak_keywords(&result).to_string()
}

/// Appends underscore suffix to Rust keywords to avoid conflicts.
fn tweak_keywords(s: &str) -> &str {
    match s {
        "as" => "as_",
        "break" => "break_",
        "const" => "const_",
        "continue" => "continue_",
        "crate" => "crate_",
        "else" => "else_",
        "enum" => "enum_",
        "fn" => "fn_",
        "for" => "for_",
        "if" => "if_",
        "impl" => "impl_",
        "in" => "in_",
        "let" => "let_",
        "loop" => "loop_",
        "match" => "match_",
        "mod" => "mod_",
        "move" => "move_",
        "mut" => "mut_",
        "pub" => "pub_",
        "ref" => "ref_",
        "return" => "return_",
        "self" => "self_",
        "Self" => "Self_",
        "static" => "static_",
        "struct" => "struct_",
        "super" => "super_",
        "trait" => "trait_",
        "true" => "true_",
        "type" => "type_",
        "unsafe" => "unsafe_",
        "use" => "use_",
        "where" => "where_",
        "while" => "while_",
        "async" => "async_",
        "await" => "await_",
        "dyn" => "dyn_",
        "abstract" => "abstract_",
        "become" => "become_",
        "box" => "box_",
        "do" => "do_",
        "final" => "final_",
        "macro" => "macro_",
        "override" => "override_",
        "priv" => "priv_",
        "typeof" => "typeof_",
        "unsized" => "unsized_",
        "virtual" => "virtual_",
        "yield" => "yield_",
        s => s,
    }
}

/// Formats an integer as a hex constant with underscores for readability.
///
/// Values <= 9 are formatted as decimal; larger values use hex with
/// underscore separators every 4 digits.
///
/// # Examples
/// ```
/// use mcu_registers_generator::util::hex_const;
/// assert_eq!(hex_const(5), "5");
/// assert_eq!(hex_const(0x1234), "0x1234");
/// assert_eq!(hex_const(0x40002000), "0x4000_2000");
/// ```
pub fn hex_const(val: u64) -> String {
    if val > 9 {
        let mut x = String::new();
        for (i, c) in format!("{val:x}").chars().rev().enumerate() {
            if i % 4 == 0 && i != 0 {
                x.push('_');
            }
            x.push(c);
        }
        "0x".to_string() + &x.chars().rev().collect::<String>()
    } else {
        format!("{val}")
    }
}
