// Licensed under the Apache-2.0 license

/// Parses an SVD numeric literal.
///
/// Accepts decimal or `0x`/`0X` prefixed hexadecimal, with surrounding
/// whitespace.
pub(crate) fn parse_number(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

/// Parses a `[msb:lsb]` bit range, returning `(lsb, msb)`.
pub(crate) fn parse_bit_range(text: &str) -> Option<(u64, u64)> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    let (msb, lsb) = inner.split_once(':')?;
    Some((parse_number(lsb)?, parse_number(msb)?))
}
