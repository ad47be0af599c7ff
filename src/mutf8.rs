//! Modified UTF-8 (JVMS 4.4.7).
//!
//! Differs from standard UTF-8 in two places:
//! - U+0000 is written as the two bytes `C0 80`, so no encoded string contains a NUL byte
//! - supplementary characters (above U+FFFF) are written as a surrogate pair,
//!   each half encoded as a three-byte sequence (six bytes total)

/// Number of bytes `value` occupies in modified UTF-8.
pub fn encoded_len(value: &str) -> usize {
    if value.is_ascii() && !value.as_bytes().contains(&0) {
        // ASCII ohne NUL: identisch mit Standard-UTF-8
        return value.len();
    }
    value.chars().map(char_len).sum()
}

#[inline]
fn char_len(ch: char) -> usize {
    match ch as u32 {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        0x0800..=0xFFFF => 3,
        _ => 6,
    }
}

/// Appends the modified UTF-8 encoding of `value` to `out`.
pub fn encode_into(value: &str, out: &mut Vec<u8>) {
    if value.is_ascii() && !value.as_bytes().contains(&0) {
        out.extend_from_slice(value.as_bytes());
        return;
    }
    out.reserve(encoded_len(value));
    let mut units = [0u16; 2];
    for ch in value.chars() {
        match ch as u32 {
            0x0001..=0x007F => out.push(ch as u8),
            0x0000..=0x07FF => push_two(out, ch as u32),
            0x0800..=0xFFFF => push_three(out, ch as u32),
            _ => {
                for unit in ch.encode_utf16(&mut units).iter() {
                    push_three(out, u32::from(*unit));
                }
            }
        }
    }
}

/// Encodes `value` as modified UTF-8.
pub fn encode(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    encode_into(value, &mut out);
    out
}

#[inline]
fn push_two(out: &mut Vec<u8>, cp: u32) {
    out.push(0xC0 | ((cp >> 6) & 0x1F) as u8);
    out.push(0x80 | (cp & 0x3F) as u8);
}

#[inline]
fn push_three(out: &mut Vec<u8>, cp: u32) {
    out.push(0xE0 | ((cp >> 12) & 0x0F) as u8);
    out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
    out.push(0x80 | (cp & 0x3F) as u8);
}
