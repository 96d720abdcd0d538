//! LEB128 variable-length integer encoding.
//!
//! Immediates (constants, local and function indices) are LEB128 encoded.
//! Call sites whose target is not known yet use the padded form: always
//! five bytes, so the final index can be written in place later without
//! shifting anything after it.

/// Width of a padded `u32`.
pub const PADDED_U32_LEN: usize = 5;

pub fn write_u32(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn write_i32(out: &mut Vec<u8>, value: i32) {
    write_i64(out, i64::from(value));
}

pub fn write_i64(out: &mut Vec<u8>, mut value: i64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        let sign_bit_clear = byte & 0x40 == 0;
        if (value == 0 && sign_bit_clear) || (value == -1 && !sign_bit_clear) {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Encode `value` into exactly five bytes.
pub fn padded_u32(value: u32) -> [u8; PADDED_U32_LEN] {
    let mut out = [0u8; PADDED_U32_LEN];
    let mut rest = value;
    for (i, slot) in out.iter_mut().enumerate() {
        let byte = (rest & 0x7F) as u8;
        rest >>= 7;
        *slot = if i + 1 < PADDED_U32_LEN { byte | 0x80 } else { byte };
    }
    out
}

/// Decode an unsigned value starting at `pos`.
///
/// Returns the value and the number of bytes read, or `None` if the input
/// ends early or the value does not fit in 32 bits.
pub fn read_u32(bytes: &[u8], pos: usize) -> Option<(u32, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;
    for (i, &byte) in bytes.get(pos..)?.iter().enumerate() {
        if shift >= 35 {
            return None;
        }
        result |= u64::from(byte & 0x7F) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return u32::try_from(result).ok().map(|v| (v, i + 1));
        }
    }
    None
}

pub fn read_i64(bytes: &[u8], pos: usize) -> Option<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in bytes.get(pos..)?.iter().enumerate() {
        if shift >= 70 {
            return None;
        }
        if shift < 64 {
            result |= i64::from(byte & 0x7F) << shift;
        }
        shift += 7;
        if byte & 0x80 == 0 {
            if shift < 64 && byte & 0x40 != 0 {
                result |= -1i64 << shift;
            }
            return Some((result, i + 1));
        }
    }
    None
}

pub fn read_i32(bytes: &[u8], pos: usize) -> Option<(i32, usize)> {
    let (value, len) = read_i64(bytes, pos)?;
    i32::try_from(value).ok().map(|v| (v, len))
}

#[cfg(test)]
mod tests;
