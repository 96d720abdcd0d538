use super::*;
use proptest::prelude::*;

fn enc_u32(v: u32) -> Vec<u8> {
    let mut out = Vec::new();
    write_u32(&mut out, v);
    out
}

fn enc_i64(v: i64) -> Vec<u8> {
    let mut out = Vec::new();
    write_i64(&mut out, v);
    out
}

#[test]
fn unsigned_reference_encodings() {
    assert_eq!(enc_u32(0), vec![0x00]);
    assert_eq!(enc_u32(127), vec![0x7F]);
    assert_eq!(enc_u32(128), vec![0x80, 0x01]);
    assert_eq!(enc_u32(624_485), vec![0xE5, 0x8E, 0x26]);
}

#[test]
fn signed_reference_encodings() {
    assert_eq!(enc_i64(0), vec![0x00]);
    assert_eq!(enc_i64(-1), vec![0x7F]);
    assert_eq!(enc_i64(63), vec![0x3F]);
    assert_eq!(enc_i64(64), vec![0xC0, 0x00]);
    assert_eq!(enc_i64(-123_456), vec![0xC0, 0xBB, 0x78]);
}

#[test]
fn padded_is_always_five_bytes_and_decodes() {
    for v in [0, 1, 300, u32::MAX] {
        let bytes = padded_u32(v);
        assert_eq!(read_u32(&bytes, 0), Some((v, PADDED_U32_LEN)));
    }
    assert_eq!(padded_u32(0), [0x80, 0x80, 0x80, 0x80, 0x00]);
}

#[test]
fn truncated_input_is_rejected() {
    assert_eq!(read_u32(&[0x80, 0x80], 0), None);
    assert_eq!(read_i64(&[0xFF], 0), None);
    assert_eq!(read_u32(&[], 0), None);
}

#[test]
fn i32_read_rejects_wide_values() {
    let bytes = enc_i64(i64::from(i32::MAX) + 1);
    assert_eq!(read_i32(&bytes, 0), None);
}

proptest! {
    #[test]
    fn any_u32_decodes_to_itself(v in any::<u32>()) {
        let bytes = enc_u32(v);
        prop_assert_eq!(read_u32(&bytes, 0), Some((v, bytes.len())));
    }

    #[test]
    fn any_i64_decodes_to_itself(v in any::<i64>()) {
        let bytes = enc_i64(v);
        prop_assert_eq!(read_i64(&bytes, 0), Some((v, bytes.len())));
    }
}
