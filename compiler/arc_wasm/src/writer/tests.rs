use super::*;
use crate::{decode, Instruction, ValueType};
use pretty_assertions::assert_eq;

#[test]
fn constants_and_locals_encode() {
    let mut w = Writer::new();
    w.write_i32_const(-1);
    w.write_local_get(3);
    w.write_opcode(Opcode::I32Add);
    assert_eq!(w.bytes(), &[0x41, 0x7F, 0x20, 0x03, 0x6A]);
}

#[test]
fn float_constants_are_little_endian() {
    let mut w = Writer::new();
    w.write_f32_const(1.0);
    assert_eq!(w.bytes(), &[0x43, 0x00, 0x00, 0x80, 0x3F]);
}

#[test]
fn immediate_call_is_not_pending() {
    let mut w = Writer::new();
    w.write_call(300);
    assert_eq!(w.bytes(), &[0x10, 0xAC, 0x02]);
    assert!(w.pending().is_empty());
}

#[test]
fn deferred_call_reserves_five_bytes() {
    let mut w = Writer::new();
    w.write_call_deferred(DeferredId::new(2));
    assert_eq!(w.len(), 6);
    assert_eq!(
        w.pending(),
        &[PatchSite {
            offset: 1,
            target: DeferredId::new(2)
        }]
    );
}

#[test]
fn patch_rewrites_in_place() {
    let mut w = Writer::new();
    w.write_i32_const(7);
    w.write_call_deferred(DeferredId::new(0));
    w.write_call_deferred(DeferredId::new(1));
    let before = w.len();

    let patched = w.patch(|id| Some(100 + id.raw()));
    assert_eq!(patched, Ok(2));
    assert_eq!(w.len(), before);
    assert!(w.pending().is_empty());

    let bytes = w.finish().unwrap_or_default();
    assert_eq!(
        decode(&bytes),
        Ok(vec![
            Instruction::I32Const(7),
            Instruction::Call(100),
            Instruction::Call(101),
        ])
    );
}

#[test]
fn patch_with_unknown_target_leaves_stream_untouched() {
    let mut w = Writer::new();
    w.write_call_deferred(DeferredId::new(0));
    w.write_call_deferred(DeferredId::new(9));
    let snapshot = w.bytes().to_vec();

    let err = w.patch(|id| (id.raw() == 0).then_some(5));
    assert_eq!(
        err,
        Err(WriterError::UnknownTarget {
            offset: 7,
            target: DeferredId::new(9)
        })
    );
    assert_eq!(w.bytes(), snapshot.as_slice());
    assert_eq!(w.pending().len(), 2);
}

#[test]
fn finish_requires_patching() {
    let mut w = Writer::new();
    w.write_call_deferred(DeferredId::new(0));
    assert_eq!(w.finish(), Err(WriterError::Unpatched { count: 1 }));
}

#[test]
fn if_else_end_shape() {
    let mut w = Writer::new();
    w.write_if(BlockType::Value(ValueType::I32));
    w.write_i32_const(1);
    w.write_else();
    w.write_i32_const(0);
    w.write_end();
    assert_eq!(
        w.bytes(),
        &[0x04, 0x7F, 0x41, 0x01, 0x05, 0x41, 0x00, 0x0B]
    );
}

#[test]
fn into_parts_keeps_pending_sites() {
    let mut w = Writer::new();
    w.write_call_deferred(DeferredId::new(4));
    let (bytes, pending) = w.into_parts();
    assert_eq!(bytes.len(), 6);
    assert_eq!(pending[0].target, DeferredId::new(4));
}
