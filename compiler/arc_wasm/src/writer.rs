//! Append-only instruction stream writer.
//!
//! The writer never validates stack effects or block nesting; it encodes
//! exactly what it is told. The one piece of state beyond the byte buffer
//! is the list of deferred call sites: calls whose target function index
//! is not known until every import has been counted. Those are written
//! with a fixed-width operand and rewritten in place by [`Writer::patch`].

use std::fmt;

use crate::{leb128, BlockType, Opcode};

/// Placeholder identity of a function whose final index is assigned later.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct DeferredId(u32);

impl DeferredId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        DeferredId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeferredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A call operand waiting for its final function index.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PatchSite {
    /// Offset of the five-byte operand (not of the `call` opcode).
    pub offset: usize,
    pub target: DeferredId,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WriterError {
    #[error("call site at offset {offset} targets unknown function {target}")]
    UnknownTarget { offset: usize, target: DeferredId },

    #[error("{count} deferred call site(s) were never patched")]
    Unpatched { count: usize },
}

#[derive(Clone, Default, Debug)]
pub struct Writer {
    bytes: Vec<u8>,
    pending: Vec<PatchSite>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn write_opcode(&mut self, op: Opcode) {
        self.bytes.push(op.byte());
    }

    pub fn write_i32_const(&mut self, value: i32) {
        self.write_opcode(Opcode::I32Const);
        leb128::write_i32(&mut self.bytes, value);
    }

    pub fn write_i64_const(&mut self, value: i64) {
        self.write_opcode(Opcode::I64Const);
        leb128::write_i64(&mut self.bytes, value);
    }

    pub fn write_f32_const(&mut self, value: f32) {
        self.write_opcode(Opcode::F32Const);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64_const(&mut self, value: f64) {
        self.write_opcode(Opcode::F64Const);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_local_get(&mut self, index: u32) {
        self.write_opcode(Opcode::LocalGet);
        leb128::write_u32(&mut self.bytes, index);
    }

    pub fn write_local_set(&mut self, index: u32) {
        self.write_opcode(Opcode::LocalSet);
        leb128::write_u32(&mut self.bytes, index);
    }

    pub fn write_local_tee(&mut self, index: u32) {
        self.write_opcode(Opcode::LocalTee);
        leb128::write_u32(&mut self.bytes, index);
    }

    /// Call a function whose index is already final (a host import).
    pub fn write_call(&mut self, function_index: u32) {
        self.write_opcode(Opcode::Call);
        leb128::write_u32(&mut self.bytes, function_index);
    }

    /// Call a function whose index is assigned later.
    pub fn write_call_deferred(&mut self, target: DeferredId) {
        self.write_opcode(Opcode::Call);
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(&leb128::padded_u32(0));
        self.pending.push(PatchSite { offset, target });
    }

    pub fn write_if(&mut self, block_type: BlockType) {
        self.write_opcode(Opcode::If);
        self.bytes.push(block_type.byte());
    }

    pub fn write_else(&mut self) {
        self.write_opcode(Opcode::Else);
    }

    pub fn write_end(&mut self) {
        self.write_opcode(Opcode::End);
    }

    /// Rewrite every pending call operand with the index `resolve` gives
    /// for its target.
    ///
    /// Returns the number of sites patched. On error nothing is modified.
    pub fn patch(
        &mut self,
        resolve: impl Fn(DeferredId) -> Option<u32>,
    ) -> Result<usize, WriterError> {
        let mut resolved = Vec::with_capacity(self.pending.len());
        for site in &self.pending {
            let index = resolve(site.target).ok_or(WriterError::UnknownTarget {
                offset: site.offset,
                target: site.target,
            })?;
            resolved.push((site.offset, index));
        }

        for &(offset, index) in &resolved {
            self.bytes[offset..offset + leb128::PADDED_U32_LEN]
                .copy_from_slice(&leb128::padded_u32(index));
        }
        let count = resolved.len();
        self.pending.clear();
        tracing::debug!(count, "patched deferred call sites");
        Ok(count)
    }

    /// Call sites still waiting for [`Writer::patch`].
    pub fn pending(&self) -> &[PatchSite] {
        &self.pending
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The finished stream. Fails while call sites are still pending.
    pub fn finish(self) -> Result<Vec<u8>, WriterError> {
        if self.pending.is_empty() {
            Ok(self.bytes)
        } else {
            Err(WriterError::Unpatched {
                count: self.pending.len(),
            })
        }
    }

    /// The raw stream and its pending sites, for callers that patch after
    /// assembling a whole module.
    pub fn into_parts(self) -> (Vec<u8>, Vec<PatchSite>) {
        (self.bytes, self.pending)
    }
}

#[cfg(test)]
mod tests;
