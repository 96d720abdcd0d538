//! Instruction opcodes.
//!
//! Byte values are the WebAssembly MVP encodings plus the sign-extension
//! operators. The table is declared once; the enum, byte lookup and text
//! names are generated from it.

use std::fmt;

macro_rules! opcodes {
    ($($variant:ident = $byte:literal => $name:literal,)*) => {
        /// A single-byte instruction opcode.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        #[repr(u8)]
        pub enum Opcode {
            $($variant = $byte,)*
        }

        impl Opcode {
            /// Every opcode in table order.
            pub const ALL: &[Opcode] = &[$(Opcode::$variant,)*];

            #[inline]
            pub const fn byte(self) -> u8 {
                self as u8
            }

            pub const fn from_byte(byte: u8) -> Option<Opcode> {
                match byte {
                    $($byte => Some(Opcode::$variant),)*
                    _ => None,
                }
            }

            /// Text-format mnemonic, e.g. `i32.add`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $name,)*
                }
            }
        }
    };
}

opcodes! {
    // Control
    Unreachable = 0x00 => "unreachable",
    Nop = 0x01 => "nop",
    Block = 0x02 => "block",
    Loop = 0x03 => "loop",
    If = 0x04 => "if",
    Else = 0x05 => "else",
    End = 0x0B => "end",
    Br = 0x0C => "br",
    BrIf = 0x0D => "br_if",
    Return = 0x0F => "return",
    Call = 0x10 => "call",
    Drop = 0x1A => "drop",
    Select = 0x1B => "select",

    // Variables
    LocalGet = 0x20 => "local.get",
    LocalSet = 0x21 => "local.set",
    LocalTee = 0x22 => "local.tee",
    GlobalGet = 0x23 => "global.get",
    GlobalSet = 0x24 => "global.set",

    // Constants
    I32Const = 0x41 => "i32.const",
    I64Const = 0x42 => "i64.const",
    F32Const = 0x43 => "f32.const",
    F64Const = 0x44 => "f64.const",

    // i32 comparison
    I32Eqz = 0x45 => "i32.eqz",
    I32Eq = 0x46 => "i32.eq",
    I32Ne = 0x47 => "i32.ne",
    I32LtS = 0x48 => "i32.lt_s",
    I32LtU = 0x49 => "i32.lt_u",
    I32GtS = 0x4A => "i32.gt_s",
    I32GtU = 0x4B => "i32.gt_u",
    I32LeS = 0x4C => "i32.le_s",
    I32LeU = 0x4D => "i32.le_u",
    I32GeS = 0x4E => "i32.ge_s",
    I32GeU = 0x4F => "i32.ge_u",

    // i64 comparison
    I64Eqz = 0x50 => "i64.eqz",
    I64Eq = 0x51 => "i64.eq",
    I64Ne = 0x52 => "i64.ne",
    I64LtS = 0x53 => "i64.lt_s",
    I64LtU = 0x54 => "i64.lt_u",
    I64GtS = 0x55 => "i64.gt_s",
    I64GtU = 0x56 => "i64.gt_u",
    I64LeS = 0x57 => "i64.le_s",
    I64LeU = 0x58 => "i64.le_u",
    I64GeS = 0x59 => "i64.ge_s",
    I64GeU = 0x5A => "i64.ge_u",

    // Float comparison
    F32Eq = 0x5B => "f32.eq",
    F32Ne = 0x5C => "f32.ne",
    F32Lt = 0x5D => "f32.lt",
    F32Gt = 0x5E => "f32.gt",
    F32Le = 0x5F => "f32.le",
    F32Ge = 0x60 => "f32.ge",
    F64Eq = 0x61 => "f64.eq",
    F64Ne = 0x62 => "f64.ne",
    F64Lt = 0x63 => "f64.lt",
    F64Gt = 0x64 => "f64.gt",
    F64Le = 0x65 => "f64.le",
    F64Ge = 0x66 => "f64.ge",

    // i32 arithmetic
    I32Add = 0x6A => "i32.add",
    I32Sub = 0x6B => "i32.sub",
    I32Mul = 0x6C => "i32.mul",
    I32DivS = 0x6D => "i32.div_s",
    I32DivU = 0x6E => "i32.div_u",
    I32RemS = 0x6F => "i32.rem_s",
    I32RemU = 0x70 => "i32.rem_u",
    I32And = 0x71 => "i32.and",
    I32Or = 0x72 => "i32.or",
    I32Xor = 0x73 => "i32.xor",

    // i64 arithmetic
    I64Add = 0x7C => "i64.add",
    I64Sub = 0x7D => "i64.sub",
    I64Mul = 0x7E => "i64.mul",
    I64DivS = 0x7F => "i64.div_s",
    I64DivU = 0x80 => "i64.div_u",
    I64RemS = 0x81 => "i64.rem_s",
    I64RemU = 0x82 => "i64.rem_u",
    I64And = 0x83 => "i64.and",

    // Float arithmetic
    F32Neg = 0x8C => "f32.neg",
    F32Add = 0x92 => "f32.add",
    F32Sub = 0x93 => "f32.sub",
    F32Mul = 0x94 => "f32.mul",
    F32Div = 0x95 => "f32.div",
    F64Neg = 0x9A => "f64.neg",
    F64Add = 0xA0 => "f64.add",
    F64Sub = 0xA1 => "f64.sub",
    F64Mul = 0xA2 => "f64.mul",
    F64Div = 0xA3 => "f64.div",

    // Conversions
    I32WrapI64 = 0xA7 => "i32.wrap_i64",
    I32TruncF32S = 0xA8 => "i32.trunc_f32_s",
    I32TruncF32U = 0xA9 => "i32.trunc_f32_u",
    I32TruncF64S = 0xAA => "i32.trunc_f64_s",
    I32TruncF64U = 0xAB => "i32.trunc_f64_u",
    I64ExtendI32S = 0xAC => "i64.extend_i32_s",
    I64ExtendI32U = 0xAD => "i64.extend_i32_u",
    I64TruncF32S = 0xAE => "i64.trunc_f32_s",
    I64TruncF32U = 0xAF => "i64.trunc_f32_u",
    I64TruncF64S = 0xB0 => "i64.trunc_f64_s",
    I64TruncF64U = 0xB1 => "i64.trunc_f64_u",
    F32ConvertI32S = 0xB2 => "f32.convert_i32_s",
    F32ConvertI32U = 0xB3 => "f32.convert_i32_u",
    F32ConvertI64S = 0xB4 => "f32.convert_i64_s",
    F32ConvertI64U = 0xB5 => "f32.convert_i64_u",
    F32DemoteF64 = 0xB6 => "f32.demote_f64",
    F64ConvertI32S = 0xB7 => "f64.convert_i32_s",
    F64ConvertI32U = 0xB8 => "f64.convert_i32_u",
    F64ConvertI64S = 0xB9 => "f64.convert_i64_s",
    F64ConvertI64U = 0xBA => "f64.convert_i64_u",
    F64PromoteF32 = 0xBB => "f64.promote_f32",

    // Sign extension
    I32Extend8S = 0xC0 => "i32.extend8_s",
    I32Extend16S = 0xC1 => "i32.extend16_s",
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
