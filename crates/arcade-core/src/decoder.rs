//! Instruction decode: reads opcode and operand bytes through the bus and
//! produces a decoded representation with its encoded width.

#![allow(clippy::similar_names)]

use crate::encoding::{skip_width, Opcode};
use crate::memory::Bus;

/// Three-operand ALU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Xor,
}

/// A decoded instruction ready for execution.
///
/// Register fields are carried as raw bytes; range policy (indices ≥ 16
/// never written) is enforced by the execute stage so a malformed operand
/// still advances the instruction pointer by the encoded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedInstruction {
    /// Load a 32-bit immediate into a register.
    LoadConst {
        /// Destination register field.
        rd: u8,
        /// Immediate value.
        value: u32,
    },
    /// Register–register ALU operation, two sources and one destination.
    Alu {
        /// Operation selector.
        op: AluOp,
        /// Destination register field.
        rd: u8,
        /// First source register field.
        ra: u8,
        /// Second source register field.
        rb: u8,
    },
    /// Bitwise complement of one source register.
    Not {
        /// Destination register field.
        rd: u8,
        /// Source register field.
        ra: u8,
    },
    /// Equality compare; writes only the zero flag.
    Compare {
        /// First source register field.
        ra: u8,
        /// Second source register field.
        rb: u8,
    },
    /// Conditional absolute jump on the zero flag.
    Branch {
        /// Branch when the zero flag is set (`beq`) or clear (`bne`).
        when_zero: bool,
        /// Absolute target address.
        target: u32,
    },
    /// Unconditional absolute jump; an out-of-RAM target halts the CPU.
    Jump {
        /// Absolute target address.
        target: u32,
    },
    /// Load a word from an absolute address.
    LoadWord {
        /// Destination register field.
        rd: u8,
        /// Absolute source address.
        addr: u32,
    },
    /// Store a word to an absolute address.
    StoreWord {
        /// Source register field.
        rs: u8,
        /// Absolute destination address.
        addr: u32,
    },
    /// Load a zero-extended byte from an absolute address.
    LoadByte {
        /// Destination register field.
        rd: u8,
        /// Absolute source address.
        addr: u32,
    },
    /// Store the low byte of a register to an absolute address.
    StoreByte {
        /// Source register field.
        rs: u8,
        /// Absolute destination address.
        addr: u32,
    },
    /// Latch the halted state.
    Halt,
    /// Unknown encoding, skipped by its documented width.
    Skip {
        /// The unrecognized opcode byte.
        opcode: u8,
        /// Bytes to skip, including the opcode byte.
        width: u32,
    },
}

impl DecodedInstruction {
    /// Encoded width in bytes, including the opcode byte.
    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            Self::LoadConst { .. }
            | Self::LoadWord { .. }
            | Self::StoreWord { .. }
            | Self::LoadByte { .. }
            | Self::StoreByte { .. } => 6,
            Self::Alu { .. } => 4,
            Self::Not { .. } | Self::Compare { .. } => 3,
            Self::Branch { .. } | Self::Jump { .. } => 5,
            Self::Halt => 1,
            Self::Skip { width, .. } => *width,
        }
    }
}

/// Fetches a big-endian 32-bit immediate from the instruction stream.
fn fetch_u32(bus: &Bus, addr: u32) -> u32 {
    let mut value = 0_u32;
    for lane in 0..4 {
        value = (value << 8) | u32::from(bus.read_byte(addr.wrapping_add(lane)));
    }
    value
}

/// Decodes the instruction at `ip`. Never fails: unknown encodings decode
/// to [`DecodedInstruction::Skip`] so the core always makes forward
/// progress.
#[must_use]
pub fn decode(bus: &Bus, ip: u32) -> DecodedInstruction {
    let opcode = bus.read_byte(ip);
    let Some(assigned) = Opcode::from_u8(opcode) else {
        return DecodedInstruction::Skip {
            opcode,
            width: skip_width(opcode),
        };
    };

    match assigned {
        Opcode::LdConst => DecodedInstruction::LoadConst {
            rd: bus.read_byte(ip.wrapping_add(1)),
            value: fetch_u32(bus, ip.wrapping_add(2)),
        },
        Opcode::Add => decode_alu(bus, ip, AluOp::Add),
        Opcode::Sub => decode_alu(bus, ip, AluOp::Sub),
        Opcode::Mul => decode_alu(bus, ip, AluOp::Mul),
        Opcode::Div => decode_alu(bus, ip, AluOp::Div),
        Opcode::And => decode_alu(bus, ip, AluOp::And),
        Opcode::Or => decode_alu(bus, ip, AluOp::Or),
        Opcode::Xor => decode_alu(bus, ip, AluOp::Xor),
        Opcode::Not => DecodedInstruction::Not {
            rd: bus.read_byte(ip.wrapping_add(1)),
            ra: bus.read_byte(ip.wrapping_add(2)),
        },
        Opcode::Cmp => DecodedInstruction::Compare {
            ra: bus.read_byte(ip.wrapping_add(1)),
            rb: bus.read_byte(ip.wrapping_add(2)),
        },
        Opcode::Beq => DecodedInstruction::Branch {
            when_zero: true,
            target: fetch_u32(bus, ip.wrapping_add(1)),
        },
        Opcode::Bne => DecodedInstruction::Branch {
            when_zero: false,
            target: fetch_u32(bus, ip.wrapping_add(1)),
        },
        Opcode::Jmp => DecodedInstruction::Jump {
            target: fetch_u32(bus, ip.wrapping_add(1)),
        },
        Opcode::LdWord => DecodedInstruction::LoadWord {
            rd: bus.read_byte(ip.wrapping_add(1)),
            addr: fetch_u32(bus, ip.wrapping_add(2)),
        },
        Opcode::StWord => DecodedInstruction::StoreWord {
            rs: bus.read_byte(ip.wrapping_add(1)),
            addr: fetch_u32(bus, ip.wrapping_add(2)),
        },
        Opcode::LdByte => DecodedInstruction::LoadByte {
            rd: bus.read_byte(ip.wrapping_add(1)),
            addr: fetch_u32(bus, ip.wrapping_add(2)),
        },
        Opcode::StByte => DecodedInstruction::StoreByte {
            rs: bus.read_byte(ip.wrapping_add(1)),
            addr: fetch_u32(bus, ip.wrapping_add(2)),
        },
        Opcode::Halt => DecodedInstruction::Halt,
    }
}

fn decode_alu(bus: &Bus, ip: u32, op: AluOp) -> DecodedInstruction {
    DecodedInstruction::Alu {
        op,
        rd: bus.read_byte(ip.wrapping_add(1)),
        ra: bus.read_byte(ip.wrapping_add(2)),
        rb: bus.read_byte(ip.wrapping_add(3)),
    }
}
