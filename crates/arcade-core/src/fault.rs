use thiserror::Error;

/// Diagnostic classes used for counter aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DiagClass {
    /// Malformed operand recovered inside the execute stage.
    Operand,
    /// Unknown instruction encoding skipped by fixed width.
    Decode,
    /// Interrupt controller misuse treated as a no-op.
    Interrupt,
    /// GPU command processor recovery (stack bounds, unknown command/register).
    Gpu,
}

/// Stable taxonomy of recovered events.
///
/// None of these is fatal: every event is a local no-op plus a diagnostics
/// update. The only fatal condition in the machine is the halted CPU state,
/// which is an observable state change rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DiagEvent {
    /// A register field addressed a register index of 16 or above.
    #[error("register index out of range")]
    RegisterIndexOutOfRange,
    /// `div` with a zero divisor; destination and zero flag are preserved.
    #[error("division by zero")]
    DivideByZero,
    /// Unassigned opcode byte skipped by its documented width.
    #[error("unknown opcode skipped")]
    UnknownOpcode,
    /// Interrupt trigger while already inside a handler.
    #[error("nested interrupt suppressed")]
    NestedInterrupt,
    /// Interrupt trigger for a vector still holding the unhandled sentinel.
    #[error("interrupt vector is unset")]
    UnsetVector,
    /// Interrupt trigger with no free frame on the bounded return stack.
    #[error("interrupt return stack overflow")]
    InterruptStackOverflow,
    /// Interrupt return outside interrupt mode or with an empty stack.
    #[error("interrupt return without saved context")]
    ReturnOutsideInterrupt,
    /// Matrix push with the bounded stack already full.
    #[error("matrix stack overflow")]
    MatrixStackOverflow,
    /// Matrix pop with the bounded stack empty.
    #[error("matrix stack underflow")]
    MatrixStackUnderflow,
    /// Strobe write carrying a command opcode outside the assigned set.
    #[error("unknown gpu command")]
    UnknownGpuCommand,
    /// Access to a GPU register offset outside the register file.
    #[error("unknown gpu register")]
    UnknownGpuRegister,
}

impl DiagEvent {
    /// Returns the diagnostics class this event aggregates under.
    #[must_use]
    pub const fn class(self) -> DiagClass {
        match self {
            Self::RegisterIndexOutOfRange | Self::DivideByZero => DiagClass::Operand,
            Self::UnknownOpcode => DiagClass::Decode,
            Self::NestedInterrupt
            | Self::UnsetVector
            | Self::InterruptStackOverflow
            | Self::ReturnOutsideInterrupt => DiagClass::Interrupt,
            Self::MatrixStackOverflow
            | Self::MatrixStackUnderflow
            | Self::UnknownGpuCommand
            | Self::UnknownGpuRegister => DiagClass::Gpu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagClass, DiagEvent};

    #[test]
    fn class_mapping_matches_event_taxonomy() {
        assert_eq!(
            DiagEvent::RegisterIndexOutOfRange.class(),
            DiagClass::Operand
        );
        assert_eq!(DiagEvent::DivideByZero.class(), DiagClass::Operand);
        assert_eq!(DiagEvent::UnknownOpcode.class(), DiagClass::Decode);
        assert_eq!(DiagEvent::NestedInterrupt.class(), DiagClass::Interrupt);
        assert_eq!(DiagEvent::UnsetVector.class(), DiagClass::Interrupt);
        assert_eq!(
            DiagEvent::InterruptStackOverflow.class(),
            DiagClass::Interrupt
        );
        assert_eq!(
            DiagEvent::ReturnOutsideInterrupt.class(),
            DiagClass::Interrupt
        );
        assert_eq!(DiagEvent::MatrixStackOverflow.class(), DiagClass::Gpu);
        assert_eq!(DiagEvent::MatrixStackUnderflow.class(), DiagClass::Gpu);
        assert_eq!(DiagEvent::UnknownGpuCommand.class(), DiagClass::Gpu);
        assert_eq!(DiagEvent::UnknownGpuRegister.class(), DiagClass::Gpu);
    }

    #[test]
    fn events_render_stable_messages() {
        assert_eq!(DiagEvent::DivideByZero.to_string(), "division by zero");
        assert_eq!(
            DiagEvent::MatrixStackUnderflow.to_string(),
            "matrix stack underflow"
        );
    }
}
