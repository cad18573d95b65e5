/// Architectural register file and interrupt context storage.
pub mod registers;
/// Host-observable execution state machine.
pub mod run_state;

pub use registers::{
    CpuState, InterruptFrame, GENERAL_REGISTER_COUNT, INTERRUPT_STACK_DEPTH,
    INTERRUPT_VECTOR_COUNT, UNHANDLED_VECTOR,
};
pub use run_state::RunState;
