//! Core emulator crate for the Polystar 3D arcade platform.
//!
//! One session couples a 32-bit register CPU to a fixed-function 3D
//! coprocessor over a shared address space with memory-mapped input and
//! audio windows. Execution is single-threaded and tick-driven: each
//! [`Machine::step`] retires exactly one instruction, and any GPU command
//! it arms completes synchronously inside that call.

/// Memory model: flat RAM, peripheral windows, and the session bus.
pub mod memory;
pub use memory::{
    decode_access, read_u32_be, write_u32_be, Bus, MappedRegion, Window, WindowDescriptor,
    AUDIO_WINDOW_BASE, AUDIO_WINDOW_BYTES, GPU_WINDOW_BASE, GPU_WINDOW_BYTES, INPUT_WINDOW_BASE,
    INPUT_WINDOW_BYTES, PERIPHERAL_WINDOWS, RAM_BYTES, WORD_ACCESS_BYTES,
};

/// Recovered-event taxonomy.
pub mod fault;
pub use fault::{DiagClass, DiagEvent};

/// Session diagnostics counters.
pub mod diag;
pub use diag::DiagCounters;

/// Architectural CPU state model.
pub mod state;
pub use state::{
    CpuState, InterruptFrame, RunState, GENERAL_REGISTER_COUNT, INTERRUPT_STACK_DEPTH,
    INTERRUPT_VECTOR_COUNT, UNHANDLED_VECTOR,
};

/// Deterministic opcode and width tables.
pub mod encoding;
pub use encoding::{skip_width, Opcode, OPCODE_TABLE};

/// Instruction decode pipeline.
pub mod decoder;
pub use decoder::{decode, AluOp, DecodedInstruction};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{step, StepOutcome};

/// Single-level interrupt controller.
pub mod interrupt;

/// GPU command processor, matrix math, and raster pipeline.
pub mod gpu;
pub use gpu::matrix::Mat4;
pub use gpu::raster::{
    clip_triangle, pack_color, rasterize_triangle, render_triangle, transform_vertex,
    FrameBuffers, Triangle, Vertex, FRAME_HEIGHT, FRAME_WIDTH,
};
pub use gpu::{
    Gpu, GpuCommand, CONTROL_COMMAND_SHIFT, CONTROL_STROBE_BIT, GPU_REG_CONTROL,
    GPU_REG_INDEX_BUFFER, GPU_REG_TEXTURE_BASE, GPU_REG_VERTEX_BUFFER, MATRIX_STACK_DEPTH,
};

/// Input latch and audio parameter blocks behind the peripheral windows.
pub mod peripherals;
pub use peripherals::{AudioChannel, AudioParams, InputLatches, Waveform, AUDIO_CHANNEL_COUNT};

/// Public host-facing session API.
pub mod api;
pub use api::{Machine, RunOutcome, WindowPort};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
