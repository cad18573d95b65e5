//! Host-facing session surface: peripheral port contract and the machine
//! that owns one CPU, bus, and GPU.

use crate::execute::{step, StepOutcome};
use crate::gpu::Gpu;
use crate::interrupt;
use crate::memory::Bus;
use crate::peripherals::{AudioParams, InputLatches};
use crate::{CpuState, DiagCounters, RunState};

/// Register-file contract for a peripheral window.
///
/// The address space forwards each word access inside a window as exactly
/// one `{offset, value}` transaction against the owning port. Ports never
/// fault: unassigned offsets read 0 and ignore writes.
pub trait WindowPort {
    /// Reads the register at `offset` from the window base.
    fn read_register(&mut self, offset: u32) -> u32;

    /// Writes the register at `offset` from the window base.
    fn write_register(&mut self, offset: u32, value: u32);
}

/// Aggregated outcome of a batched [`Machine::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions executed (retired or skipped) before stopping.
    pub steps: u32,
    /// The outcome of the final `step` call.
    pub last: StepOutcome,
}

/// One emulation session: CPU, address space, GPU, and peripherals,
/// single-threaded and tick-driven.
///
/// The external presentation layer reads [`Machine::framebuffer`] and
/// [`Machine::depth_buffer`] between ticks only; both are mutated solely
/// during GPU command execution inside [`Machine::step`].
#[derive(Debug, Default)]
pub struct Machine {
    /// Architectural CPU state.
    pub cpu: CpuState,
    /// Address space with GPU, peripheral windows, and diagnostics.
    pub bus: Bus,
}

impl Machine {
    /// Creates a powered-on machine with default peripheral blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a machine with caller-supplied peripheral blocks, keeping
    /// all window state explicit and session-owned.
    #[must_use]
    pub fn with_peripherals(input: InputLatches, audio: AudioParams) -> Self {
        Self {
            cpu: CpuState::new(),
            bus: Bus::with_peripherals(input, audio),
        }
    }

    /// Bring-up semantics: zeroes all CPU registers, sets `ip` to the
    /// reset entry, clears halted/interrupt state and the vector table,
    /// and resets the GPU (registers, identity matrices, cleared frame).
    /// The loaded RAM image survives so a program can be re-run.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
    }

    /// Advances the CPU by exactly one instruction. Any GPU command armed
    /// by that instruction's register write completes before this returns.
    pub fn step(&mut self) -> StepOutcome {
        step(&mut self.cpu, &mut self.bus)
    }

    /// Steps until the CPU halts or `max_steps` instructions have
    /// executed. The halting step itself is not counted as an executed
    /// instruction.
    pub fn run(&mut self, max_steps: u32) -> RunOutcome {
        let mut steps = 0;
        let mut last = StepOutcome::Idle;
        while steps < max_steps {
            last = self.step();
            match last {
                StepOutcome::Retired | StepOutcome::Skipped { .. } => steps += 1,
                StepOutcome::Halted | StepOutcome::Idle => break,
            }
        }
        RunOutcome { steps, last }
    }

    /// Host loader entry: copies an image into RAM before or between
    /// ticks.
    pub fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        self.bus.write_bytes(offset, data);
    }

    /// Installs an interrupt handler address.
    pub fn set_interrupt_vector(&mut self, vector: u8, address: u32) {
        interrupt::set_vector(&mut self.cpu, vector, address);
    }

    /// Raises an interrupt between ticks.
    pub fn trigger_interrupt(&mut self, vector: u8) {
        interrupt::trigger(&mut self.cpu, self.bus.diag_mut(), vector);
    }

    /// Returns from the current interrupt handler.
    pub fn return_from_interrupt(&mut self) {
        interrupt::return_from_interrupt(&mut self.cpu, self.bus.diag_mut());
    }

    /// The host-observable execution state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        RunState::of(&self.cpu)
    }

    /// Packed RGBA8 color plane, read-only between ticks.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        self.bus.gpu().framebuffer()
    }

    /// Depth plane, read-only between ticks.
    #[must_use]
    pub fn depth_buffer(&self) -> &[f32] {
        self.bus.gpu().depth_buffer()
    }

    /// The GPU, for host-side configuration such as the projection matrix.
    pub const fn gpu_mut(&mut self) -> &mut Gpu {
        self.bus.gpu_mut()
    }

    /// Input latches for the host input layer to deposit values between
    /// ticks.
    pub const fn input_mut(&mut self) -> &mut InputLatches {
        self.bus.input_mut()
    }

    /// Audio parameters for the external synthesizer.
    #[must_use]
    pub const fn audio(&self) -> &AudioParams {
        self.bus.audio()
    }

    /// Session diagnostics.
    #[must_use]
    pub const fn diagnostics(&self) -> &DiagCounters {
        self.bus.diag()
    }
}
