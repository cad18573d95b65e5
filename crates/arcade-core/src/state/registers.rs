/// Number of architecturally visible general-purpose registers (`g0..g15`).
pub const GENERAL_REGISTER_COUNT: usize = 16;
/// Number of entries in the interrupt vector table.
pub const INTERRUPT_VECTOR_COUNT: usize = 256;
/// Capacity of the bounded interrupt return stack, in frames.
pub const INTERRUPT_STACK_DEPTH: usize = 16;
/// Vector table value meaning "no handler installed".
pub const UNHANDLED_VECTOR: u32 = 0;

/// One saved interrupt context: the interrupted instruction pointer and the
/// zero flag at trigger time. Both are restored exactly on return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptFrame {
    /// Instruction pointer to resume at.
    pub ip: u32,
    /// Zero flag value at the moment the interrupt was taken.
    pub zero_flag: bool,
}

/// Full architectural CPU state for the Polystar core.
///
/// Exclusively owned by the session and mutated only through the execute
/// and interrupt paths. The vector table and return stack are fixed-size
/// arrays with explicit occupancy; the core performs no allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    gpr: [u32; GENERAL_REGISTER_COUNT],
    ip: u32,
    zero_flag: bool,
    halted: bool,
    interrupt_mode: bool,
    interrupt_stack: [InterruptFrame; INTERRUPT_STACK_DEPTH],
    interrupt_top: usize,
    vectors: [u32; INTERRUPT_VECTOR_COUNT],
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            gpr: [0; GENERAL_REGISTER_COUNT],
            ip: 0,
            zero_flag: false,
            halted: false,
            interrupt_mode: false,
            interrupt_stack: [InterruptFrame::default(); INTERRUPT_STACK_DEPTH],
            interrupt_top: 0,
            vectors: [UNHANDLED_VECTOR; INTERRUPT_VECTOR_COUNT],
        }
    }
}

impl CpuState {
    /// Creates a power-on CPU state: all registers zero, `ip` at the reset
    /// entry, flags clear, no handlers installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores power-on state. The only way out of `halted`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reads a general-purpose register, or `None` for an out-of-range index.
    #[must_use]
    pub const fn gpr(&self, index: u8) -> Option<u32> {
        if (index as usize) < GENERAL_REGISTER_COUNT {
            Some(self.gpr[index as usize])
        } else {
            None
        }
    }

    /// Writes a general-purpose register. Returns `false` (and writes
    /// nothing) for an out-of-range index.
    pub const fn set_gpr(&mut self, index: u8, value: u32) -> bool {
        if (index as usize) < GENERAL_REGISTER_COUNT {
            self.gpr[index as usize] = value;
            true
        } else {
            false
        }
    }

    /// Reads the instruction pointer.
    #[must_use]
    pub const fn ip(&self) -> u32 {
        self.ip
    }

    /// Writes the instruction pointer.
    pub const fn set_ip(&mut self, value: u32) {
        self.ip = value;
    }

    /// Reads the zero flag.
    #[must_use]
    pub const fn zero_flag(&self) -> bool {
        self.zero_flag
    }

    /// Writes the zero flag. Only arithmetic/compare results do this.
    pub const fn set_zero_flag(&mut self, value: bool) {
        self.zero_flag = value;
    }

    /// Returns `true` once the CPU has halted.
    #[must_use]
    pub const fn halted(&self) -> bool {
        self.halted
    }

    /// Latches the halted state. Irreversible without [`CpuState::reset`].
    pub const fn halt(&mut self) {
        self.halted = true;
    }

    /// Returns `true` while executing inside an interrupt handler.
    #[must_use]
    pub const fn interrupt_mode(&self) -> bool {
        self.interrupt_mode
    }

    /// Reads a vector table entry. Out-of-range is impossible: the table
    /// covers the full `u8` vector space.
    #[must_use]
    pub const fn vector(&self, vector: u8) -> u32 {
        self.vectors[vector as usize]
    }

    /// Writes a vector table entry unconditionally.
    pub const fn set_vector(&mut self, vector: u8, address: u32) {
        self.vectors[vector as usize] = address;
    }

    /// Number of frames currently saved on the interrupt return stack.
    #[must_use]
    pub const fn interrupt_depth(&self) -> usize {
        self.interrupt_top
    }

    /// Saves an interrupt frame and enters interrupt mode. Returns `false`
    /// without any state change when the bounded stack is full.
    pub const fn push_interrupt_frame(&mut self, frame: InterruptFrame) -> bool {
        if self.interrupt_top < INTERRUPT_STACK_DEPTH {
            self.interrupt_stack[self.interrupt_top] = frame;
            self.interrupt_top += 1;
            self.interrupt_mode = true;
            true
        } else {
            false
        }
    }

    /// Pops the most recent interrupt frame and leaves interrupt mode.
    /// Returns `None` without any state change when the stack is empty.
    pub const fn pop_interrupt_frame(&mut self) -> Option<InterruptFrame> {
        if self.interrupt_top == 0 {
            None
        } else {
            self.interrupt_top -= 1;
            self.interrupt_mode = false;
            Some(self.interrupt_stack[self.interrupt_top])
        }
    }
}
