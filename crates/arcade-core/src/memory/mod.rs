//! Address-space dispatcher: flat RAM plus memory-mapped peripherals.
//!
//! The whole machine is big-endian: instruction immediates and the generic
//! word helpers both assemble most-significant-byte-first. No access ever
//! faults — reads past RAM and outside every window return 0, writes there
//! are ignored.

/// Fixed window map and address decoding.
pub mod map;

pub use map::{
    decode_access, MappedRegion, Window, WindowDescriptor, AUDIO_WINDOW_BASE, AUDIO_WINDOW_BYTES,
    GPU_WINDOW_BASE, GPU_WINDOW_BYTES, INPUT_WINDOW_BASE, INPUT_WINDOW_BYTES, PERIPHERAL_WINDOWS,
    RAM_BYTES,
};

use crate::api::WindowPort;
use crate::gpu::Gpu;
use crate::peripherals::{AudioParams, InputLatches};
use crate::DiagCounters;

/// Size in bytes of one bus word.
pub const WORD_ACCESS_BYTES: u32 = 4;

/// Reads a big-endian word from a byte image; bytes past the end read 0.
#[must_use]
pub fn read_u32_be(bytes: &[u8], addr: u32) -> u32 {
    let mut value = 0_u32;
    for lane in 0..WORD_ACCESS_BYTES {
        let byte = (addr as usize)
            .checked_add(lane as usize)
            .and_then(|index| bytes.get(index))
            .copied()
            .unwrap_or(0);
        value = (value << 8) | u32::from(byte);
    }
    value
}

/// Writes a big-endian word into a byte image; bytes past the end are
/// dropped.
#[allow(clippy::cast_possible_truncation)]
pub fn write_u32_be(bytes: &mut [u8], addr: u32, value: u32) {
    for lane in 0..WORD_ACCESS_BYTES {
        let byte = (value >> (8 * (WORD_ACCESS_BYTES - 1 - lane))) as u8;
        if let Some(slot) = (addr as usize)
            .checked_add(lane as usize)
            .and_then(|index| bytes.get_mut(index))
        {
            *slot = byte;
        }
    }
}

/// The session bus: 16 MiB of RAM, the GPU, both peripheral shims, and the
/// diagnostics block. Exclusively owned by the session and accessed by one
/// logical thread of control at a time.
#[derive(Debug)]
pub struct Bus {
    ram: Box<[u8]>,
    gpu: Gpu,
    input: InputLatches,
    audio: AudioParams,
    diag: DiagCounters,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates a bus with zeroed RAM and default peripheral blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_peripherals(InputLatches::new(), AudioParams::new())
    }

    /// Creates a bus with caller-supplied peripheral blocks behind the
    /// input and audio windows.
    #[must_use]
    pub fn with_peripherals(input: InputLatches, audio: AudioParams) -> Self {
        Self {
            ram: vec![0; RAM_BYTES].into_boxed_slice(),
            gpu: Gpu::new(),
            input,
            audio,
            diag: DiagCounters::new(),
        }
    }

    /// Resets the GPU and diagnostics. The RAM image and host-latched
    /// peripheral values survive, so a loaded program can be re-run.
    pub fn reset(&mut self) {
        self.gpu.reset();
        self.diag.reset();
    }

    /// Reads one byte. Peripheral registers are word-granular: byte
    /// accesses inside a window are not forwarded and behave as unmapped.
    #[must_use]
    pub fn read_byte(&self, addr: u32) -> u8 {
        self.ram.get(addr as usize).copied().unwrap_or(0)
    }

    /// Writes one byte, ignored outside RAM.
    pub fn write_byte(&mut self, addr: u32, value: u8) {
        if let Some(slot) = self.ram.get_mut(addr as usize) {
            *slot = value;
        }
    }

    /// Reads one word. A window hit forwards a single register access at
    /// `addr - base`; otherwise four bytes compose big-endian.
    pub fn read_word(&mut self, addr: u32) -> u32 {
        match decode_access(addr) {
            MappedRegion::Window { window, offset } => {
                let Self {
                    gpu, input, audio, diag, ..
                } = self;
                match window {
                    Window::Gpu => gpu.read_register(offset, diag),
                    Window::Input => input.read_register(offset),
                    Window::Audio => audio.read_register(offset),
                }
            }
            MappedRegion::Ram | MappedRegion::Unmapped => read_u32_be(&self.ram, addr),
        }
    }

    /// Writes one word. A window hit forwards a single register access;
    /// a GPU control strobe executes its command before this returns.
    pub fn write_word(&mut self, addr: u32, value: u32) {
        match decode_access(addr) {
            MappedRegion::Window { window, offset } => {
                let Self {
                    gpu,
                    ram,
                    input,
                    audio,
                    diag,
                } = self;
                match window {
                    Window::Gpu => gpu.write_register(offset, value, ram, diag),
                    Window::Input => input.write_register(offset, value),
                    Window::Audio => audio.write_register(offset, value),
                }
            }
            MappedRegion::Ram | MappedRegion::Unmapped => {
                write_u32_be(&mut self.ram, addr, value);
            }
        }
    }

    /// Host loader entry: copies an image into RAM at `offset`, clipping
    /// anything past the end of RAM.
    pub fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        let start = offset as usize;
        if start >= RAM_BYTES {
            return;
        }
        let len = data.len().min(RAM_BYTES - start);
        self.ram[start..start + len].copy_from_slice(&data[..len]);
    }

    /// The raw RAM image.
    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// The GPU behind the GPU window.
    #[must_use]
    pub const fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    /// Mutable GPU access for host configuration (projection matrix).
    pub const fn gpu_mut(&mut self) -> &mut Gpu {
        &mut self.gpu
    }

    /// The input latch block behind the input window.
    #[must_use]
    pub const fn input(&self) -> &InputLatches {
        &self.input
    }

    /// Mutable latch access for the host input layer.
    pub const fn input_mut(&mut self) -> &mut InputLatches {
        &mut self.input
    }

    /// The audio parameter block behind the audio window.
    #[must_use]
    pub const fn audio(&self) -> &AudioParams {
        &self.audio
    }

    /// Mutable audio access for the host synthesizer.
    pub const fn audio_mut(&mut self) -> &mut AudioParams {
        &mut self.audio
    }

    /// Session diagnostics.
    #[must_use]
    pub const fn diag(&self) -> &DiagCounters {
        &self.diag
    }

    /// Mutable diagnostics access for the execute and interrupt paths.
    pub const fn diag_mut(&mut self) -> &mut DiagCounters {
        &mut self.diag
    }
}
