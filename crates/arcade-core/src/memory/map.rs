//! Fixed physical address map: flat RAM plus three peripheral windows.

/// Size in bytes of the flat RAM image (16 MiB).
pub const RAM_BYTES: usize = 16 * 1024 * 1024;

/// Base address of the GPU register window.
pub const GPU_WINDOW_BASE: u32 = 0xC000_0000;
/// Extent in bytes of the GPU register window.
pub const GPU_WINDOW_BYTES: u32 = 0x1000;
/// Base address of the input latch window.
pub const INPUT_WINDOW_BASE: u32 = 0xD000_0000;
/// Extent in bytes of the input latch window.
pub const INPUT_WINDOW_BYTES: u32 = 0x100;
/// Base address of the audio parameter window.
pub const AUDIO_WINDOW_BASE: u32 = 0xE000_0000;
/// Extent in bytes of the audio parameter window.
pub const AUDIO_WINDOW_BYTES: u32 = 0x200;

/// Peripheral window identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// GPU command processor register file.
    Gpu,
    /// Input latch block.
    Input,
    /// Audio parameter block.
    Audio,
}

/// Canonical descriptor for one peripheral window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowDescriptor {
    /// Window identity.
    pub window: Window,
    /// First address covered by the window.
    pub base: u32,
    /// Number of bytes covered.
    pub extent: u32,
}

impl Window {
    /// Returns the `{base, extent}` pair for this window.
    #[must_use]
    pub const fn bounds(self) -> (u32, u32) {
        match self {
            Self::Gpu => (GPU_WINDOW_BASE, GPU_WINDOW_BYTES),
            Self::Input => (INPUT_WINDOW_BASE, INPUT_WINDOW_BYTES),
            Self::Audio => (AUDIO_WINDOW_BASE, AUDIO_WINDOW_BYTES),
        }
    }

    /// Returns `true` when `addr` falls inside this window.
    #[must_use]
    pub const fn contains(self, addr: u32) -> bool {
        let (base, extent) = self.bounds();
        addr >= base && addr - base < extent
    }

    /// Returns the canonical descriptor for this window.
    #[must_use]
    pub const fn descriptor(self) -> WindowDescriptor {
        let (base, extent) = self.bounds();
        WindowDescriptor {
            window: self,
            base,
            extent,
        }
    }
}

/// Canonical window layout in ascending address order.
pub const PERIPHERAL_WINDOWS: [WindowDescriptor; 3] = [
    Window::Gpu.descriptor(),
    Window::Input.descriptor(),
    Window::Audio.descriptor(),
];

const _: () = assert_window_layout();

const fn assert_window_layout() {
    let mut index = 0;
    while index < PERIPHERAL_WINDOWS.len() {
        let descriptor = PERIPHERAL_WINDOWS[index];
        assert!(
            descriptor.base as usize >= RAM_BYTES,
            "peripheral windows must never alias ram"
        );
        assert!(
            descriptor.base.checked_add(descriptor.extent).is_some(),
            "window extent must not wrap the address space"
        );
        if index > 0 {
            let previous = PERIPHERAL_WINDOWS[index - 1];
            assert!(
                previous.base + previous.extent <= descriptor.base,
                "peripheral windows must be disjoint and ascending"
            );
        }
        index += 1;
    }
}

/// Decoded target of one access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedRegion {
    /// Backed by the flat RAM image.
    Ram,
    /// Redirected to a peripheral register file.
    Window {
        /// Which peripheral owns the address.
        window: Window,
        /// Byte offset from the window base.
        offset: u32,
    },
    /// Past RAM and outside every window: reads 0, ignores writes.
    Unmapped,
}

/// Decodes an address into its mapped region. Windows take precedence over
/// RAM; everything else is unmapped and never faults.
#[must_use]
pub const fn decode_access(addr: u32) -> MappedRegion {
    let mut index = 0;
    while index < PERIPHERAL_WINDOWS.len() {
        let descriptor = PERIPHERAL_WINDOWS[index];
        if descriptor.window.contains(addr) {
            return MappedRegion::Window {
                window: descriptor.window,
                offset: addr - descriptor.base,
            };
        }
        index += 1;
    }
    if (addr as usize) < RAM_BYTES {
        MappedRegion::Ram
    } else {
        MappedRegion::Unmapped
    }
}
