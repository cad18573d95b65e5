//! Input latch block mapped at the input window.
//!
//! The host's input layer latches button and analog values here between
//! ticks; the CPU sees them as read-only registers. Writes from the CPU
//! side are accepted and discarded.

use crate::api::WindowPort;

/// Offset of the start button register.
pub const INPUT_REG_START: u32 = 0x00;
/// Offset of the service button register.
pub const INPUT_REG_SERVICE: u32 = 0x04;
/// Offset of the test button register.
pub const INPUT_REG_TEST: u32 = 0x08;
/// Offset of the coin button register.
pub const INPUT_REG_COIN: u32 = 0x0C;
/// Offset of the first action button register; buttons 2–4 follow at +4.
pub const INPUT_REG_BUTTON1: u32 = 0x10;
/// Offset of action button 2.
pub const INPUT_REG_BUTTON2: u32 = 0x14;
/// Offset of action button 3.
pub const INPUT_REG_BUTTON3: u32 = 0x18;
/// Offset of action button 4.
pub const INPUT_REG_BUTTON4: u32 = 0x1C;
/// Offset of the packed direction nibble.
pub const INPUT_REG_DIRECTIONS: u32 = 0x20;
/// Offset of the steering register (i16 sign-extended).
pub const INPUT_REG_STEERING: u32 = 0x24;
/// Offset of the throttle register (i16 sign-extended).
pub const INPUT_REG_THROTTLE: u32 = 0x28;

/// Direction nibble bit for up.
pub const DIRECTION_UP: u32 = 1 << 0;
/// Direction nibble bit for down.
pub const DIRECTION_DOWN: u32 = 1 << 1;
/// Direction nibble bit for left.
pub const DIRECTION_LEFT: u32 = 1 << 2;
/// Direction nibble bit for right.
pub const DIRECTION_RIGHT: u32 = 1 << 3;

/// Latched input state for one cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct InputLatches {
    /// Start button.
    pub start: bool,
    /// Service button.
    pub service: bool,
    /// Test button.
    pub test: bool,
    /// Coin switch.
    pub coin: bool,
    /// Action button 1.
    pub button1: bool,
    /// Action button 2.
    pub button2: bool,
    /// Action button 3.
    pub button3: bool,
    /// Action button 4.
    pub button4: bool,
    /// Directional up.
    pub up: bool,
    /// Directional down.
    pub down: bool,
    /// Directional left.
    pub left: bool,
    /// Directional right.
    pub right: bool,
    /// Steering position, full i16 range.
    pub steering: i16,
    /// Throttle position, full i16 range.
    pub throttle: i16,
}

impl InputLatches {
    /// Creates a block with everything released and analogs centered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The packed up/down/left/right nibble as the CPU reads it.
    #[must_use]
    pub const fn direction_bits(&self) -> u32 {
        let mut bits = 0;
        if self.up {
            bits |= DIRECTION_UP;
        }
        if self.down {
            bits |= DIRECTION_DOWN;
        }
        if self.left {
            bits |= DIRECTION_LEFT;
        }
        if self.right {
            bits |= DIRECTION_RIGHT;
        }
        bits
    }
}

const fn button_bit(pressed: bool) -> u32 {
    if pressed {
        1
    } else {
        0
    }
}

#[allow(clippy::cast_sign_loss)]
const fn sign_extend(value: i16) -> u32 {
    value as i32 as u32
}

impl WindowPort for InputLatches {
    fn read_register(&mut self, offset: u32) -> u32 {
        match offset {
            INPUT_REG_START => button_bit(self.start),
            INPUT_REG_SERVICE => button_bit(self.service),
            INPUT_REG_TEST => button_bit(self.test),
            INPUT_REG_COIN => button_bit(self.coin),
            INPUT_REG_BUTTON1 => button_bit(self.button1),
            INPUT_REG_BUTTON2 => button_bit(self.button2),
            INPUT_REG_BUTTON3 => button_bit(self.button3),
            INPUT_REG_BUTTON4 => button_bit(self.button4),
            INPUT_REG_DIRECTIONS => self.direction_bits(),
            INPUT_REG_STEERING => sign_extend(self.steering),
            INPUT_REG_THROTTLE => sign_extend(self.throttle),
            _ => 0,
        }
    }

    fn write_register(&mut self, _offset: u32, _value: u32) {
        // The latch block is read-only from the CPU side.
    }
}
