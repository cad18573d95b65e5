//! Audio parameter block mapped at the audio window.
//!
//! The core only stores and serves these values; an external synthesizer
//! reads them between ticks to produce sound. The whole block is
//! read/write from the CPU side.

#![allow(clippy::option_if_let_else)]

use crate::api::WindowPort;

/// Number of audio channels.
pub const AUDIO_CHANNEL_COUNT: usize = 8;

/// Offset of the global enable register.
pub const AUDIO_REG_ENABLE: u32 = 0x00;
/// Offset of the master volume register (0–255).
pub const AUDIO_REG_MASTER_VOLUME: u32 = 0x04;
/// Offset of the first channel block; each block is `AUDIO_CHANNEL_STRIDE`
/// bytes.
pub const AUDIO_CHANNEL_BLOCK_BASE: u32 = 0x10;
/// Byte stride between channel blocks.
pub const AUDIO_CHANNEL_STRIDE: u32 = 0x10;
/// Channel-relative offset of the enable register.
pub const AUDIO_CHANNEL_REG_ENABLE: u32 = 0x00;
/// Channel-relative offset of the frequency register.
pub const AUDIO_CHANNEL_REG_FREQUENCY: u32 = 0x04;
/// Channel-relative offset of the volume register.
pub const AUDIO_CHANNEL_REG_VOLUME: u32 = 0x08;
/// Channel-relative offset of the waveform register.
pub const AUDIO_CHANNEL_REG_WAVEFORM: u32 = 0x0C;

/// Waveform shapes selectable per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Waveform {
    /// Sine wave.
    Sine = 0,
    /// Square wave.
    Square = 1,
    /// Triangle wave.
    Triangle = 2,
    /// Sawtooth wave.
    Sawtooth = 3,
}

impl Waveform {
    /// Decodes the two-bit waveform field.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Sine,
            1 => Self::Square,
            2 => Self::Triangle,
            _ => Self::Sawtooth,
        }
    }
}

/// Parameters for one synthesizer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AudioChannel {
    /// Channel gate.
    pub enabled: bool,
    /// Oscillator frequency in Hz.
    pub frequency: u16,
    /// Channel volume (0–255).
    pub volume: u8,
    /// Waveform selector, always masked to `0..=3`.
    pub waveform: u8,
}

impl AudioChannel {
    /// The decoded waveform shape for this channel.
    #[must_use]
    pub const fn waveform_shape(&self) -> Waveform {
        Waveform::from_bits(self.waveform)
    }
}

/// The full audio parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AudioParams {
    /// Global output gate.
    pub enabled: bool,
    /// Master volume (0–255).
    pub master_volume: u8,
    /// Per-channel parameters.
    pub channels: [AudioChannel; AUDIO_CHANNEL_COUNT],
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: 255,
            channels: [AudioChannel::default(); AUDIO_CHANNEL_COUNT],
        }
    }
}

impl AudioParams {
    /// Creates a block with output enabled at full master volume and all
    /// channels silent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn channel_for_offset(offset: u32) -> Option<(usize, u32)> {
        if offset < AUDIO_CHANNEL_BLOCK_BASE {
            return None;
        }
        let relative = offset - AUDIO_CHANNEL_BLOCK_BASE;
        let index = (relative / AUDIO_CHANNEL_STRIDE) as usize;
        if index < AUDIO_CHANNEL_COUNT {
            Some((index, relative % AUDIO_CHANNEL_STRIDE))
        } else {
            None
        }
    }
}

impl WindowPort for AudioParams {
    fn read_register(&mut self, offset: u32) -> u32 {
        match offset {
            AUDIO_REG_ENABLE => u32::from(self.enabled),
            AUDIO_REG_MASTER_VOLUME => u32::from(self.master_volume),
            _ => match Self::channel_for_offset(offset) {
                Some((index, register)) => {
                    let channel = &self.channels[index];
                    match register {
                        AUDIO_CHANNEL_REG_ENABLE => u32::from(channel.enabled),
                        AUDIO_CHANNEL_REG_FREQUENCY => u32::from(channel.frequency),
                        AUDIO_CHANNEL_REG_VOLUME => u32::from(channel.volume),
                        AUDIO_CHANNEL_REG_WAVEFORM => u32::from(channel.waveform),
                        _ => 0,
                    }
                }
                None => 0,
            },
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_register(&mut self, offset: u32, value: u32) {
        match offset {
            AUDIO_REG_ENABLE => self.enabled = value != 0,
            AUDIO_REG_MASTER_VOLUME => self.master_volume = value as u8,
            _ => {
                if let Some((index, register)) = Self::channel_for_offset(offset) {
                    let channel = &mut self.channels[index];
                    match register {
                        AUDIO_CHANNEL_REG_ENABLE => channel.enabled = value != 0,
                        AUDIO_CHANNEL_REG_FREQUENCY => channel.frequency = value as u16,
                        AUDIO_CHANNEL_REG_VOLUME => channel.volume = value as u8,
                        AUDIO_CHANNEL_REG_WAVEFORM => channel.waveform = (value & 0x03) as u8,
                        _ => {}
                    }
                }
            }
        }
    }
}
