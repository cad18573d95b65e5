/// Audio parameter block served to an external synthesizer.
pub mod audio;
/// Input latch block fed by the host input layer.
pub mod input;

pub use audio::{AudioChannel, AudioParams, Waveform, AUDIO_CHANNEL_COUNT};
pub use input::InputLatches;
