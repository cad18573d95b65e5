//! System-level coverage: address-space dispatch precedence, the input and
//! audio window contracts as programs see them, and the interrupt surface.

#![allow(clippy::pedantic, clippy::nursery)]

use arcade_core::peripherals::audio::{
    AUDIO_CHANNEL_BLOCK_BASE, AUDIO_CHANNEL_REG_FREQUENCY, AUDIO_CHANNEL_REG_WAVEFORM,
    AUDIO_CHANNEL_STRIDE, AUDIO_REG_MASTER_VOLUME,
};
use arcade_core::peripherals::input::{
    DIRECTION_LEFT, DIRECTION_UP, INPUT_REG_DIRECTIONS, INPUT_REG_STEERING,
};
use arcade_core::{
    decode_access, MappedRegion, Machine, StepOutcome, Waveform, Window, AUDIO_WINDOW_BASE,
    GPU_WINDOW_BASE, INPUT_WINDOW_BASE, PERIPHERAL_WINDOWS, RAM_BYTES,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn ld(rd: u8, addr: u32) -> Vec<u8> {
    let mut bytes = vec![0xC0, rd];
    bytes.extend_from_slice(&addr.to_be_bytes());
    bytes
}

fn st(rs: u8, addr: u32) -> Vec<u8> {
    let mut bytes = vec![0xC1, rs];
    bytes.extend_from_slice(&addr.to_be_bytes());
    bytes
}

fn ld_const(rd: u8, value: u32) -> Vec<u8> {
    let mut bytes = vec![0x90, rd];
    bytes.extend_from_slice(&value.to_be_bytes());
    bytes
}

proptest! {
    /// Word reads and writes anywhere past RAM and outside every window
    /// are no-ops that read as zero.
    #[test]
    fn unmapped_word_space_is_inert(offset in 0_u32..0x0F00_0000, value in any::<u32>()) {
        let addr = u32::try_from(RAM_BYTES).unwrap() + offset;
        prop_assume!(matches!(decode_access(addr), MappedRegion::Unmapped));

        let mut machine = Machine::new();
        prop_assert_eq!(machine.bus.read_word(addr), 0);
        machine.bus.write_word(addr, value);
        prop_assert_eq!(machine.bus.read_word(addr), 0);
    }

    /// Every RAM word survives a round trip through the bus regardless of
    /// alignment.
    #[test]
    fn ram_words_round_trip(addr in 0_u32..0x00FF_FF00, value in any::<u32>()) {
        let mut machine = Machine::new();
        machine.bus.write_word(addr, value);
        prop_assert_eq!(machine.bus.read_word(addr), value);
    }
}

#[test]
fn window_decode_takes_precedence_over_ram_and_unmapped_space() {
    for descriptor in PERIPHERAL_WINDOWS {
        assert_eq!(
            decode_access(descriptor.base),
            MappedRegion::Window {
                window: descriptor.window,
                offset: 0
            }
        );
    }
    assert_eq!(decode_access(0x0000_1000), MappedRegion::Ram);
    assert_eq!(decode_access(0x4000_0000), MappedRegion::Unmapped);
    assert!(matches!(
        decode_access(GPU_WINDOW_BASE + 0x0FFC),
        MappedRegion::Window {
            window: Window::Gpu,
            ..
        }
    ));
}

/// A program polls the input window the way game code does: the latched
/// direction nibble and sign-extended steering arrive in registers.
#[test]
fn programs_read_latched_inputs_through_the_window() {
    let mut machine = Machine::new();
    machine.input_mut().up = true;
    machine.input_mut().left = true;
    machine.input_mut().steering = -16384;

    let mut program = Vec::new();
    program.extend(ld(0, INPUT_WINDOW_BASE + INPUT_REG_DIRECTIONS));
    program.extend(ld(1, INPUT_WINDOW_BASE + INPUT_REG_STEERING));
    program.push(0xFF);
    machine.write_bytes(0, &program);

    let outcome = machine.run(10);
    assert_eq!(outcome.last, StepOutcome::Halted);
    assert_eq!(machine.cpu.gpr(0), Some(DIRECTION_UP | DIRECTION_LEFT));
    assert_eq!(machine.cpu.gpr(1), Some(0xFFFF_C000));
}

/// CPU-side stores into the input window are accepted but change nothing.
#[test]
fn input_window_ignores_cpu_writes() {
    let mut machine = Machine::new();
    machine.input_mut().steering = 123;

    let mut program = Vec::new();
    program.extend(ld_const(0, 0xFFFF_FFFF));
    program.extend(st(0, INPUT_WINDOW_BASE + INPUT_REG_STEERING));
    program.extend(ld(1, INPUT_WINDOW_BASE + INPUT_REG_STEERING));
    program.push(0xFF);
    machine.write_bytes(0, &program);

    machine.run(10);
    assert_eq!(machine.cpu.gpr(1), Some(123));
    assert_eq!(machine.bus.input().steering, 123);
}

/// A program configures a synth voice; the host synthesizer sees the
/// stored parameters.
#[test]
fn programs_configure_audio_channels_for_the_external_synthesizer() {
    let mut machine = Machine::new();
    let channel2 = AUDIO_WINDOW_BASE + AUDIO_CHANNEL_BLOCK_BASE + 2 * AUDIO_CHANNEL_STRIDE;

    let mut program = Vec::new();
    program.extend(ld_const(0, 96)); // master volume
    program.extend(st(0, AUDIO_WINDOW_BASE + AUDIO_REG_MASTER_VOLUME));
    program.extend(ld_const(1, 440));
    program.extend(st(1, channel2 + AUDIO_CHANNEL_REG_FREQUENCY));
    program.extend(ld_const(2, 1));
    program.extend(st(2, channel2)); // channel enable
    program.extend(ld_const(3, 2)); // triangle wave
    program.extend(st(3, channel2 + AUDIO_CHANNEL_REG_WAVEFORM));
    program.push(0xFF);
    machine.write_bytes(0, &program);

    let outcome = machine.run(20);
    assert_eq!(outcome.last, StepOutcome::Halted);

    let audio = machine.audio();
    assert_eq!(audio.master_volume, 96);
    assert!(audio.channels[2].enabled);
    assert_eq!(audio.channels[2].frequency, 440);
    assert_eq!(audio.channels[2].waveform_shape(), Waveform::Triangle);
    assert!(!audio.channels[3].enabled);
}

/// Interrupt round trip across real instruction boundaries: the handler
/// runs, returns, and the interrupted context resumes bit-exact.
#[test]
fn interrupt_suspends_and_resumes_the_main_program() {
    let mut machine = Machine::new();

    // Main program: g0 = 1; g1 = 1; cmp g0, g1 (sets the zero flag); halt.
    let mut program = Vec::new();
    program.extend(ld_const(0, 1));
    program.extend(ld_const(1, 1));
    program.push(0xF0);
    program.extend([0x00, 0x01]); // cmp g0, g1
    program.push(0xFF);
    machine.write_bytes(0, &program);

    // Handler at 0x8000: clobber the zero flag via cmp of unequal values.
    let mut handler = Vec::new();
    handler.extend(ld_const(5, 7));
    handler.push(0xF0);
    handler.extend([0x05, 0x00]); // cmp g5, g0 -> clears the flag
    machine.write_bytes(0x8000, &handler);
    machine.set_interrupt_vector(0x20, 0x8000);

    // Run main to just after cmp: flag set, about to halt.
    for _ in 0..3 {
        assert_eq!(machine.step(), StepOutcome::Retired);
    }
    assert!(machine.cpu.zero_flag());
    let resume_ip = machine.cpu.ip();

    machine.trigger_interrupt(0x20);
    assert_eq!(machine.cpu.ip(), 0x8000);
    assert!(machine.cpu.interrupt_mode());

    // Execute the handler body; it destroys the zero flag.
    assert_eq!(machine.step(), StepOutcome::Retired);
    assert_eq!(machine.step(), StepOutcome::Retired);
    assert!(!machine.cpu.zero_flag());

    machine.return_from_interrupt();
    assert_eq!(machine.cpu.ip(), resume_ip);
    assert!(machine.cpu.zero_flag());
    assert!(!machine.cpu.interrupt_mode());

    // The main program finishes normally.
    assert_eq!(machine.step(), StepOutcome::Halted);
    assert_eq!(machine.diagnostics().total(), 0);
}

#[test]
fn interrupt_misuse_is_counted_but_never_fatal() {
    let mut machine = Machine::new();
    machine.write_bytes(0, &[0xFF]);

    machine.trigger_interrupt(3); // unset vector
    machine.return_from_interrupt(); // no context
    assert_eq!(machine.diagnostics().interrupt_events, 2);

    assert_eq!(machine.step(), StepOutcome::Halted);
}

#[test]
fn loader_populates_ram_before_and_between_ticks() {
    let mut machine = Machine::new();
    machine.write_bytes(0, &[0xC0, 0x00, 0x00, 0x00, 0x10, 0x00, 0xFF]); // ld g0, [0x1000]; halt
    machine.write_bytes(0x1000, &0xAABB_CCDD_u32.to_be_bytes());

    assert_eq!(machine.step(), StepOutcome::Retired);
    assert_eq!(machine.cpu.gpr(0), Some(0xAABB_CCDD));

    // Between ticks the loader may patch memory the program then sees.
    machine.write_bytes(0x1000, &0x1122_3344_u32.to_be_bytes());
    machine.cpu.set_ip(0);
    assert_eq!(machine.step(), StepOutcome::Retired);
    assert_eq!(machine.cpu.gpr(0), Some(0x1122_3344));
}

#[test]
fn presentation_reads_are_stable_between_ticks() {
    let mut machine = Machine::new();
    let before: Vec<u32> = machine.framebuffer().to_vec();

    // A tick that touches no GPU register leaves both planes untouched.
    machine.write_bytes(0, &[0x90, 0x00, 0x00, 0x00, 0x00, 0x01]);
    machine.step();
    assert_eq!(machine.framebuffer(), before.as_slice());
    assert!(machine.depth_buffer().iter().all(|&d| d == 1.0));
}
