//! Session diagnostics: recovered-event counters.
//!
//! The core never prints or returns errors for recovered conditions; it
//! records them here and carries on. Hosts inspect the counters between
//! ticks.

use crate::{DiagClass, DiagEvent};

/// Saturating per-class counters plus the most recent recovered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DiagCounters {
    /// The most recent recovered event, if any.
    pub last_event: Option<DiagEvent>,
    /// Saturating counter for operand-class events.
    pub operand_events: u32,
    /// Saturating counter for decode-class events (unknown opcode skips).
    pub decode_events: u32,
    /// Saturating counter for interrupt-misuse events.
    pub interrupt_events: u32,
    /// Saturating counter for GPU recovery events.
    pub gpu_events: u32,
}

impl DiagCounters {
    /// Creates a fresh counter block with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a recovered event, updating the last-event slot and the
    /// matching class counter.
    pub const fn record(&mut self, event: DiagEvent) {
        self.last_event = Some(event);
        match event.class() {
            DiagClass::Operand => {
                self.operand_events = self.operand_events.saturating_add(1);
            }
            DiagClass::Decode => {
                self.decode_events = self.decode_events.saturating_add(1);
            }
            DiagClass::Interrupt => {
                self.interrupt_events = self.interrupt_events.saturating_add(1);
            }
            DiagClass::Gpu => {
                self.gpu_events = self.gpu_events.saturating_add(1);
            }
        }
    }

    /// Total recovered events across all classes, saturating.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.operand_events
            .saturating_add(self.decode_events)
            .saturating_add(self.interrupt_events)
            .saturating_add(self.gpu_events)
    }

    /// Resets all counters and clears the last-event slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
