//! Timeline encoding: one deterministic pass over the collected events.
//!
//! The encoder walks the timeline in ascending timestamp order, resolves
//! each note to a pin, updates a single carried [`ChannelState`], and fills
//! four parallel output arrays. The per-timestamp state snapshot is the
//! *full current state*, not a diff: a pin switched on at `t=0` stays set
//! in every snapshot until an off event clears it.

use std::collections::BTreeMap;

use crate::collect::{EventCollector, NoteMode};
use crate::error::ConvertWarning;
use crate::mapping::ChannelMapping;

/// On/off bits for every output pin, carried across all timestamps.
///
/// Bit `i` corresponds to pin `i`, least-significant bit first. The word
/// is wide enough for [`MAX_CHANNELS`] pins; the serializer later narrows
/// it to the smallest type that fits the channel count.
///
/// [`MAX_CHANNELS`]: crate::mapping::MAX_CHANNELS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    bits: u32,
    channel_count: u8,
}

impl ChannelState {
    /// All pins off.
    pub fn new(channel_count: u8) -> Self {
        Self {
            bits: 0,
            channel_count,
        }
    }

    /// Switches a pin on. Pins outside the channel count are never passed
    /// in here; the mapper guarantees `pin < channel_count`.
    pub fn set(&mut self, pin: u8) {
        debug_assert!(pin < self.channel_count);
        self.bits |= 1 << pin;
    }

    /// Switches a pin off.
    pub fn clear(&mut self, pin: u8) {
        debug_assert!(pin < self.channel_count);
        self.bits &= !(1 << pin);
    }

    /// True if the pin is currently on.
    pub fn is_set(&self, pin: u8) -> bool {
        self.bits & (1 << pin) != 0
    }

    /// The full current state as one unsigned word.
    pub fn snapshot(&self) -> u32 {
        self.bits
    }
}

/// The four aligned output sequences of one conversion run.
///
/// `timestamps`, `pins`, and `values` have event granularity (one entry per
/// qualifying event, in emission order); `states` has timestamp granularity
/// (one entry per distinct input timestamp, ascending). The event-level
/// arrays must stay index-aligned; the serializer treats a disagreement as
/// fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTable {
    /// Number of output channels the state words describe.
    pub channel_count: u8,
    /// Millisecond timestamp of each emitted event, non-decreasing.
    pub timestamps: Vec<u32>,
    /// Output pin of each emitted event.
    pub pins: Vec<u8>,
    /// Velocity of each emitted on event; 0 for off events.
    pub values: Vec<u8>,
    /// Full channel state after each distinct timestamp.
    pub states: Vec<u32>,
}

impl EncodedTable {
    /// Number of emitted events.
    pub fn event_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Number of distinct input timestamps.
    pub fn distinct_timestamps(&self) -> usize {
        self.states.len()
    }
}

/// Result of an encoding pass: the table plus every recoverable condition
/// encountered along the way.
#[derive(Debug)]
pub struct EncodeOutcome {
    /// The encoded table.
    pub table: EncodedTable,
    /// Unmapped-note warnings, one per distinct note, with occurrence
    /// counts.
    pub warnings: Vec<ConvertWarning>,
}

/// Encodes the collected timeline against a mapping.
///
/// Single pass, single owned [`ChannelState`]: events at one timestamp are
/// processed in collector insertion order, then exactly one state snapshot
/// is appended for that timestamp — even when every event in the bucket
/// was skipped as unmapped, so the carried state is still observable there.
pub fn encode(collector: &EventCollector, mapping: &ChannelMapping) -> EncodeOutcome {
    let channel_count = mapping.channel_count();
    let mut state = ChannelState::new(channel_count);

    let mut table = EncodedTable {
        channel_count,
        timestamps: Vec::new(),
        pins: Vec::new(),
        values: Vec::new(),
        states: Vec::with_capacity(collector.timeline().len()),
    };
    let mut unmapped: BTreeMap<u8, u32> = BTreeMap::new();

    for (&timestamp, events) in collector.timeline() {
        for event in events {
            let Some(pin) = mapping.resolve(event.note) else {
                *unmapped.entry(event.note).or_insert(0) += 1;
                continue;
            };

            let value = match event.mode {
                NoteMode::On => {
                    state.set(pin);
                    event.velocity
                }
                NoteMode::Off => {
                    state.clear(pin);
                    0
                }
            };

            table.timestamps.push(timestamp);
            table.pins.push(pin);
            table.values.push(value);
        }
        table.states.push(state.snapshot());
    }

    let warnings = unmapped
        .into_iter()
        .map(|(note, occurrences)| ConvertWarning::UnmappedNote { note, occurrences })
        .collect();

    EncodeOutcome { table, warnings }
}
