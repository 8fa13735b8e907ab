//! Event collection: raw note events bucketed into a millisecond timeline.

use std::collections::{BTreeMap, BTreeSet};

/// Whether a note event starts or ends a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMode {
    /// Note starts sounding.
    On,
    /// Note stops sounding.
    Off,
}

/// One decoded note event. Immutable once recorded.
///
/// The timestamp is not stored here; it is the key of the timeline bucket
/// the event lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Source MIDI channel (0-15). Counted for diagnostics only.
    pub channel: u8,
    /// Source note number (0-127).
    pub note: u8,
    /// Note velocity (0-127).
    pub velocity: u8,
    /// On or off.
    pub mode: NoteMode,
}

/// Accumulates raw note events into a timestamp-indexed timeline.
///
/// Every event is accepted; validation (note-to-pin resolution) is deferred
/// to the mapper. Within one timestamp bucket, arrival order is preserved.
#[derive(Debug, Default)]
pub struct EventCollector {
    timeline: BTreeMap<u32, Vec<RawEvent>>,
    notes_seen: BTreeSet<u8>,
    channels_seen: BTreeSet<u8>,
    event_count: usize,
}

impl EventCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one note event at `timestamp_ms`.
    ///
    /// Repeated identical calls grow the bucket; nothing is deduplicated
    /// and nothing is rejected.
    pub fn record(&mut self, timestamp_ms: u32, channel: u8, note: u8, velocity: u8, mode: NoteMode) {
        self.notes_seen.insert(note);
        self.channels_seen.insert(channel);
        self.event_count += 1;
        self.timeline.entry(timestamp_ms).or_default().push(RawEvent {
            channel,
            note,
            velocity,
            mode,
        });
    }

    /// Number of distinct note numbers seen so far.
    ///
    /// With no mapping override, this is the output channel count.
    pub fn distinct_notes(&self) -> usize {
        self.notes_seen.len()
    }

    /// Number of distinct source MIDI channels seen so far.
    pub fn distinct_channels(&self) -> usize {
        self.channels_seen.len()
    }

    /// Total number of recorded events.
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    /// Timestamp of the earliest recorded event, if any.
    pub fn first_event_ms(&self) -> Option<u32> {
        self.timeline.keys().next().copied()
    }

    /// Timestamp of the latest recorded event, if any. Diagnostic only;
    /// encoding never consumes it.
    pub fn last_event_ms(&self) -> Option<u32> {
        self.timeline.keys().next_back().copied()
    }

    /// True if no event has been recorded.
    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    /// The timeline in ascending timestamp order.
    pub fn timeline(&self) -> &BTreeMap<u32, Vec<RawEvent>> {
        &self.timeline
    }
}
