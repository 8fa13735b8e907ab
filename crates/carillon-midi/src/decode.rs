//! Standard MIDI File decoding into millisecond-stamped note events.
//!
//! Built on the `midly` parser. The converter core only understands
//! absolute-millisecond note on/off tuples, so this module resolves SMF
//! delta ticks against a single tempo and flattens all tracks into one
//! time-ordered event list. Tempo-map awareness is deliberately out of
//! scope: the first tempo event wins and later changes are counted so the
//! caller can warn about them.

use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use carillon_core::NoteMode;

use crate::error::DecodeError;

/// SMF default tempo (microseconds per quarter note) used when no tempo
/// meta-event is present.
pub const DEFAULT_TEMPO_US: u32 = 500_000;

/// One note event with an absolute millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    /// Absolute time from the start of the file, in milliseconds.
    pub time_ms: u32,
    /// Source MIDI channel (0-15).
    pub channel: u8,
    /// Note number (0-127).
    pub note: u8,
    /// Velocity (0-127).
    pub velocity: u8,
    /// On or off. A NoteOn with velocity 0 decodes as off.
    pub mode: NoteMode,
}

/// A fully decoded performance, buffered and time-ordered.
#[derive(Debug, Clone)]
pub struct DecodedPerformance {
    /// Note events, sorted by timestamp; events sharing a timestamp keep
    /// their file order.
    pub events: Vec<TimedEvent>,
    /// SMF ticks per quarter note.
    pub ticks_per_beat: u16,
    /// The tempo used for tick-to-millisecond conversion.
    pub tempo_us_per_beat: u32,
    /// Channel messages and sysex that are not note on/off.
    pub skipped_events: u32,
    /// Tempo meta-events after the first, ignored by the single-tempo
    /// conversion.
    pub skipped_tempo_changes: u32,
}

impl DecodedPerformance {
    /// Reads and decodes a MIDI file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let data = std::fs::read(path.as_ref())?;
        Self::parse(&data)
    }

    /// Decodes a MIDI file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let smf = Smf::parse(data)?;

        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int(),
            Timing::Timecode(_, _) => return Err(DecodeError::UnsupportedTiming),
        };

        let (tempo_us_per_beat, skipped_tempo_changes) = scan_tempo(&smf);

        let mut events = Vec::new();
        let mut skipped_events = 0u32;

        for track in &smf.tracks {
            let mut current_tick = 0u64;
            for event in track {
                current_tick += u64::from(event.delta.as_int());
                match &event.kind {
                    TrackEventKind::Midi { channel, message } => match message {
                        MidiMessage::NoteOn { key, vel } => {
                            let mode = if vel.as_int() == 0 {
                                NoteMode::Off
                            } else {
                                NoteMode::On
                            };
                            events.push(TimedEvent {
                                time_ms: ticks_to_ms(current_tick, tempo_us_per_beat, ticks_per_beat),
                                channel: channel.as_int(),
                                note: key.as_int(),
                                velocity: vel.as_int(),
                                mode,
                            });
                        }
                        MidiMessage::NoteOff { key, vel } => {
                            events.push(TimedEvent {
                                time_ms: ticks_to_ms(current_tick, tempo_us_per_beat, ticks_per_beat),
                                channel: channel.as_int(),
                                note: key.as_int(),
                                velocity: vel.as_int(),
                                mode: NoteMode::Off,
                            });
                        }
                        _ => skipped_events += 1,
                    },
                    TrackEventKind::SysEx(_) | TrackEventKind::Escape(_) => {
                        skipped_events += 1;
                    }
                    TrackEventKind::Meta(_) => {}
                }
            }
        }

        // Stable: simultaneous events keep file order across the merge.
        events.sort_by_key(|e| e.time_ms);

        Ok(Self {
            events,
            ticks_per_beat,
            tempo_us_per_beat,
            skipped_events,
            skipped_tempo_changes,
        })
    }

    /// True if the file contained no note events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Finds the tempo for the whole conversion: the first tempo meta-event in
/// track order, or the SMF default. Every further tempo event is counted.
fn scan_tempo(smf: &Smf<'_>) -> (u32, u32) {
    let mut tempo = None;
    let mut extra = 0u32;

    for track in &smf.tracks {
        for event in track {
            if let TrackEventKind::Meta(MetaMessage::Tempo(us_per_beat)) = event.kind {
                if tempo.is_none() {
                    tempo = Some(us_per_beat.as_int());
                } else {
                    extra += 1;
                }
            }
        }
    }

    (tempo.unwrap_or(DEFAULT_TEMPO_US), extra)
}

fn ticks_to_ms(ticks: u64, tempo_us_per_beat: u32, ticks_per_beat: u16) -> u32 {
    let us = ticks * u64::from(tempo_us_per_beat);
    let ms = us / (u64::from(ticks_per_beat) * 1000);
    u32::try_from(ms).unwrap_or(u32::MAX)
}
