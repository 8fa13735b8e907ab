//! Note-to-pin resolution.
//!
//! A [`ChannelMapping`] decides which physical output pin a source note
//! number drives. It comes from one of two places:
//!
//! 1. an optional JSON override file (`{"mapping": {"36": 0, ...}}`),
//!    strictly parsed and validated, or
//! 2. the default contiguous layout: `channel_count` consecutive notes
//!    starting at `first_tone`, mapped to pins `0..channel_count` in order.
//!
//! A missing or rejected override is a recoverable condition: the default
//! layout is used and the caller receives a [`ConvertWarning`] describing
//! exactly what was wrong.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ConvertWarning, MappingError};

/// Widest state word the serializer can emit, and therefore the most
/// output channels a table can address.
pub const MAX_CHANNELS: u8 = 32;

/// First note of the default layout (C2 on most instruments).
pub const DEFAULT_FIRST_TONE: u8 = 36;

/// Highest valid MIDI note number.
const MAX_NOTE: u8 = 127;

/// Which construction policy produced the active mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingSource {
    /// Loaded from an override file.
    Override,
    /// Synthesized contiguous default layout.
    Default,
}

impl MappingSource {
    /// Returns the string representation for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingSource::Override => "override",
            MappingSource::Default => "default",
        }
    }
}

impl std::fmt::Display for MappingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an override file was rejected.
///
/// [`ChannelMapping::load_or_default`] downgrades these to warnings and
/// falls back to the default layout; `carillon check-mapping` surfaces
/// them as hard errors.
#[derive(Debug, Error)]
pub enum OverrideError {
    /// The file does not exist.
    #[error("mapping file '{path}' not found")]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file exists but reading it failed.
    #[error("could not read mapping file '{path}': {source}")]
    Unreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file content is not the expected JSON document.
    #[error("not a valid mapping document: {0}")]
    Parse(String),

    /// The document parsed but one or more entries are invalid.
    #[error("{}", .problems.join("; "))]
    Entries {
        /// One sentence per offending entry.
        problems: Vec<String>,
    },
}

/// On-disk shape of the override file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingFile {
    mapping: BTreeMap<String, u8>,
}

/// Injective partial map from source note number to output pin index.
///
/// Immutable once constructed; the encoder only calls [`resolve`].
///
/// [`resolve`]: ChannelMapping::resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMapping {
    pins: BTreeMap<u8, u8>,
    channel_count: u8,
}

impl ChannelMapping {
    /// Builds the default contiguous layout: notes
    /// `[first_tone, first_tone + channel_count)` map to pins
    /// `[0, channel_count)` in order.
    pub fn default_layout(first_tone: u8, channel_count: u8) -> Result<Self, MappingError> {
        validate_channel_count(channel_count)?;
        if first_tone as u16 + channel_count as u16 > MAX_NOTE as u16 + 1 {
            return Err(MappingError::ToneRangeOverflow {
                first_tone,
                channel_count,
            });
        }

        let pins = (0..channel_count)
            .map(|pin| (first_tone + pin, pin))
            .collect();
        Ok(Self {
            pins,
            channel_count,
        })
    }

    /// Parses and validates an override file.
    ///
    /// Every entry must use a note key in `0..=127` and a pin in
    /// `[0, channel_count)`, and no two notes may share a pin. All
    /// offending entries are reported together, not just the first.
    pub fn load_override(path: &Path, channel_count: u8) -> Result<Self, OverrideError> {
        validate_channel_count(channel_count).map_err(|e| OverrideError::Parse(e.to_string()))?;

        if !path.exists() {
            return Err(OverrideError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| OverrideError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let file: MappingFile =
            serde_json::from_str(&content).map_err(|e| OverrideError::Parse(e.to_string()))?;

        let mut pins: BTreeMap<u8, u8> = BTreeMap::new();
        let mut pin_owner: BTreeMap<u8, u8> = BTreeMap::new();
        let mut problems = Vec::new();

        for (key, &pin) in &file.mapping {
            let note = match key.parse::<u8>() {
                Ok(note) if note <= MAX_NOTE => note,
                _ => {
                    problems.push(format!("'{}' is not a MIDI note number (0-127)", key));
                    continue;
                }
            };
            if pin >= channel_count {
                problems.push(format!(
                    "note {}: pin {} is out of range (0-{})",
                    note,
                    pin,
                    channel_count - 1
                ));
                continue;
            }
            if let Some(&other) = pin_owner.get(&pin) {
                problems.push(format!(
                    "pin {} is assigned to both note {} and note {}",
                    pin, other, note
                ));
                continue;
            }
            pin_owner.insert(pin, note);
            pins.insert(note, pin);
        }

        if !problems.is_empty() {
            return Err(OverrideError::Entries { problems });
        }

        Ok(Self {
            pins,
            channel_count,
        })
    }

    /// Loads the override if one was requested, falling back to the
    /// default layout on any recoverable failure.
    ///
    /// # Returns
    /// The mapping, which policy produced it, and the warnings describing
    /// any fallback that happened. Only construction-time errors (invalid
    /// channel count or tone range) are fatal.
    pub fn load_or_default(
        override_path: Option<&Path>,
        first_tone: u8,
        channel_count: u8,
    ) -> Result<(Self, MappingSource, Vec<ConvertWarning>), MappingError> {
        validate_channel_count(channel_count)?;

        let mut warnings = Vec::new();
        if let Some(path) = override_path {
            match Self::load_override(path, channel_count) {
                Ok(mapping) => return Ok((mapping, MappingSource::Override, warnings)),
                Err(OverrideError::NotFound { path }) => {
                    warnings.push(ConvertWarning::MappingFileMissing { path });
                }
                Err(OverrideError::Unreadable { path, source }) => {
                    warnings.push(ConvertWarning::MappingFileUnreadable {
                        path,
                        detail: source.to_string(),
                    });
                }
                Err(err @ (OverrideError::Parse(_) | OverrideError::Entries { .. })) => {
                    warnings.push(ConvertWarning::MappingFileInvalid {
                        path: path.to_path_buf(),
                        detail: err.to_string(),
                    });
                }
            }
        }

        let mapping = Self::default_layout(first_tone, channel_count)?;
        Ok((mapping, MappingSource::Default, warnings))
    }

    /// Resolves a note to its output pin, or `None` if the note has no
    /// assignment. The caller skips unmapped notes; it must never abort.
    pub fn resolve(&self, note: u8) -> Option<u8> {
        self.pins.get(&note).copied()
    }

    /// Number of output channels this mapping addresses.
    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Number of notes with a pin assignment.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// True if no note is mapped.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Mapped `(note, pin)` pairs in ascending note order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.pins.iter().map(|(&note, &pin)| (note, pin))
    }
}

/// Derives the output channel count for a conversion run.
///
/// An explicit override wins; otherwise the count of distinct notes in the
/// performance is used, matching the one-pin-per-note hardware layout.
pub fn resolve_channel_count(
    distinct_notes: usize,
    override_count: Option<u8>,
) -> Result<u8, MappingError> {
    let count = match override_count {
        Some(count) => count,
        None => {
            if distinct_notes > MAX_CHANNELS as usize {
                return Err(MappingError::TooManyChannels {
                    requested: distinct_notes,
                    max: MAX_CHANNELS,
                });
            }
            distinct_notes as u8
        }
    };
    validate_channel_count(count)?;
    Ok(count)
}

fn validate_channel_count(channel_count: u8) -> Result<(), MappingError> {
    if channel_count == 0 {
        return Err(MappingError::NoChannels);
    }
    if channel_count > MAX_CHANNELS {
        return Err(MappingError::TooManyChannels {
            requested: channel_count as usize,
            max: MAX_CHANNELS,
        });
    }
    Ok(())
}
