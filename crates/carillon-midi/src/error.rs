//! Decode error type.

use thiserror::Error;

/// Failure to decode a Standard MIDI File.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be read.
    #[error("could not read MIDI file: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a well-formed SMF stream.
    #[error("malformed MIDI file: {0}")]
    Malformed(#[from] midly::Error),

    /// SMPTE timecode division; only metrical (ticks-per-beat) timing can
    /// be converted to milliseconds here.
    #[error("SMPTE timecode timing is not supported")]
    UnsupportedTiming,
}
