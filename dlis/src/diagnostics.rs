//! Recoverable read diagnostics.

use std::fmt;

use crate::{representation_code::UnsupportedCodeError, value::ObjectName};

/// A recoverable anomaly found while reading a physical file.
///
/// The reader collects these instead of failing, so a partially built model can still be
/// returned for a damaged file. Each diagnostic carries the position of the logical record it
/// was found in, as an offset into the logical byte stream (visible record headers excluded).
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A segment checksum does not match. The record is still returned.
    Checksum {
        /// The position of the record.
        position: u64,
    },
    /// A logical record segment header is malformed. The record is skipped.
    InvalidSegment {
        /// The position of the record.
        position: u64,
        /// A description of the problem.
        message: String,
    },
    /// The stream ends in the middle of a logical record, or a field runs past the end of the
    /// record body. The record is skipped.
    TruncatedRecord {
        /// The position of the record.
        position: u64,
    },
    /// The components of an explicitly formatted record are malformed. The record is skipped.
    Component {
        /// The position of the record.
        position: u64,
        /// A description of the problem.
        message: String,
    },
    /// A value uses an undefined representation code. The object being decoded is dropped.
    UnsupportedCode {
        /// The position of the record.
        position: u64,
        /// The undefined code.
        code: u32,
    },
    /// A frame lists a channel that no `CHANNEL` object declares. The frame is dropped.
    UnresolvedChannel {
        /// The frame name.
        frame: ObjectName,
        /// The missing channel name.
        channel: ObjectName,
    },
    /// The curves of a frame end with different row counts. Short curves are padded.
    RowCountMismatch {
        /// The frame name.
        frame: ObjectName,
    },
    /// Frame data refers to a frame that is not declared. The record is skipped.
    UnknownFrame {
        /// The position of the record.
        position: u64,
        /// The frame name.
        frame: ObjectName,
    },
    /// Records precede the first `FILE-HEADER` set. They are grouped into an implicit logical
    /// file.
    MissingFileHeader {
        /// The position of the first such record.
        position: u64,
    },
}

impl Diagnostic {
    pub(crate) fn unsupported_code(position: u64, e: UnsupportedCodeError) -> Self {
        Self::UnsupportedCode {
            position,
            code: e.0,
        }
    }

    /// Returns the position of the logical record the diagnostic refers to, if any.
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::Checksum { position }
            | Self::InvalidSegment { position, .. }
            | Self::TruncatedRecord { position }
            | Self::Component { position, .. }
            | Self::UnsupportedCode { position, .. }
            | Self::UnknownFrame { position, .. }
            | Self::MissingFileHeader { position } => Some(*position),
            Self::UnresolvedChannel { .. } | Self::RowCountMismatch { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum { position } => {
                write!(f, "record at {position}: checksum mismatch")
            }
            Self::InvalidSegment { position, message } => {
                write!(f, "record at {position}: invalid segment: {message}")
            }
            Self::TruncatedRecord { position } => {
                write!(f, "record at {position}: truncated record")
            }
            Self::Component { position, message } => {
                write!(f, "record at {position}: invalid component: {message}")
            }
            Self::UnsupportedCode { position, code } => {
                write!(f, "record at {position}: unsupported representation code: {code}")
            }
            Self::UnresolvedChannel { frame, channel } => {
                write!(f, "frame {frame}: unresolved channel: {channel}")
            }
            Self::RowCountMismatch { frame } => {
                write!(f, "frame {frame}: curve row counts differ")
            }
            Self::UnknownFrame { position, frame } => {
                write!(f, "record at {position}: unknown frame: {frame}")
            }
            Self::MissingFileHeader { position } => {
                write!(f, "record at {position}: missing FILE-HEADER")
            }
        }
    }
}

/// A collector of diagnostics.
///
/// Every diagnostic is also emitted as a `tracing` warning when it is recorded.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "recoverable error");
        self.0.push(diagnostic);
    }

    pub fn extend<I>(&mut self, diagnostics: I)
    where
        I: IntoIterator<Item = Diagnostic>,
    {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.0
    }
}
