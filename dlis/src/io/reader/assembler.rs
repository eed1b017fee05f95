use std::io;

use indexmap::IndexMap;

use super::{
    component::{DecodeError, read_set_partial},
    frame_data::{read_frame_data, read_frame_name},
    logical_record::Outcome,
};
use crate::{
    Curve, Diagnostic, EncryptedRecord, Frame, IndirectRecord, LogicalFile, LogicalRecord, Set,
    diagnostics::Diagnostics,
    frame::{FromObjectError, channel_names},
    logical_record::{ChecksumStatus, Format, IndirectType},
    set::{self, Object, types},
    value::ObjectName,
};

#[derive(Debug, Default)]
struct FileBuilder {
    file: LogicalFile,
    channels: IndexMap<ObjectName, Curve>,
    frames: IndexMap<ObjectName, Frame>,
}

impl FileBuilder {
    fn add_set(&mut self, position: u64, set: Set, diagnostics: &mut Diagnostics) {
        // Redundant and replacement sets are kept but do not declare channels or frames.
        if set.kind() == set::Kind::Set {
            if set.set_type() == types::CHANNEL {
                for object in set.objects() {
                    self.add_channel(position, &set, object, diagnostics);
                }
            } else if set.set_type() == types::FRAME {
                for object in set.objects() {
                    self.add_frame(&set, object, diagnostics);
                }
            }
        }

        self.file.sets.push(set);
    }

    fn add_channel(
        &mut self,
        position: u64,
        set: &Set,
        object: &Object,
        diagnostics: &mut Diagnostics,
    ) {
        match Curve::from_object(set, object) {
            Ok(curve) => {
                self.channels.insert(object.name().clone(), curve);
            }
            Err(FromObjectError::UnsupportedCode(e)) => {
                diagnostics.push(Diagnostic::unsupported_code(position, e));
            }
            Err(e) => diagnostics.push(Diagnostic::Component {
                position,
                message: format!("channel {}: {e}", object.name()),
            }),
        }
    }

    fn add_frame(&mut self, set: &Set, object: &Object, diagnostics: &mut Diagnostics) {
        let names = channel_names(set, object);
        let mut curves = Vec::with_capacity(names.len());

        for name in names {
            match self.channels.get(name) {
                Some(curve) => curves.push(curve.clone()),
                None => {
                    diagnostics.push(Diagnostic::UnresolvedChannel {
                        frame: object.name().clone(),
                        channel: name.clone(),
                    });

                    return;
                }
            }
        }

        let frame = Frame::from_object(set, object, curves);

        tracing::debug!(frame = %frame.name(), curves = frame.curves().len(), "declared frame");

        self.frames.insert(frame.name().clone(), frame);
    }

    fn add_frame_data(&mut self, position: u64, body: &[u8], diagnostics: &mut Diagnostics) {
        let mut src = body;

        let name = match read_frame_name(&mut src) {
            Ok(name) => name,
            Err(e) => {
                diagnostics.push(frame_data_diagnostic(position, &e));
                return;
            }
        };

        let Some(frame) = self.frames.get_mut(&name) else {
            diagnostics.push(Diagnostic::UnknownFrame {
                position,
                frame: name,
            });

            return;
        };

        if let Err(e) = read_frame_data(body, frame) {
            diagnostics.push(frame_data_diagnostic(position, &e));
        }
    }

    fn finish(self, diagnostics: &mut Diagnostics) -> LogicalFile {
        let mut file = self.file;

        for (_, mut frame) in self.frames {
            let row_count = frame
                .curves
                .iter()
                .map(Curve::row_count)
                .max()
                .unwrap_or_default();

            if frame.curves.iter().any(|curve| curve.row_count() != row_count) {
                diagnostics.push(Diagnostic::RowCountMismatch {
                    frame: frame.name().clone(),
                });

                for curve in &mut frame.curves {
                    curve.pad_rows(row_count);
                }
            }

            file.frames.push(frame);
        }

        file
    }
}

/// Builds logical files from a stream of logical records.
///
/// Recoverable errors are collected as diagnostics. A `FILE-HEADER` set starts a new logical
/// file. Records that precede the first `FILE-HEADER` set are grouped into an implicit logical
/// file.
#[derive(Debug)]
pub(crate) struct Assembler {
    load_bulk_data: bool,
    logical_files: Vec<LogicalFile>,
    current: Option<FileBuilder>,
    diagnostics: Diagnostics,
}

impl Assembler {
    pub fn new(load_bulk_data: bool) -> Self {
        Self {
            load_bulk_data,
            logical_files: Vec::new(),
            current: None,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn push(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Record(record) => self.push_record(record),
            Outcome::Skipped(diagnostic) => self.diagnostics.push(diagnostic),
        }
    }

    fn push_record(&mut self, record: LogicalRecord) {
        let position = record.position;

        if record.checksum_status == ChecksumStatus::Invalid {
            self.diagnostics.push(Diagnostic::Checksum { position });
        }

        if record.is_encrypted {
            let file = current_file(&mut self.current, &mut self.diagnostics, position);

            file.file.encrypted_records.push(EncryptedRecord::new(
                record.is_explicit(),
                record.record_type,
                record.body,
            ));

            return;
        }

        match record.format {
            Format::Explicit => self.push_set_record(position, &record.body),
            Format::Indirect => self.push_indirect_record(record),
        }
    }

    fn push_set_record(&mut self, position: u64, body: &[u8]) {
        let (set, error) = decode_set(body);

        if let Some(e) = error {
            self.diagnostics.push(decode_diagnostic(position, &e));
        }

        let Some(set) = set else {
            return;
        };

        if is_logical_file_start(&set) {
            self.finish_file();
            self.current = Some(FileBuilder::default());
        }

        let file = current_file(&mut self.current, &mut self.diagnostics, position);
        file.add_set(position, set, &mut self.diagnostics);
    }

    fn push_indirect_record(&mut self, record: LogicalRecord) {
        let position = record.position;
        let file = current_file(&mut self.current, &mut self.diagnostics, position);

        match IndirectType::from(record.record_type) {
            IndirectType::FrameData => {
                if self.load_bulk_data {
                    file.add_frame_data(position, &record.body, &mut self.diagnostics);
                }
            }
            _ => file
                .file
                .indirect_records
                .push(IndirectRecord::new(record.record_type, record.body)),
        }
    }

    fn finish_file(&mut self) {
        if let Some(builder) = self.current.take() {
            let file = builder.finish(&mut self.diagnostics);
            self.logical_files.push(file);
        }
    }

    pub fn finish(mut self) -> (Vec<LogicalFile>, Vec<Diagnostic>) {
        self.finish_file();
        (self.logical_files, self.diagnostics.into_inner())
    }
}

/// Decodes the set in an explicitly formatted record body.
///
/// The objects that decode before an unsupported representation code are kept. Any other error
/// drops the whole set.
fn decode_set(body: &[u8]) -> (Option<Set>, Option<DecodeError>) {
    match read_set_partial(body) {
        (set, Ok(())) => (set, None),
        (set, Err(e @ DecodeError::UnsupportedCode(_))) => (set, Some(e)),
        (_, Err(e)) => (None, Some(e)),
    }
}

fn is_logical_file_start(set: &Set) -> bool {
    set.kind() == set::Kind::Set && set.is_file_header()
}

/// Returns whether a logical record starts a new logical file when it is assembled.
#[cfg(any(test, feature = "parallel"))]
pub(crate) fn starts_logical_file(record: &LogicalRecord) -> bool {
    use super::component::Components;
    use crate::Component;

    if record.is_encrypted || !record.is_explicit() {
        return false;
    }

    let has_file_header = matches!(
        Components::new(&record.body).next(),
        Some(Ok(Component::Set(header)))
            if header.kind() == set::Kind::Set && header.set_type() == types::FILE_HEADER
    );

    has_file_header && decode_set(&record.body).0.is_some_and(|set| is_logical_file_start(&set))
}

fn current_file<'a>(
    current: &'a mut Option<FileBuilder>,
    diagnostics: &mut Diagnostics,
    position: u64,
) -> &'a mut FileBuilder {
    if current.is_none() {
        diagnostics.push(Diagnostic::MissingFileHeader { position });
    }

    current.get_or_insert_with(FileBuilder::default)
}

fn decode_diagnostic(position: u64, e: &DecodeError) -> Diagnostic {
    match e {
        DecodeError::Truncated => Diagnostic::TruncatedRecord { position },
        DecodeError::UnsupportedCode(e) => Diagnostic::unsupported_code(position, *e),
        _ => Diagnostic::Component {
            position,
            message: e.to_string(),
        },
    }
}

fn frame_data_diagnostic(position: u64, e: &io::Error) -> Diagnostic {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Diagnostic::TruncatedRecord { position }
    } else {
        Diagnostic::Component {
            position,
            message: e.to_string(),
        }
    }
}
