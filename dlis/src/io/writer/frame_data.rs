//! DLIS frame data encoder.

use std::io::{self, Write};

use super::{
    InconsistentObjectError,
    num::write_uvari,
    value::{write_obname, write_value},
};
use crate::{Frame, value::ObjectName};

/// Writes one row of a frame as the body of a frame data (`FDATA`) record.
///
/// A frame data row has no marker for an absent sample, so every sample must be present. This
/// includes the `None` samples the reader pads short curves with: a frame read with a
/// [`crate::Diagnostic::RowCountMismatch`] must have its short curves trimmed or filled before
/// it is written.
///
/// # Errors
///
/// Returns an [`InconsistentObjectError`] if a sample in the row is missing or does not have
/// the representation code of its curve.
///
/// # Examples
///
/// ```
/// use dlis::{
///     Curve, Frame, RepresentationCode, Value,
///     io::writer::frame_data::write_frame_data,
///     value::ObjectName,
/// };
///
/// let curve = Curve::new(ObjectName::new(1, 0, "MD"), RepresentationCode::Ushort)
///     .with_samples(vec![Some(Value::Ushort(8))]);
/// let frame = Frame::new(ObjectName::new(1, 0, "F"), vec![curve]);
///
/// let mut buf = Vec::new();
/// write_frame_data(&mut buf, &frame, 0, 1)?;
///
/// assert_eq!(buf, [
///     0x01, 0x00, 0x01, b'F', // name = 1.0.F
///     0x01, // frame number = 1
///     0x08, // MD = 8
/// ]);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn write_frame_data<W>(
    writer: &mut W,
    frame: &Frame,
    row: usize,
    frame_number: u32,
) -> io::Result<()>
where
    W: Write,
{
    write_obname(writer, frame.name())?;
    write_uvari(writer, frame_number)?;

    for curve in frame.curves() {
        let samples = curve.row(row).unwrap_or_default();

        if samples.len() != curve.element_count() {
            return Err(missing_sample(frame, curve.name().clone(), row));
        }

        for sample in samples {
            let Some(value) = sample else {
                return Err(missing_sample(frame, curve.name().clone(), row));
            };

            if value.representation_code() != curve.representation_code() {
                return Err(InconsistentObjectError::ValueRepresentationCode {
                    expected: curve.representation_code(),
                    actual: value.representation_code(),
                }
                .into());
            }

            write_value(writer, value)?;
        }
    }

    Ok(())
}

fn missing_sample(frame: &Frame, curve: ObjectName, row: usize) -> io::Error {
    InconsistentObjectError::MissingSample {
        frame: frame.name().clone(),
        curve,
        row,
    }
    .into()
}
