//! DLIS frame data decoder.

use std::io;

use super::{
    num::read_uvari,
    value::{read_obname, read_values},
};
use crate::{Frame, value::ObjectName};

/// Reads the frame name at the start of a frame data (`FDATA`) record body.
///
/// # Examples
///
/// ```
/// use dlis::{io::reader::frame_data::read_frame_name, value::ObjectName};
///
/// let mut src = &[0x01, 0x00, 0x04, b'M', b'A', b'I', b'N', 0x01][..];
/// assert_eq!(read_frame_name(&mut src)?, ObjectName::new(1, 0, "MAIN"));
/// assert_eq!(src, [0x01]);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn read_frame_name(src: &mut &[u8]) -> io::Result<ObjectName> {
    read_obname(src)
}

/// Reads one row of a frame data (`FDATA`) record body and appends it to the frame.
///
/// Each curve takes [`crate::Curve::element_count`] values with its representation code. The
/// frame is only updated when the whole row decodes. This returns the frame number.
pub fn read_frame_data(mut src: &[u8], frame: &mut Frame) -> io::Result<u32> {
    let name = read_frame_name(&mut src)?;

    if &name != frame.name() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame name mismatch: expected {}, got {name}", frame.name()),
        ));
    }

    let frame_number = read_uvari(&mut src)?;

    let row = frame
        .curves
        .iter()
        .map(|curve| read_values(&mut src, curve.representation_code(), curve.element_count()))
        .collect::<io::Result<Vec<_>>>()?;

    if !src.is_empty() {
        tracing::debug!(frame = %name, len = src.len(), "ignoring trailing frame data");
    }

    for (curve, values) in frame.curves.iter_mut().zip(row) {
        curve.extend_samples(values.into_iter().map(Some));
    }

    frame.frame_numbers.push(frame_number);

    Ok(frame_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Curve, RepresentationCode, Value};

    fn build_frame() -> Frame {
        Frame::new(
            ObjectName::new(1, 0, "MAIN"),
            vec![
                Curve::new(ObjectName::new(1, 0, "MD"), RepresentationCode::Fdoubl),
                Curve::new(ObjectName::new(1, 0, "AZ"), RepresentationCode::Ushort)
                    .with_dimension(vec![2]),
            ],
        )
    }

    #[test]
    fn test_read_frame_data() -> io::Result<()> {
        let mut frame = build_frame();

        let src = [
            0x01, 0x00, 0x04, b'M', b'A', b'I', b'N', // name = 1.0.MAIN
            0x07, // frame number = 7
            0x40, 0x96, 0xa8, 0x00, 0x00, 0x00, 0x00, 0x00, // MD = 1450.0
            0x05, 0x06, // AZ = [5, 6]
        ];

        assert_eq!(read_frame_data(&src, &mut frame)?, 7);

        assert_eq!(frame.frame_numbers(), [7]);
        assert_eq!(frame.curves()[0].samples(), [Some(Value::Fdoubl(1450.0))]);
        assert_eq!(
            frame.curves()[1].samples(),
            [Some(Value::Ushort(5)), Some(Value::Ushort(6))]
        );

        Ok(())
    }

    #[test]
    fn test_read_frame_data_with_truncated_row() {
        let mut frame = build_frame();

        let src = [
            0x01, 0x00, 0x04, b'M', b'A', b'I', b'N', // name = 1.0.MAIN
            0x01, // frame number = 1
            0x40, 0x96, 0xa8, 0x00, 0x00, 0x00, 0x00, 0x00, // MD = 1450.0
            0x05, // AZ = [5, (missing)]
        ];

        assert!(matches!(
            read_frame_data(&src, &mut frame),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof
        ));

        assert!(frame.frame_numbers().is_empty());
        assert!(frame.curves().iter().all(|curve| curve.samples().is_empty()));
    }

    #[test]
    fn test_read_frame_data_with_other_frame() {
        let mut frame = build_frame();
        let src = [0x01, 0x00, 0x03, b'A', b'U', b'X', 0x01];

        assert!(matches!(
            read_frame_data(&src, &mut frame),
            Err(e) if e.kind() == io::ErrorKind::InvalidData
        ));
    }
}
