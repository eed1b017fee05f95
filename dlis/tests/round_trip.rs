//! Round-trip integration tests: write logical files then read them back.

mod common;

use std::io;

use dlis::{
    LogicalFile,
    io::{
        reader::{self, frame_data::read_frame_data},
        writer,
    },
    logical_record::IndirectType,
};

fn read_dlis(src: &[u8]) -> io::Result<(Vec<LogicalFile>, Vec<dlis::Diagnostic>)> {
    let mut reader = reader::Builder::default().build_from_reader(src);
    reader.read_logical_files()
}

#[test]
fn test_round_trip() -> io::Result<()> {
    let expected = common::build_logical_file();

    let data = common::write_dlis(writer::Builder::default(), &[expected.clone()])?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    assert_eq!(
        reader.read_storage_unit_label()?,
        &common::build_storage_unit_label()
    );

    let (logical_files, diagnostics) = reader.read_logical_files()?;

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(logical_files, [expected]);

    Ok(())
}

#[test]
fn test_round_trip_with_small_visible_records_and_trailers() -> io::Result<()> {
    let expected = common::build_logical_file();

    for len in [20, 32, 128] {
        let builder = writer::Builder::default()
            .set_visible_record_length(len)
            .set_checksums(true)
            .set_trailing_length(true);

        let data = common::write_dlis(builder, &[expected.clone()])?;
        let (logical_files, diagnostics) = read_dlis(&data)?;

        assert!(diagnostics.is_empty(), "{len}: {diagnostics:?}");
        assert_eq!(logical_files, [expected.clone()], "{len}");
    }

    Ok(())
}

#[test]
fn test_round_trip_with_multiple_logical_files() -> io::Result<()> {
    let first = common::build_logical_file();

    let mut frame = common::build_frame();
    frame.curves_mut().truncate(1);
    let second = common::build_logical_file_with_frames(vec![frame]);

    let data = common::write_dlis(writer::Builder::default(), &[first.clone(), second.clone()])?;
    let (logical_files, diagnostics) = read_dlis(&data)?;

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(logical_files, [first, second]);

    Ok(())
}

#[test]
fn test_read_frame_data_after_metadata_only_read() -> io::Result<()> {
    let expected = common::build_logical_file();
    let data = common::write_dlis(writer::Builder::default(), &[expected.clone()])?;

    let mut reader = reader::Builder::default()
        .load_bulk_data(false)
        .build_from_reader(&data[..]);

    let (logical_files, diagnostics) = reader.read_logical_files()?;
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let mut frame = logical_files[0].frames()[0].clone();
    assert_eq!(frame.row_count(), 0);
    assert_eq!(frame.curves().len(), 2);

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);

    for result in reader.logical_records() {
        let record = result?;

        if record.indirect_type() == Some(IndirectType::FrameData) {
            read_frame_data(record.body(), &mut frame)?;
        }
    }

    assert_eq!(&frame, &expected.frames()[0]);

    Ok(())
}

#[cfg(feature = "parallel")]
#[test]
fn test_read_logical_files_par() -> io::Result<()> {
    let first = common::build_logical_file();
    let second = common::build_logical_file();

    let data = common::write_dlis(writer::Builder::default(), &[first, second])?;

    let expected = read_dlis(&data)?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let actual = reader.read_logical_files_par()?;

    assert_eq!(actual, expected);
    assert_eq!(actual.0.len(), 2);

    Ok(())
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_round_trip() -> io::Result<()> {
    use dlis::r#async::io::{Reader, Writer};

    let expected = common::build_logical_file();

    let mut async_writer = Writer::new(Vec::new());
    async_writer
        .write_storage_unit_label(&common::build_storage_unit_label())
        .await?;
    async_writer.write_logical_file(&expected).await?;
    async_writer.shutdown().await?;

    let data = async_writer.into_inner();
    assert_eq!(
        data,
        common::write_dlis(writer::Builder::default(), &[expected.clone()])?
    );

    let mut reader = Reader::new(&data[..]);
    let (logical_files, diagnostics) = reader.read_logical_files().await?;

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(logical_files, [expected]);

    Ok(())
}
