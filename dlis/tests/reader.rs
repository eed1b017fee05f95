//! Reader integration tests.

mod common;

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use dlis::{
    Diagnostic, LogicalRecord, Set,
    io::{reader, writer},
    logical_record::{ExplicitType, Format, IndirectType},
    value::ObjectName,
};

fn write_default() -> io::Result<Vec<u8>> {
    common::write_dlis(writer::Builder::default(), &[common::build_logical_file()])
}

fn build_set_record(set: &Set) -> io::Result<LogicalRecord> {
    let mut body = Vec::new();
    writer::component::write_set(&mut body, set)?;

    let record_type = u8::from(ExplicitType::for_set_type(set.set_type()));
    Ok(LogicalRecord::new(Format::Explicit, record_type, body))
}

fn write_records(records: &[LogicalRecord]) -> io::Result<Vec<u8>> {
    let mut writer = dlis::io::Writer::new(Vec::new());
    writer.write_storage_unit_label(&common::build_storage_unit_label())?;

    for record in records {
        writer.write_logical_record(record)?;
    }

    writer.try_finish()?;

    Ok(writer.get_ref().clone())
}

#[test]
fn test_read_logical_files() -> io::Result<()> {
    let data = write_default()?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let (logical_files, diagnostics) = reader.read_logical_files()?;

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(logical_files.len(), 1);

    let logical_file = &logical_files[0];
    assert!(logical_file.file_header().is_some());
    assert_eq!(logical_file.origins().count(), 1);
    assert_eq!(logical_file.channels().count(), 1);

    let frame = logical_file
        .frame(&ObjectName::new(common::ORIGIN, 0, "MAIN"))
        .expect("missing frame");

    assert_eq!(frame.row_count(), 3);
    assert_eq!(frame.spacing(), Some(0.5));
    assert_eq!(frame.index_units().map(|s| s.to_vec()), Some(b"m".to_vec()));
    assert_eq!(frame.index_min(), Some(1450.0));
    assert_eq!(frame.index_max(), Some(1451.0));
    assert_eq!(frame.frame_numbers(), [1, 2, 3]);

    let md = frame.curve(b"MD").expect("missing MD");
    assert_eq!(md.to_f64s(), [Some(1450.0), Some(1450.5), Some(1451.0)]);
    assert_eq!(md.units(), "m");

    let gr = frame.curve(b"GR").expect("missing GR");
    assert_eq!(gr.to_f64s(), [Some(50.0), Some(60.5), Some(72.25)]);
    assert_eq!(gr.units(), "gAPI");

    Ok(())
}

#[test]
fn test_logical_records() -> io::Result<()> {
    let data = write_default()?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let records = reader
        .logical_records()
        .collect::<io::Result<Vec<_>>>()?;

    let explicit_types: Vec<_> = records
        .iter()
        .filter_map(LogicalRecord::explicit_type)
        .collect();

    assert_eq!(
        explicit_types,
        [
            ExplicitType::FileHeader,
            ExplicitType::Origin,
            ExplicitType::Channel,
            ExplicitType::Frame,
        ]
    );

    let frame_data_count = records
        .iter()
        .filter(|record| record.indirect_type() == Some(IndirectType::FrameData))
        .count();

    assert_eq!(frame_data_count, 3);

    Ok(())
}

#[test]
fn test_progress() -> io::Result<()> {
    let data = write_default()?;

    let calls = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&calls);

    let mut reader = reader::Builder::default()
        .set_progress_callback(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .build_from_reader(&data[..]);

    reader.read_logical_files()?;

    let progress = reader.progress();
    assert_eq!(progress.logical_record_count, 7);
    assert_eq!(progress.bytes_read, data.len() as u64);
    assert_eq!(calls.load(Ordering::Relaxed), 7);

    Ok(())
}

#[test]
fn test_read_logical_files_with_invalid_checksum() -> io::Result<()> {
    let builder = writer::Builder::default().set_checksums(true);
    let mut data = common::write_dlis(builder, &[common::build_logical_file()])?;

    // The file ends with the checksum of the last frame data segment.
    if let Some(b) = data.last_mut() {
        *b ^= 0xff;
    }

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let (logical_files, diagnostics) = reader.read_logical_files()?;

    assert!(matches!(diagnostics[..], [Diagnostic::Checksum { .. }]));
    assert_eq!(logical_files[0].frames()[0].row_count(), 3);

    let mut reader = reader::Builder::default()
        .validate_checksums(false)
        .build_from_reader(&data[..]);

    let (_, diagnostics) = reader.read_logical_files()?;
    assert!(diagnostics.is_empty());

    Ok(())
}

#[test]
fn test_read_logical_files_with_truncated_file() -> io::Result<()> {
    let mut data = write_default()?;
    data.truncate(data.len() - 10);

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let (logical_files, diagnostics) = reader.read_logical_files()?;

    assert!(matches!(
        diagnostics[..],
        [Diagnostic::TruncatedRecord { .. }]
    ));

    let frame = &logical_files[0].frames()[0];
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.frame_numbers(), [1, 2]);

    Ok(())
}

#[test]
fn test_read_logical_files_with_invalid_visible_record_header() -> io::Result<()> {
    let mut data = write_default()?;

    // format version
    data[80 + 2] = 0x00;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);

    assert!(matches!(
        reader.read_logical_files(),
        Err(e) if e.kind() == io::ErrorKind::InvalidData
    ));

    Ok(())
}

#[test]
fn test_read_logical_files_with_unresolved_channel() -> io::Result<()> {
    let frame = common::build_frame();

    let records = [
        build_set_record(&common::build_file_header_set())?,
        build_set_record(&common::build_origin_set())?,
        build_set_record(&dlis::frame::build_frame_set(&[frame]))?,
    ];

    let data = write_records(&records)?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let (logical_files, diagnostics) = reader.read_logical_files()?;

    assert_eq!(
        diagnostics,
        [Diagnostic::UnresolvedChannel {
            frame: ObjectName::new(common::ORIGIN, 0, "MAIN"),
            channel: ObjectName::new(common::ORIGIN, 0, "MD"),
        }]
    );

    assert_eq!(logical_files[0].sets().len(), 3);
    assert!(logical_files[0].frames().is_empty());

    Ok(())
}

#[test]
fn test_read_logical_files_with_missing_file_header() -> io::Result<()> {
    let records = [
        build_set_record(&common::build_origin_set())?,
        build_set_record(&common::build_file_header_set())?,
    ];

    let data = write_records(&records)?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let (logical_files, diagnostics) = reader.read_logical_files()?;

    assert_eq!(diagnostics, [Diagnostic::MissingFileHeader { position: 0 }]);
    assert_eq!(logical_files.len(), 2);
    assert!(logical_files[0].file_header().is_none());
    assert!(logical_files[1].file_header().is_some());

    Ok(())
}

#[cfg(feature = "parallel")]
#[test]
fn test_read_logical_files_par_with_truncated_file_header() -> io::Result<()> {
    let file_header = build_set_record(&common::build_file_header_set())?;
    let body = file_header.body();
    let truncated_body = body[..body.len() - 4].to_vec();

    let records = [
        file_header.clone(),
        build_set_record(&common::build_origin_set())?,
        LogicalRecord::new(
            Format::Explicit,
            u8::from(ExplicitType::FileHeader),
            truncated_body,
        ),
        LogicalRecord::new(Format::Indirect, u8::from(IndirectType::EndOfData), vec![0x00]),
    ];

    let data = write_records(&records)?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let expected = reader.read_logical_files()?;

    let mut reader = reader::Builder::default().build_from_reader(&data[..]);
    let actual = reader.read_logical_files_par()?;

    assert_eq!(actual, expected);

    let (logical_files, diagnostics) = actual;
    assert_eq!(logical_files.len(), 1);
    assert_eq!(logical_files[0].indirect_records().len(), 1);
    assert!(matches!(
        diagnostics[..],
        [Diagnostic::TruncatedRecord { .. }]
    ));

    Ok(())
}
