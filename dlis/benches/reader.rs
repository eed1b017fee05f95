use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use dlis::{
    Curve, Frame, LogicalFile, RepresentationCode, Set, StorageUnitLabel, Value,
    frame::{build_channel_set, build_frame_set},
    io::{reader, writer},
    set::{Attribute, AttributeDefinition, Object, Template},
    value::ObjectName,
};

const ROW_COUNT: usize = 10_000;

fn build_set(set_type: &str) -> Set {
    let template = Template::new(vec![AttributeDefinition::new("ID", RepresentationCode::Ascii)]);

    let object = Object::new(
        ObjectName::new(1, 0, "0"),
        vec![Some(Attribute::new(
            RepresentationCode::Ascii,
            "",
            vec![Value::Ascii("BENCH".into())],
        ))],
    );

    Set::new(set_type, None, template, vec![object])
}

fn build_dlis() -> Vec<u8> {
    let md = Curve::new(ObjectName::new(1, 0, "MD"), RepresentationCode::Fdoubl)
        .with_units("m")
        .with_samples(
            (0..ROW_COUNT)
                .map(|i| Some(Value::Fdoubl(1000.0 + i as f64 * 0.1)))
                .collect(),
        );

    let gr = Curve::new(ObjectName::new(1, 0, "GR"), RepresentationCode::Fsingl)
        .with_units("gAPI")
        .with_samples(
            (0..ROW_COUNT)
                .map(|i| Some(Value::Fsingl((i % 150) as f32)))
                .collect(),
        );

    let frames = vec![Frame::new(ObjectName::new(1, 0, "MAIN"), vec![md, gr])];

    let sets = vec![
        build_set("FILE-HEADER"),
        build_set("ORIGIN"),
        build_channel_set(&frames),
        build_frame_set(&frames),
    ];

    let logical_file = LogicalFile::new(sets, frames);

    let mut writer = writer::Builder::default()
        .set_checksums(true)
        .build_from_writer(Vec::new());

    writer
        .write_storage_unit_label(&StorageUnitLabel::default())
        .unwrap();
    writer.write_logical_file(&logical_file).unwrap();
    writer.try_finish().unwrap();

    writer.get_ref().clone()
}

fn bench_read_logical_files(c: &mut Criterion) {
    let data = build_dlis();

    c.bench_function("read_logical_files", |b| {
        b.iter(|| {
            let mut reader = reader::Builder::default().build_from_reader(&data[..]);
            black_box(reader.read_logical_files().unwrap())
        })
    });

    c.bench_function("read_logical_files (metadata only)", |b| {
        b.iter(|| {
            let mut reader = reader::Builder::default()
                .load_bulk_data(false)
                .build_from_reader(&data[..]);

            black_box(reader.read_logical_files().unwrap())
        })
    });
}

criterion_group!(benches, bench_read_logical_files);
criterion_main!(benches);
