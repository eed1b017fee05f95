#![allow(dead_code)]

use std::io;

use dlis::{
    Curve, Frame, LogicalFile, RepresentationCode, Set, StorageUnitLabel, Value,
    frame::{self, Direction},
    io::writer::Builder,
    set::{Attribute, AttributeDefinition, Object, Template},
    storage_unit_label::Version,
    value::ObjectName,
};

pub const ORIGIN: u32 = 2;

fn ascii(s: &str) -> Option<Attribute> {
    Some(Attribute::new(
        RepresentationCode::Ascii,
        "",
        vec![Value::Ascii(s.into())],
    ))
}

pub fn build_file_header_set() -> Set {
    let template = Template::new(vec![
        AttributeDefinition::new("SEQUENCE-NUMBER", RepresentationCode::Ascii),
        AttributeDefinition::new("ID", RepresentationCode::Ascii),
    ]);

    let object = Object::new(
        ObjectName::new(ORIGIN, 0, "0"),
        vec![ascii("1"), ascii("WELL A MAIN LOG")],
    );

    Set::new("FILE-HEADER", None, template, vec![object])
}

pub fn build_origin_set() -> Set {
    let template = Template::new(vec![
        AttributeDefinition::new("FILE-ID", RepresentationCode::Ascii),
        AttributeDefinition::new("WELL-NAME", RepresentationCode::Ascii),
        AttributeDefinition::new("FIELD-NAME", RepresentationCode::Ascii),
    ]);

    let object = Object::new(
        ObjectName::new(ORIGIN, 0, "DEFINING_ORIGIN"),
        vec![ascii("WELL A MAIN LOG"), ascii("WELL A"), None],
    );

    Set::new("ORIGIN", None, template, vec![object])
}

/// Builds the main frame: `MD` (m) and `GR` (gAPI), sampled every 0.5 m from 1450 m to 1451 m.
pub fn build_frame() -> Frame {
    let md = Curve::new(ObjectName::new(ORIGIN, 0, "MD"), RepresentationCode::Fdoubl)
        .with_long_name("Measured Depth")
        .with_units("m")
        .with_samples(vec![
            Some(Value::Fdoubl(1450.0)),
            Some(Value::Fdoubl(1450.5)),
            Some(Value::Fdoubl(1451.0)),
        ]);

    let gr = Curve::new(ObjectName::new(ORIGIN, 0, "GR"), RepresentationCode::Fsingl)
        .with_long_name("Gamma Ray")
        .with_units("gAPI")
        .with_samples(vec![
            Some(Value::Fsingl(50.0)),
            Some(Value::Fsingl(60.5)),
            Some(Value::Fsingl(72.25)),
        ]);

    Frame::new(ObjectName::new(ORIGIN, 0, "MAIN"), vec![md, gr])
        .with_description("Main depth frame")
        .with_index_type("BOREHOLE-DEPTH")
        .with_direction(Direction::Increasing)
        .with_spacing(Attribute::new(
            RepresentationCode::Fdoubl,
            "m",
            vec![Value::Fdoubl(0.5)],
        ))
        .with_index_bounds(Value::Fdoubl(1450.0), Value::Fdoubl(1451.0))
        .with_frame_numbers(vec![1, 2, 3])
}

pub fn build_logical_file() -> LogicalFile {
    build_logical_file_with_frames(vec![build_frame()])
}

pub fn build_logical_file_with_frames(frames: Vec<Frame>) -> LogicalFile {
    let sets = vec![
        build_file_header_set(),
        build_origin_set(),
        frame::build_channel_set(&frames),
        frame::build_frame_set(&frames),
    ];

    LogicalFile::new(sets, frames)
}

pub fn build_storage_unit_label() -> StorageUnitLabel {
    StorageUnitLabel::new(1, Version::V1_0, 8192, "WELL A")
}

pub fn write_dlis(builder: Builder, logical_files: &[LogicalFile]) -> io::Result<Vec<u8>> {
    let mut writer = builder.build_from_writer(Vec::new());
    writer.write_storage_unit_label(&build_storage_unit_label())?;

    for logical_file in logical_files {
        writer.write_logical_file(logical_file)?;
    }

    writer.try_finish()?;

    Ok(writer.get_ref().clone())
}
