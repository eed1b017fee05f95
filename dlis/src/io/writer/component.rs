//! DLIS component encoder.

use std::io::{self, Write};

use super::{
    InconsistentObjectError,
    num::{write_u8, write_uvari},
    value::{write_ident, write_obname, write_value},
};
use crate::{
    RepresentationCode, Set, Value,
    component::descriptor::{AttributeFlags, Descriptor, ObjectFlags, Role, SetFlags},
    set::{
        self, Attribute, AttributeDefinition, Object,
        template::{DEFAULT_COUNT, DEFAULT_REPRESENTATION_CODE},
    },
};

/// Writes a set as the body of an explicitly formatted logical record.
///
/// Template attributes carry every field that differs from the RP66 defaults. Object
/// attributes only carry the fields that differ from the template. Invariant attributes are
/// only written in the template.
///
/// # Errors
///
/// Returns an [`InconsistentObjectError`] if an object does not have one attribute per
/// template attribute definition, if an object attribute differs from an invariant template
/// attribute, or if a value does not have the representation code of its attribute.
///
/// # Examples
///
/// ```
/// use dlis::{
///     RepresentationCode, Set, Value,
///     io::writer::component::write_set,
///     set::{Attribute, AttributeDefinition, Object, Template},
///     value::ObjectName,
/// };
///
/// let template = Template::new(vec![AttributeDefinition::new("UNITS", RepresentationCode::Units)]);
/// let object = Object::new(
///     ObjectName::new(1, 0, "GR"),
///     vec![Some(Attribute::new(RepresentationCode::Units, "", vec![Value::Units("gAPI".into())]))],
/// );
/// let set = Set::new("CHANNEL", Some("0".into()), template, vec![object]);
///
/// let mut buf = Vec::new();
/// write_set(&mut buf, &set)?;
///
/// assert_eq!(buf, [
///     0xf8, // SET: T N
///     0x07, b'C', b'H', b'A', b'N', b'N', b'E', b'L', // type = "CHANNEL"
///     0x01, b'0', // name = "0"
///     0x34, // ATTRIB: L R
///     0x05, b'U', b'N', b'I', b'T', b'S', // label = "UNITS"
///     0x1b, // representation code = 27 (UNITS)
///     0x70, // OBJECT: N
///     0x01, 0x00, 0x02, b'G', b'R', // name = 1.0.GR
///     0x21, // ATTRIB: V
///     0x04, b'g', b'A', b'P', b'I', // value = "gAPI"
/// ]);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn write_set<W>(writer: &mut W, set: &Set) -> io::Result<()>
where
    W: Write,
{
    write_set_header(writer, set)?;

    for definition in set.template().iter() {
        write_template_attribute(writer, definition)?;
    }

    for object in set.objects() {
        write_object(writer, set, object)?;
    }

    Ok(())
}

fn write_descriptor<W>(writer: &mut W, role: Role, flags: u8) -> io::Result<()>
where
    W: Write,
{
    write_u8(writer, u8::from(Descriptor::new(role, flags)))
}

fn write_set_header<W>(writer: &mut W, set: &Set) -> io::Result<()>
where
    W: Write,
{
    let role = match set.kind() {
        set::Kind::Set => Role::Set,
        set::Kind::Redundant => Role::RedundantSet,
        set::Kind::Replacement => Role::ReplacementSet,
    };

    let mut flags = SetFlags::TYPE;

    if set.name().is_some() {
        flags |= SetFlags::NAME;
    }

    write_descriptor(writer, role, flags.bits())?;
    write_ident(writer, set.set_type())?;

    if let Some(name) = set.name() {
        write_ident(writer, name)?;
    }

    Ok(())
}

fn write_template_attribute<W>(writer: &mut W, definition: &AttributeDefinition) -> io::Result<()>
where
    W: Write,
{
    let mut flags = AttributeFlags::LABEL;

    if definition.count() != DEFAULT_COUNT {
        flags |= AttributeFlags::COUNT;
    }

    if definition.representation_code() != DEFAULT_REPRESENTATION_CODE {
        flags |= AttributeFlags::REPRESENTATION_CODE;
    }

    if !definition.units().is_empty() {
        flags |= AttributeFlags::UNITS;
    }

    if let Some(values) = definition.default_value() {
        flags |= AttributeFlags::VALUE;

        if values.len() != definition.count() as usize {
            return Err(InconsistentObjectError::DefaultCount {
                label: definition.label().into(),
                expected: definition.count(),
                actual: values.len(),
            }
            .into());
        }

        check_representation_codes(definition.representation_code(), values)?;
    }

    let role = if definition.is_invariant() {
        Role::InvariantAttribute
    } else {
        Role::Attribute
    };

    write_descriptor(writer, role, flags.bits())?;
    write_ident(writer, definition.label())?;

    if flags.contains(AttributeFlags::COUNT) {
        write_uvari(writer, definition.count())?;
    }

    if flags.contains(AttributeFlags::REPRESENTATION_CODE) {
        write_u8(writer, u8::from(definition.representation_code()))?;
    }

    if flags.contains(AttributeFlags::UNITS) {
        write_ident(writer, definition.units())?;
    }

    if let Some(values) = definition.default_value() {
        write_values(writer, values)?;
    }

    Ok(())
}

fn write_object<W>(writer: &mut W, set: &Set, object: &Object) -> io::Result<()>
where
    W: Write,
{
    let template = set.template();
    let attributes = object.attributes();

    if attributes.len() != template.len() {
        return Err(InconsistentObjectError::AttributeCount {
            object: object.name().clone(),
            expected: template.len(),
            actual: attributes.len(),
        }
        .into());
    }

    write_descriptor(writer, Role::Object, ObjectFlags::NAME.bits())?;
    write_obname(writer, object.name())?;

    for (definition, attribute) in template.iter().zip(attributes) {
        if definition.is_invariant() {
            check_invariant_attribute(object, definition, attribute.as_ref())?;
            continue;
        }

        match attribute {
            Some(attribute) => write_object_attribute(writer, definition, attribute)?,
            None => write_descriptor(writer, Role::AbsentAttribute, 0)?,
        }
    }

    Ok(())
}

/// Checks that an object attribute does not override an invariant template attribute.
///
/// The attribute may be absent or equal to the attribute the template defines.
fn check_invariant_attribute(
    object: &Object,
    definition: &AttributeDefinition,
    attribute: Option<&Attribute>,
) -> Result<(), InconsistentObjectError> {
    match attribute {
        Some(attribute) if *attribute != Attribute::from_definition(definition) => {
            Err(InconsistentObjectError::InvariantAttribute {
                object: object.name().clone(),
                label: definition.label().into(),
            })
        }
        _ => Ok(()),
    }
}

fn write_object_attribute<W>(
    writer: &mut W,
    definition: &AttributeDefinition,
    attribute: &Attribute,
) -> io::Result<()>
where
    W: Write,
{
    check_representation_codes(attribute.representation_code(), attribute.values())?;

    let mut flags = AttributeFlags::empty();

    if attribute.representation_code() != definition.representation_code() {
        flags |= AttributeFlags::REPRESENTATION_CODE;
    }

    if attribute.units() != definition.units() {
        flags |= AttributeFlags::UNITS;
    }

    let inherited_values = definition.default_value().unwrap_or_default();

    if attribute.values() != inherited_values {
        flags |= AttributeFlags::VALUE;

        if attribute.count() != definition.count() as usize {
            flags |= AttributeFlags::COUNT;
        }
    }

    write_descriptor(writer, Role::Attribute, flags.bits())?;

    if flags.contains(AttributeFlags::COUNT) {
        let count = u32::try_from(attribute.count())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        write_uvari(writer, count)?;
    }

    if flags.contains(AttributeFlags::REPRESENTATION_CODE) {
        write_u8(writer, u8::from(attribute.representation_code()))?;
    }

    if flags.contains(AttributeFlags::UNITS) {
        write_ident(writer, attribute.units())?;
    }

    if flags.contains(AttributeFlags::VALUE) {
        write_values(writer, attribute.values())?;
    }

    Ok(())
}

fn write_values<W>(writer: &mut W, values: &[Value]) -> io::Result<()>
where
    W: Write,
{
    values.iter().try_for_each(|value| write_value(writer, value))
}

fn check_representation_codes(expected: RepresentationCode, values: &[Value]) -> io::Result<()> {
    match values
        .iter()
        .map(Value::representation_code)
        .find(|&actual| actual != expected)
    {
        Some(actual) => Err(InconsistentObjectError::ValueRepresentationCode { expected, actual }.into()),
        None => Ok(()),
    }
}
