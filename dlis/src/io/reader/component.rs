//! DLIS component decoder.

use std::{error, fmt, io};

use bstr::BString;

use super::{
    num::{read_u8, read_uvari},
    value::{read_ident, read_obname, read_values},
};
use crate::{
    Component, RepresentationCode, Set,
    component::{
        SetHeader,
        descriptor::{self, AttributeFlags, Descriptor, ObjectFlags, Role, SetFlags},
    },
    representation_code::UnsupportedCodeError,
    set::{
        self, Attribute, AttributeDefinition, Object, Template,
        template::{DEFAULT_COUNT, DEFAULT_REPRESENTATION_CODE},
    },
};

/// An error returned when the components of an explicitly formatted logical record fail to
/// decode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// A field runs past the end of the record body.
    Truncated,
    /// A value uses an undefined representation code.
    UnsupportedCode(UnsupportedCodeError),
    /// A descriptor has the reserved role.
    InvalidDescriptor(descriptor::TryFromByteError),
    /// The record body does not start with a set component.
    ExpectedSet,
    /// A set component has no type.
    MissingSetType,
    /// A template attribute has no label.
    MissingLabel,
    /// An object component has no name.
    MissingObjectName,
    /// A component role is not valid at its position.
    UnexpectedRole(Role),
    /// An object has more attributes than the template defines.
    TooManyAttributes,
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::UnsupportedCode(e) => Some(e),
            Self::InvalidDescriptor(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => f.write_str("truncated component"),
            Self::UnsupportedCode(_) => f.write_str("unsupported representation code"),
            Self::InvalidDescriptor(_) => f.write_str("invalid descriptor"),
            Self::ExpectedSet => f.write_str("expected set component"),
            Self::MissingSetType => f.write_str("missing set type"),
            Self::MissingLabel => f.write_str("missing template attribute label"),
            Self::MissingObjectName => f.write_str("missing object name"),
            Self::UnexpectedRole(role) => write!(f, "unexpected component role: {role:?}"),
            Self::TooManyAttributes => f.write_str("object has more attributes than template"),
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(_: io::Error) -> Self {
        // Slice readers only fail on EOF.
        Self::Truncated
    }
}

impl From<UnsupportedCodeError> for DecodeError {
    fn from(e: UnsupportedCodeError) -> Self {
        Self::UnsupportedCode(e)
    }
}

impl From<descriptor::TryFromByteError> for DecodeError {
    fn from(e: descriptor::TryFromByteError) -> Self {
        Self::InvalidDescriptor(e)
    }
}

#[derive(Debug)]
enum State {
    Set,
    Template,
    Objects,
    Object(usize),
    Done,
}

/// An iterator over the components of an explicitly formatted logical record body.
///
/// Components are decoded lazily. Object attributes are resolved against the template: absent
/// fields take the template defaults, invariant attributes are filled in, and attributes an
/// object omits at the end take the template defaults. The iterator stops after the first error.
pub struct Components<'a> {
    src: &'a [u8],
    template: Template,
    state: State,
}

impl<'a> Components<'a> {
    /// Creates a component iterator over a record body.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{Component, io::reader::component::Components};
    ///
    /// let src = [
    ///     0xf0, 0x06, b'O', b'R', b'I', b'G', b'I', b'N', // SET: T
    /// ];
    ///
    /// let mut components = Components::new(&src);
    /// assert!(matches!(components.next(), Some(Ok(Component::Set(_)))));
    /// assert!(matches!(components.next(), Some(Ok(Component::Template(_)))));
    /// assert!(components.next().is_none());
    /// ```
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            template: Template::default(),
            state: State::Set,
        }
    }

    fn peek_role(&self) -> Result<Option<Role>, DecodeError> {
        match self.src.first() {
            Some(&b) => Descriptor::try_from(b)
                .map(|descriptor| Some(descriptor.role()))
                .map_err(DecodeError::from),
            None => Ok(None),
        }
    }

    fn read_set(&mut self) -> Result<Component, DecodeError> {
        let descriptor = read_descriptor(&mut self.src)?;

        let kind = match descriptor.role() {
            Role::Set => set::Kind::Set,
            Role::RedundantSet => set::Kind::Redundant,
            Role::ReplacementSet => set::Kind::Replacement,
            _ => return Err(DecodeError::ExpectedSet),
        };

        let flags = descriptor.set_flags();

        if !flags.contains(SetFlags::TYPE) {
            return Err(DecodeError::MissingSetType);
        }

        let set_type = read_ident(&mut self.src)?;

        let name = if flags.contains(SetFlags::NAME) {
            Some(read_ident(&mut self.src)?)
        } else {
            None
        };

        tracing::trace!(%set_type, "read set component");

        Ok(Component::Set(SetHeader {
            kind,
            set_type,
            name,
        }))
    }

    fn read_template(&mut self) -> Result<Component, DecodeError> {
        let mut template = Template::default();

        while let Some(role) = self.peek_role()? {
            let is_invariant = match role {
                Role::Attribute => false,
                Role::InvariantAttribute => true,
                Role::Object => break,
                _ => return Err(DecodeError::UnexpectedRole(role)),
            };

            let descriptor = read_descriptor(&mut self.src)?;
            let definition = read_template_attribute(&mut self.src, descriptor, is_invariant)?;
            template.push(definition);
        }

        self.template = template.clone();

        Ok(Component::Template(template))
    }

    fn read_object(&mut self) -> Result<Option<Component>, DecodeError> {
        let Some(role) = self.peek_role()? else {
            return Ok(None);
        };

        match role {
            Role::Object => {}
            Role::Attribute | Role::AbsentAttribute => return Err(DecodeError::TooManyAttributes),
            _ => return Err(DecodeError::UnexpectedRole(role)),
        }

        let descriptor = read_descriptor(&mut self.src)?;

        if !descriptor.object_flags().contains(ObjectFlags::NAME) {
            return Err(DecodeError::MissingObjectName);
        }

        let name = read_obname(&mut self.src)?;

        tracing::trace!(%name, "read object component");

        Ok(Some(Component::Object(name)))
    }

    fn read_object_attribute(&mut self, i: usize) -> Result<Component, DecodeError> {
        let Some(definition) = self.template.as_ref().get(i) else {
            return Err(DecodeError::TooManyAttributes);
        };

        if definition.is_invariant() {
            return Ok(Component::Attribute(Some(Attribute::from_definition(
                definition,
            ))));
        }

        match self.peek_role()? {
            None | Some(Role::Object) => {
                return Ok(Component::Attribute(Some(Attribute::from_definition(
                    definition,
                ))));
            }
            Some(Role::AbsentAttribute) => {
                read_descriptor(&mut self.src)?;
                return Ok(Component::Attribute(None));
            }
            Some(Role::Attribute) => {}
            Some(role) => return Err(DecodeError::UnexpectedRole(role)),
        }

        let descriptor = read_descriptor(&mut self.src)?;
        let attribute = read_object_attribute(&mut self.src, descriptor, definition)?;

        Ok(Component::Attribute(Some(attribute)))
    }

    fn read_next(&mut self) -> Result<Option<Component>, DecodeError> {
        match self.state {
            State::Set => {
                let component = self.read_set()?;
                self.state = State::Template;
                Ok(Some(component))
            }
            State::Template => {
                let component = self.read_template()?;
                self.state = State::Objects;
                Ok(Some(component))
            }
            State::Object(i) if i < self.template.len() => {
                let component = self.read_object_attribute(i)?;
                self.state = State::Object(i + 1);
                Ok(Some(component))
            }
            State::Objects | State::Object(_) => {
                let component = self.read_object()?;

                self.state = if component.is_some() {
                    State::Object(0)
                } else {
                    State::Done
                };

                Ok(component)
            }
            State::Done => Ok(None),
        }
    }
}

impl Iterator for Components<'_> {
    type Item = Result<Component, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_next() {
            Ok(component) => component.map(Ok),
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

fn read_descriptor(src: &mut &[u8]) -> Result<Descriptor, DecodeError> {
    let b = read_u8(src)?;
    Descriptor::try_from(b).map_err(DecodeError::from)
}

fn read_representation_code(src: &mut &[u8]) -> Result<RepresentationCode, DecodeError> {
    let n = read_u8(src)?;
    RepresentationCode::try_from(n).map_err(DecodeError::from)
}

fn read_count(src: &mut &[u8]) -> Result<u32, DecodeError> {
    read_uvari(src).map_err(DecodeError::from)
}

fn read_template_attribute(
    src: &mut &[u8],
    descriptor: Descriptor,
    is_invariant: bool,
) -> Result<AttributeDefinition, DecodeError> {
    let flags = descriptor.attribute_flags();

    if !flags.contains(AttributeFlags::LABEL) {
        return Err(DecodeError::MissingLabel);
    }

    let label = read_ident(src)?;

    let count = if flags.contains(AttributeFlags::COUNT) {
        read_count(src)?
    } else {
        DEFAULT_COUNT
    };

    let representation_code = if flags.contains(AttributeFlags::REPRESENTATION_CODE) {
        read_representation_code(src)?
    } else {
        DEFAULT_REPRESENTATION_CODE
    };

    let units = if flags.contains(AttributeFlags::UNITS) {
        read_ident(src)?
    } else {
        BString::default()
    };

    let default = if flags.contains(AttributeFlags::VALUE) {
        Some(read_values(src, representation_code, count as usize)?)
    } else {
        None
    };

    Ok(AttributeDefinition {
        label,
        count,
        representation_code,
        units,
        default,
        is_invariant,
    })
}

fn read_object_attribute(
    src: &mut &[u8],
    descriptor: Descriptor,
    definition: &AttributeDefinition,
) -> Result<Attribute, DecodeError> {
    let flags = descriptor.attribute_flags();

    if flags.contains(AttributeFlags::LABEL) {
        // Object attributes are matched to the template by position.
        read_ident(src)?;
    }

    let count = if flags.contains(AttributeFlags::COUNT) {
        read_count(src)?
    } else {
        definition.count()
    };

    let representation_code = if flags.contains(AttributeFlags::REPRESENTATION_CODE) {
        read_representation_code(src)?
    } else {
        definition.representation_code()
    };

    let units = if flags.contains(AttributeFlags::UNITS) {
        read_ident(src)?
    } else {
        definition.units.clone()
    };

    let values = if flags.contains(AttributeFlags::VALUE) {
        read_values(src, representation_code, count as usize)?
    } else {
        definition.default.clone().unwrap_or_default()
    };

    Ok(Attribute {
        representation_code,
        units,
        values,
    })
}

/// Reads the set in an explicitly formatted logical record body.
///
/// # Examples
///
/// ```
/// use dlis::io::reader::component::read_set;
///
/// let src = [
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
/// ];
///
/// let set = read_set(&src)?;
/// assert_eq!(set.set_type(), "CHANNEL");
/// assert_eq!(set.objects().len(), 1);
/// # Ok::<_, dlis::io::reader::component::DecodeError>(())
/// ```
pub fn read_set(src: &[u8]) -> Result<Set, DecodeError> {
    let (set, result) = read_set_partial(src);
    result?;
    set.ok_or(DecodeError::ExpectedSet)
}

/// Reads the set in an explicitly formatted logical record body, keeping the objects that
/// decode before an error.
///
/// An object is kept if it has a value for every template attribute when the error occurs.
/// The object being decoded when the error occurs is dropped.
pub(crate) fn read_set_partial(src: &[u8]) -> (Option<Set>, Result<(), DecodeError>) {
    let mut set: Option<Set> = None;
    let mut object: Option<Object> = None;

    for result in Components::new(src) {
        let component = match result {
            Ok(component) => component,
            Err(e) => {
                if let (Some(set), Some(object)) = (set.as_mut(), object)
                    && object.attributes.len() == set.template.len()
                {
                    set.objects.push(object);
                }

                return (set, Err(e));
            }
        };

        match component {
            Component::Set(header) => {
                set = Some(Set {
                    kind: header.kind,
                    set_type: header.set_type,
                    name: header.name,
                    ..Default::default()
                });
            }
            Component::Template(template) => {
                if let Some(set) = set.as_mut() {
                    set.template = template;
                }
            }
            Component::Object(name) => {
                if let (Some(set), Some(object)) = (set.as_mut(), object.take()) {
                    set.objects.push(object);
                }

                object = Some(Object::new(name, Vec::new()));
            }
            Component::Attribute(attribute) => {
                if let Some(object) = object.as_mut() {
                    object.attributes.push(attribute);
                }
            }
        }
    }

    if let (Some(set), Some(object)) = (set.as_mut(), object) {
        set.objects.push(object);
    }

    (set, Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Value, value::ObjectName};

    fn channel_set_src() -> Vec<u8> {
        vec![
            0xf8, // SET: T N
            0x07, b'C', b'H', b'A', b'N', b'N', b'E', b'L', // type = "CHANNEL"
            0x01, b'0', // name = "0"
            0x34, // ATTRIB: L R
            0x05, b'U', b'N', b'I', b'T', b'S', // label = "UNITS"
            0x1b, // representation code = 27 (UNITS)
            0x3d, // ATTRIB: L C R V
            0x09, b'D', b'I', b'M', b'E', b'N', b'S', b'I', b'O', b'N', // label = "DIMENSION"
            0x01, // count = 1
            0x12, // representation code = 18 (UVARI)
            0x01, // default = [1]
            0x50, // INVATR: L
            0x06, b'S', b'O', b'U', b'R', b'C', b'E', // label = "SOURCE"
            0x70, // OBJECT: N
            0x01, 0x00, 0x02, b'M', b'D', // name = 1.0.MD
            0x21, // ATTRIB: V
            0x01, b'm', // value = "m"
            0x70, // OBJECT: N
            0x01, 0x00, 0x02, b'G', b'R', // name = 1.0.GR
            0x00, // ABSATR
            0x29, // ATTRIB: C V
            0x02, // count = 2
            0x02, 0x03, // value = [2, 3]
        ]
    }

    #[test]
    fn test_components() -> Result<(), DecodeError> {
        let src = channel_set_src();
        let components: Vec<_> = Components::new(&src).collect::<Result<_, _>>()?;

        assert_eq!(components.len(), 10);

        assert_eq!(
            components[0],
            Component::Set(SetHeader::new(set::Kind::Set, "CHANNEL", Some("0".into())))
        );

        let Component::Template(template) = &components[1] else {
            panic!("expected template");
        };

        assert_eq!(template.len(), 3);

        let dimension = &template.as_ref()[1];
        assert_eq!(dimension.label(), "DIMENSION");
        assert_eq!(dimension.representation_code(), RepresentationCode::Uvari);
        assert_eq!(dimension.default_value(), Some(&[Value::Uvari(1)][..]));

        let source = &template.as_ref()[2];
        assert!(source.is_invariant());
        assert_eq!(source.representation_code(), RepresentationCode::Ident);

        assert_eq!(components[2], Component::Object(ObjectName::new(1, 0, "MD")));
        assert_eq!(
            components[3],
            Component::Attribute(Some(Attribute::new(
                RepresentationCode::Units,
                "",
                vec![Value::Units("m".into())]
            )))
        );
        // inherited from the template
        assert_eq!(
            components[4],
            Component::Attribute(Some(Attribute::new(
                RepresentationCode::Uvari,
                "",
                vec![Value::Uvari(1)]
            )))
        );
        // invariant
        assert_eq!(
            components[5],
            Component::Attribute(Some(Attribute::new(
                RepresentationCode::Ident,
                "",
                Vec::new()
            )))
        );

        assert_eq!(components[6], Component::Object(ObjectName::new(1, 0, "GR")));
        assert_eq!(components[7], Component::Attribute(None));
        assert_eq!(
            components[8],
            Component::Attribute(Some(Attribute::new(
                RepresentationCode::Uvari,
                "",
                vec![Value::Uvari(2), Value::Uvari(3)]
            )))
        );

        Ok(())
    }

    #[test]
    fn test_read_set() -> Result<(), DecodeError> {
        let src = channel_set_src();
        let set = read_set(&src)?;

        assert_eq!(set.set_type(), "CHANNEL");
        assert_eq!(set.name(), Some("0".into()));
        assert_eq!(set.objects().len(), 2);

        for object in set.objects() {
            assert_eq!(object.attributes().len(), set.template().len());
        }

        Ok(())
    }

    #[test]
    fn test_read_set_with_omitted_trailing_attributes() -> Result<(), DecodeError> {
        let src = [
            0xf0, // SET: T
            0x04, b'T', b'O', b'O', b'L', // type = "TOOL"
            0x30, // ATTRIB: L
            0x01, b'A', // label = "A"
            0x30, // ATTRIB: L
            0x01, b'B', // label = "B"
            0x70, // OBJECT: N
            0x00, 0x00, 0x01, b'X', // name = 0.0.X
        ];

        let set = read_set(&src)?;
        let attributes = set.objects()[0].attributes();

        let expected = Some(Attribute::new(RepresentationCode::Ident, "", Vec::new()));
        assert_eq!(attributes, [expected.clone(), expected]);

        Ok(())
    }

    #[test]
    fn test_read_set_partial_with_unsupported_code() {
        let src = [
            0xf0, // SET: T
            0x04, b'T', b'O', b'O', b'L', // type = "TOOL"
            0x30, // ATTRIB: L
            0x01, b'A', // label = "A"
            0x70, // OBJECT: N
            0x00, 0x00, 0x01, b'X', // name = 0.0.X
            0x21, // ATTRIB: V
            0x01, b'x', // value = "x"
            0x70, // OBJECT: N
            0x00, 0x00, 0x01, b'Y', // name = 0.0.Y
            0x25, // ATTRIB: R V
            0x42, // representation code = 66
            0x00, 0x00,
        ];

        let (set, result) = read_set_partial(&src);

        assert_eq!(
            result,
            Err(DecodeError::UnsupportedCode(UnsupportedCodeError(66)))
        );

        let set = set.expect("missing set");
        assert_eq!(set.objects().len(), 1);
        assert_eq!(set.objects()[0].name(), &ObjectName::new(0, 0, "X"));
    }

    #[test]
    fn test_read_set_partial_with_truncated_object_name() {
        let src = [
            0xf0, // SET: T
            0x04, b'T', b'O', b'O', b'L', // type = "TOOL"
            0x30, // ATTRIB: L
            0x01, b'A', // label = "A"
            0x70, // OBJECT: N
            0x00, 0x00, 0x01, b'X', // name = 0.0.X
            0x21, // ATTRIB: V
            0x01, b'x', // value = "x"
            0x70, // OBJECT: N
            0x00, 0x00, 0x05, b'Y', // name = 0.0.Y (truncated)
        ];

        let (set, result) = read_set_partial(&src);

        assert_eq!(result, Err(DecodeError::Truncated));

        let set = set.expect("missing set");
        assert_eq!(set.objects().len(), 1);
        assert_eq!(set.objects()[0].name(), &ObjectName::new(0, 0, "X"));
        assert_eq!(
            set.objects()[0].attributes(),
            [Some(Attribute::new(
                RepresentationCode::Ident,
                "",
                vec![Value::Ident("x".into())]
            ))]
        );
    }

    #[test]
    fn test_read_set_partial_drops_incomplete_object() {
        let src = [
            0xf0, // SET: T
            0x04, b'T', b'O', b'O', b'L', // type = "TOOL"
            0x30, // ATTRIB: L
            0x01, b'A', // label = "A"
            0x30, // ATTRIB: L
            0x01, b'B', // label = "B"
            0x70, // OBJECT: N
            0x00, 0x00, 0x01, b'X', // name = 0.0.X
            0x21, // ATTRIB: V
            0x01, b'x', // value = "x"
            0x21, // ATTRIB: V
            0x03, b'y', // value (truncated)
        ];

        let (set, result) = read_set_partial(&src);

        assert_eq!(result, Err(DecodeError::Truncated));
        assert!(set.is_some_and(|set| set.objects().is_empty()));
    }

    #[test]
    fn test_read_set_with_invalid_components() {
        fn t(src: &[u8], expected: DecodeError) {
            assert_eq!(read_set(src), Err(expected));
        }

        t(&[], DecodeError::Truncated);
        t(&[0x70, 0x00, 0x00, 0x00], DecodeError::ExpectedSet);
        t(&[0xe0], DecodeError::MissingSetType);
        t(&[0xf0, 0x04, b'T', b'O'], DecodeError::Truncated);
        t(&[0xf0, 0x00, 0x20], DecodeError::MissingLabel);
        t(&[0xf0, 0x00, 0x60], DecodeError::MissingObjectName);
        t(
            &[0xf0, 0x00, 0x00],
            DecodeError::UnexpectedRole(Role::AbsentAttribute),
        );
        t(
            &[0xf0, 0x00, 0x80],
            DecodeError::InvalidDescriptor(Descriptor::try_from(0x80).unwrap_err()),
        );
        t(
            &[0xf0, 0x00, 0x70, 0x00, 0x00, 0x00, 0x20],
            DecodeError::TooManyAttributes,
        );
    }
}
