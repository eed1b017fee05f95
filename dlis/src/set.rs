//! DLIS sets.

mod attribute;
mod object;
pub(crate) mod template;

pub use self::{
    attribute::Attribute,
    object::Object,
    template::{AttributeDefinition, Template},
};

use bstr::{BStr, BString};

use crate::value::ObjectName;

/// Well-known set types.
pub mod types {
    /// `FILE-HEADER`
    pub const FILE_HEADER: &[u8] = b"FILE-HEADER";
    /// `ORIGIN`
    pub const ORIGIN: &[u8] = b"ORIGIN";
    /// `CHANNEL`
    pub const CHANNEL: &[u8] = b"CHANNEL";
    /// `FRAME`
    pub const FRAME: &[u8] = b"FRAME";
}

/// The kind of a set.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Kind {
    /// A set (`SET`).
    #[default]
    Set,
    /// A redundant set (`RDSET`), a copy of a set that appeared earlier.
    Redundant,
    /// A replacement set (`RSET`), which updates the attributes of objects that appeared
    /// earlier.
    Replacement,
}

/// A DLIS set.
///
/// A set is a table: its template defines the columns and each object is a row. Every object
/// has exactly one attribute slot per template attribute definition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Set {
    pub(crate) kind: Kind,
    pub(crate) set_type: BString,
    pub(crate) name: Option<BString>,
    pub(crate) template: Template,
    pub(crate) objects: Vec<Object>,
}

impl Set {
    /// Creates a set.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{Set, RepresentationCode, set::{AttributeDefinition, Template}};
    ///
    /// let template = Template::new(vec![
    ///     AttributeDefinition::new("SEQUENCE-NUMBER", RepresentationCode::Ascii),
    ///     AttributeDefinition::new("ID", RepresentationCode::Ascii),
    /// ]);
    ///
    /// let set = Set::new("FILE-HEADER", None, template, Vec::new());
    /// assert_eq!(set.set_type(), "FILE-HEADER");
    /// ```
    pub fn new<T>(set_type: T, name: Option<BString>, template: Template, objects: Vec<Object>) -> Self
    where
        T: Into<BString>,
    {
        Self {
            kind: Kind::Set,
            set_type: set_type.into(),
            name,
            template,
            objects,
        }
    }

    /// Returns the set kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Sets the set kind.
    pub fn set_kind(&mut self, kind: Kind) {
        self.kind = kind;
    }

    /// Returns the set type.
    pub fn set_type(&self) -> &BStr {
        self.set_type.as_ref()
    }

    /// Returns the set name.
    pub fn name(&self) -> Option<&BStr> {
        self.name.as_ref().map(|name| name.as_ref())
    }

    /// Returns the template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns the objects.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Returns a mutable reference to the objects.
    pub fn objects_mut(&mut self) -> &mut Vec<Object> {
        &mut self.objects
    }

    /// Returns the object with the given name.
    pub fn get(&self, name: &ObjectName) -> Option<&Object> {
        self.objects.iter().find(|object| object.name() == name)
    }

    /// Returns the attribute with the given label of an object in this set.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{
    ///     RepresentationCode, Set, Value,
    ///     set::{Attribute, AttributeDefinition, Object, Template},
    ///     value::ObjectName,
    /// };
    ///
    /// let template = Template::new(vec![AttributeDefinition::new("UNITS", RepresentationCode::Units)]);
    /// let object = Object::new(
    ///     ObjectName::new(0, 0, "GR"),
    ///     vec![Some(Attribute::new(RepresentationCode::Units, "", vec![Value::Units("gAPI".into())]))],
    /// );
    ///
    /// let set = Set::new("CHANNEL", None, template, vec![object]);
    /// let object = &set.objects()[0];
    ///
    /// let attribute = set.attribute(object, b"UNITS").expect("missing UNITS");
    /// assert_eq!(attribute.values(), [Value::Units("gAPI".into())]);
    /// ```
    pub fn attribute<'a>(&self, object: &'a Object, label: &[u8]) -> Option<&'a Attribute> {
        let i = self.template.position(label)?;
        object.attributes().get(i).and_then(|attribute| attribute.as_ref())
    }

    /// Returns whether this set begins a logical file.
    pub fn is_file_header(&self) -> bool {
        self.set_type == types::FILE_HEADER
    }
}
