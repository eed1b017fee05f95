//! DLIS set components.

pub mod descriptor;

pub use self::descriptor::{Descriptor, Role};

use bstr::{BStr, BString};

use crate::{
    set::{self, Attribute, Template},
    value::ObjectName,
};

/// A set component header.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SetHeader {
    pub(crate) kind: set::Kind,
    pub(crate) set_type: BString,
    pub(crate) name: Option<BString>,
}

impl SetHeader {
    /// Creates a set component header.
    pub fn new<T>(kind: set::Kind, set_type: T, name: Option<BString>) -> Self
    where
        T: Into<BString>,
    {
        Self {
            kind,
            set_type: set_type.into(),
            name,
        }
    }

    /// Returns the set kind.
    pub fn kind(&self) -> set::Kind {
        self.kind
    }

    /// Returns the set type.
    pub fn set_type(&self) -> &BStr {
        self.set_type.as_ref()
    }

    /// Returns the set name.
    pub fn name(&self) -> Option<&BStr> {
        self.name.as_ref().map(|name| name.as_ref())
    }
}

/// A decoded component of an explicitly formatted logical record.
///
/// A record body decodes to a set header, the set's template, then each object followed by its
/// attributes. Object attributes are resolved against the template, so inherited fields are
/// already filled in.
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    /// A set header.
    Set(SetHeader),
    /// The attribute definitions of the preceding set.
    Template(Template),
    /// An object.
    Object(ObjectName),
    /// An attribute of the preceding object. `None` marks an absent attribute.
    Attribute(Option<Attribute>),
}
