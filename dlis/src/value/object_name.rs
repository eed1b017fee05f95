use std::fmt;

use bstr::{BStr, BString};

/// A DLIS object name (`OBNAME`).
///
/// An object is uniquely identified within a logical file by its origin, copy number, and
/// identifier.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectName {
    pub(crate) origin: u32,
    pub(crate) copy_number: u8,
    pub(crate) identifier: BString,
}

impl ObjectName {
    /// Creates an object name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::value::ObjectName;
    /// let name = ObjectName::new(2, 0, "GR");
    /// assert_eq!(name.identifier(), "GR");
    /// ```
    pub fn new<I>(origin: u32, copy_number: u8, identifier: I) -> Self
    where
        I: Into<BString>,
    {
        Self {
            origin,
            copy_number,
            identifier: identifier.into(),
        }
    }

    /// Returns the origin reference.
    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Returns the copy number.
    pub fn copy_number(&self) -> u8 {
        self.copy_number
    }

    /// Returns the identifier.
    pub fn identifier(&self) -> &BStr {
        self.identifier.as_ref()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.origin, self.copy_number, self.identifier)
    }
}

/// A DLIS object reference (`OBJREF`).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ObjectReference {
    pub(crate) set_type: BString,
    pub(crate) name: ObjectName,
}

impl ObjectReference {
    /// Creates an object reference.
    pub fn new<T>(set_type: T, name: ObjectName) -> Self
    where
        T: Into<BString>,
    {
        Self {
            set_type: set_type.into(),
            name,
        }
    }

    /// Returns the type of the set the referenced object belongs to.
    pub fn set_type(&self) -> &BStr {
        self.set_type.as_ref()
    }

    /// Returns the name of the referenced object.
    pub fn name(&self) -> &ObjectName {
        &self.name
    }
}

/// A DLIS attribute reference (`ATTREF`).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct AttributeReference {
    pub(crate) set_type: BString,
    pub(crate) name: ObjectName,
    pub(crate) label: BString,
}

impl AttributeReference {
    /// Creates an attribute reference.
    pub fn new<T, L>(set_type: T, name: ObjectName, label: L) -> Self
    where
        T: Into<BString>,
        L: Into<BString>,
    {
        Self {
            set_type: set_type.into(),
            name,
            label: label.into(),
        }
    }

    /// Returns the type of the set the referenced object belongs to.
    pub fn set_type(&self) -> &BStr {
        self.set_type.as_ref()
    }

    /// Returns the name of the referenced object.
    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Returns the label of the referenced attribute.
    pub fn label(&self) -> &BStr {
        self.label.as_ref()
    }
}
