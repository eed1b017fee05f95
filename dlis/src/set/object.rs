use crate::{set::Attribute, value::ObjectName};

/// A set object.
///
/// There is one attribute slot per template attribute definition. `None` marks an absent
/// attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub(crate) name: ObjectName,
    pub(crate) attributes: Vec<Option<Attribute>>,
}

impl Object {
    /// Creates an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{set::Object, value::ObjectName};
    /// let object = Object::new(ObjectName::new(0, 0, "MAIN"), Vec::new());
    /// assert_eq!(object.name().identifier(), "MAIN");
    /// ```
    pub fn new(name: ObjectName, attributes: Vec<Option<Attribute>>) -> Self {
        Self { name, attributes }
    }

    /// Returns the object name.
    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Returns the attribute slots.
    pub fn attributes(&self) -> &[Option<Attribute>] {
        &self.attributes
    }
}
