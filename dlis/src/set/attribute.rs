use bstr::{BStr, BString};

use super::AttributeDefinition;
use crate::{RepresentationCode, Value};

/// An object attribute.
///
/// The count of an attribute is the number of values it holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub(crate) representation_code: RepresentationCode,
    pub(crate) units: BString,
    pub(crate) values: Vec<Value>,
}

impl Attribute {
    /// Creates an attribute.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{RepresentationCode, Value, set::Attribute};
    /// let attribute = Attribute::new(RepresentationCode::Fdoubl, "m", vec![Value::Fdoubl(0.5)]);
    /// assert_eq!(attribute.count(), 1);
    /// ```
    pub fn new<U>(representation_code: RepresentationCode, units: U, values: Vec<Value>) -> Self
    where
        U: Into<BString>,
    {
        Self {
            representation_code,
            units: units.into(),
            values,
        }
    }

    /// Creates the attribute an object takes when it inherits everything from the template.
    pub fn from_definition(definition: &AttributeDefinition) -> Self {
        Self {
            representation_code: definition.representation_code,
            units: definition.units.clone(),
            values: definition.default.clone().unwrap_or_default(),
        }
    }

    /// Returns the representation code.
    pub fn representation_code(&self) -> RepresentationCode {
        self.representation_code
    }

    /// Returns the units.
    pub fn units(&self) -> &BStr {
        self.units.as_ref()
    }

    /// Returns the number of values.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Returns the values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the first value.
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }
}
