use bstr::{BStr, BString};

use crate::{RepresentationCode, Value};

/// The count a template attribute has when it is not given.
pub(crate) const DEFAULT_COUNT: u32 = 1;

/// The representation code a template attribute has when it is not given.
pub(crate) const DEFAULT_REPRESENTATION_CODE: RepresentationCode = RepresentationCode::Ident;

/// A template attribute definition.
///
/// This defines one column of a set: its label and the defaults that object attributes inherit.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefinition {
    pub(crate) label: BString,
    pub(crate) count: u32,
    pub(crate) representation_code: RepresentationCode,
    pub(crate) units: BString,
    pub(crate) default: Option<Vec<Value>>,
    pub(crate) is_invariant: bool,
}

impl AttributeDefinition {
    /// Creates an attribute definition with a count of 1, no units, and no default value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{RepresentationCode, set::AttributeDefinition};
    /// let definition = AttributeDefinition::new("LONG-NAME", RepresentationCode::Ascii);
    /// assert_eq!(definition.label(), "LONG-NAME");
    /// assert_eq!(definition.count(), 1);
    /// ```
    pub fn new<L>(label: L, representation_code: RepresentationCode) -> Self
    where
        L: Into<BString>,
    {
        Self {
            label: label.into(),
            count: DEFAULT_COUNT,
            representation_code,
            units: BString::default(),
            default: None,
            is_invariant: false,
        }
    }

    /// Sets the default count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the default units.
    pub fn with_units<U>(mut self, units: U) -> Self
    where
        U: Into<BString>,
    {
        self.units = units.into();
        self
    }

    /// Sets the default value.
    ///
    /// This also sets the default count to the number of values.
    pub fn with_default(mut self, values: Vec<Value>) -> Self {
        self.count = u32::try_from(values.len()).unwrap_or(u32::MAX);
        self.default = Some(values);
        self
    }

    /// Marks the attribute as invariant.
    ///
    /// An invariant attribute has the same value in every object and is only stored in the
    /// template.
    pub fn invariant(mut self) -> Self {
        self.is_invariant = true;
        self
    }

    /// Returns the label.
    pub fn label(&self) -> &BStr {
        self.label.as_ref()
    }

    /// Returns the default count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the default representation code.
    pub fn representation_code(&self) -> RepresentationCode {
        self.representation_code
    }

    /// Returns the default units.
    pub fn units(&self) -> &BStr {
        self.units.as_ref()
    }

    /// Returns the default value.
    pub fn default_value(&self) -> Option<&[Value]> {
        self.default.as_deref()
    }

    /// Returns whether the attribute is invariant.
    pub fn is_invariant(&self) -> bool {
        self.is_invariant
    }
}

/// A set template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template(Vec<AttributeDefinition>);

impl Template {
    /// Creates a template.
    pub fn new(definitions: Vec<AttributeDefinition>) -> Self {
        Self(definitions)
    }

    /// Returns the position of the attribute definition with the given label.
    pub fn position(&self, label: &[u8]) -> Option<usize> {
        self.0
            .iter()
            .position(|definition| definition.label == label)
    }

    /// Returns the number of attribute definitions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the template has no attribute definitions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the attribute definitions.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, definition: AttributeDefinition) {
        self.0.push(definition);
    }
}

impl AsRef<[AttributeDefinition]> for Template {
    fn as_ref(&self) -> &[AttributeDefinition] {
        &self.0
    }
}
