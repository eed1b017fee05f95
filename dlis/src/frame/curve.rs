use std::{error, fmt};

use bstr::{BStr, BString};

use super::channel_labels::{DIMENSION, LONG_NAME, PROPERTIES, REPRESENTATION_CODE, UNITS};
use crate::{
    RepresentationCode, Set, Value,
    representation_code::UnsupportedCodeError,
    set::{Attribute, Object},
    value::ObjectName,
};

/// An error returned when a `CHANNEL` object does not describe a readable curve.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FromObjectError {
    /// The representation code is not defined.
    UnsupportedCode(UnsupportedCodeError),
    /// The number of values per row overflows.
    DimensionOverflow(Vec<u32>),
}

impl error::Error for FromObjectError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::UnsupportedCode(e) => Some(e),
            Self::DimensionOverflow(_) => None,
        }
    }
}

impl fmt::Display for FromObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCode(_) => f.write_str("unsupported representation code"),
            Self::DimensionOverflow(dimension) => write!(f, "dimension overflows: {dimension:?}"),
        }
    }
}

impl From<UnsupportedCodeError> for FromObjectError {
    fn from(e: UnsupportedCodeError) -> Self {
        Self::UnsupportedCode(e)
    }
}

/// A DLIS curve.
///
/// A curve is one channel of a frame. Each row holds [`Self::element_count`] samples, stored
/// flattened in row-major order. A `None` sample is a no-value marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub(crate) name: ObjectName,
    pub(crate) long_name: Option<BString>,
    pub(crate) properties: Vec<BString>,
    pub(crate) representation_code: RepresentationCode,
    pub(crate) units: BString,
    pub(crate) dimension: Vec<u32>,
    pub(crate) samples: Vec<Option<Value>>,
}

impl Curve {
    /// Creates a scalar curve with no samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{Curve, RepresentationCode, value::ObjectName};
    /// let curve = Curve::new(ObjectName::new(0, 0, "GR"), RepresentationCode::Fsingl);
    /// assert_eq!(curve.element_count(), 1);
    /// ```
    pub fn new(name: ObjectName, representation_code: RepresentationCode) -> Self {
        Self {
            name,
            long_name: None,
            properties: Vec::new(),
            representation_code,
            units: BString::default(),
            dimension: vec![1],
            samples: Vec::new(),
        }
    }

    /// Sets the long name.
    pub fn with_long_name<N>(mut self, long_name: N) -> Self
    where
        N: Into<BString>,
    {
        self.long_name = Some(long_name.into());
        self
    }

    /// Sets the properties.
    pub fn with_properties(mut self, properties: Vec<BString>) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the units.
    pub fn with_units<U>(mut self, units: U) -> Self
    where
        U: Into<BString>,
    {
        self.units = units.into();
        self
    }

    /// Sets the dimension of a sample.
    pub fn with_dimension(mut self, dimension: Vec<u32>) -> Self {
        self.dimension = dimension;
        self
    }

    /// Sets the samples.
    ///
    /// The number of samples must be a multiple of the element count.
    pub fn with_samples(mut self, samples: Vec<Option<Value>>) -> Self {
        self.samples = samples;
        self
    }

    /// Returns the curve (channel) name.
    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Returns the long name.
    pub fn long_name(&self) -> Option<&BStr> {
        self.long_name.as_ref().map(|s| s.as_ref())
    }

    /// Returns the properties.
    pub fn properties(&self) -> &[BString] {
        &self.properties
    }

    /// Returns the representation code of the samples.
    pub fn representation_code(&self) -> RepresentationCode {
        self.representation_code
    }

    /// Returns the units.
    pub fn units(&self) -> &BStr {
        self.units.as_ref()
    }

    /// Returns the dimension of a sample.
    pub fn dimension(&self) -> &[u32] {
        &self.dimension
    }

    /// Returns the number of values per row.
    ///
    /// This is the product of the dimension. An empty dimension is a scalar. The count
    /// saturates at `usize::MAX` if the product overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{Curve, RepresentationCode, value::ObjectName};
    ///
    /// let curve = Curve::new(ObjectName::new(0, 0, "IMG"), RepresentationCode::Ushort)
    ///     .with_dimension(vec![4, 3]);
    /// assert_eq!(curve.element_count(), 12);
    ///
    /// let curve = curve.with_dimension(vec![u32::MAX; 3]);
    /// assert_eq!(curve.element_count(), usize::MAX);
    /// ```
    pub fn element_count(&self) -> usize {
        checked_element_count(&self.dimension).unwrap_or(usize::MAX)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        match self.element_count() {
            0 => 0,
            n => self.samples.len() / n,
        }
    }

    /// Returns the flattened samples.
    pub fn samples(&self) -> &[Option<Value>] {
        &self.samples
    }

    /// Returns the samples of a row.
    pub fn row(&self, i: usize) -> Option<&[Option<Value>]> {
        let n = self.element_count();
        let start = i.checked_mul(n)?;
        let end = start.checked_add(n)?;
        self.samples.get(start..end)
    }

    /// Returns the samples as floating point numbers.
    ///
    /// Non-numeric samples and no-value markers are `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{Curve, RepresentationCode, Value, value::ObjectName};
    ///
    /// let curve = Curve::new(ObjectName::new(0, 0, "MD"), RepresentationCode::Fdoubl)
    ///     .with_samples(vec![Some(Value::Fdoubl(1450.0)), None]);
    ///
    /// assert_eq!(curve.to_f64s(), [Some(1450.0), None]);
    /// ```
    pub fn to_f64s(&self) -> Vec<Option<f64>> {
        self.samples
            .iter()
            .map(|sample| sample.as_ref().and_then(Value::as_f64))
            .collect()
    }

    pub(crate) fn clear_samples(&mut self) {
        self.samples.clear();
    }

    pub(crate) fn extend_samples<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = Option<Value>>,
    {
        self.samples.extend(samples);
    }

    /// Pads the samples with no-value markers up to the given number of rows.
    pub(crate) fn pad_rows(&mut self, row_count: usize) {
        let Some(len) = row_count.checked_mul(self.element_count()) else {
            return;
        };

        if self.samples.len() < len {
            self.samples.resize(len, None);
        }
    }

    /// Builds a curve from a `CHANNEL` object.
    pub(crate) fn from_object(set: &Set, object: &Object) -> Result<Self, FromObjectError> {
        let first = |label| set.attribute(object, label).and_then(Attribute::first);

        let representation_code = match first(REPRESENTATION_CODE).and_then(Value::as_u32) {
            Some(n) => {
                let m = u8::try_from(n).map_err(|_| UnsupportedCodeError(n))?;
                RepresentationCode::try_from(m)?
            }
            None => RepresentationCode::Fsingl,
        };

        let long_name = first(LONG_NAME)
            .and_then(Value::as_bytes)
            .map(BString::from);

        let properties = set
            .attribute(object, PROPERTIES)
            .map(|attribute| {
                attribute
                    .values()
                    .iter()
                    .filter_map(Value::as_bytes)
                    .map(BString::from)
                    .collect()
            })
            .unwrap_or_default();

        let units = first(UNITS)
            .and_then(Value::as_bytes)
            .map(BString::from)
            .unwrap_or_default();

        let dimension = set
            .attribute(object, DIMENSION)
            .map(|attribute| {
                attribute
                    .values()
                    .iter()
                    .filter_map(Value::as_u32)
                    .collect::<Vec<_>>()
            })
            .filter(|dimension| !dimension.is_empty())
            .unwrap_or_else(|| vec![1]);

        if checked_element_count(&dimension).is_none() {
            return Err(FromObjectError::DimensionOverflow(dimension));
        }

        Ok(Self {
            name: object.name().clone(),
            long_name,
            properties,
            representation_code,
            units,
            dimension,
            samples: Vec::new(),
        })
    }
}

fn checked_element_count(dimension: &[u32]) -> Option<usize> {
    dimension.iter().try_fold(1usize, |n, &m| {
        usize::try_from(m).ok().and_then(|m| n.checked_mul(m))
    })
}
