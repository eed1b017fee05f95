//! DLIS frames and curves.

mod curve;

pub use self::curve::Curve;
pub(crate) use self::curve::FromObjectError;

use bstr::{BStr, BString};

use crate::{
    RepresentationCode, Set, Value,
    set::{Attribute, AttributeDefinition, Object, Template, types},
    value::ObjectName,
};

/// `CHANNEL` attribute labels.
pub mod channel_labels {
    /// `LONG-NAME`
    pub const LONG_NAME: &[u8] = b"LONG-NAME";
    /// `PROPERTIES`
    pub const PROPERTIES: &[u8] = b"PROPERTIES";
    /// `REPRESENTATION-CODE`
    pub const REPRESENTATION_CODE: &[u8] = b"REPRESENTATION-CODE";
    /// `UNITS`
    pub const UNITS: &[u8] = b"UNITS";
    /// `DIMENSION`
    pub const DIMENSION: &[u8] = b"DIMENSION";
}

/// `FRAME` attribute labels.
pub mod frame_labels {
    /// `DESCRIPTION`
    pub const DESCRIPTION: &[u8] = b"DESCRIPTION";
    /// `CHANNELS`
    pub const CHANNELS: &[u8] = b"CHANNELS";
    /// `INDEX-TYPE`
    pub const INDEX_TYPE: &[u8] = b"INDEX-TYPE";
    /// `DIRECTION`
    pub const DIRECTION: &[u8] = b"DIRECTION";
    /// `SPACING`
    pub const SPACING: &[u8] = b"SPACING";
    /// `INDEX-MIN`
    pub const INDEX_MIN: &[u8] = b"INDEX-MIN";
    /// `INDEX-MAX`
    pub const INDEX_MAX: &[u8] = b"INDEX-MAX";
}

/// The direction in which a frame's index changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// The index increases from row to row.
    Increasing,
    /// The index decreases from row to row.
    Decreasing,
}

impl Direction {
    fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Increasing => b"INCREASING",
            Self::Decreasing => b"DECREASING",
        }
    }

    fn from_bytes(s: &[u8]) -> Option<Self> {
        match s {
            b"INCREASING" => Some(Self::Increasing),
            b"DECREASING" => Some(Self::Decreasing),
            _ => None,
        }
    }
}

/// A DLIS frame.
///
/// A frame is a table of index-aligned samples. Each curve is a column, and the first curve is
/// the index when the frame has an index type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub(crate) name: ObjectName,
    pub(crate) description: Option<BString>,
    pub(crate) index_type: Option<BString>,
    pub(crate) direction: Option<Direction>,
    pub(crate) spacing: Option<Attribute>,
    pub(crate) index_min: Option<Value>,
    pub(crate) index_max: Option<Value>,
    pub(crate) curves: Vec<Curve>,
    pub(crate) frame_numbers: Vec<u32>,
}

impl Frame {
    /// Creates a frame with the given curves.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{Frame, value::ObjectName};
    /// let frame = Frame::new(ObjectName::new(0, 0, "MAIN"), Vec::new());
    /// assert_eq!(frame.row_count(), 0);
    /// ```
    pub fn new(name: ObjectName, curves: Vec<Curve>) -> Self {
        Self {
            name,
            curves,
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description<D>(mut self, description: D) -> Self
    where
        D: Into<BString>,
    {
        self.description = Some(description.into());
        self
    }

    /// Sets the index type, e.g., `BOREHOLE-DEPTH` or `TIME`.
    pub fn with_index_type<T>(mut self, index_type: T) -> Self
    where
        T: Into<BString>,
    {
        self.index_type = Some(index_type.into());
        self
    }

    /// Sets the index direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Sets the index spacing.
    pub fn with_spacing(mut self, spacing: Attribute) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Sets the index bounds.
    pub fn with_index_bounds(mut self, min: Value, max: Value) -> Self {
        self.index_min = Some(min);
        self.index_max = Some(max);
        self
    }

    /// Sets the frame numbers of the rows.
    pub fn with_frame_numbers(mut self, frame_numbers: Vec<u32>) -> Self {
        self.frame_numbers = frame_numbers;
        self
    }

    /// Returns the frame name.
    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&BStr> {
        self.description.as_ref().map(|s| s.as_ref())
    }

    /// Returns the index type.
    pub fn index_type(&self) -> Option<&BStr> {
        self.index_type.as_ref().map(|s| s.as_ref())
    }

    /// Returns the index direction.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Returns the index spacing as a number.
    pub fn spacing(&self) -> Option<f64> {
        self.spacing
            .as_ref()
            .and_then(|attribute| attribute.first())
            .and_then(Value::as_f64)
    }

    /// Returns the units of the index spacing.
    pub fn index_units(&self) -> Option<&BStr> {
        self.spacing.as_ref().map(|attribute| attribute.units())
    }

    /// Returns the smallest index value.
    pub fn index_min(&self) -> Option<f64> {
        self.index_min.as_ref().and_then(Value::as_f64)
    }

    /// Returns the largest index value.
    pub fn index_max(&self) -> Option<f64> {
        self.index_max.as_ref().and_then(Value::as_f64)
    }

    /// Returns the curves.
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Returns a mutable reference to the curves.
    pub fn curves_mut(&mut self) -> &mut Vec<Curve> {
        &mut self.curves
    }

    /// Returns the curve with the given identifier.
    pub fn curve(&self, identifier: &[u8]) -> Option<&Curve> {
        self.curves
            .iter()
            .find(|curve| curve.name().identifier() == identifier)
    }

    /// Returns the index curve.
    ///
    /// This is the first curve, if the frame declares an index type.
    pub fn index(&self) -> Option<&Curve> {
        self.index_type.as_ref().and(self.curves.first())
    }

    /// Returns the frame numbers of the rows read.
    pub fn frame_numbers(&self) -> &[u32] {
        &self.frame_numbers
    }

    /// Returns the number of rows.
    ///
    /// This is the row count of the first curve.
    pub fn row_count(&self) -> usize {
        self.curves.first().map(Curve::row_count).unwrap_or_default()
    }

    /// Builds a frame from a `FRAME` object and the curves its `CHANNELS` attribute resolves to.
    pub(crate) fn from_object(set: &Set, object: &Object, curves: Vec<Curve>) -> Self {
        use self::frame_labels::{
            DESCRIPTION, DIRECTION, INDEX_MAX, INDEX_MIN, INDEX_TYPE, SPACING,
        };

        let string = |label| {
            set.attribute(object, label)
                .and_then(Attribute::first)
                .and_then(Value::as_bytes)
                .map(BString::from)
        };

        let first_value = |label| {
            set.attribute(object, label)
                .and_then(Attribute::first)
                .cloned()
        };

        Self {
            name: object.name().clone(),
            description: string(DESCRIPTION),
            index_type: string(INDEX_TYPE),
            direction: string(DIRECTION).and_then(|s| Direction::from_bytes(&s)),
            spacing: set.attribute(object, SPACING).cloned(),
            index_min: first_value(INDEX_MIN),
            index_max: first_value(INDEX_MAX),
            curves,
            frame_numbers: Vec::new(),
        }
    }
}

/// Returns the channel names a `FRAME` object lists.
pub(crate) fn channel_names<'a>(set: &Set, object: &'a Object) -> Vec<&'a ObjectName> {
    set.attribute(object, frame_labels::CHANNELS)
        .map(|attribute| {
            attribute
                .values()
                .iter()
                .filter_map(Value::as_object_name)
                .collect()
        })
        .unwrap_or_default()
}

/// Builds a `CHANNEL` set describing the curves of the given frames.
///
/// # Examples
///
/// ```
/// use dlis::{Curve, Frame, RepresentationCode, frame, value::ObjectName};
///
/// let curve = Curve::new(ObjectName::new(0, 0, "GR"), RepresentationCode::Fsingl)
///     .with_units("gAPI");
/// let frame = Frame::new(ObjectName::new(0, 0, "MAIN"), vec![curve]);
///
/// let set = frame::build_channel_set(&[frame]);
/// assert_eq!(set.set_type(), "CHANNEL");
/// assert_eq!(set.objects().len(), 1);
/// ```
pub fn build_channel_set(frames: &[Frame]) -> Set {
    use self::channel_labels::{DIMENSION, LONG_NAME, PROPERTIES, REPRESENTATION_CODE, UNITS};

    let template = Template::new(vec![
        AttributeDefinition::new(LONG_NAME, RepresentationCode::Ascii),
        AttributeDefinition::new(PROPERTIES, RepresentationCode::Ident),
        AttributeDefinition::new(REPRESENTATION_CODE, RepresentationCode::Ushort),
        AttributeDefinition::new(UNITS, RepresentationCode::Units),
        AttributeDefinition::new(DIMENSION, RepresentationCode::Uvari),
    ]);

    let objects = frames
        .iter()
        .flat_map(|frame| frame.curves())
        .map(|curve| {
            let long_name = curve.long_name().map(|s| {
                Attribute::new(
                    RepresentationCode::Ascii,
                    "",
                    vec![Value::Ascii(s.into())],
                )
            });

            let properties = Attribute::new(
                RepresentationCode::Ident,
                "",
                curve
                    .properties()
                    .iter()
                    .map(|p| Value::Ident(p.clone()))
                    .collect(),
            );

            let representation_code = Attribute::new(
                RepresentationCode::Ushort,
                "",
                vec![Value::Ushort(u8::from(curve.representation_code()))],
            );

            let units = Attribute::new(
                RepresentationCode::Units,
                "",
                vec![Value::Units(curve.units().into())],
            );

            let dimension = Attribute::new(
                RepresentationCode::Uvari,
                "",
                curve.dimension().iter().copied().map(Value::Uvari).collect(),
            );

            Object::new(
                curve.name().clone(),
                vec![
                    long_name,
                    Some(properties),
                    Some(representation_code),
                    Some(units),
                    Some(dimension),
                ],
            )
        })
        .collect();

    Set::new(types::CHANNEL, None, template, objects)
}

/// Builds a `FRAME` set describing the given frames.
pub fn build_frame_set(frames: &[Frame]) -> Set {
    use self::frame_labels::{
        CHANNELS, DESCRIPTION, DIRECTION, INDEX_MAX, INDEX_MIN, INDEX_TYPE, SPACING,
    };

    let template = Template::new(vec![
        AttributeDefinition::new(DESCRIPTION, RepresentationCode::Ascii),
        AttributeDefinition::new(CHANNELS, RepresentationCode::Obname),
        AttributeDefinition::new(INDEX_TYPE, RepresentationCode::Ident),
        AttributeDefinition::new(DIRECTION, RepresentationCode::Ident),
        AttributeDefinition::new(SPACING, RepresentationCode::Fdoubl),
        AttributeDefinition::new(INDEX_MIN, RepresentationCode::Fdoubl),
        AttributeDefinition::new(INDEX_MAX, RepresentationCode::Fdoubl),
    ]);

    let single = |value: &Value| {
        Attribute::new(value.representation_code(), "", vec![value.clone()])
    };

    let objects = frames
        .iter()
        .map(|frame| {
            let channels = Attribute::new(
                RepresentationCode::Obname,
                "",
                frame
                    .curves()
                    .iter()
                    .map(|curve| Value::Obname(curve.name().clone()))
                    .collect(),
            );

            Object::new(
                frame.name().clone(),
                vec![
                    frame
                        .description
                        .as_ref()
                        .map(|s| single(&Value::Ascii(s.clone()))),
                    Some(channels),
                    frame
                        .index_type
                        .as_ref()
                        .map(|s| single(&Value::Ident(s.clone()))),
                    frame
                        .direction
                        .map(|d| single(&Value::Ident(d.as_bytes().into()))),
                    frame.spacing.clone(),
                    frame.index_min.as_ref().map(single),
                    frame.index_max.as_ref().map(single),
                ],
            )
        })
        .collect();

    Set::new(types::FRAME, None, template, objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_frame() -> Frame {
        let depth = Curve::new(ObjectName::new(1, 0, "MD"), RepresentationCode::Fdoubl)
            .with_units("m");
        let gr = Curve::new(ObjectName::new(1, 0, "GR"), RepresentationCode::Fsingl)
            .with_long_name("Gamma Ray")
            .with_units("gAPI");

        Frame::new(ObjectName::new(1, 0, "MAIN"), vec![depth, gr])
            .with_index_type("BOREHOLE-DEPTH")
            .with_direction(Direction::Increasing)
            .with_spacing(Attribute::new(
                RepresentationCode::Fdoubl,
                "m",
                vec![Value::Fdoubl(0.5)],
            ))
            .with_index_bounds(Value::Fdoubl(1450.0), Value::Fdoubl(1451.0))
    }

    #[test]
    fn test_build_frame_set_round_trips_through_from_object() {
        let frame = build_frame();
        let set = build_frame_set(std::slice::from_ref(&frame));
        let object = &set.objects()[0];

        let names: Vec<_> = channel_names(&set, object)
            .into_iter()
            .map(|name| name.identifier().to_string())
            .collect();
        assert_eq!(names, ["MD", "GR"]);

        let actual = Frame::from_object(&set, object, frame.curves().to_vec());
        assert_eq!(actual, frame);

        assert_eq!(actual.spacing(), Some(0.5));
        assert_eq!(actual.index_units(), Some(BStr::new("m")));
        assert_eq!(actual.index_min(), Some(1450.0));
        assert_eq!(actual.index_max(), Some(1451.0));
        assert_eq!(actual.index().map(|curve| curve.name().identifier()), Some(BStr::new("MD")));
    }

    #[test]
    fn test_build_channel_set() {
        let frame = build_frame();
        let set = build_channel_set(&[frame]);

        assert_eq!(set.objects().len(), 2);

        let gr = &set.objects()[1];
        assert_eq!(
            set.attribute(gr, channel_labels::REPRESENTATION_CODE)
                .and_then(Attribute::first),
            Some(&Value::Ushort(2))
        );
        assert_eq!(
            set.attribute(gr, channel_labels::LONG_NAME)
                .and_then(Attribute::first),
            Some(&Value::Ascii("Gamma Ray".into()))
        );

        let md = &set.objects()[0];
        assert!(set.attribute(md, channel_labels::LONG_NAME).is_none());
    }
}
