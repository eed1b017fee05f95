//! DLIS component descriptors.

use std::{error, fmt};

use bitflags::bitflags;

/// A component role.
///
/// This is the upper three bits of a component descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Absent attribute (`ABSATR`, 0).
    AbsentAttribute,
    /// Attribute (`ATTRIB`, 1).
    Attribute,
    /// Invariant attribute (`INVATR`, 2).
    InvariantAttribute,
    /// Object (`OBJECT`, 3).
    Object,
    /// Redundant set (`RDSET`, 5).
    RedundantSet,
    /// Replacement set (`RSET`, 6).
    ReplacementSet,
    /// Set (`SET`, 7).
    Set,
}

impl Role {
    /// Returns whether the role begins a set.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set | Self::RedundantSet | Self::ReplacementSet)
    }

    /// Returns whether the role is one of the attribute roles.
    pub fn is_attribute(&self) -> bool {
        matches!(
            self,
            Self::AbsentAttribute | Self::Attribute | Self::InvariantAttribute
        )
    }
}

/// An error returned when a component descriptor has the reserved role.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TryFromByteError(u8);

impl error::Error for TryFromByteError {}

impl fmt::Display for TryFromByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid component role: {:#05b}", self.0 >> 5)
    }
}

bitflags! {
    /// Set component field presence flags.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct SetFlags: u8 {
        /// The set type is present.
        const TYPE = 0x10;
        /// The set name is present.
        const NAME = 0x08;
    }
}

bitflags! {
    /// Object component field presence flags.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ObjectFlags: u8 {
        /// The object name is present.
        const NAME = 0x10;
    }
}

bitflags! {
    /// Attribute component field presence flags.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct AttributeFlags: u8 {
        /// The label is present.
        const LABEL = 0x10;
        /// The count is present.
        const COUNT = 0x08;
        /// The representation code is present.
        const REPRESENTATION_CODE = 0x04;
        /// The units are present.
        const UNITS = 0x02;
        /// The value is present.
        const VALUE = 0x01;
    }
}

const FLAGS_MASK: u8 = 0x1f;

/// A component descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Descriptor {
    role: Role,
    flags: u8,
}

impl Descriptor {
    /// Creates a descriptor.
    ///
    /// Only the lower five bits of `flags` are used.
    pub fn new(role: Role, flags: u8) -> Self {
        Self {
            role,
            flags: flags & FLAGS_MASK,
        }
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the field presence flags of a set component.
    pub fn set_flags(&self) -> SetFlags {
        SetFlags::from_bits_truncate(self.flags)
    }

    /// Returns the field presence flags of an object component.
    pub fn object_flags(&self) -> ObjectFlags {
        ObjectFlags::from_bits_truncate(self.flags)
    }

    /// Returns the field presence flags of an attribute component.
    pub fn attribute_flags(&self) -> AttributeFlags {
        AttributeFlags::from_bits_truncate(self.flags)
    }
}

impl TryFrom<u8> for Descriptor {
    type Error = TryFromByteError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        let role = match b >> 5 {
            0 => Role::AbsentAttribute,
            1 => Role::Attribute,
            2 => Role::InvariantAttribute,
            3 => Role::Object,
            5 => Role::RedundantSet,
            6 => Role::ReplacementSet,
            7 => Role::Set,
            _ => return Err(TryFromByteError(b)),
        };

        Ok(Self::new(role, b))
    }
}

impl From<Descriptor> for u8 {
    fn from(descriptor: Descriptor) -> Self {
        let role = match descriptor.role {
            Role::AbsentAttribute => 0,
            Role::Attribute => 1,
            Role::InvariantAttribute => 2,
            Role::Object => 3,
            Role::RedundantSet => 5,
            Role::ReplacementSet => 6,
            Role::Set => 7,
        };

        (role << 5) | descriptor.flags
    }
}
