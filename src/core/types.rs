use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use serde::{Deserialize, Serialize};

/// Storage kind of a field. The set is closed; every value operation on a
/// field dispatches over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Boolean,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    DateTime,
    Time,
    Guid,
    Stream,
}

impl FieldType {
    /// Name of the Rust type a value of this kind materializes as.
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Single => "f32",
            Self::Double => "f64",
            Self::Decimal => "rust_decimal::Decimal",
            Self::String => "String",
            Self::DateTime => "chrono::NaiveDateTime",
            Self::Time => "chrono::NaiveTime",
            Self::Guid => "uuid::Uuid",
            Self::Stream => "Vec<u8>",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int16 | Self::Int32 | Self::Int64 | Self::Single | Self::Double | Self::Decimal
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Single => "SINGLE",
            Self::Double => "DOUBLE",
            Self::Decimal => "DECIMAL",
            Self::String => "STRING",
            Self::DateTime => "DATETIME",
            Self::Time => "TIME",
            Self::Guid => "GUID",
            Self::Stream => "STREAM",
        };
        write!(f, "{}", name)
    }
}

/// Behavioral modifiers of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldFlags(u32);

impl FieldFlags {
    pub const NONE: Self = Self(0);
    pub const INSERTABLE: Self = Self(1);
    pub const UPDATABLE: Self = Self(1 << 1);
    pub const NOT_NULL: Self = Self(1 << 2);
    pub const PRIMARY_KEY: Self = Self(1 << 3);
    pub const AUTO_INCREMENT: Self = Self(1 << 4);
    pub const FOREIGN: Self = Self(1 << 5);
    pub const CALCULATED: Self = Self(1 << 6);
    pub const REFLECTIVE: Self = Self(1 << 7);
    pub const NOT_MAPPED: Self = Self(1 << 8);
    pub const TRIM: Self = Self(1 << 9);
    // Implies TRIM.
    pub const TRIM_TO_EMPTY: Self = Self(1 << 9 | 1 << 10);
    pub const DENY_FILTERING: Self = Self(1 << 11);
    pub const UNIQUE: Self = Self(1 << 12);

    pub const DEFAULT: Self = Self(Self::INSERTABLE.0 | Self::UPDATABLE.0 | Self::TRIM.0);
    pub const REQUIRED: Self = Self(Self::DEFAULT.0 | Self::NOT_NULL.0);
    pub const IDENTITY: Self = Self(Self::PRIMARY_KEY.0 | Self::AUTO_INCREMENT.0 | Self::NOT_NULL.0);

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// True when every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for FieldFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FieldFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for FieldFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Tier at which a field is included in generated SELECT lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SelectLevel {
    /// Resolved by the query builder: primary key and plain table columns
    /// are selected, joined and calculated columns are not.
    #[default]
    Default,
    Always,
    Lookup,
    List,
    Details,
    Explicit,
    Never,
}
