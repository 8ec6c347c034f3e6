//! Concrete type model: every variant carries its parameters and a nullability flag

use crate::error::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};

/// Largest decimal precision
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Largest sub-second precision for timestamps (picoseconds)
pub const MAX_TIMESTAMP_PRECISION: u8 = 12;

/// Largest sub-second precision for day intervals and compound intervals
pub const MAX_INTERVAL_PRECISION: u8 = 9;

/// Precision assumed when a timestamp type string carries no parameter (microseconds)
pub const DEFAULT_TIMESTAMP_PRECISION: u8 = 6;

/// Nullability of a type, orthogonal to its shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    /// Values are never null
    #[default]
    Required,
    /// Values may be null
    Nullable,
}

impl Nullability {
    /// Combine two nullability states: if either is nullable, result is nullable
    pub fn combine(self, other: Nullability) -> Nullability {
        match (self, other) {
            (Nullability::Nullable, _) | (_, Nullability::Nullable) => Nullability::Nullable,
            _ => Nullability::Required,
        }
    }

    /// Whether values may be null
    pub fn is_nullable(self) -> bool {
        matches!(self, Nullability::Nullable)
    }

    /// Map a plain boolean flag onto a nullability state
    pub fn from_nullable(nullable: bool) -> Nullability {
        if nullable {
            Nullability::Nullable
        } else {
            Nullability::Required
        }
    }
}

impl std::fmt::Display for Nullability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nullability::Required => write!(f, "REQUIRED"),
            Nullability::Nullable => write!(f, "NULLABLE"),
        }
    }
}

/// Shape of a concrete type, without nullability
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Boolean
    Boolean,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit IEEE float
    Fp32,
    /// 64-bit IEEE float
    Fp64,
    /// Unbounded character string
    String,
    /// Unbounded binary
    Binary,
    /// Fixed-length character string
    FixedChar { length: u32 },
    /// Variable-length character string with a maximum length
    VarChar { length: u32 },
    /// Fixed-length binary
    FixedBinary { length: u32 },
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Timestamp without time zone, `precision` fractional-second digits
    Timestamp { precision: u8 },
    /// Timestamp with time zone, `precision` fractional-second digits
    TimestampTz { precision: u8 },
    /// Interval in years and months
    IntervalYear,
    /// Interval in days, seconds and fractional seconds
    IntervalDay { precision: u8 },
    /// Interval with both year-month and day-time components
    IntervalCompound { precision: u8 },
    /// Exact numeric
    Decimal { precision: u8, scale: u8 },
    /// 128-bit UUID
    Uuid,
    /// Opaque extension type identified by name
    UserDefined { name: String },
    /// Ordered positional struct
    Struct { fields: Vec<Type> },
    /// Homogeneous list
    List { element: Box<Type> },
    /// Key/value map
    Map { key: Box<Type>, value: Box<Type> },
}

/// One discriminant per [`TypeKind`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeFamily {
    Boolean,
    I8,
    I16,
    I32,
    I64,
    Fp32,
    Fp64,
    String,
    Binary,
    FixedChar,
    VarChar,
    FixedBinary,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    IntervalYear,
    IntervalDay,
    IntervalCompound,
    Decimal,
    Uuid,
    UserDefined,
    Struct,
    List,
    Map,
}

impl TypeFamily {
    /// Every family, in declaration order
    pub const ALL: [TypeFamily; 25] = [
        TypeFamily::Boolean,
        TypeFamily::I8,
        TypeFamily::I16,
        TypeFamily::I32,
        TypeFamily::I64,
        TypeFamily::Fp32,
        TypeFamily::Fp64,
        TypeFamily::String,
        TypeFamily::Binary,
        TypeFamily::FixedChar,
        TypeFamily::VarChar,
        TypeFamily::FixedBinary,
        TypeFamily::Date,
        TypeFamily::Time,
        TypeFamily::Timestamp,
        TypeFamily::TimestampTz,
        TypeFamily::IntervalYear,
        TypeFamily::IntervalDay,
        TypeFamily::IntervalCompound,
        TypeFamily::Decimal,
        TypeFamily::Uuid,
        TypeFamily::UserDefined,
        TypeFamily::Struct,
        TypeFamily::List,
        TypeFamily::Map,
    ];

    /// Short name used in compound function keys (e.g. `sum:i32`)
    pub fn short_name(self) -> &'static str {
        match self {
            TypeFamily::Boolean => "bool",
            TypeFamily::I8 => "i8",
            TypeFamily::I16 => "i16",
            TypeFamily::I32 => "i32",
            TypeFamily::I64 => "i64",
            TypeFamily::Fp32 => "fp32",
            TypeFamily::Fp64 => "fp64",
            TypeFamily::String => "str",
            TypeFamily::Binary => "vbin",
            TypeFamily::FixedChar => "fchar",
            TypeFamily::VarChar => "vchar",
            TypeFamily::FixedBinary => "fbin",
            TypeFamily::Date => "date",
            TypeFamily::Time => "time",
            TypeFamily::Timestamp => "pts",
            TypeFamily::TimestampTz => "ptstz",
            TypeFamily::IntervalYear => "iyear",
            TypeFamily::IntervalDay => "iday",
            TypeFamily::IntervalCompound => "icompound",
            TypeFamily::Decimal => "dec",
            TypeFamily::Uuid => "uuid",
            TypeFamily::UserDefined => "u",
            TypeFamily::Struct => "struct",
            TypeFamily::List => "list",
            TypeFamily::Map => "map",
        }
    }

    /// Whether this is one of the character string families
    pub fn is_character(self) -> bool {
        matches!(
            self,
            TypeFamily::String | TypeFamily::FixedChar | TypeFamily::VarChar
        )
    }
}

impl std::fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl TypeKind {
    /// The family discriminant of this shape
    pub fn family(&self) -> TypeFamily {
        match self {
            TypeKind::Boolean => TypeFamily::Boolean,
            TypeKind::I8 => TypeFamily::I8,
            TypeKind::I16 => TypeFamily::I16,
            TypeKind::I32 => TypeFamily::I32,
            TypeKind::I64 => TypeFamily::I64,
            TypeKind::Fp32 => TypeFamily::Fp32,
            TypeKind::Fp64 => TypeFamily::Fp64,
            TypeKind::String => TypeFamily::String,
            TypeKind::Binary => TypeFamily::Binary,
            TypeKind::FixedChar { .. } => TypeFamily::FixedChar,
            TypeKind::VarChar { .. } => TypeFamily::VarChar,
            TypeKind::FixedBinary { .. } => TypeFamily::FixedBinary,
            TypeKind::Date => TypeFamily::Date,
            TypeKind::Time => TypeFamily::Time,
            TypeKind::Timestamp { .. } => TypeFamily::Timestamp,
            TypeKind::TimestampTz { .. } => TypeFamily::TimestampTz,
            TypeKind::IntervalYear => TypeFamily::IntervalYear,
            TypeKind::IntervalDay { .. } => TypeFamily::IntervalDay,
            TypeKind::IntervalCompound { .. } => TypeFamily::IntervalCompound,
            TypeKind::Decimal { .. } => TypeFamily::Decimal,
            TypeKind::Uuid => TypeFamily::Uuid,
            TypeKind::UserDefined { .. } => TypeFamily::UserDefined,
            TypeKind::Struct { .. } => TypeFamily::Struct,
            TypeKind::List { .. } => TypeFamily::List,
            TypeKind::Map { .. } => TypeFamily::Map,
        }
    }

    /// Check the parameters of this shape
    fn validate(&self) -> TypeResult<()> {
        match self {
            TypeKind::FixedChar { length } => check_length("fixedchar", *length),
            TypeKind::VarChar { length } => check_length("varchar", *length),
            TypeKind::FixedBinary { length } => check_length("fixedbinary", *length),
            TypeKind::Timestamp { precision } => {
                check_precision("precision_timestamp", *precision, MAX_TIMESTAMP_PRECISION)
            }
            TypeKind::TimestampTz { precision } => check_precision(
                "precision_timestamp_tz",
                *precision,
                MAX_TIMESTAMP_PRECISION,
            ),
            TypeKind::IntervalDay { precision } => {
                check_precision("interval_day", *precision, MAX_INTERVAL_PRECISION)
            }
            TypeKind::IntervalCompound { precision } => {
                check_precision("interval_compound", *precision, MAX_INTERVAL_PRECISION)
            }
            TypeKind::Decimal { precision, scale } => {
                if *precision == 0 || *precision > MAX_DECIMAL_PRECISION || scale > precision {
                    return Err(TypeError::InvalidDecimal {
                        precision: *precision,
                        scale: *scale,
                    });
                }
                Ok(())
            }
            TypeKind::UserDefined { name } if name.trim().is_empty() => {
                Err(TypeError::EmptyUserDefinedName)
            }
            _ => Ok(()),
        }
    }
}

fn check_length(kind: &'static str, length: u32) -> TypeResult<()> {
    if length == 0 {
        return Err(TypeError::InvalidLength { kind, length });
    }
    Ok(())
}

fn check_precision(kind: &'static str, precision: u8, max: u8) -> TypeResult<()> {
    if precision > max {
        return Err(TypeError::InvalidPrecision {
            kind,
            precision,
            max,
        });
    }
    Ok(())
}

/// A concrete, fully-parameterized type
///
/// Equality is structural and includes nullability; use [`Type::shape_eq`]
/// to compare shapes only. Serializes as its canonical type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Type {
    kind: TypeKind,
    nullability: Nullability,
}

impl Type {
    /// Create a type, rejecting malformed parameters
    pub fn new(kind: TypeKind, nullability: Nullability) -> TypeResult<Self> {
        kind.validate()?;
        Ok(Self { kind, nullability })
    }

    /// Shape of this type
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Family discriminant of this type
    pub fn family(&self) -> TypeFamily {
        self.kind.family()
    }

    /// Nullability of this type
    pub fn nullability(&self) -> Nullability {
        self.nullability
    }

    /// Whether values of this type may be null
    pub fn is_nullable(&self) -> bool {
        self.nullability.is_nullable()
    }

    /// Same shape with the given nullability
    pub fn with_nullability(&self, nullability: Nullability) -> Type {
        Type {
            kind: self.kind.clone(),
            nullability,
        }
    }

    /// Same shape, nullable
    pub fn as_nullable(&self) -> Type {
        self.with_nullability(Nullability::Nullable)
    }

    /// Same shape, required
    pub fn as_required(&self) -> Type {
        self.with_nullability(Nullability::Required)
    }

    /// Compare every parameter except the top-level nullability
    pub fn shape_eq(&self, other: &Type) -> bool {
        self.kind == other.kind
    }

    /// Whether this is a boolean type of either nullability
    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, TypeKind::Boolean)
    }

    /// Field types if this is a struct
    pub fn struct_fields(&self) -> Option<&[Type]> {
        match &self.kind {
            TypeKind::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// Consume the type and return its shape and nullability
    pub fn into_parts(self) -> (TypeKind, Nullability) {
        (self.kind, self.nullability)
    }

    /// Construct from parts already known to be valid
    pub(crate) fn from_valid(kind: TypeKind, nullability: Nullability) -> Self {
        Self { kind, nullability }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TypeKind::Boolean => write!(f, "boolean")?,
            TypeKind::I8 => write!(f, "i8")?,
            TypeKind::I16 => write!(f, "i16")?,
            TypeKind::I32 => write!(f, "i32")?,
            TypeKind::I64 => write!(f, "i64")?,
            TypeKind::Fp32 => write!(f, "fp32")?,
            TypeKind::Fp64 => write!(f, "fp64")?,
            TypeKind::String => write!(f, "string")?,
            TypeKind::Binary => write!(f, "binary")?,
            TypeKind::FixedChar { length } => write!(f, "fixedchar<{length}>")?,
            TypeKind::VarChar { length } => write!(f, "varchar<{length}>")?,
            TypeKind::FixedBinary { length } => write!(f, "fixedbinary<{length}>")?,
            TypeKind::Date => write!(f, "date")?,
            TypeKind::Time => write!(f, "time")?,
            TypeKind::Timestamp { precision } => write!(f, "precision_timestamp<{precision}>")?,
            TypeKind::TimestampTz { precision } => {
                write!(f, "precision_timestamp_tz<{precision}>")?
            }
            TypeKind::IntervalYear => write!(f, "interval_year")?,
            TypeKind::IntervalDay { precision } => write!(f, "interval_day<{precision}>")?,
            TypeKind::IntervalCompound { precision } => {
                write!(f, "interval_compound<{precision}>")?
            }
            TypeKind::Decimal { precision, scale } => write!(f, "decimal<{precision},{scale}>")?,
            TypeKind::Uuid => write!(f, "uuid")?,
            TypeKind::UserDefined { name } => write!(f, "u!{name}")?,
            TypeKind::Struct { fields } => {
                let field_strs: Vec<String> = fields.iter().map(|t| t.to_string()).collect();
                write!(f, "struct<{}>", field_strs.join(","))?
            }
            TypeKind::List { element } => write!(f, "list<{element}>")?,
            TypeKind::Map { key, value } => write!(f, "map<{key},{value}>")?,
        }
        if self.is_nullable() {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Type {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_type(s)
    }
}

impl TryFrom<String> for Type {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        crate::parse::parse_type(&s)
    }
}

impl From<Type> for String {
    fn from(ty: Type) -> Self {
        ty.to_string()
    }
}

/// Factory for types of a fixed nullability
///
/// Parameterless types are created infallibly; anything carrying a length,
/// precision or name goes through the same validation as [`Type::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCreator {
    nullability: Nullability,
}

impl TypeCreator {
    /// Creates required (non-nullable) types
    pub const REQUIRED: TypeCreator = TypeCreator {
        nullability: Nullability::Required,
    };

    /// Creates nullable types
    pub const NULLABLE: TypeCreator = TypeCreator {
        nullability: Nullability::Nullable,
    };

    /// Creator for the given nullability
    pub fn of(nullability: Nullability) -> Self {
        Self { nullability }
    }

    fn simple(&self, kind: TypeKind) -> Type {
        Type::from_valid(kind, self.nullability)
    }

    pub fn boolean(&self) -> Type {
        self.simple(TypeKind::Boolean)
    }

    pub fn i8(&self) -> Type {
        self.simple(TypeKind::I8)
    }

    pub fn i16(&self) -> Type {
        self.simple(TypeKind::I16)
    }

    pub fn i32(&self) -> Type {
        self.simple(TypeKind::I32)
    }

    pub fn i64(&self) -> Type {
        self.simple(TypeKind::I64)
    }

    pub fn fp32(&self) -> Type {
        self.simple(TypeKind::Fp32)
    }

    pub fn fp64(&self) -> Type {
        self.simple(TypeKind::Fp64)
    }

    /// Unbounded character string
    pub fn string(&self) -> Type {
        self.simple(TypeKind::String)
    }

    /// Unbounded binary
    pub fn binary(&self) -> Type {
        self.simple(TypeKind::Binary)
    }

    pub fn date(&self) -> Type {
        self.simple(TypeKind::Date)
    }

    pub fn time(&self) -> Type {
        self.simple(TypeKind::Time)
    }

    pub fn interval_year(&self) -> Type {
        self.simple(TypeKind::IntervalYear)
    }

    pub fn uuid(&self) -> Type {
        self.simple(TypeKind::Uuid)
    }

    pub fn fixed_char(&self, length: u32) -> TypeResult<Type> {
        Type::new(TypeKind::FixedChar { length }, self.nullability)
    }

    pub fn var_char(&self, length: u32) -> TypeResult<Type> {
        Type::new(TypeKind::VarChar { length }, self.nullability)
    }

    pub fn fixed_binary(&self, length: u32) -> TypeResult<Type> {
        Type::new(TypeKind::FixedBinary { length }, self.nullability)
    }

    pub fn decimal(&self, precision: u8, scale: u8) -> TypeResult<Type> {
        Type::new(TypeKind::Decimal { precision, scale }, self.nullability)
    }

    pub fn timestamp(&self, precision: u8) -> TypeResult<Type> {
        Type::new(TypeKind::Timestamp { precision }, self.nullability)
    }

    pub fn timestamp_tz(&self, precision: u8) -> TypeResult<Type> {
        Type::new(TypeKind::TimestampTz { precision }, self.nullability)
    }

    pub fn interval_day(&self, precision: u8) -> TypeResult<Type> {
        Type::new(TypeKind::IntervalDay { precision }, self.nullability)
    }

    pub fn interval_compound(&self, precision: u8) -> TypeResult<Type> {
        Type::new(TypeKind::IntervalCompound { precision }, self.nullability)
    }

    pub fn user_defined(&self, name: impl Into<String>) -> TypeResult<Type> {
        Type::new(TypeKind::UserDefined { name: name.into() }, self.nullability)
    }

    /// Ordered struct of the given field types
    pub fn structure(&self, fields: impl IntoIterator<Item = Type>) -> Type {
        self.simple(TypeKind::Struct {
            fields: fields.into_iter().collect(),
        })
    }

    pub fn list(&self, element: Type) -> Type {
        self.simple(TypeKind::List {
            element: Box::new(element),
        })
    }

    pub fn map(&self, key: Type, value: Type) -> Type {
        self.simple(TypeKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
