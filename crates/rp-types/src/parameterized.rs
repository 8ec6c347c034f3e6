//! Parameterized types: templates whose parameters may still be symbolic
//!
//! These describe function argument/return shapes and coercion targets.
//! They never appear inside a finished plan.

use crate::error::TypeError;
use crate::types::{Nullability, Type, TypeFamily};
use serde::{Deserialize, Serialize};

/// A type template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParameterizedType {
    /// Fully bound type; every concrete type is also a valid template
    Concrete(Type),
    /// `fixedchar<L>` with a symbolic length
    FixedChar {
        length: String,
        nullability: Nullability,
    },
    /// `varchar<L>` with a symbolic maximum length
    VarChar {
        length: String,
        nullability: Nullability,
    },
    /// `fixedbinary<L>` with a symbolic length
    FixedBinary {
        length: String,
        nullability: Nullability,
    },
    /// `decimal<P,S>` with at least one symbolic parameter
    Decimal {
        precision: String,
        scale: String,
        nullability: Nullability,
    },
    /// `precision_timestamp<P>` with a symbolic precision
    Timestamp {
        precision: String,
        nullability: Nullability,
    },
    /// `precision_timestamp_tz<P>` with a symbolic precision
    TimestampTz {
        precision: String,
        nullability: Nullability,
    },
    /// `interval_day<P>` with a symbolic precision
    IntervalDay {
        precision: String,
        nullability: Nullability,
    },
    /// `interval_compound<P>` with a symbolic precision
    IntervalCompound {
        precision: String,
        nullability: Nullability,
    },
    /// Struct with at least one templated field
    Struct {
        fields: Vec<ParameterizedType>,
        nullability: Nullability,
    },
    /// List with a templated element
    List {
        element: Box<ParameterizedType>,
        nullability: Nullability,
    },
    /// Map with a templated key or value
    Map {
        key: Box<ParameterizedType>,
        value: Box<ParameterizedType>,
        nullability: Nullability,
    },
    /// Untyped placeholder (`any1`, `T`): shape and family inferred from context
    StringLiteral { value: String },
}

/// Discriminant of a [`ParameterizedType`], with concrete templates split by family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetShape {
    Concrete(TypeFamily),
    FixedChar,
    VarChar,
    FixedBinary,
    Decimal,
    Timestamp,
    TimestampTz,
    IntervalDay,
    IntervalCompound,
    Struct,
    List,
    Map,
    StringLiteral,
}

impl ParameterizedType {
    /// The template that matches exactly the given concrete type
    pub fn shape_of(ty: &Type) -> ParameterizedType {
        ParameterizedType::Concrete(ty.clone())
    }

    /// Whether every parameter is bound
    pub fn is_concrete(&self) -> bool {
        matches!(self, ParameterizedType::Concrete(_))
    }

    /// Discriminant of this template
    pub fn target_shape(&self) -> TargetShape {
        match self {
            ParameterizedType::Concrete(ty) => TargetShape::Concrete(ty.family()),
            ParameterizedType::FixedChar { .. } => TargetShape::FixedChar,
            ParameterizedType::VarChar { .. } => TargetShape::VarChar,
            ParameterizedType::FixedBinary { .. } => TargetShape::FixedBinary,
            ParameterizedType::Decimal { .. } => TargetShape::Decimal,
            ParameterizedType::Timestamp { .. } => TargetShape::Timestamp,
            ParameterizedType::TimestampTz { .. } => TargetShape::TimestampTz,
            ParameterizedType::IntervalDay { .. } => TargetShape::IntervalDay,
            ParameterizedType::IntervalCompound { .. } => TargetShape::IntervalCompound,
            ParameterizedType::Struct { .. } => TargetShape::Struct,
            ParameterizedType::List { .. } => TargetShape::List,
            ParameterizedType::Map { .. } => TargetShape::Map,
            ParameterizedType::StringLiteral { .. } => TargetShape::StringLiteral,
        }
    }

    /// The concrete family this template resolves into, if it names one
    pub fn family(&self) -> Option<TypeFamily> {
        match self.target_shape() {
            TargetShape::Concrete(family) => Some(family),
            TargetShape::FixedChar => Some(TypeFamily::FixedChar),
            TargetShape::VarChar => Some(TypeFamily::VarChar),
            TargetShape::FixedBinary => Some(TypeFamily::FixedBinary),
            TargetShape::Decimal => Some(TypeFamily::Decimal),
            TargetShape::Timestamp => Some(TypeFamily::Timestamp),
            TargetShape::TimestampTz => Some(TypeFamily::TimestampTz),
            TargetShape::IntervalDay => Some(TypeFamily::IntervalDay),
            TargetShape::IntervalCompound => Some(TypeFamily::IntervalCompound),
            TargetShape::Struct => Some(TypeFamily::Struct),
            TargetShape::List => Some(TypeFamily::List),
            TargetShape::Map => Some(TypeFamily::Map),
            TargetShape::StringLiteral => None,
        }
    }

    /// Declared nullability; string literals carry none and report `Required`
    pub fn nullability(&self) -> Nullability {
        match self {
            ParameterizedType::Concrete(ty) => ty.nullability(),
            ParameterizedType::FixedChar { nullability, .. }
            | ParameterizedType::VarChar { nullability, .. }
            | ParameterizedType::FixedBinary { nullability, .. }
            | ParameterizedType::Decimal { nullability, .. }
            | ParameterizedType::Timestamp { nullability, .. }
            | ParameterizedType::TimestampTz { nullability, .. }
            | ParameterizedType::IntervalDay { nullability, .. }
            | ParameterizedType::IntervalCompound { nullability, .. }
            | ParameterizedType::Struct { nullability, .. }
            | ParameterizedType::List { nullability, .. }
            | ParameterizedType::Map { nullability, .. } => *nullability,
            ParameterizedType::StringLiteral { .. } => Nullability::Required,
        }
    }

    /// Short name used in compound function keys; string literals use `any`
    pub fn short_name(&self) -> &'static str {
        match self.family() {
            Some(family) => family.short_name(),
            None => "any",
        }
    }
}

impl TypeFamily {
    /// Template shapes a source of this family can be coerced onto
    ///
    /// Every family accepts a concrete template of its own family; the
    /// character families additionally accept character templates and the
    /// untyped string literal.
    pub fn target_shapes(self) -> Vec<TargetShape> {
        let own = TargetShape::Concrete(self);
        match self {
            TypeFamily::FixedChar | TypeFamily::VarChar => vec![
                own,
                TargetShape::FixedChar,
                TargetShape::VarChar,
                TargetShape::StringLiteral,
            ],
            TypeFamily::String => vec![own, TargetShape::StringLiteral],
            _ => vec![own],
        }
    }
}

fn write_template(
    f: &mut std::fmt::Formatter<'_>,
    base: &str,
    params: &[&str],
    nullability: Nullability,
) -> std::fmt::Result {
    write!(f, "{base}<{}>", params.join(","))?;
    if nullability.is_nullable() {
        write!(f, "?")?;
    }
    Ok(())
}

impl std::fmt::Display for ParameterizedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterizedType::Concrete(ty) => write!(f, "{ty}"),
            ParameterizedType::FixedChar {
                length,
                nullability,
            } => write_template(f, "fixedchar", &[length.as_str()], *nullability),
            ParameterizedType::VarChar {
                length,
                nullability,
            } => write_template(f, "varchar", &[length.as_str()], *nullability),
            ParameterizedType::FixedBinary {
                length,
                nullability,
            } => write_template(f, "fixedbinary", &[length.as_str()], *nullability),
            ParameterizedType::Decimal {
                precision,
                scale,
                nullability,
            } => write_template(f, "decimal", &[precision.as_str(), scale.as_str()], *nullability),
            ParameterizedType::Timestamp {
                precision,
                nullability,
            } => write_template(f, "precision_timestamp", &[precision.as_str()], *nullability),
            ParameterizedType::TimestampTz {
                precision,
                nullability,
            } => write_template(f, "precision_timestamp_tz", &[precision.as_str()], *nullability),
            ParameterizedType::IntervalDay {
                precision,
                nullability,
            } => write_template(f, "interval_day", &[precision.as_str()], *nullability),
            ParameterizedType::IntervalCompound {
                precision,
                nullability,
            } => write_template(f, "interval_compound", &[precision.as_str()], *nullability),
            ParameterizedType::Struct {
                fields,
                nullability,
            } => {
                let field_strs: Vec<String> = fields.iter().map(|t| t.to_string()).collect();
                let refs: Vec<&str> = field_strs.iter().map(String::as_str).collect();
                write_template(f, "struct", &refs, *nullability)
            }
            ParameterizedType::List {
                element,
                nullability,
            } => write_template(f, "list", &[element.to_string().as_str()], *nullability),
            ParameterizedType::Map {
                key,
                value,
                nullability,
            } => write_template(
                f,
                "map",
                &[key.to_string().as_str(), value.to_string().as_str()],
                *nullability,
            ),
            ParameterizedType::StringLiteral { value } => f.write_str(value),
        }
    }
}

impl std::str::FromStr for ParameterizedType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_parameterized_type(s)
    }
}

impl TryFrom<String> for ParameterizedType {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        crate::parse::parse_parameterized_type(&s)
    }
}

impl From<ParameterizedType> for String {
    fn from(ty: ParameterizedType) -> Self {
        ty.to_string()
    }
}

impl From<Type> for ParameterizedType {
    fn from(ty: Type) -> Self {
        ParameterizedType::Concrete(ty)
    }
}

#[cfg(test)]
#[path = "parameterized_test.rs"]
mod tests;
