//! rp-types: type system for the relplan IR
//!
//! Concrete types with an orthogonal nullability flag, parameterized type
//! templates used by function signatures, double-dispatch visitors over
//! both, and coercion of a concrete type onto a template.

pub mod coercion;
pub(crate) mod error;
pub mod parameterized;
pub(crate) mod parse;
pub mod types;
pub mod visitor;

pub use coercion::{as_type, AsTypeBuilder, AsTypeVisitor};
pub use error::{TypeError, TypeResult};
pub use parameterized::{ParameterizedType, TargetShape};
pub use parse::{parse_parameterized_type, parse_type};
pub use types::{Nullability, Type, TypeCreator, TypeFamily, TypeKind};
pub use visitor::{ParameterizedTypeVisitor, TypeVisitor};
