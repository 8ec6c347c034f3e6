//! Type coercion onto parameterized target shapes
//!
//! Coercion is a two-stage dispatch. [`AsTypeBuilder`] visits the source
//! type and yields an [`AsTypeVisitor`] specialised for the source family;
//! that visitor is then applied to the target template. A `None` result is
//! the normal "incompatible" outcome, never an error.

use crate::parameterized::ParameterizedType;
use crate::types::{Type, TypeCreator};
use crate::visitor::{ParameterizedTypeVisitor, TypeVisitor};
use std::convert::Infallible;

/// Coerce `source` onto `target`, or `None` if the pair is incompatible
pub fn as_type(source: &Type, target: &ParameterizedType) -> Option<Type> {
    let mut visitor = AsTypeBuilder.build(source);
    let visited: Result<Option<Type>, Infallible> = target.accept(&mut visitor);
    let result = match visited {
        Ok(result) => result,
        Err(never) => match never {},
    };
    if result.is_none() {
        log::debug!("No coercion from {source} onto {target}");
    }
    result
}

/// First stage: selects the per-source coercion visitor
#[derive(Debug, Clone, Copy, Default)]
pub struct AsTypeBuilder;

impl AsTypeBuilder {
    /// Visitor specialised for `source`
    pub fn build(&mut self, source: &Type) -> AsTypeVisitor {
        let visited: Result<AsTypeVisitor, Infallible> = source.accept(self);
        match visited {
            Ok(visitor) => visitor,
            Err(never) => match never {},
        }
    }
}

impl TypeVisitor<AsTypeVisitor, Infallible> for AsTypeBuilder {
    fn visit_fallback(&mut self, ty: &Type) -> Result<AsTypeVisitor, Infallible> {
        Ok(AsTypeVisitor::new(ty.clone(), SourceRule::Exact))
    }

    fn visit_string(&mut self, ty: &Type) -> Result<AsTypeVisitor, Infallible> {
        Ok(AsTypeVisitor::new(ty.clone(), SourceRule::String))
    }

    fn visit_fixed_char(&mut self, ty: &Type, length: u32) -> Result<AsTypeVisitor, Infallible> {
        Ok(AsTypeVisitor::new(ty.clone(), SourceRule::FixedChar(length)))
    }

    fn visit_var_char(&mut self, ty: &Type, length: u32) -> Result<AsTypeVisitor, Infallible> {
        Ok(AsTypeVisitor::new(ty.clone(), SourceRule::VarChar(length)))
    }
}

/// How a source family reacts to character templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceRule {
    /// Only a shape-equal concrete target matches
    Exact,
    String,
    FixedChar(u32),
    VarChar(u32),
}

/// Second stage: applies one source type to target templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsTypeVisitor {
    source: Type,
    rule: SourceRule,
}

impl AsTypeVisitor {
    fn new(source: Type, rule: SourceRule) -> Self {
        Self { source, rule }
    }

    /// The source type being coerced
    pub fn source(&self) -> &Type {
        &self.source
    }

    fn creator(&self) -> TypeCreator {
        TypeCreator::of(self.source.nullability())
    }
}

impl TypeVisitor<Option<Type>, Infallible> for AsTypeVisitor {
    /// Concrete targets: identity when the shapes agree
    fn visit_fallback(&mut self, target: &Type) -> Result<Option<Type>, Infallible> {
        if self.source.shape_eq(target) {
            Ok(Some(self.source.clone()))
        } else {
            Ok(None)
        }
    }
}

impl ParameterizedTypeVisitor<Option<Type>, Infallible> for AsTypeVisitor {
    fn visit_parameterized_fallback(
        &mut self,
        _target: &ParameterizedType,
    ) -> Result<Option<Type>, Infallible> {
        Ok(None)
    }

    fn visit_fixed_char_template(
        &mut self,
        _target: &ParameterizedType,
        _length: &str,
    ) -> Result<Option<Type>, Infallible> {
        Ok(match self.rule {
            SourceRule::FixedChar(_) => Some(self.source.clone()),
            SourceRule::VarChar(length) => self.creator().fixed_char(length).ok(),
            SourceRule::Exact | SourceRule::String => None,
        })
    }

    fn visit_var_char_template(
        &mut self,
        _target: &ParameterizedType,
        _length: &str,
    ) -> Result<Option<Type>, Infallible> {
        Ok(match self.rule {
            SourceRule::VarChar(_) => Some(self.source.clone()),
            SourceRule::FixedChar(length) => self.creator().var_char(length).ok(),
            SourceRule::Exact | SourceRule::String => None,
        })
    }

    fn visit_string_literal(
        &mut self,
        _target: &ParameterizedType,
        _value: &str,
    ) -> Result<Option<Type>, Infallible> {
        Ok(match self.rule {
            SourceRule::String => Some(self.source.clone()),
            SourceRule::FixedChar(_) | SourceRule::VarChar(_) => Some(self.creator().string()),
            SourceRule::Exact => None,
        })
    }
}

#[cfg(test)]
#[path = "coercion_test.rs"]
mod tests;
