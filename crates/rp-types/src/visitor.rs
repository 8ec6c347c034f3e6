//! Double-dispatch visitors over concrete and parameterized types
//!
//! Each visitor is generic over its result `O` and a propagated error `E`.
//! Every per-variant method defaults to a required fallback, so a variant
//! added later reaches every implementation through the fallback until the
//! implementation opts in explicitly. Dispatch is a single, non-recursive
//! call; visitors that care about struct/list/map children recurse themselves.

use crate::parameterized::ParameterizedType;
use crate::types::{Type, TypeKind};

/// Visitor over concrete [`Type`]s
///
/// Every method receives the visited type plus its destructured parameters.
#[allow(unused_variables)]
pub trait TypeVisitor<O, E> {
    /// Called for every variant the implementation does not handle itself
    fn visit_fallback(&mut self, ty: &Type) -> Result<O, E>;

    fn visit_boolean(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_i8(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_i16(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_i32(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_i64(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_fp32(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_fp64(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_string(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_binary(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_fixed_char(&mut self, ty: &Type, length: u32) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_var_char(&mut self, ty: &Type, length: u32) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_fixed_binary(&mut self, ty: &Type, length: u32) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_date(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_time(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_timestamp(&mut self, ty: &Type, precision: u8) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_timestamp_tz(&mut self, ty: &Type, precision: u8) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_interval_year(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_interval_day(&mut self, ty: &Type, precision: u8) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_interval_compound(&mut self, ty: &Type, precision: u8) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_decimal(&mut self, ty: &Type, precision: u8, scale: u8) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_uuid(&mut self, ty: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_user_defined(&mut self, ty: &Type, name: &str) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_struct(&mut self, ty: &Type, fields: &[Type]) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_list(&mut self, ty: &Type, element: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }

    fn visit_map(&mut self, ty: &Type, key: &Type, value: &Type) -> Result<O, E> {
        self.visit_fallback(ty)
    }
}

/// Visitor over [`ParameterizedType`]s
///
/// Concrete templates are routed through the [`TypeVisitor`] half by
/// default, so a visitor sees a bound `varchar<10>` as a concrete varchar.
#[allow(unused_variables)]
pub trait ParameterizedTypeVisitor<O, E>: TypeVisitor<O, E> {
    /// Called for every template variant the implementation does not handle itself
    fn visit_parameterized_fallback(&mut self, ty: &ParameterizedType) -> Result<O, E>;

    fn visit_concrete(&mut self, ty: &Type) -> Result<O, E> {
        ty.accept(self)
    }

    fn visit_fixed_char_template(&mut self, ty: &ParameterizedType, length: &str) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_var_char_template(&mut self, ty: &ParameterizedType, length: &str) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_fixed_binary_template(
        &mut self,
        ty: &ParameterizedType,
        length: &str,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_decimal_template(
        &mut self,
        ty: &ParameterizedType,
        precision: &str,
        scale: &str,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_timestamp_template(
        &mut self,
        ty: &ParameterizedType,
        precision: &str,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_timestamp_tz_template(
        &mut self,
        ty: &ParameterizedType,
        precision: &str,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_interval_day_template(
        &mut self,
        ty: &ParameterizedType,
        precision: &str,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_interval_compound_template(
        &mut self,
        ty: &ParameterizedType,
        precision: &str,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_struct_template(
        &mut self,
        ty: &ParameterizedType,
        fields: &[ParameterizedType],
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_list_template(
        &mut self,
        ty: &ParameterizedType,
        element: &ParameterizedType,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_map_template(
        &mut self,
        ty: &ParameterizedType,
        key: &ParameterizedType,
        value: &ParameterizedType,
    ) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }

    fn visit_string_literal(&mut self, ty: &ParameterizedType, value: &str) -> Result<O, E> {
        self.visit_parameterized_fallback(ty)
    }
}

impl Type {
    /// Dispatch to the visitor method for this type's variant
    pub fn accept<O, E, V>(&self, visitor: &mut V) -> Result<O, E>
    where
        V: TypeVisitor<O, E> + ?Sized,
    {
        match self.kind() {
            TypeKind::Boolean => visitor.visit_boolean(self),
            TypeKind::I8 => visitor.visit_i8(self),
            TypeKind::I16 => visitor.visit_i16(self),
            TypeKind::I32 => visitor.visit_i32(self),
            TypeKind::I64 => visitor.visit_i64(self),
            TypeKind::Fp32 => visitor.visit_fp32(self),
            TypeKind::Fp64 => visitor.visit_fp64(self),
            TypeKind::String => visitor.visit_string(self),
            TypeKind::Binary => visitor.visit_binary(self),
            TypeKind::FixedChar { length } => visitor.visit_fixed_char(self, *length),
            TypeKind::VarChar { length } => visitor.visit_var_char(self, *length),
            TypeKind::FixedBinary { length } => visitor.visit_fixed_binary(self, *length),
            TypeKind::Date => visitor.visit_date(self),
            TypeKind::Time => visitor.visit_time(self),
            TypeKind::Timestamp { precision } => visitor.visit_timestamp(self, *precision),
            TypeKind::TimestampTz { precision } => visitor.visit_timestamp_tz(self, *precision),
            TypeKind::IntervalYear => visitor.visit_interval_year(self),
            TypeKind::IntervalDay { precision } => visitor.visit_interval_day(self, *precision),
            TypeKind::IntervalCompound { precision } => {
                visitor.visit_interval_compound(self, *precision)
            }
            TypeKind::Decimal { precision, scale } => {
                visitor.visit_decimal(self, *precision, *scale)
            }
            TypeKind::Uuid => visitor.visit_uuid(self),
            TypeKind::UserDefined { name } => visitor.visit_user_defined(self, name),
            TypeKind::Struct { fields } => visitor.visit_struct(self, fields),
            TypeKind::List { element } => visitor.visit_list(self, element),
            TypeKind::Map { key, value } => visitor.visit_map(self, key, value),
        }
    }
}

impl ParameterizedType {
    /// Dispatch to the visitor method for this template's variant
    pub fn accept<O, E, V>(&self, visitor: &mut V) -> Result<O, E>
    where
        V: ParameterizedTypeVisitor<O, E> + ?Sized,
    {
        match self {
            ParameterizedType::Concrete(ty) => visitor.visit_concrete(ty),
            ParameterizedType::FixedChar { length, .. } => {
                visitor.visit_fixed_char_template(self, length)
            }
            ParameterizedType::VarChar { length, .. } => {
                visitor.visit_var_char_template(self, length)
            }
            ParameterizedType::FixedBinary { length, .. } => {
                visitor.visit_fixed_binary_template(self, length)
            }
            ParameterizedType::Decimal {
                precision, scale, ..
            } => visitor.visit_decimal_template(self, precision, scale),
            ParameterizedType::Timestamp { precision, .. } => {
                visitor.visit_timestamp_template(self, precision)
            }
            ParameterizedType::TimestampTz { precision, .. } => {
                visitor.visit_timestamp_tz_template(self, precision)
            }
            ParameterizedType::IntervalDay { precision, .. } => {
                visitor.visit_interval_day_template(self, precision)
            }
            ParameterizedType::IntervalCompound { precision, .. } => {
                visitor.visit_interval_compound_template(self, precision)
            }
            ParameterizedType::Struct { fields, .. } => visitor.visit_struct_template(self, fields),
            ParameterizedType::List { element, .. } => visitor.visit_list_template(self, element),
            ParameterizedType::Map { key, value, .. } => {
                visitor.visit_map_template(self, key, value)
            }
            ParameterizedType::StringLiteral { value } => visitor.visit_string_literal(self, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeCreator;
    use std::convert::Infallible;

    /// Counts leaf types, recursing into composite children itself
    struct LeafCounter;

    impl TypeVisitor<usize, Infallible> for LeafCounter {
        fn visit_fallback(&mut self, _ty: &Type) -> Result<usize, Infallible> {
            Ok(1)
        }

        fn visit_struct(&mut self, _ty: &Type, fields: &[Type]) -> Result<usize, Infallible> {
            let mut total = 0;
            for field in fields {
                total += self.count(field)?;
            }
            Ok(total)
        }

        fn visit_list(&mut self, _ty: &Type, element: &Type) -> Result<usize, Infallible> {
            self.count(element)
        }

        fn visit_map(&mut self, _ty: &Type, key: &Type, value: &Type) -> Result<usize, Infallible> {
            Ok(self.count(key)? + self.count(value)?)
        }
    }

    impl LeafCounter {
        fn count(&mut self, ty: &Type) -> Result<usize, Infallible> {
            ty.accept(self)
        }
    }

    /// Rejects user-defined types anywhere in a struct
    struct NoUserDefined;

    impl TypeVisitor<(), String> for NoUserDefined {
        fn visit_fallback(&mut self, _ty: &Type) -> Result<(), String> {
            Ok(())
        }

        fn visit_user_defined(&mut self, _ty: &Type, name: &str) -> Result<(), String> {
            Err(format!("user-defined type {name} not allowed"))
        }

        fn visit_struct(&mut self, _ty: &Type, fields: &[Type]) -> Result<(), String> {
            fields
                .iter()
                .try_for_each(|f| f.accept::<(), String, Self>(self))
        }
    }

    /// Reports which template variant was dispatched
    struct ShapeName;

    impl TypeVisitor<&'static str, Infallible> for ShapeName {
        fn visit_fallback(&mut self, _ty: &Type) -> Result<&'static str, Infallible> {
            Ok("concrete")
        }

        fn visit_var_char(&mut self, _ty: &Type, _length: u32) -> Result<&'static str, Infallible> {
            Ok("concrete varchar")
        }
    }

    impl ParameterizedTypeVisitor<&'static str, Infallible> for ShapeName {
        fn visit_parameterized_fallback(
            &mut self,
            _ty: &ParameterizedType,
        ) -> Result<&'static str, Infallible> {
            Ok("template")
        }

        fn visit_var_char_template(
            &mut self,
            _ty: &ParameterizedType,
            _length: &str,
        ) -> Result<&'static str, Infallible> {
            Ok("varchar template")
        }
    }

    fn unwrap_infallible<T>(result: Result<T, Infallible>) -> T {
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    #[test]
    fn test_composite_visitor_recurses_itself() {
        let r = TypeCreator::REQUIRED;
        let ty = r.structure([
            r.i32(),
            r.list(r.string()),
            r.map(r.string(), r.structure([r.fp64(), r.date()])),
        ]);
        assert_eq!(unwrap_infallible(LeafCounter.count(&ty)), 5);
    }

    #[test]
    fn test_visitor_error_propagates() {
        let r = TypeCreator::REQUIRED;
        let ty = r.structure([r.i32(), r.user_defined("point").unwrap(), r.i64()]);
        let err: Result<(), String> = ty.accept(&mut NoUserDefined);
        assert_eq!(err.unwrap_err(), "user-defined type point not allowed");
        let ok: Result<(), String> = r.structure([r.i32()]).accept(&mut NoUserDefined);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_parameterized_dispatch() {
        let r = TypeCreator::REQUIRED;
        let concrete = ParameterizedType::Concrete(r.var_char(8).unwrap());
        let other_concrete = ParameterizedType::Concrete(r.i32());
        let template: ParameterizedType = "varchar<L1>".parse().unwrap();
        let decimal: ParameterizedType = "decimal<P,S>".parse().unwrap();

        let shape = |ty: &ParameterizedType| -> &'static str {
            unwrap_infallible(ty.accept(&mut ShapeName))
        };
        assert_eq!(shape(&concrete), "concrete varchar");
        assert_eq!(shape(&other_concrete), "concrete");
        assert_eq!(shape(&template), "varchar template");
        assert_eq!(shape(&decimal), "template");
    }
}
