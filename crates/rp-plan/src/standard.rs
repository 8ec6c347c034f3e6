//! Built-in catalog of common arithmetic, comparison, string and aggregate functions

use crate::function::{FunctionCatalog, FunctionSignature, NullabilityHandling, ReturnType};
use rp_types::{Nullability, ParameterizedType, Type, TypeCreator};

fn any(name: &str) -> ParameterizedType {
    ParameterizedType::StringLiteral {
        value: name.to_string(),
    }
}

fn var_char(length: &str) -> ParameterizedType {
    ParameterizedType::VarChar {
        length: length.to_string(),
        nullability: Nullability::Required,
    }
}

fn fixed_char(length: &str) -> ParameterizedType {
    ParameterizedType::FixedChar {
        length: length.to_string(),
        nullability: Nullability::Required,
    }
}

fn integers() -> [Type; 4] {
    let r = TypeCreator::REQUIRED;
    [r.i8(), r.i16(), r.i32(), r.i64()]
}

fn floats() -> [Type; 2] {
    let r = TypeCreator::REQUIRED;
    [r.fp32(), r.fp64()]
}

fn numerics() -> impl Iterator<Item = Type> {
    integers().into_iter().chain(floats())
}

fn scalars() -> Vec<FunctionSignature> {
    let r = TypeCreator::REQUIRED;
    let mut sigs = Vec::new();

    for ty in numerics() {
        let shape = ParameterizedType::shape_of(&ty);
        for name in ["add", "subtract", "multiply", "divide"] {
            sigs.push(FunctionSignature::scalar(
                name,
                vec![shape.clone(), shape.clone()],
                ReturnType::Argument(0),
            ));
        }
    }

    for name in ["equal", "not_equal", "lt", "lte", "gt", "gte"] {
        sigs.push(FunctionSignature::scalar(
            name,
            vec![any("any1"), any("any1")],
            ReturnType::Fixed(r.boolean()),
        ));
    }

    let boolean = ParameterizedType::shape_of(&r.boolean());
    for name in ["and", "or"] {
        sigs.push(FunctionSignature::scalar(
            name,
            vec![boolean.clone(), boolean.clone()],
            ReturnType::Fixed(r.boolean()),
        ));
    }
    sigs.push(FunctionSignature::scalar(
        "not",
        vec![boolean],
        ReturnType::Fixed(r.boolean()),
    ));
    sigs.push(
        FunctionSignature::scalar("is_null", vec![any("any1")], ReturnType::Fixed(r.boolean()))
            .with_nullability(NullabilityHandling::DeclaredOutput),
    );

    for name in ["upper", "lower"] {
        sigs.push(FunctionSignature::scalar(
            name,
            vec![var_char("L1")],
            ReturnType::Argument(0),
        ));
        sigs.push(FunctionSignature::scalar(
            name,
            vec![ParameterizedType::shape_of(&r.string())],
            ReturnType::Argument(0),
        ));
    }
    // Padding is dropped, so fixed-width input comes back variable-width
    sigs.push(FunctionSignature::scalar(
        "rtrim",
        vec![fixed_char("L1")],
        ReturnType::Derived {
            argument: 0,
            template: var_char("L1"),
        },
    ));
    sigs.push(FunctionSignature::scalar(
        "concat",
        vec![any("any1"), any("any2")],
        ReturnType::Fixed(r.string()),
    ));

    sigs
}

fn aggregates() -> Vec<FunctionSignature> {
    let r = TypeCreator::REQUIRED;
    let n = TypeCreator::NULLABLE;
    let mut sigs = Vec::new();

    for ty in numerics() {
        let args = vec![ParameterizedType::shape_of(&ty)];
        let is_float = floats().contains(&ty);

        // Empty input yields null for everything but sum0 and count
        for name in ["min", "max", "avg"] {
            sigs.push(
                FunctionSignature::aggregate(
                    name,
                    args.clone(),
                    ReturnType::Fixed(ty.as_nullable()),
                )
                .with_nullability(NullabilityHandling::DeclaredOutput),
            );
        }
        let (sum, sum0) = if is_float {
            (n.fp64(), r.fp64())
        } else {
            (n.i64(), r.i64())
        };
        sigs.push(
            FunctionSignature::aggregate("sum", args.clone(), ReturnType::Fixed(sum))
                .with_nullability(NullabilityHandling::DeclaredOutput),
        );
        sigs.push(
            FunctionSignature::aggregate("sum0", args, ReturnType::Fixed(sum0))
                .with_nullability(NullabilityHandling::DeclaredOutput),
        );
    }

    sigs.push(
        FunctionSignature::aggregate("count", vec![any("any1")], ReturnType::Fixed(r.i64()))
            .with_nullability(NullabilityHandling::DeclaredOutput),
    );
    sigs.push(
        FunctionSignature::aggregate("count", Vec::new(), ReturnType::Fixed(r.i64()))
            .with_nullability(NullabilityHandling::DeclaredOutput),
    );

    sigs
}

impl FunctionCatalog {
    /// Catalog of the built-in functions
    pub fn standard() -> Self {
        FunctionCatalog::new(scalars().into_iter().chain(aggregates()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FunctionKind;

    #[test]
    fn test_standard_keys() {
        let catalog = FunctionCatalog::standard();
        assert!(catalog.get("sum:i32").is_some());
        assert!(catalog.get("sum0:fp32").is_some());
        assert!(catalog.get("add:i64_i64").is_some());
        assert!(catalog.get("equal:any_any").is_some());
        assert!(catalog.get("upper:vchar").is_some());
        assert!(catalog.get("count:").is_some());
        assert!(catalog.get("sum:str").is_none());
    }

    #[test]
    fn test_sum_widens_and_is_nullable() {
        let catalog = FunctionCatalog::standard();
        let r = TypeCreator::REQUIRED;
        let sig = catalog
            .resolve(FunctionKind::Aggregate, "sum", &[r.i16()])
            .unwrap();
        assert_eq!(sig.output_type(&[r.i16()]).unwrap(), TypeCreator::NULLABLE.i64());

        let sig = catalog
            .resolve(FunctionKind::Aggregate, "sum0", &[r.fp32()])
            .unwrap();
        assert_eq!(sig.output_type(&[r.fp32()]).unwrap(), r.fp64());
    }

    #[test]
    fn test_min_keeps_argument_type() {
        let catalog = FunctionCatalog::standard();
        let arg = TypeCreator::REQUIRED.i8();
        let sig = catalog
            .resolve(FunctionKind::Aggregate, "min", &[arg.clone()])
            .unwrap();
        assert_eq!(sig.output_type(&[arg]).unwrap(), TypeCreator::NULLABLE.i8());
    }

    #[test]
    fn test_rtrim_derives_varchar() {
        let catalog = FunctionCatalog::standard();
        let arg = TypeCreator::NULLABLE.fixed_char(8).unwrap();
        let sig = catalog
            .resolve(FunctionKind::Scalar, "rtrim", &[arg.clone()])
            .unwrap();
        assert_eq!(
            sig.output_type(&[arg]).unwrap(),
            TypeCreator::NULLABLE.var_char(8).unwrap()
        );
    }

    #[test]
    fn test_equal_requires_matching_shapes() {
        let catalog = FunctionCatalog::standard();
        let r = TypeCreator::REQUIRED;
        assert!(catalog
            .resolve(FunctionKind::Scalar, "equal", &[r.i32(), r.i32()])
            .is_ok());
        assert!(catalog
            .resolve(FunctionKind::Scalar, "equal", &[r.i32(), r.string()])
            .is_err());
    }
}
