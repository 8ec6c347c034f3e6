use super::*;
use crate::expr::Literal;
use rp_types::{Nullability, TypeCreator};

fn param(text: &str) -> ParameterizedType {
    text.parse().unwrap()
}

fn catalog() -> FunctionCatalog {
    let r = TypeCreator::REQUIRED;
    FunctionCatalog::new([
        FunctionSignature::scalar(
            "add",
            vec![param("i32"), param("i32")],
            ReturnType::Argument(0),
        ),
        FunctionSignature::scalar(
            "add",
            vec![param("fp64"), param("fp64")],
            ReturnType::Argument(0),
        ),
        FunctionSignature::scalar(
            "equal",
            vec![param("any1"), param("any1")],
            ReturnType::Fixed(r.boolean()),
        ),
        FunctionSignature::scalar(
            "rtrim",
            vec![param("fixedchar<L1>")],
            ReturnType::Derived {
                argument: 0,
                template: param("varchar<L1>"),
            },
        ),
        FunctionSignature::aggregate(
            "sum",
            vec![param("i32")],
            ReturnType::Fixed(TypeCreator::NULLABLE.i64()),
        )
        .with_nullability(NullabilityHandling::DeclaredOutput),
    ])
}

#[test]
fn test_key_uses_short_names() {
    let cat = catalog();
    let sig = &cat.overloads("add")[0];
    assert_eq!(sig.key(), "add:i32_i32");
    assert_eq!(sig.reference().name(), "add");
    assert_eq!(sig.reference().key(), "add:i32_i32");
    assert_eq!(sig.reference().to_string(), "add:i32_i32");
    assert_eq!(cat.overloads("rtrim")[0].key(), "rtrim:fchar");
}

#[test]
fn test_catalog_lookup() {
    let cat = catalog();
    assert_eq!(cat.len(), 5);
    assert!(!cat.is_empty());
    assert_eq!(cat.overloads("ADD").len(), 2);
    assert!(cat.overloads("missing").is_empty());
    assert!(cat.get("add:fp64_fp64").is_some());
    assert!(cat.get("add:i64_i64").is_none());
    assert!(FunctionCatalog::default().is_empty());
}

#[test]
fn test_arity_mismatch() {
    let cat = catalog();
    let sig = &cat.overloads("add")[0];
    let err = sig
        .check_arguments(&[TypeCreator::REQUIRED.i32()])
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn test_concrete_param_ignores_nullability() {
    let cat = catalog();
    let sig = &cat.overloads("add")[0];
    let n = TypeCreator::NULLABLE;
    assert!(sig.accepts(&[n.i32(), TypeCreator::REQUIRED.i32()]));
    assert!(!sig.accepts(&[n.i64(), n.i64()]));
}

#[test]
fn test_mirror_nullability() {
    let cat = catalog();
    let sig = &cat.overloads("add")[0];
    let r = TypeCreator::REQUIRED;
    let n = TypeCreator::NULLABLE;
    assert_eq!(sig.output_type(&[r.i32(), r.i32()]).unwrap(), r.i32());
    assert_eq!(sig.output_type(&[r.i32(), n.i32()]).unwrap(), n.i32());

    let equal = &cat.overloads("equal")[0];
    assert_eq!(equal.output_type(&[n.i32(), r.i32()]).unwrap(), n.boolean());
}

#[test]
fn test_declared_output_nullability() {
    let cat = catalog();
    let sum = &cat.overloads("sum")[0];
    let r = TypeCreator::REQUIRED;
    assert_eq!(
        sum.output_type(&[r.i32()]).unwrap(),
        TypeCreator::NULLABLE.i64()
    );
    assert_eq!(sum.nullability, NullabilityHandling::DeclaredOutput);
}

#[test]
fn test_placeholder_binds_consistently() {
    let cat = catalog();
    let equal = &cat.overloads("equal")[0];
    let r = TypeCreator::REQUIRED;
    assert!(equal.accepts(&[r.string(), TypeCreator::NULLABLE.string()]));

    let err = equal.check_arguments(&[r.i32(), r.string()]).unwrap_err();
    match err {
        PlanError::ArgumentType {
            function,
            index,
            expected,
            found,
        } => {
            assert_eq!(function, "equal:any_any");
            assert_eq!(index, 1);
            assert_eq!(expected, "any1");
            assert_eq!(found, r.string());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_derived_return_type() {
    let cat = catalog();
    let rtrim = &cat.overloads("rtrim")[0];
    let n = TypeCreator::NULLABLE;
    let arg = n.fixed_char(8).unwrap();
    assert_eq!(rtrim.output_type(&[arg]).unwrap(), n.var_char(8).unwrap());
}

#[test]
fn test_argument_return_coerced_onto_template() {
    let upper = FunctionSignature::scalar(
        "upper",
        vec![param("varchar<L1>")],
        ReturnType::Argument(0),
    );
    let n = TypeCreator::NULLABLE;
    let arg = n.fixed_char(5).unwrap();
    assert_eq!(upper.output_type(&[arg]).unwrap(), n.var_char(5).unwrap());

    let r = TypeCreator::REQUIRED;
    let arg = r.var_char(12).unwrap();
    assert_eq!(upper.output_type(&[arg.clone()]).unwrap(), arg);
}

#[test]
fn test_standard_upper_returns_varchar() {
    let r = TypeCreator::REQUIRED;
    let arg: Expression = Literal::fixed_char("abc").unwrap().into();
    let expr = FunctionCatalog::standard().scalar("upper", vec![arg]).unwrap();
    assert_eq!(expr.get_type(), &r.var_char(3).unwrap());
}

#[test]
fn test_nullable_placeholder_is_same_binding() {
    let sig = FunctionSignature::scalar(
        "coalesce",
        vec![param("any1"), param("any1?")],
        ReturnType::Argument(0),
    );
    let r = TypeCreator::REQUIRED;
    assert!(sig.accepts(&[r.i32(), TypeCreator::NULLABLE.i32()]));
    assert!(!sig.accepts(&[r.i32(), r.string()]));
}

#[test]
fn test_template_accepts_coercible_character_type() {
    let cat = catalog();
    let rtrim = &cat.overloads("rtrim")[0];
    let r = TypeCreator::REQUIRED;
    assert!(rtrim.accepts(&[r.var_char(4).unwrap()]));
    assert!(!rtrim.accepts(&[r.string()]));
    assert!(!rtrim.accepts(&[r.i32()]));
}

#[test]
fn test_derived_return_type_unresolved() {
    let sig = FunctionSignature::scalar(
        "pad",
        vec![param("any1")],
        ReturnType::Derived {
            argument: 0,
            template: param("fixedchar<L1>"),
        },
    );
    let err = sig
        .output_type(&[TypeCreator::REQUIRED.i32()])
        .unwrap_err();
    assert!(matches!(err, PlanError::UnresolvedReturnType { .. }));
    assert!(err.to_string().contains("P009"));
}

#[test]
fn test_argument_rule_out_of_range() {
    let sig = FunctionSignature::scalar("first", Vec::new(), ReturnType::Argument(0));
    assert!(matches!(
        sig.output_type(&[]),
        Err(PlanError::UnresolvedReturnType { .. })
    ));
}

#[test]
fn test_resolve_picks_matching_overload() {
    let cat = catalog();
    let r = TypeCreator::REQUIRED;
    let sig = cat
        .resolve(FunctionKind::Scalar, "add", &[r.fp64(), r.fp64()])
        .unwrap();
    assert_eq!(sig.key(), "add:fp64_fp64");
}

#[test]
fn test_resolve_filters_by_kind() {
    let cat = catalog();
    let err = cat
        .resolve(FunctionKind::Scalar, "sum", &[TypeCreator::REQUIRED.i32()])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "[P008] No scalar function 'sum' accepts (i32)"
    );
}

#[test]
fn test_scalar_builds_invocation() {
    let cat = catalog();
    let expr = cat
        .scalar("add", vec![Literal::i32(1).into(), Literal::i32(2).into()])
        .unwrap();
    match &expr {
        Expression::ScalarFunction(func) => {
            assert_eq!(func.function().key(), "add:i32_i32");
            assert_eq!(func.arguments().len(), 2);
            assert_eq!(func.output_type(), &TypeCreator::REQUIRED.i32());
        }
        other => panic!("expected a scalar call, got {other}"),
    }
}

#[test]
fn test_aggregate_builds_invocation() {
    let cat = catalog();
    let call = cat
        .aggregate("sum", vec![Literal::i32(1).into()])
        .unwrap();
    assert_eq!(call.function().key(), "sum:i32");
    assert_eq!(call.output_type(), &TypeCreator::NULLABLE.i64());
    assert!(cat.aggregate("sum", vec![Literal::string("x").into()]).is_err());
}

#[test]
fn test_signature_serde_round_trip() {
    let sig = FunctionSignature::aggregate(
        "avg",
        vec![param("i32")],
        ReturnType::Fixed(TypeCreator::NULLABLE.i32()),
    );
    let json = serde_json::to_string(&sig).unwrap();
    assert!(json.contains("\"aggregate\""));
    let back: FunctionSignature = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sig);
    assert_eq!(back.args[0].nullability(), Nullability::Required);
}
