use super::*;
use crate::error::PlanError;
use crate::expr::{Expression, FieldReference, Literal};
use crate::schema::NamedStruct;
use crate::test_utils::{customers_scan, field, orders_scan, sample_catalog, scan};

fn r() -> TypeCreator {
    TypeCreator::REQUIRED
}

fn n() -> TypeCreator {
    TypeCreator::NULLABLE
}

fn equal(left: Expression, right: Expression) -> Expression {
    sample_catalog().scalar("equal", vec![left, right]).unwrap()
}

#[test]
fn test_named_scan_record_type() {
    let scan = orders_scan();
    assert_eq!(scan.name(), "NamedScan");
    assert!(scan.inputs().is_empty());
    assert_eq!(scan.field_types().len(), 4);
    assert!(!scan.record_type().is_nullable());
    match &scan {
        Rel::NamedScan(named) => {
            assert_eq!(named.names(), &["sales".to_string(), "orders".to_string()]);
            assert_eq!(named.schema().index_of("amount"), Some(2));
        }
        other => panic!("expected a scan, got {}", other.name()),
    }
}

#[test]
fn test_named_scan_requires_names() {
    let schema = crate::test_utils::schema(&[("a", r().i32())]);
    let err = NamedScan::builder()
        .names(Vec::<String>::new())
        .schema(schema)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::MissingField {
            node: "NamedScan",
            field: "names"
        }
    ));
}

#[test]
fn test_named_scan_from_yaml_schema() {
    let schema = NamedStruct::from_yaml(
        "columns:\n  - name: id\n    type: i64\n  - name: note\n    type: string?\n",
    )
    .unwrap();
    let rel = NamedScan::builder()
        .names(["notes"])
        .schema(schema)
        .build_rel()
        .unwrap();
    assert_eq!(rel.field_types(), &[r().i64(), n().string()]);
}

#[test]
fn test_filter_keeps_record_type() {
    let scan = orders_scan();
    let expected = scan.record_type().clone();
    let condition = equal(field(&scan, 3), Literal::string("west").into());
    let filter = Filter::builder()
        .input(scan)
        .condition(condition)
        .build_rel()
        .unwrap();
    assert_eq!(filter.record_type(), &expected);
}

#[test]
fn test_filter_rejects_non_boolean_condition() {
    let scan = orders_scan();
    let condition = field(&scan, 0);
    let err = Filter::builder()
        .input(scan)
        .condition(condition)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::NonBooleanCondition {
            context: "Filter condition",
            ..
        }
    ));
}

#[test]
fn test_filter_requires_condition() {
    let err = Filter::builder().input(orders_scan()).build().unwrap_err();
    assert_eq!(
        err.to_string(),
        "[P001] Filter requires 'condition' to be set"
    );
}

#[test]
fn test_project_appends_expressions() {
    let scan = orders_scan();
    let doubled = sample_catalog()
        .scalar("multiply", vec![field(&scan, 2), Literal::fp64(2.0).into()])
        .unwrap();
    let project = Project::builder()
        .input(scan)
        .expression(doubled)
        .expression(Literal::boolean(true).into())
        .build()
        .unwrap();
    let fields = project.record_type().struct_fields().unwrap();
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[4], n().fp64());
    assert_eq!(fields[5], r().boolean());
    assert_eq!(project.expressions().len(), 2);
}

#[test]
fn test_project_validates_references() {
    let err = Project::builder()
        .input(orders_scan())
        .expression(FieldReference::new(0, r().string()).into())
        .build()
        .unwrap_err();
    assert!(matches!(err, PlanError::FieldTypeMismatch { offset: 0, .. }));
}

#[test]
fn test_sort_keeps_record_type() {
    let scan = orders_scan();
    let expected = scan.record_type().clone();
    let sort = Sort::builder()
        .sort(field(&scan, 2), SortDirection::DescNullsLast)
        .sort(field(&scan, 0), SortDirection::default())
        .input(scan)
        .build()
        .unwrap();
    assert_eq!(sort.record_type(), &expected);
    assert_eq!(sort.sorts()[0].direction.to_string(), "DESC NULLS LAST");
    assert_eq!(sort.sorts()[1].direction, SortDirection::AscNullsFirst);
}

#[test]
fn test_fetch_defaults_and_bounds() {
    let fetch = Fetch::builder().input(orders_scan()).build().unwrap();
    assert_eq!(fetch.offset(), 0);
    assert_eq!(fetch.count(), None);

    let err = Fetch::builder()
        .input(orders_scan())
        .offset(-1)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::InvalidFetch {
            field: "offset",
            value: -1
        }
    ));

    let err = Fetch::builder()
        .input(orders_scan())
        .count(-5)
        .build()
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidFetch { field: "count", .. }));
}

#[test]
fn test_cross_concatenates_fields() {
    let cross = Cross::builder()
        .left(orders_scan())
        .right(customers_scan())
        .build_rel()
        .unwrap();
    assert_eq!(cross.field_types().len(), 7);
    assert_eq!(cross.inputs().len(), 2);
    assert_eq!(cross.field_types()[4], r().i64());
}

#[test]
fn test_join_output_nullability() {
    let left = orders_scan();
    let right = customers_scan();
    let width = left.field_types().len();
    let combined = [left.field_types(), right.field_types()].concat();
    let on = equal(
        Expression::field(&combined, 0).unwrap(),
        Expression::field(&combined, width).unwrap(),
    );

    let join = Join::builder()
        .left(left.clone())
        .right(right.clone())
        .join_type(JoinType::Left)
        .condition(on.clone())
        .build()
        .unwrap();
    let fields = join.record_type().struct_fields().unwrap();
    assert_eq!(fields[0], r().i64());
    assert_eq!(fields[4], n().i64());
    assert_eq!(fields[5], n().fixed_char(20).unwrap());

    let semi = Join::builder()
        .left(left)
        .right(right)
        .join_type(JoinType::LeftSemi)
        .condition(on)
        .build()
        .unwrap();
    assert_eq!(semi.record_type().struct_fields().unwrap().len(), 4);
}

#[test]
fn test_join_type_output_fields() {
    let left = [r().i32()];
    let right = [r().string()];
    assert_eq!(
        JoinType::Outer.output_fields(&left, &right),
        vec![n().i32(), n().string()]
    );
    assert_eq!(
        JoinType::Right.output_fields(&left, &right),
        vec![n().i32(), r().string()]
    );
    assert_eq!(JoinType::RightAnti.output_fields(&left, &right), vec![r().string()]);
}

#[test]
fn test_join_condition_sees_both_sides() {
    let left = orders_scan();
    let right = customers_scan();
    // $6 only exists in the combined record
    let tier = Expression::field(&[left.field_types(), right.field_types()].concat(), 6).unwrap();
    let err = Join::builder()
        .left(left)
        .right(right)
        .join_type(JoinType::Inner)
        .condition(tier)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::NonBooleanCondition {
            context: "Join condition",
            ..
        }
    ));
}

#[test]
fn test_join_requires_condition() {
    let err = Join::builder()
        .left(orders_scan())
        .right(customers_scan())
        .join_type(JoinType::Inner)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::MissingField {
            node: "Join",
            field: "condition"
        }
    ));
}

fn pair(first: Type, second: Type) -> Rel {
    scan(&["t"], &[("a", first), ("b", second)])
}

#[test]
fn test_set_nullability_by_op() {
    let a = pair(r().i32(), n().string());
    let b = pair(n().i32(), n().string());

    let union = Set::builder()
        .input(a.clone())
        .input(b.clone())
        .op(SetOp::UnionAll)
        .build()
        .unwrap();
    assert_eq!(union.record_type(), &r().structure([n().i32(), n().string()]));

    let intersect = Set::builder()
        .input(a.clone())
        .input(b.clone())
        .op(SetOp::IntersectionPrimary)
        .build()
        .unwrap();
    assert_eq!(
        intersect.record_type(),
        &r().structure([r().i32(), n().string()])
    );

    let minus = Set::builder()
        .input(b)
        .input(a)
        .op(SetOp::MinusPrimary)
        .build()
        .unwrap();
    assert_eq!(minus.record_type(), &r().structure([n().i32(), n().string()]));
    assert_eq!(minus.inputs().len(), 2);
    assert_eq!(minus.op().to_string(), "MINUS");
}

#[test]
fn test_set_rejects_mismatched_inputs() {
    let err = Set::builder()
        .input(pair(r().i32(), r().string()))
        .input(pair(r().i64(), r().string()))
        .op(SetOp::UnionDistinct)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("field 0 is i32 in input 0 but i64 in input 1"));

    let err = Set::builder()
        .input(pair(r().i32(), r().string()))
        .input(orders_scan())
        .op(SetOp::UnionDistinct)
        .build()
        .unwrap_err();
    assert!(matches!(err, PlanError::SetInputMismatch { .. }));
}

#[test]
fn test_set_requires_two_inputs() {
    let err = Set::builder()
        .input(orders_scan())
        .op(SetOp::UnionAll)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("found one"));

    let err = Set::builder().input(orders_scan()).build().unwrap_err();
    assert!(matches!(err, PlanError::MissingField { node: "Set", .. }));
}

#[test]
fn test_rel_serializes_to_json() {
    let value = serde_json::to_value(orders_scan()).unwrap();
    assert_eq!(value["NamedScan"]["names"][1], "orders");
}
