//! Aggregate record-type derivation and construction failures

use rp_plan::test_utils::{field, numeric_scan, numeric_types, orders_scan, sample_catalog, scan};
use rp_plan::{
    Aggregate, Expression, FieldReference, Grouping, Literal, Measure, PlanBuilder, PlanError, Rel,
};
use rp_types::{Type, TypeCreator};

fn sum(input: &Rel, offset: usize) -> Measure {
    Measure::new(
        sample_catalog()
            .aggregate("sum", vec![field(input, offset)])
            .unwrap(),
    )
}

fn sales() -> Rel {
    let n = TypeCreator::NULLABLE;
    scan(
        &["sales"],
        &[
            ("country", n.var_char(255).unwrap()),
            ("amount", TypeCreator::REQUIRED.i32()),
        ],
    )
}

#[test]
fn test_whole_input_sum_has_no_discriminator() {
    let input = sales();
    let measure = sum(&input, 1);
    let sum_type = measure.function.output_type().clone();
    let agg = Aggregate::builder()
        .input(input)
        .grouping(Grouping::empty())
        .measure(measure)
        .build()
        .unwrap();

    assert_eq!(agg.record_type().struct_fields().unwrap(), &[sum_type]);
    assert_eq!(
        agg.record_type().struct_fields().unwrap()[0],
        TypeCreator::NULLABLE.i64()
    );
}

#[test]
fn test_grouping_sets_dedup_and_discriminator() {
    let input = sales();
    let country = field(&input, 0);
    let measure = sum(&input, 1);
    let sum_type = measure.function.output_type().clone();
    let agg = Aggregate::builder()
        .input(input)
        .grouping(Grouping::new(vec![country.clone()]))
        .grouping(Grouping::empty())
        .measure(measure)
        .build()
        .unwrap();

    let expected: Vec<Type> = vec![
        country.get_type().clone(),
        sum_type,
        TypeCreator::REQUIRED.i32(),
    ];
    assert_eq!(agg.record_type().struct_fields().unwrap(), expected.as_slice());
}

#[test]
fn test_grouping_beyond_input_width_fails() {
    let input = sales();
    let result = Aggregate::builder()
        .input(input)
        .grouping(Grouping::new(vec![FieldReference::new(
            2,
            TypeCreator::REQUIRED.i32(),
        )
        .into()]))
        .build();
    assert!(matches!(
        result,
        Err(PlanError::FieldOutOfBounds {
            offset: 2,
            width: 2
        })
    ));
}

#[test]
fn test_non_boolean_measure_filter_fails() {
    let input = sales();
    let measure = sum(&input, 1).with_filter(field(&input, 1));
    let result = Aggregate::builder()
        .input(input)
        .grouping(Grouping::empty())
        .measure(measure)
        .build();
    assert!(matches!(
        result,
        Err(PlanError::NonBooleanCondition {
            context: "Measure filter",
            ..
        })
    ));
}

#[test]
fn test_field_count_matches_inputs() {
    let input = orders_scan();
    let region = field(&input, 3);
    let customer = field(&input, 1);
    let id = field(&input, 0);
    let cases: Vec<(Vec<Grouping>, usize)> = vec![
        (vec![Grouping::empty()], 1),
        (vec![Grouping::new(vec![region.clone()])], 1),
        (
            vec![
                Grouping::new(vec![region.clone(), customer.clone()]),
                Grouping::new(vec![customer.clone(), id.clone()]),
            ],
            2,
        ),
        (
            vec![
                Grouping::new(vec![region.clone()]),
                Grouping::new(vec![region.clone()]),
                Grouping::new(vec![id.clone()]),
            ],
            3,
        ),
    ];

    for (groupings, measure_count) in cases {
        let measures: Vec<Measure> = (0..measure_count).map(|_| sum(&input, 2)).collect();
        let group_count = groupings.len();
        let agg = Aggregate::builder()
            .input(input.clone())
            .groupings(groupings)
            .measures(measures)
            .build()
            .unwrap();
        let distinct = agg.unique_grouping_expressions().len();
        let discriminator = usize::from(group_count > 1);
        assert_eq!(
            agg.record_type().struct_fields().unwrap().len(),
            distinct + measure_count + discriminator
        );
    }
}

#[test]
fn test_same_field_in_two_groupings_collapses() {
    let input = orders_scan();
    let agg = Aggregate::builder()
        .input(input.clone())
        .grouping(Grouping::new(vec![field(&input, 3)]))
        .grouping(Grouping::new(vec![field(&input, 3)]))
        .build()
        .unwrap();
    let fields = agg.record_type().struct_fields().unwrap();
    assert_eq!(fields, &[TypeCreator::REQUIRED.string(), TypeCreator::REQUIRED.i32()]);
}

#[test]
fn test_distinct_expressions_of_same_type_do_not_collapse() {
    let input = orders_scan();
    let plus_one = sample_catalog()
        .scalar("add", vec![field(&input, 0), Literal::i64(1).into()])
        .unwrap();
    let plus_two = sample_catalog()
        .scalar("add", vec![field(&input, 0), Literal::i64(2).into()])
        .unwrap();
    let agg = Aggregate::builder()
        .input(input)
        .grouping(Grouping::new(vec![plus_one]))
        .grouping(Grouping::new(vec![plus_two]))
        .build()
        .unwrap();
    assert_eq!(agg.unique_grouping_expressions().len(), 2);
}

#[test]
fn test_same_offset_different_annotation_does_not_collapse() {
    let input = scan(&["t"], &[("a", TypeCreator::NULLABLE.i32())]);
    let annotated: Expression = FieldReference::new(0, TypeCreator::NULLABLE.i32()).into();
    let resolved = field(&input, 0);
    assert_eq!(annotated, resolved);

    let other: Expression = FieldReference::new(0, TypeCreator::REQUIRED.i32()).into();
    assert_ne!(other, resolved);
}

#[test]
fn test_every_numeric_aggregate_builds() {
    let b = PlanBuilder::default();
    let columns = numeric_types().len();
    for name in ["min", "max", "sum", "sum0", "avg"] {
        for grouped in [false, true] {
            let input = numeric_scan();
            let plan = b
                .aggregate(
                    input,
                    |input| {
                        let offsets: &[usize] = if grouped { &[0] } else { &[] };
                        Ok(vec![b.grouping(input, offsets)?])
                    },
                    |input| {
                        (1..=columns)
                            .map(|i| b.measure(input, name, &[i]))
                            .collect()
                    },
                )
                .unwrap();
            let expected = columns + usize::from(grouped);
            assert_eq!(plan.field_types().len(), expected, "{name} grouped={grouped}");
        }
    }
}

#[test]
fn test_sum0_is_never_nullable() {
    let b = PlanBuilder::default();
    let input = numeric_scan();
    let columns = numeric_types().len();
    let plan = b
        .aggregate(
            input,
            |input| Ok(vec![b.grouping(input, &[])?]),
            |input| (1..=columns).map(|i| b.sum0(input, i)).collect(),
        )
        .unwrap();
    assert!(plan.field_types().iter().all(|t| !t.is_nullable()));
}
