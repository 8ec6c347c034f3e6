//! Shared test fixtures for rp-plan

use crate::expr::Expression;
use crate::function::FunctionCatalog;
use crate::rel::{NamedScan, Rel};
use crate::schema::NamedStruct;
use rp_types::{Type, TypeCreator};

/// Build a schema from `(name, type)` pairs
pub fn schema(columns: &[(&str, Type)]) -> NamedStruct {
    let (names, types) = columns
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.clone()))
        .unzip();
    NamedStruct::new(names, types).unwrap()
}

/// Scan of `names` over the given columns
pub fn scan(names: &[&str], columns: &[(&str, Type)]) -> Rel {
    NamedScan::builder()
        .names(names.iter().copied())
        .schema(schema(columns))
        .build_rel()
        .unwrap()
}

/// `sales.orders(id i64, customer varchar<100>?, amount fp64?, region string)`
pub fn orders_scan() -> Rel {
    let r = TypeCreator::REQUIRED;
    let n = TypeCreator::NULLABLE;
    scan(
        &["sales", "orders"],
        &[
            ("id", r.i64()),
            ("customer", n.var_char(100).unwrap()),
            ("amount", n.fp64()),
            ("region", r.string()),
        ],
    )
}

/// `sales.customers(id i64, name fixedchar<20>, tier i32?)`
pub fn customers_scan() -> Rel {
    let r = TypeCreator::REQUIRED;
    let n = TypeCreator::NULLABLE;
    scan(
        &["sales", "customers"],
        &[
            ("id", r.i64()),
            ("name", r.fixed_char(20).unwrap()),
            ("tier", n.i32()),
        ],
    )
}

/// Required then nullable variants of every numeric type
pub fn numeric_types() -> Vec<Type> {
    let mut types = Vec::new();
    for creator in [TypeCreator::REQUIRED, TypeCreator::NULLABLE] {
        types.extend([
            creator.i8(),
            creator.i16(),
            creator.i32(),
            creator.i64(),
            creator.fp32(),
            creator.fp64(),
        ]);
    }
    types
}

/// `example` with a nullable `i8` grouping column `0` followed by one column
/// per entry of [`numeric_types`], named by position
pub fn numeric_scan() -> Rel {
    let types: Vec<Type> = std::iter::once(TypeCreator::NULLABLE.i8())
        .chain(numeric_types())
        .collect();
    let names: Vec<String> = (0..types.len()).map(|i| i.to_string()).collect();
    let columns: Vec<(&str, Type)> = names
        .iter()
        .map(String::as_str)
        .zip(types)
        .collect();
    scan(&["example"], &columns)
}

/// Field reference into `input`, panicking when out of bounds
pub fn field(input: &Rel, offset: usize) -> Expression {
    Expression::field(input.field_types(), offset).unwrap()
}

pub fn sample_catalog() -> FunctionCatalog {
    FunctionCatalog::standard()
}
