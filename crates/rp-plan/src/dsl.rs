//! Shorthand for assembling plans against a function catalog
//!
//! Field arguments are positional offsets into the input's record type, and
//! every helper goes through the same builders and catalog resolution a
//! hand-written plan would.

use crate::error::PlanResult;
use crate::expr::Expression;
use crate::function::FunctionCatalog;
use crate::rel::{Aggregate, Fetch, Filter, Grouping, Measure, NamedScan, Project, Rel};
use crate::schema::NamedStruct;
use rp_types::Type;

/// Plan builder bound to one catalog
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    catalog: FunctionCatalog,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new(FunctionCatalog::standard())
    }
}

impl PlanBuilder {
    pub fn new(catalog: FunctionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FunctionCatalog {
        &self.catalog
    }

    /// Scan of table `names` with parallel column names and types
    pub fn named_scan<S: Into<String>>(
        &self,
        names: impl IntoIterator<Item = S>,
        column_names: Vec<String>,
        types: Vec<Type>,
    ) -> PlanResult<Rel> {
        let schema = NamedStruct::new(column_names, types)?;
        NamedScan::builder().names(names).schema(schema).build_rel()
    }

    /// Reference to field `offset` of `input`
    pub fn field(&self, input: &Rel, offset: usize) -> PlanResult<Expression> {
        Expression::field(input.field_types(), offset)
    }

    pub fn fields(&self, input: &Rel, offsets: &[usize]) -> PlanResult<Vec<Expression>> {
        offsets.iter().map(|&i| self.field(input, i)).collect()
    }

    /// Resolve a scalar call over already built arguments
    pub fn scalar(&self, name: &str, arguments: Vec<Expression>) -> PlanResult<Expression> {
        self.catalog.scalar(name, arguments)
    }

    /// Grouping over the given fields; no offsets gives the empty grouping
    pub fn grouping(&self, input: &Rel, offsets: &[usize]) -> PlanResult<Grouping> {
        Ok(Grouping::new(self.fields(input, offsets)?))
    }

    /// Aggregate measure `name` over the given fields
    pub fn measure(&self, input: &Rel, name: &str, offsets: &[usize]) -> PlanResult<Measure> {
        let arguments = self.fields(input, offsets)?;
        Ok(Measure::new(self.catalog.aggregate(name, arguments)?))
    }

    pub fn min(&self, input: &Rel, field: usize) -> PlanResult<Measure> {
        self.measure(input, "min", &[field])
    }

    pub fn max(&self, input: &Rel, field: usize) -> PlanResult<Measure> {
        self.measure(input, "max", &[field])
    }

    pub fn sum(&self, input: &Rel, field: usize) -> PlanResult<Measure> {
        self.measure(input, "sum", &[field])
    }

    pub fn sum0(&self, input: &Rel, field: usize) -> PlanResult<Measure> {
        self.measure(input, "sum0", &[field])
    }

    pub fn avg(&self, input: &Rel, field: usize) -> PlanResult<Measure> {
        self.measure(input, "avg", &[field])
    }

    pub fn count(&self, input: &Rel, field: usize) -> PlanResult<Measure> {
        self.measure(input, "count", &[field])
    }

    /// `count(*)`
    pub fn count_star(&self, input: &Rel) -> PlanResult<Measure> {
        self.measure(input, "count", &[])
    }

    /// Aggregate whose groupings and measures are built from its input
    pub fn aggregate<G, M>(&self, input: Rel, groupings: G, measures: M) -> PlanResult<Rel>
    where
        G: FnOnce(&Rel) -> PlanResult<Vec<Grouping>>,
        M: FnOnce(&Rel) -> PlanResult<Vec<Measure>>,
    {
        let groupings = groupings(&input)?;
        let measures = measures(&input)?;
        Aggregate::builder()
            .input(input)
            .groupings(groupings)
            .measures(measures)
            .build_rel()
    }

    pub fn filter<F>(&self, input: Rel, condition: F) -> PlanResult<Rel>
    where
        F: FnOnce(&Rel) -> PlanResult<Expression>,
    {
        let condition = condition(&input)?;
        Filter::builder().input(input).condition(condition).build_rel()
    }

    pub fn project<F>(&self, input: Rel, expressions: F) -> PlanResult<Rel>
    where
        F: FnOnce(&Rel) -> PlanResult<Vec<Expression>>,
    {
        let expressions = expressions(&input)?;
        Project::builder()
            .input(input)
            .expressions(expressions)
            .build_rel()
    }

    pub fn limit(&self, input: Rel, count: i64) -> PlanResult<Rel> {
        Fetch::builder().input(input).count(count).build_rel()
    }
}
