use super::{record, required, Rel, RelVisitor, SingleInputRel};
use crate::error::{PlanError, PlanResult};
use crate::expr::{AggregateFunctionInvocation, Expression};
use rp_types::{Type, TypeCreator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One grouping set: an ordered, possibly empty, list of expressions
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grouping {
    pub expressions: Vec<Expression>,
}

impl Grouping {
    pub fn new(expressions: Vec<Expression>) -> Self {
        Self { expressions }
    }

    /// The empty grouping set (whole-input aggregation)
    pub fn empty() -> Self {
        Self::default()
    }
}

/// An aggregate invocation producing one output field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub function: AggregateFunctionInvocation,
    /// Rows for which this is false are not fed to the function
    pub pre_measure_filter: Option<Expression>,
}

impl Measure {
    pub fn new(function: AggregateFunctionInvocation) -> Self {
        Self {
            function,
            pre_measure_filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Expression) -> Self {
        self.pre_measure_filter = Some(filter);
        self
    }
}

/// Grouped aggregation over a single input
///
/// Output fields are the distinct grouping expressions across all grouping
/// sets (first occurrence wins), then one field per measure, then a required
/// `i32` grouping-set discriminator when there is more than one grouping set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    input: Box<Rel>,
    groupings: Vec<Grouping>,
    measures: Vec<Measure>,
    record_type: Type,
}

impl Aggregate {
    pub fn builder() -> AggregateBuilder {
        AggregateBuilder::default()
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    /// Grouping expressions across all grouping sets, deduplicated structurally
    pub fn unique_grouping_expressions(&self) -> Vec<&Expression> {
        unique_grouping_expressions(&self.groupings)
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_aggregate(self, ctx)
    }
}

impl SingleInputRel for Aggregate {
    fn input(&self) -> &Rel {
        &self.input
    }
}

fn unique_grouping_expressions(groupings: &[Grouping]) -> Vec<&Expression> {
    let mut seen = HashSet::new();
    groupings
        .iter()
        .flat_map(|g| g.expressions.iter())
        .filter(|e| seen.insert(*e))
        .collect()
}

fn derive_record_type(groupings: &[Grouping], measures: &[Measure]) -> Type {
    let grouping_types = unique_grouping_expressions(groupings)
        .into_iter()
        .map(|e| e.get_type().clone());
    let measure_types = measures.iter().map(|m| m.function.output_type().clone());
    let discriminator = (groupings.len() > 1).then(|| TypeCreator::REQUIRED.i32());
    record(grouping_types.chain(measure_types).chain(discriminator))
}

#[derive(Debug, Default)]
pub struct AggregateBuilder {
    input: Option<Rel>,
    groupings: Vec<Grouping>,
    measures: Vec<Measure>,
}

impl AggregateBuilder {
    pub fn input(mut self, input: impl Into<Rel>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn grouping(mut self, grouping: Grouping) -> Self {
        self.groupings.push(grouping);
        self
    }

    pub fn groupings(mut self, groupings: impl IntoIterator<Item = Grouping>) -> Self {
        self.groupings.extend(groupings);
        self
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn measures(mut self, measures: impl IntoIterator<Item = Measure>) -> Self {
        self.measures.extend(measures);
        self
    }

    pub fn build(self) -> PlanResult<Aggregate> {
        let input = required(self.input, "Aggregate", "input")?;
        if self.groupings.is_empty() {
            log::debug!("Aggregate builder finalized without groupings");
            return Err(PlanError::EmptyGroupings);
        }

        let fields = input.field_types();
        for expression in self.groupings.iter().flat_map(|g| g.expressions.iter()) {
            expression.validate(fields)?;
        }
        for measure in &self.measures {
            measure.function.validate(fields)?;
            if let Some(filter) = &measure.pre_measure_filter {
                filter.validate_predicate(fields, "Measure filter")?;
            }
        }

        let record_type = derive_record_type(&self.groupings, &self.measures);
        Ok(Aggregate {
            input: Box::new(input),
            groupings: self.groupings,
            measures: self.measures,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Aggregate)
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
