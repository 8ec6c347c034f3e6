use super::{required, Rel, RelVisitor, SingleInputRel};
use crate::error::PlanResult;
use crate::expr::Expression;
use rp_types::Type;
use serde::Serialize;

/// Keeps the input rows for which the condition holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    input: Box<Rel>,
    condition: Expression,
    record_type: Type,
}

impl Filter {
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_filter(self, ctx)
    }
}

impl SingleInputRel for Filter {
    fn input(&self) -> &Rel {
        &self.input
    }
}

#[derive(Debug, Default)]
pub struct FilterBuilder {
    input: Option<Rel>,
    condition: Option<Expression>,
}

impl FilterBuilder {
    pub fn input(mut self, input: impl Into<Rel>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn condition(mut self, condition: Expression) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn build(self) -> PlanResult<Filter> {
        let input = required(self.input, "Filter", "input")?;
        let condition = required(self.condition, "Filter", "condition")?;
        condition.validate_predicate(input.field_types(), "Filter condition")?;
        let record_type = input.record_type().clone();
        Ok(Filter {
            input: Box::new(input),
            condition,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Filter)
    }
}
