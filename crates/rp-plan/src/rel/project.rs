use super::{record, required, Rel, RelVisitor, SingleInputRel};
use crate::error::PlanResult;
use crate::expr::Expression;
use rp_types::Type;
use serde::Serialize;

/// Appends computed expressions to every input row
///
/// The output keeps all input fields, followed by one field per expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    input: Box<Rel>,
    expressions: Vec<Expression>,
    record_type: Type,
}

impl Project {
    pub fn builder() -> ProjectBuilder {
        ProjectBuilder::default()
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_project(self, ctx)
    }
}

impl SingleInputRel for Project {
    fn input(&self) -> &Rel {
        &self.input
    }
}

#[derive(Debug, Default)]
pub struct ProjectBuilder {
    input: Option<Rel>,
    expressions: Vec<Expression>,
}

impl ProjectBuilder {
    pub fn input(mut self, input: impl Into<Rel>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn expression(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    pub fn expressions(mut self, expressions: impl IntoIterator<Item = Expression>) -> Self {
        self.expressions.extend(expressions);
        self
    }

    pub fn build(self) -> PlanResult<Project> {
        let input = required(self.input, "Project", "input")?;
        let fields = input.field_types();
        for expression in &self.expressions {
            expression.validate(fields)?;
        }
        let record_type = record(
            fields
                .iter()
                .cloned()
                .chain(self.expressions.iter().map(|e| e.get_type().clone())),
        );
        Ok(Project {
            input: Box::new(input),
            expressions: self.expressions,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Project)
    }
}
