use super::{required, Rel, RelVisitor, SingleInputRel};
use crate::error::PlanResult;
use crate::expr::Expression;
use rp_types::Type;
use serde::{Deserialize, Serialize};

/// Ordering of one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    AscNullsFirst,
    AscNullsLast,
    DescNullsFirst,
    DescNullsLast,
    /// Equal values grouped together, in no particular order
    Clustered,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::AscNullsFirst => write!(f, "ASC NULLS FIRST"),
            SortDirection::AscNullsLast => write!(f, "ASC NULLS LAST"),
            SortDirection::DescNullsFirst => write!(f, "DESC NULLS FIRST"),
            SortDirection::DescNullsLast => write!(f, "DESC NULLS LAST"),
            SortDirection::Clustered => write!(f, "CLUSTERED"),
        }
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    pub expression: Expression,
    pub direction: SortDirection,
}

/// Orders the input rows; the record type is unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    input: Box<Rel>,
    sorts: Vec<SortField>,
    record_type: Type,
}

impl Sort {
    pub fn builder() -> SortBuilder {
        SortBuilder::default()
    }

    pub fn sorts(&self) -> &[SortField] {
        &self.sorts
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_sort(self, ctx)
    }
}

impl SingleInputRel for Sort {
    fn input(&self) -> &Rel {
        &self.input
    }
}

#[derive(Debug, Default)]
pub struct SortBuilder {
    input: Option<Rel>,
    sorts: Vec<SortField>,
}

impl SortBuilder {
    pub fn input(mut self, input: impl Into<Rel>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn sort(mut self, expression: Expression, direction: SortDirection) -> Self {
        self.sorts.push(SortField {
            expression,
            direction,
        });
        self
    }

    pub fn build(self) -> PlanResult<Sort> {
        let input = required(self.input, "Sort", "input")?;
        for field in &self.sorts {
            field.expression.validate(input.field_types())?;
        }
        let record_type = input.record_type().clone();
        Ok(Sort {
            input: Box::new(input),
            sorts: self.sorts,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Sort)
    }
}
