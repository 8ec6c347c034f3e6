use super::{required, Rel, RelVisitor, SingleInputRel};
use crate::error::{PlanError, PlanResult};
use rp_types::Type;
use serde::Serialize;

/// Skips `offset` rows, then emits at most `count` rows (all when unset)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fetch {
    input: Box<Rel>,
    offset: i64,
    count: Option<i64>,
    record_type: Type,
}

impl Fetch {
    pub fn builder() -> FetchBuilder {
        FetchBuilder::default()
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn count(&self) -> Option<i64> {
        self.count
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_fetch(self, ctx)
    }
}

impl SingleInputRel for Fetch {
    fn input(&self) -> &Rel {
        &self.input
    }
}

#[derive(Debug, Default)]
pub struct FetchBuilder {
    input: Option<Rel>,
    offset: i64,
    count: Option<i64>,
}

impl FetchBuilder {
    pub fn input(mut self, input: impl Into<Rel>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn build(self) -> PlanResult<Fetch> {
        let input = required(self.input, "Fetch", "input")?;
        if self.offset < 0 {
            return Err(PlanError::InvalidFetch {
                field: "offset",
                value: self.offset,
            });
        }
        if let Some(count) = self.count.filter(|c| *c < 0) {
            return Err(PlanError::InvalidFetch {
                field: "count",
                value: count,
            });
        }
        let record_type = input.record_type().clone();
        Ok(Fetch {
            input: Box::new(input),
            offset: self.offset,
            count: self.count,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Fetch)
    }
}
