use super::{record, Rel, RelVisitor};
use crate::error::{PlanError, PlanResult};
use rp_types::{Nullability, Type};
use serde::{Deserialize, Serialize};

/// Set operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOp {
    /// Rows of the first input not in any other, duplicates removed
    MinusPrimary,
    /// Rows of the first input not in any other, multiset semantics
    MinusMultiset,
    /// Rows in every input, duplicates removed
    IntersectionPrimary,
    IntersectionMultiset,
    /// Rows in any input, duplicates removed
    UnionDistinct,
    UnionAll,
}

impl SetOp {
    /// Nullability of an output field given that field's nullability per input
    fn field_nullability(self, per_input: &[Nullability]) -> Nullability {
        let any = per_input.iter().any(|n| n.is_nullable());
        let all = !per_input.is_empty() && per_input.iter().all(|n| n.is_nullable());
        match self {
            SetOp::UnionDistinct | SetOp::UnionAll => Nullability::from_nullable(any),
            SetOp::IntersectionPrimary | SetOp::IntersectionMultiset => {
                Nullability::from_nullable(all)
            }
            SetOp::MinusPrimary | SetOp::MinusMultiset => {
                per_input.first().copied().unwrap_or_default()
            }
        }
    }
}

impl std::fmt::Display for SetOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetOp::MinusPrimary => write!(f, "MINUS"),
            SetOp::MinusMultiset => write!(f, "MINUS ALL"),
            SetOp::IntersectionPrimary => write!(f, "INTERSECT"),
            SetOp::IntersectionMultiset => write!(f, "INTERSECT ALL"),
            SetOp::UnionDistinct => write!(f, "UNION"),
            SetOp::UnionAll => write!(f, "UNION ALL"),
        }
    }
}

/// Set operation over two or more inputs with matching field shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Set {
    inputs: Vec<Rel>,
    op: SetOp,
    record_type: Type,
}

impl Set {
    pub fn builder() -> SetBuilder {
        SetBuilder::default()
    }

    pub fn inputs(&self) -> &[Rel] {
        &self.inputs
    }

    pub fn op(&self) -> SetOp {
        self.op
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_set(self, ctx)
    }
}

#[derive(Debug, Default)]
pub struct SetBuilder {
    inputs: Vec<Rel>,
    op: Option<SetOp>,
}

impl SetBuilder {
    pub fn input(mut self, input: impl Into<Rel>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn op(mut self, op: SetOp) -> Self {
        self.op = Some(op);
        self
    }

    pub fn build(self) -> PlanResult<Set> {
        let op = super::required(self.op, "Set", "op")?;
        let record_type = derive_record(op, &self.inputs)?;
        Ok(Set {
            inputs: self.inputs,
            op,
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Set)
    }
}

fn derive_record(op: SetOp, inputs: &[Rel]) -> PlanResult<Type> {
    let Some((first, rest)) = inputs.split_first() else {
        return Err(mismatch("a set operation needs at least two inputs, found none"));
    };
    if rest.is_empty() {
        return Err(mismatch("a set operation needs at least two inputs, found one"));
    }

    let width = first.field_types().len();
    for (i, input) in rest.iter().enumerate() {
        let fields = input.field_types();
        if fields.len() != width {
            return Err(mismatch(format!(
                "input {} has {} field(s), input 0 has {width}",
                i + 1,
                fields.len()
            )));
        }
        for (pos, (a, b)) in first.field_types().iter().zip(fields).enumerate() {
            if !a.shape_eq(b) {
                return Err(mismatch(format!(
                    "field {pos} is {a} in input 0 but {b} in input {}",
                    i + 1
                )));
            }
        }
    }

    let fields = first.field_types().iter().enumerate().map(|(pos, ty)| {
        let per_input: Vec<Nullability> = inputs
            .iter()
            .map(|input| input.field_types()[pos].nullability())
            .collect();
        ty.with_nullability(op.field_nullability(&per_input))
    });
    Ok(record(fields))
}

fn mismatch(message: impl Into<String>) -> PlanError {
    let message = message.into();
    log::debug!("Rejecting set operation: {message}");
    PlanError::SetInputMismatch { message }
}
