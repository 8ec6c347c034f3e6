use super::{record, required, BiRel, Rel, RelVisitor};
use crate::error::PlanResult;
use crate::expr::Expression;
use rp_types::Type;
use serde::{Deserialize, Serialize};

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    /// Left outer join
    Left,
    /// Right outer join
    Right,
    /// Full outer join
    Outer,
    LeftSemi,
    LeftAnti,
    RightSemi,
    RightAnti,
}

impl JoinType {
    /// Output fields for the given left and right inputs
    ///
    /// The side that may be padded with nulls has every field made
    /// nullable; semi and anti joins emit one side only.
    pub fn output_fields(self, left: &[Type], right: &[Type]) -> Vec<Type> {
        let nullable = |fields: &[Type]| -> Vec<Type> {
            fields.iter().map(Type::as_nullable).collect()
        };
        match self {
            JoinType::Inner => [left, right].concat(),
            JoinType::Left => [left.to_vec(), nullable(right)].concat(),
            JoinType::Right => [nullable(left), right.to_vec()].concat(),
            JoinType::Outer => [nullable(left), nullable(right)].concat(),
            JoinType::LeftSemi | JoinType::LeftAnti => left.to_vec(),
            JoinType::RightSemi | JoinType::RightAnti => right.to_vec(),
        }
    }
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Outer => write!(f, "FULL OUTER"),
            JoinType::LeftSemi => write!(f, "LEFT SEMI"),
            JoinType::LeftAnti => write!(f, "LEFT ANTI"),
            JoinType::RightSemi => write!(f, "RIGHT SEMI"),
            JoinType::RightAnti => write!(f, "RIGHT ANTI"),
        }
    }
}

/// Cartesian product: left fields followed by right fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cross {
    left: Box<Rel>,
    right: Box<Rel>,
    record_type: Type,
}

impl Cross {
    pub fn builder() -> CrossBuilder {
        CrossBuilder::default()
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_cross(self, ctx)
    }
}

impl BiRel for Cross {
    fn left(&self) -> &Rel {
        &self.left
    }

    fn right(&self) -> &Rel {
        &self.right
    }
}

#[derive(Debug, Default)]
pub struct CrossBuilder {
    left: Option<Rel>,
    right: Option<Rel>,
}

impl CrossBuilder {
    pub fn left(mut self, left: impl Into<Rel>) -> Self {
        self.left = Some(left.into());
        self
    }

    pub fn right(mut self, right: impl Into<Rel>) -> Self {
        self.right = Some(right.into());
        self
    }

    pub fn build(self) -> PlanResult<Cross> {
        let left = required(self.left, "Cross", "left")?;
        let right = required(self.right, "Cross", "right")?;
        let fields = JoinType::Inner.output_fields(left.field_types(), right.field_types());
        let record_type = record(fields);
        Ok(Cross {
            left: Box::new(left),
            right: Box::new(right),
            record_type,
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Cross)
    }
}

/// Join of two inputs on a boolean condition
///
/// The condition sees the left fields followed by the right fields; the
/// optional post-join filter sees the join's output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Join {
    left: Box<Rel>,
    right: Box<Rel>,
    join_type: JoinType,
    condition: Expression,
    post_join_filter: Option<Expression>,
    record_type: Type,
}

impl Join {
    pub fn builder() -> JoinBuilder {
        JoinBuilder::default()
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn post_join_filter(&self) -> Option<&Expression> {
        self.post_join_filter.as_ref()
    }

    pub fn record_type(&self) -> &Type {
        &self.record_type
    }

    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        visitor.visit_join(self, ctx)
    }
}

impl BiRel for Join {
    fn left(&self) -> &Rel {
        &self.left
    }

    fn right(&self) -> &Rel {
        &self.right
    }
}

#[derive(Debug, Default)]
pub struct JoinBuilder {
    left: Option<Rel>,
    right: Option<Rel>,
    join_type: Option<JoinType>,
    condition: Option<Expression>,
    post_join_filter: Option<Expression>,
}

impl JoinBuilder {
    pub fn left(mut self, left: impl Into<Rel>) -> Self {
        self.left = Some(left.into());
        self
    }

    pub fn right(mut self, right: impl Into<Rel>) -> Self {
        self.right = Some(right.into());
        self
    }

    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = Some(join_type);
        self
    }

    pub fn condition(mut self, condition: Expression) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn post_join_filter(mut self, filter: Expression) -> Self {
        self.post_join_filter = Some(filter);
        self
    }

    pub fn build(self) -> PlanResult<Join> {
        let left = required(self.left, "Join", "left")?;
        let right = required(self.right, "Join", "right")?;
        let join_type = required(self.join_type, "Join", "join_type")?;
        let condition = required(self.condition, "Join", "condition")?;

        let combined = [left.field_types(), right.field_types()].concat();
        condition.validate_predicate(&combined, "Join condition")?;

        let output = join_type.output_fields(left.field_types(), right.field_types());
        if let Some(filter) = &self.post_join_filter {
            filter.validate_predicate(&output, "Post-join filter")?;
        }

        Ok(Join {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            condition,
            post_join_filter: self.post_join_filter,
            record_type: record(output),
        })
    }

    pub fn build_rel(self) -> PlanResult<Rel> {
        self.build().map(Rel::Join)
    }
}
