//! Relational operators: the nodes of an immutable plan tree
//!
//! Each node exclusively owns its children and derives its record type (a
//! required struct of output field types) once, when its builder is
//! finalized. A transformation produces a new tree; nodes are never edited.

mod aggregate;
mod fetch;
mod filter;
mod join;
mod project;
mod read;
mod set;
mod sort;
pub mod visitor;

pub use aggregate::{Aggregate, AggregateBuilder, Grouping, Measure};
pub use fetch::{Fetch, FetchBuilder};
pub use filter::{Filter, FilterBuilder};
pub use join::{Cross, CrossBuilder, Join, JoinBuilder, JoinType};
pub use project::{Project, ProjectBuilder};
pub use read::{NamedScan, NamedScanBuilder};
pub use set::{Set, SetBuilder, SetOp};
pub use sort::{Sort, SortBuilder, SortDirection, SortField};
pub use visitor::RelVisitor;

use rp_types::{Type, TypeCreator};
use serde::Serialize;

/// A node with exactly one input
pub trait SingleInputRel {
    fn input(&self) -> &Rel;
}

/// A node with a left and a right input
pub trait BiRel {
    fn left(&self) -> &Rel;
    fn right(&self) -> &Rel;
}

/// Relational operator: one variant per node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rel {
    NamedScan(NamedScan),
    Filter(Filter),
    Project(Project),
    Sort(Sort),
    Fetch(Fetch),
    Cross(Cross),
    Join(Join),
    Set(Set),
    Aggregate(Aggregate),
}

impl Rel {
    /// Output record type, a required struct
    pub fn record_type(&self) -> &Type {
        match self {
            Rel::NamedScan(rel) => rel.record_type(),
            Rel::Filter(rel) => rel.record_type(),
            Rel::Project(rel) => rel.record_type(),
            Rel::Sort(rel) => rel.record_type(),
            Rel::Fetch(rel) => rel.record_type(),
            Rel::Cross(rel) => rel.record_type(),
            Rel::Join(rel) => rel.record_type(),
            Rel::Set(rel) => rel.record_type(),
            Rel::Aggregate(rel) => rel.record_type(),
        }
    }

    /// Output field types in order
    pub fn field_types(&self) -> &[Type] {
        self.record_type().struct_fields().unwrap_or(&[])
    }

    /// Direct children, left to right
    pub fn inputs(&self) -> Vec<&Rel> {
        match self {
            Rel::NamedScan(_) => Vec::new(),
            Rel::Filter(rel) => vec![rel.input()],
            Rel::Project(rel) => vec![rel.input()],
            Rel::Sort(rel) => vec![rel.input()],
            Rel::Fetch(rel) => vec![rel.input()],
            Rel::Aggregate(rel) => vec![rel.input()],
            Rel::Cross(rel) => vec![rel.left(), rel.right()],
            Rel::Join(rel) => vec![rel.left(), rel.right()],
            Rel::Set(rel) => rel.inputs().iter().collect(),
        }
    }

    /// Dispatch to the visitor method for this node
    pub fn accept<C, O, E, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<O, E>
    where
        V: RelVisitor<C, O, E> + ?Sized,
    {
        match self {
            Rel::NamedScan(rel) => rel.accept(visitor, ctx),
            Rel::Filter(rel) => rel.accept(visitor, ctx),
            Rel::Project(rel) => rel.accept(visitor, ctx),
            Rel::Sort(rel) => rel.accept(visitor, ctx),
            Rel::Fetch(rel) => rel.accept(visitor, ctx),
            Rel::Cross(rel) => rel.accept(visitor, ctx),
            Rel::Join(rel) => rel.accept(visitor, ctx),
            Rel::Set(rel) => rel.accept(visitor, ctx),
            Rel::Aggregate(rel) => rel.accept(visitor, ctx),
        }
    }

    /// Node name used in plan dumps
    pub fn name(&self) -> &'static str {
        match self {
            Rel::NamedScan(_) => "NamedScan",
            Rel::Filter(_) => "Filter",
            Rel::Project(_) => "Project",
            Rel::Sort(_) => "Sort",
            Rel::Fetch(_) => "Fetch",
            Rel::Cross(_) => "Cross",
            Rel::Join(_) => "Join",
            Rel::Set(_) => "Set",
            Rel::Aggregate(_) => "Aggregate",
        }
    }
}

macro_rules! impl_from_node {
    ($($node:ident),* $(,)?) => {
        $(
            impl From<$node> for Rel {
                fn from(rel: $node) -> Self {
                    Rel::$node(rel)
                }
            }
        )*
    };
}

impl_from_node!(NamedScan, Filter, Project, Sort, Fetch, Cross, Join, Set, Aggregate);

/// Required struct over the given field types
pub(crate) fn record(fields: impl IntoIterator<Item = Type>) -> Type {
    TypeCreator::REQUIRED.structure(fields)
}

/// Take a required builder field or report it missing
pub(crate) fn required<T>(
    value: Option<T>,
    node: &'static str,
    field: &'static str,
) -> crate::PlanResult<T> {
    value.ok_or_else(|| {
        log::debug!("{node} builder finalized without '{field}'");
        crate::PlanError::MissingField { node, field }
    })
}

#[cfg(test)]
#[path = "rel_test.rs"]
mod tests;
