//! Traversal contract for plan trees
//!
//! One method per node type, each receiving the node and a mutable,
//! caller-defined context. Dispatch never recurses on its own: a visitor
//! that needs the children calls `accept` on them, and any `Err` it returns
//! stops the walk at that point.

use super::{Aggregate, Cross, Fetch, Filter, Join, NamedScan, Project, Set, Sort};

/// Visitor over [`super::Rel`] nodes with context `C`, result `O` and error `E`
pub trait RelVisitor<C, O, E> {
    fn visit_named_scan(&mut self, rel: &NamedScan, ctx: &mut C) -> Result<O, E>;

    fn visit_filter(&mut self, rel: &Filter, ctx: &mut C) -> Result<O, E>;

    fn visit_project(&mut self, rel: &Project, ctx: &mut C) -> Result<O, E>;

    fn visit_sort(&mut self, rel: &Sort, ctx: &mut C) -> Result<O, E>;

    fn visit_fetch(&mut self, rel: &Fetch, ctx: &mut C) -> Result<O, E>;

    fn visit_cross(&mut self, rel: &Cross, ctx: &mut C) -> Result<O, E>;

    fn visit_join(&mut self, rel: &Join, ctx: &mut C) -> Result<O, E>;

    fn visit_set(&mut self, rel: &Set, ctx: &mut C) -> Result<O, E>;

    fn visit_aggregate(&mut self, rel: &Aggregate, ctx: &mut C) -> Result<O, E>;
}
