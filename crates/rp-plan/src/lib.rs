//! rp-plan: relational plan IR for relplan
//!
//! An immutable tree of relational operators over typed expressions.
//! Every node derives its output record type when its builder is finalized,
//! and function calls resolve against a catalog of typed signatures.

pub mod dsl;
pub(crate) mod error;
pub mod explain;
pub mod expr;
pub mod function;
pub mod rel;
pub mod schema;
mod standard;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use dsl::PlanBuilder;
pub use error::{PlanError, PlanResult};
pub use explain::explain;
pub use expr::{
    AggregateFunctionInvocation, AggregationInvocation, AggregationPhase, Cast, Expression,
    FieldReference, IfClause, IfThen, Literal, LiteralValue, ScalarFunctionInvocation,
};
pub use function::{
    FunctionCatalog, FunctionKind, FunctionReference, FunctionSignature, NullabilityHandling,
    ReturnType,
};
pub use rel::{
    Aggregate, AggregateBuilder, BiRel, Cross, CrossBuilder, Fetch, FetchBuilder, Filter,
    FilterBuilder, Grouping, Join, JoinBuilder, JoinType, Measure, NamedScan, NamedScanBuilder,
    Project, ProjectBuilder, Rel, RelVisitor, Set, SetBuilder, SetOp, SingleInputRel, Sort,
    SortBuilder, SortDirection, SortField,
};
pub use schema::{ColumnDef, NamedStruct};
