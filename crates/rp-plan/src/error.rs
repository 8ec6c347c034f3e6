//! Error types for rp-plan

use rp_types::{Type, TypeError};
use thiserror::Error;

/// Plan construction error type
///
/// These use the `P` prefix; type-level failures from `rp-types` keep their
/// own `T` codes and surface through [`PlanError::Type`].
#[derive(Error, Debug)]
pub enum PlanError {
    /// P001: A builder was finalized without a required field
    #[error("[P001] {node} requires '{field}' to be set")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },

    /// P002: Field reference past the end of the input record
    #[error("[P002] Field reference ${offset} is out of bounds for an input of {width} field(s)")]
    FieldOutOfBounds { offset: usize, width: usize },

    /// P003: Field reference annotated with a type the input does not have
    #[error("[P003] Field reference ${offset} is typed {found} but the input field is {expected}")]
    FieldTypeMismatch {
        offset: usize,
        expected: Type,
        found: Type,
    },

    /// P004: Predicate position holding a non-boolean expression
    #[error("[P004] {context} must be boolean, found {found}")]
    NonBooleanCondition { context: &'static str, found: Type },

    /// P005: Aggregate without any grouping set
    #[error("[P005] Aggregate requires at least one grouping; use an empty grouping for whole-input aggregation")]
    EmptyGroupings,

    /// P006: Wrong number of arguments for a function signature
    #[error("[P006] Function '{function}' takes {expected} argument(s), found {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    /// P007: Argument does not fit the signature's parameter
    #[error("[P007] Argument {index} of '{function}' has type {found}, expected {expected}")]
    ArgumentType {
        function: String,
        index: usize,
        expected: String,
        found: Type,
    },

    /// P008: No overload accepts the given argument types
    #[error("[P008] No {kind} function '{name}' accepts ({arguments})")]
    NoMatchingFunction {
        kind: &'static str,
        name: String,
        arguments: String,
    },

    /// P009: Return type rule could not produce a concrete type
    #[error("[P009] Cannot resolve return type of '{function}': {message}")]
    UnresolvedReturnType { function: String, message: String },

    /// P010: Inputs of a set operation disagree
    #[error("[P010] Set operation inputs do not line up: {message}")]
    SetInputMismatch { message: String },

    /// P011: Table schema definition is inconsistent
    #[error("[P011] Invalid schema: {message}")]
    InvalidSchema { message: String },

    /// P012: Negative fetch offset or count
    #[error("[P012] Fetch {field} must not be negative, found {value}")]
    InvalidFetch { field: &'static str, value: i64 },

    /// P013: Conditional branches of different shapes
    #[error("[P013] Branch of type {found} does not match {expected}")]
    BranchTypeMismatch { expected: Type, found: Type },

    /// P014: Literal value does not fit its declared type
    #[error("[P014] Invalid literal: {message}")]
    InvalidLiteral { message: String },

    /// P015: Type construction error propagation
    #[error("[P015] Type error: {0}")]
    Type(#[from] TypeError),

    /// P016: Schema document could not be parsed
    #[error("[P016] Schema parse error: {0}")]
    SchemaParse(#[from] serde_yaml::Error),
}

/// Result type alias for PlanError
pub type PlanResult<T> = Result<T, PlanError>;
