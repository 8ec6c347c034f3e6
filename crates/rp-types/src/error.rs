//! Error types for rp-types

use thiserror::Error;

/// Type construction and parsing errors
///
/// Codes use the `T` prefix so they never collide with the `P` codes raised
/// by plan construction in `rp-plan`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// T001: Length parameter outside its valid range
    #[error("[T001] Invalid length {length} for {kind}: must be at least 1")]
    InvalidLength { kind: &'static str, length: u32 },

    /// T002: Precision parameter outside its valid range
    #[error("[T002] Invalid precision {precision} for {kind}: must be between 0 and {max}")]
    InvalidPrecision {
        kind: &'static str,
        precision: u8,
        max: u8,
    },

    /// T003: Decimal precision/scale combination is not representable
    #[error("[T003] Invalid decimal<{precision},{scale}>: precision must be 1..=38 and scale must not exceed precision")]
    InvalidDecimal { precision: u8, scale: u8 },

    /// T004: User-defined type without a name
    #[error("[T004] User-defined type name must not be empty")]
    EmptyUserDefinedName,

    /// T005: Type string could not be parsed
    #[error("[T005] Cannot parse type '{input}': {message}")]
    Parse { input: String, message: String },
}

/// Result type alias for TypeError
pub type TypeResult<T> = Result<T, TypeError>;
