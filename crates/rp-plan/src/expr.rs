//! Typed expression tree evaluated against an input record
//!
//! Every node carries its resolved [`Type`]. Equality and hashing are deep
//! and structural, including those type annotations; floating-point
//! literals compare by bit pattern so that `Eq` and `Hash` stay consistent.

use crate::error::{PlanError, PlanResult};
use crate::function::FunctionReference;
use rp_types::{Nullability, Type, TypeCreator, TypeKind};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Raw value of a literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LiteralValue {
    Boolean(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Fp32(f32),
    Fp64(f64),
    String(String),
    FixedChar(String),
    VarChar(String),
    /// Days since the Unix epoch
    Date(i32),
    /// Typed null; the type lives on the enclosing [`Literal`]
    Null,
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        use LiteralValue::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (Fp32(a), Fp32(b)) => a.to_bits() == b.to_bits(),
            (Fp64(a), Fp64(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) | (FixedChar(a), FixedChar(b)) | (VarChar(a), VarChar(b)) => {
                a == b
            }
            (Date(a), Date(b)) => a == b,
            (Null, Null) => true,
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::Boolean(v) => v.hash(state),
            LiteralValue::I8(v) => v.hash(state),
            LiteralValue::I16(v) => v.hash(state),
            LiteralValue::I32(v) => v.hash(state),
            LiteralValue::I64(v) => v.hash(state),
            LiteralValue::Fp32(v) => v.to_bits().hash(state),
            LiteralValue::Fp64(v) => v.to_bits().hash(state),
            LiteralValue::String(v) | LiteralValue::FixedChar(v) | LiteralValue::VarChar(v) => {
                v.hash(state)
            }
            LiteralValue::Date(v) => v.hash(state),
            LiteralValue::Null => {}
        }
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Boolean(v) => write!(f, "{v}"),
            LiteralValue::I8(v) => write!(f, "{v}"),
            LiteralValue::I16(v) => write!(f, "{v}"),
            LiteralValue::I32(v) => write!(f, "{v}"),
            LiteralValue::I64(v) => write!(f, "{v}"),
            LiteralValue::Fp32(v) => write!(f, "{v}"),
            LiteralValue::Fp64(v) => write!(f, "{v}"),
            LiteralValue::String(v) | LiteralValue::FixedChar(v) | LiteralValue::VarChar(v) => {
                write!(f, "'{}'", v.replace('\'', "''"))
            }
            LiteralValue::Date(v) => write!(f, "date({v})"),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}

/// A constant value with its type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LiteralDef")]
pub struct Literal {
    value: LiteralValue,
    #[serde(rename = "type")]
    ty: Type,
}

/// Wire form of a [`Literal`], checked on the way in
#[derive(Deserialize)]
struct LiteralDef {
    value: LiteralValue,
    #[serde(rename = "type")]
    ty: Type,
}

impl TryFrom<LiteralDef> for Literal {
    type Error = PlanError;

    fn try_from(def: LiteralDef) -> Result<Self, Self::Error> {
        Literal::typed(def.value, def.ty)
    }
}

impl Literal {
    fn of(value: LiteralValue, ty: Type) -> Self {
        Self { value, ty }
    }

    pub fn boolean(value: bool) -> Self {
        Self::of(LiteralValue::Boolean(value), TypeCreator::REQUIRED.boolean())
    }

    pub fn i8(value: i8) -> Self {
        Self::of(LiteralValue::I8(value), TypeCreator::REQUIRED.i8())
    }

    pub fn i16(value: i16) -> Self {
        Self::of(LiteralValue::I16(value), TypeCreator::REQUIRED.i16())
    }

    pub fn i32(value: i32) -> Self {
        Self::of(LiteralValue::I32(value), TypeCreator::REQUIRED.i32())
    }

    pub fn i64(value: i64) -> Self {
        Self::of(LiteralValue::I64(value), TypeCreator::REQUIRED.i64())
    }

    pub fn fp32(value: f32) -> Self {
        Self::of(LiteralValue::Fp32(value), TypeCreator::REQUIRED.fp32())
    }

    pub fn fp64(value: f64) -> Self {
        Self::of(LiteralValue::Fp64(value), TypeCreator::REQUIRED.fp64())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::of(
            LiteralValue::String(value.into()),
            TypeCreator::REQUIRED.string(),
        )
    }

    /// Fixed-length character literal; the length is the character count
    pub fn fixed_char(value: impl Into<String>) -> PlanResult<Self> {
        let value = value.into();
        let length = char_length(&value)?;
        let ty = TypeCreator::REQUIRED.fixed_char(length)?;
        Ok(Self::of(LiteralValue::FixedChar(value), ty))
    }

    /// Variable-length character literal of declared maximum `length`
    pub fn var_char(value: impl Into<String>, length: u32) -> PlanResult<Self> {
        let value = value.into();
        let ty = TypeCreator::REQUIRED.var_char(length)?;
        if char_length(&value)? > length {
            return Err(PlanError::InvalidLiteral {
                message: format!("'{value}' is longer than varchar<{length}>"),
            });
        }
        Ok(Self::of(LiteralValue::VarChar(value), ty))
    }

    /// Date as days since the Unix epoch
    pub fn date(days: i32) -> Self {
        Self::of(LiteralValue::Date(days), TypeCreator::REQUIRED.date())
    }

    /// Null of the given type; the type is made nullable
    pub fn null(ty: &Type) -> Self {
        Self::of(LiteralValue::Null, ty.as_nullable())
    }

    /// The same value typed as nullable
    pub fn nullable(self) -> Self {
        Self {
            ty: self.ty.as_nullable(),
            value: self.value,
        }
    }

    /// Literal with an explicit type, which must agree with the value
    pub fn typed(value: LiteralValue, ty: Type) -> PlanResult<Self> {
        let agrees = match (&value, ty.kind()) {
            (LiteralValue::Null, _) => ty.is_nullable(),
            (LiteralValue::Boolean(_), TypeKind::Boolean)
            | (LiteralValue::I8(_), TypeKind::I8)
            | (LiteralValue::I16(_), TypeKind::I16)
            | (LiteralValue::I32(_), TypeKind::I32)
            | (LiteralValue::I64(_), TypeKind::I64)
            | (LiteralValue::Fp32(_), TypeKind::Fp32)
            | (LiteralValue::Fp64(_), TypeKind::Fp64)
            | (LiteralValue::String(_), TypeKind::String)
            | (LiteralValue::Date(_), TypeKind::Date) => true,
            (LiteralValue::FixedChar(v), TypeKind::FixedChar { length }) => {
                char_length(v)? == *length
            }
            (LiteralValue::VarChar(v), TypeKind::VarChar { length }) => {
                char_length(v)? <= *length
            }
            _ => false,
        };
        if !agrees {
            return Err(PlanError::InvalidLiteral {
                message: format!("{value} is not a valid {ty} value"),
            });
        }
        Ok(Self::of(value, ty))
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }
}

fn char_length(value: &str) -> PlanResult<u32> {
    u32::try_from(value.chars().count()).map_err(|_| PlanError::InvalidLiteral {
        message: "character literal is too long".to_string(),
    })
}

/// Positional reference to a field of the input record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldReference {
    offset: usize,
    #[serde(rename = "type")]
    ty: Type,
}

impl FieldReference {
    /// Reference with an explicit type annotation; checked later by [`Expression::validate`]
    pub fn new(offset: usize, ty: Type) -> Self {
        Self { offset, ty }
    }

    /// Bounds-checked reference typed from the input record
    pub fn resolve(input: &[Type], offset: usize) -> PlanResult<Self> {
        let ty = input.get(offset).ok_or(PlanError::FieldOutOfBounds {
            offset,
            width: input.len(),
        })?;
        Ok(Self::new(offset, ty.clone()))
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }

    fn validate(&self, input: &[Type]) -> PlanResult<()> {
        let expected = input.get(self.offset).ok_or(PlanError::FieldOutOfBounds {
            offset: self.offset,
            width: input.len(),
        })?;
        if expected != &self.ty {
            return Err(PlanError::FieldTypeMismatch {
                offset: self.offset,
                expected: expected.clone(),
                found: self.ty.clone(),
            });
        }
        Ok(())
    }
}

/// Call of a scalar extension function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScalarFunctionInvocation {
    function: FunctionReference,
    arguments: Vec<Expression>,
    output_type: Type,
}

impl ScalarFunctionInvocation {
    /// Invocation with an already resolved output type
    ///
    /// Prefer [`crate::FunctionCatalog::scalar`], which derives the output type
    /// from the signature.
    pub fn new(function: FunctionReference, arguments: Vec<Expression>, output_type: Type) -> Self {
        Self {
            function,
            arguments,
            output_type,
        }
    }

    pub fn function(&self) -> &FunctionReference {
        &self.function
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }

    pub fn output_type(&self) -> &Type {
        &self.output_type
    }
}

/// Conversion of an expression to another type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cast {
    input: Box<Expression>,
    #[serde(rename = "type")]
    ty: Type,
}

impl Cast {
    pub fn new(input: Expression, ty: Type) -> Self {
        Self {
            input: Box::new(input),
            ty,
        }
    }

    pub fn input(&self) -> &Expression {
        &self.input
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }
}

/// One `condition THEN result` arm
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IfClause {
    pub condition: Expression,
    pub then: Expression,
}

/// Searched conditional: first clause whose condition holds, else the fallback
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IfThenDef")]
pub struct IfThen {
    clauses: Vec<IfClause>,
    otherwise: Box<Expression>,
    #[serde(rename = "type")]
    ty: Type,
}

/// Wire form of an [`IfThen`]; the stored type must match the derived one
#[derive(Deserialize)]
struct IfThenDef {
    clauses: Vec<IfClause>,
    otherwise: Box<Expression>,
    #[serde(rename = "type")]
    ty: Type,
}

impl TryFrom<IfThenDef> for IfThen {
    type Error = PlanError;

    fn try_from(def: IfThenDef) -> Result<Self, Self::Error> {
        let if_then = IfThen::new(def.clauses, *def.otherwise)?;
        if if_then.ty != def.ty {
            return Err(PlanError::BranchTypeMismatch {
                expected: if_then.ty,
                found: def.ty,
            });
        }
        Ok(if_then)
    }
}

impl IfThen {
    /// Conditional whose type is the fallback's shape, nullable if any branch is
    pub fn new(clauses: Vec<IfClause>, otherwise: Expression) -> PlanResult<Self> {
        let base = otherwise.get_type();
        let mut nullability = base.nullability();
        for clause in &clauses {
            if !clause.condition.is_boolean() {
                return Err(PlanError::NonBooleanCondition {
                    context: "IfThen condition",
                    found: clause.condition.get_type().clone(),
                });
            }
            let branch = clause.then.get_type();
            if !branch.shape_eq(base) {
                return Err(PlanError::BranchTypeMismatch {
                    expected: base.clone(),
                    found: branch.clone(),
                });
            }
            nullability = nullability.combine(branch.nullability());
        }
        let ty = base.with_nullability(nullability);
        Ok(Self {
            clauses,
            otherwise: Box::new(otherwise),
            ty,
        })
    }

    pub fn clauses(&self) -> &[IfClause] {
        &self.clauses
    }

    pub fn otherwise(&self) -> &Expression {
        &self.otherwise
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }
}

/// Typed expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),
    FieldReference(FieldReference),
    ScalarFunction(ScalarFunctionInvocation),
    Cast(Cast),
    IfThen(IfThen),
}

impl Expression {
    /// Resolved type of this expression
    pub fn get_type(&self) -> &Type {
        match self {
            Expression::Literal(lit) => lit.get_type(),
            Expression::FieldReference(field) => field.get_type(),
            Expression::ScalarFunction(func) => func.output_type(),
            Expression::Cast(cast) => cast.get_type(),
            Expression::IfThen(if_then) => if_then.get_type(),
        }
    }

    /// Whether this expression is boolean of either nullability
    pub fn is_boolean(&self) -> bool {
        self.get_type().is_boolean()
    }

    /// Shorthand for a bounds-checked field reference
    pub fn field(input: &[Type], offset: usize) -> PlanResult<Expression> {
        FieldReference::resolve(input, offset).map(Expression::FieldReference)
    }

    /// Check every field reference in this tree against `input`
    pub fn validate(&self, input: &[Type]) -> PlanResult<()> {
        match self {
            Expression::Literal(_) => Ok(()),
            Expression::FieldReference(field) => field.validate(input),
            Expression::ScalarFunction(func) => {
                func.arguments.iter().try_for_each(|arg| arg.validate(input))
            }
            Expression::Cast(cast) => cast.input.validate(input),
            Expression::IfThen(if_then) => {
                for clause in &if_then.clauses {
                    clause.condition.validate(input)?;
                    clause.then.validate(input)?;
                }
                if_then.otherwise.validate(input)
            }
        }
    }

    /// Validate and require a boolean type, for predicate positions
    pub(crate) fn validate_predicate(
        &self,
        input: &[Type],
        context: &'static str,
    ) -> PlanResult<()> {
        self.validate(input)?;
        if !self.is_boolean() {
            return Err(PlanError::NonBooleanCondition {
                context,
                found: self.get_type().clone(),
            });
        }
        Ok(())
    }
}

impl From<Literal> for Expression {
    fn from(lit: Literal) -> Self {
        Expression::Literal(lit)
    }
}

impl From<FieldReference> for Expression {
    fn from(field: FieldReference) -> Self {
        Expression::FieldReference(field)
    }
}

impl From<ScalarFunctionInvocation> for Expression {
    fn from(func: ScalarFunctionInvocation) -> Self {
        Expression::ScalarFunction(func)
    }
}

impl From<Cast> for Expression {
    fn from(cast: Cast) -> Self {
        Expression::Cast(cast)
    }
}

impl From<IfThen> for Expression {
    fn from(if_then: IfThen) -> Self {
        Expression::IfThen(if_then)
    }
}

fn write_args(f: &mut std::fmt::Formatter<'_>, args: &[Expression]) -> std::fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit.value),
            Expression::FieldReference(field) => write!(f, "${}", field.offset),
            Expression::ScalarFunction(func) => {
                write!(f, "{}(", func.function.name())?;
                write_args(f, &func.arguments)?;
                write!(f, ")")
            }
            Expression::Cast(cast) => write!(f, "cast({} AS {})", cast.input, cast.ty),
            Expression::IfThen(if_then) => {
                write!(f, "if")?;
                for clause in &if_then.clauses {
                    write!(f, " {} then {}", clause.condition, clause.then)?;
                }
                write!(f, " else {}", if_then.otherwise)
            }
        }
    }
}

/// Which part of a possibly distributed aggregation an invocation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AggregationPhase {
    InitialToIntermediate,
    IntermediateToIntermediate,
    #[default]
    InitialToResult,
    IntermediateToResult,
}

/// Whether an aggregate sees every input row or only distinct argument tuples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AggregationInvocation {
    #[default]
    All,
    Distinct,
}

/// Call of an aggregate extension function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateFunctionInvocation {
    function: FunctionReference,
    arguments: Vec<Expression>,
    output_type: Type,
    phase: AggregationPhase,
    invocation: AggregationInvocation,
}

impl AggregateFunctionInvocation {
    /// Invocation with an already resolved output type
    pub fn new(function: FunctionReference, arguments: Vec<Expression>, output_type: Type) -> Self {
        Self {
            function,
            arguments,
            output_type,
            phase: AggregationPhase::default(),
            invocation: AggregationInvocation::default(),
        }
    }

    pub fn with_phase(mut self, phase: AggregationPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_invocation(mut self, invocation: AggregationInvocation) -> Self {
        self.invocation = invocation;
        self
    }

    pub fn function(&self) -> &FunctionReference {
        &self.function
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }

    pub fn output_type(&self) -> &Type {
        &self.output_type
    }

    pub fn phase(&self) -> AggregationPhase {
        self.phase
    }

    pub fn invocation(&self) -> AggregationInvocation {
        self.invocation
    }

    /// Check every argument's field references against `input`
    pub fn validate(&self, input: &[Type]) -> PlanResult<()> {
        self.arguments.iter().try_for_each(|arg| arg.validate(input))
    }
}

impl std::fmt::Display for AggregateFunctionInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.function.name())?;
        if self.invocation == AggregationInvocation::Distinct {
            write!(f, "DISTINCT ")?;
        }
        write_args(f, &self.arguments)?;
        write!(f, ")")
    }
}

/// Nullability of a result computed from several inputs
pub(crate) fn combined_nullability<'a>(types: impl IntoIterator<Item = &'a Type>) -> Nullability {
    types
        .into_iter()
        .fold(Nullability::Required, |acc, t| acc.combine(t.nullability()))
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
