//! Extension-function signatures and the immutable catalog that resolves calls
//!
//! A signature pairs a name with parameter templates and a rule computing
//! the concrete return type from bound argument types. Argument matching
//! goes through [`rp_types::as_type`], so character arguments coerce onto
//! character templates the same way everywhere in the plan.

use crate::error::{PlanError, PlanResult};
use crate::expr::{AggregateFunctionInvocation, Expression, ScalarFunctionInvocation};
use rp_types::{as_type, ParameterizedType, Type};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scalar or aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Scalar,
    Aggregate,
}

impl FunctionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Scalar => "scalar",
            FunctionKind::Aggregate => "aggregate",
        }
    }
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule computing a signature's return type from its bound arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Always this type
    Fixed(Type),
    /// The type of the argument at this position
    Argument(usize),
    /// The argument at `argument` coerced onto `template`
    Derived {
        argument: usize,
        template: ParameterizedType,
    },
}

/// How argument nullability reaches the return type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullabilityHandling {
    /// Nullable exactly when some argument is nullable
    #[default]
    Mirror,
    /// The return rule's own nullability is kept as is
    DeclaredOutput,
}

/// One overload of an extension function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub kind: FunctionKind,
    pub args: Vec<ParameterizedType>,
    pub return_type: ReturnType,
    #[serde(default)]
    pub nullability: NullabilityHandling,
}

impl FunctionSignature {
    /// Scalar overload with mirrored nullability
    pub fn scalar(
        name: impl Into<String>,
        args: Vec<ParameterizedType>,
        return_type: ReturnType,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Scalar,
            args,
            return_type,
            nullability: NullabilityHandling::Mirror,
        }
    }

    /// Aggregate overload with mirrored nullability
    pub fn aggregate(
        name: impl Into<String>,
        args: Vec<ParameterizedType>,
        return_type: ReturnType,
    ) -> Self {
        Self {
            kind: FunctionKind::Aggregate,
            ..Self::scalar(name, args, return_type)
        }
    }

    pub fn with_nullability(mut self, nullability: NullabilityHandling) -> Self {
        self.nullability = nullability;
        self
    }

    /// Compound key `name:arg1_arg2` built from parameter short names
    pub fn key(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(ParameterizedType::short_name).collect();
        format!("{}:{}", self.name, args.join("_"))
    }

    /// Reference to this overload, for storing on invocations
    pub fn reference(&self) -> FunctionReference {
        FunctionReference {
            name: self.name.clone(),
            key: self.key(),
        }
    }

    /// Whether the argument types fit this overload
    pub fn accepts(&self, arguments: &[Type]) -> bool {
        self.check_arguments(arguments).is_ok()
    }

    /// Arity and per-argument check, reporting the first mismatch
    ///
    /// Placeholders (`any1`, `T`) accept any type, but every occurrence of the
    /// same placeholder must bind to shape-equal types.
    pub fn check_arguments(&self, arguments: &[Type]) -> PlanResult<()> {
        if arguments.len() != self.args.len() {
            return Err(PlanError::ArityMismatch {
                function: self.key(),
                expected: self.args.len(),
                found: arguments.len(),
            });
        }
        let mut bindings: HashMap<&str, &Type> = HashMap::new();
        for (index, (param, arg)) in self.args.iter().zip(arguments).enumerate() {
            let fits = match param {
                ParameterizedType::StringLiteral { value } => match bindings.get(value.as_str()) {
                    Some(bound) => bound.shape_eq(arg),
                    None => {
                        bindings.insert(value.as_str(), arg);
                        true
                    }
                },
                _ if param.is_concrete() => as_type(arg, param).is_some(),
                _ => param.family() == Some(arg.family()) || as_type(arg, param).is_some(),
            };
            if !fits {
                return Err(PlanError::ArgumentType {
                    function: self.key(),
                    index,
                    expected: param.to_string(),
                    found: arg.clone(),
                });
            }
        }
        Ok(())
    }

    /// Concrete return type for the given argument types
    pub fn output_type(&self, arguments: &[Type]) -> PlanResult<Type> {
        self.check_arguments(arguments)?;
        let base = match &self.return_type {
            ReturnType::Fixed(ty) => ty.clone(),
            ReturnType::Argument(index) => {
                let arg = self.argument(arguments, *index)?;
                // A template parameter returns the argument as coerced onto it
                match self.args.get(*index) {
                    Some(param) if !param.is_concrete() && param.family().is_some() => {
                        as_type(arg, param).unwrap_or_else(|| arg.clone())
                    }
                    _ => arg.clone(),
                }
            }
            ReturnType::Derived { argument, template } => {
                let source = self.argument(arguments, *argument)?;
                as_type(source, template).ok_or_else(|| PlanError::UnresolvedReturnType {
                    function: self.key(),
                    message: format!("{source} cannot be coerced onto {template}"),
                })?
            }
        };
        Ok(match self.nullability {
            NullabilityHandling::DeclaredOutput => base,
            NullabilityHandling::Mirror => {
                base.with_nullability(crate::expr::combined_nullability(arguments))
            }
        })
    }

    fn argument<'a>(&self, arguments: &'a [Type], index: usize) -> PlanResult<&'a Type> {
        arguments
            .get(index)
            .ok_or_else(|| PlanError::UnresolvedReturnType {
                function: self.key(),
                message: format!("return rule refers to missing argument {index}"),
            })
    }
}

/// Identity of a resolved overload stored on invocations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionReference {
    name: String,
    key: String,
}

impl FunctionReference {
    /// Function name without argument suffix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compound key of the overload
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for FunctionReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

/// Immutable set of extension-function overloads, grouped by name
#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    functions: HashMap<String, Vec<FunctionSignature>>,
}

impl FunctionCatalog {
    /// Build a catalog; overloads keep their declaration order
    pub fn new(signatures: impl IntoIterator<Item = FunctionSignature>) -> Self {
        let mut functions: HashMap<String, Vec<FunctionSignature>> = HashMap::new();
        for sig in signatures {
            functions
                .entry(sig.name.to_lowercase())
                .or_default()
                .push(sig);
        }
        Self { functions }
    }

    /// Total number of overloads
    pub fn len(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Overloads registered under a name (case-insensitive)
    pub fn overloads(&self, name: &str) -> &[FunctionSignature] {
        self.functions
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Overload by compound key
    pub fn get(&self, key: &str) -> Option<&FunctionSignature> {
        let name = key.split(':').next().unwrap_or(key);
        self.overloads(name).iter().find(|sig| sig.key() == key)
    }

    /// First overload of `kind` named `name` that accepts the argument types
    pub fn resolve(
        &self,
        kind: FunctionKind,
        name: &str,
        arguments: &[Type],
    ) -> PlanResult<&FunctionSignature> {
        let found = self
            .overloads(name)
            .iter()
            .filter(|sig| sig.kind == kind)
            .find(|sig| sig.accepts(arguments));
        match found {
            Some(sig) => Ok(sig),
            None => {
                let arguments: Vec<String> = arguments.iter().map(Type::to_string).collect();
                log::debug!(
                    "No {kind} overload of '{name}' accepts ({})",
                    arguments.join(", ")
                );
                Err(PlanError::NoMatchingFunction {
                    kind: kind.as_str(),
                    name: name.to_string(),
                    arguments: arguments.join(", "),
                })
            }
        }
    }

    /// Resolve and invoke a scalar function
    pub fn scalar(&self, name: &str, arguments: Vec<Expression>) -> PlanResult<Expression> {
        let types = argument_types(&arguments);
        let sig = self.resolve(FunctionKind::Scalar, name, &types)?;
        let output_type = sig.output_type(&types)?;
        Ok(Expression::ScalarFunction(ScalarFunctionInvocation::new(
            sig.reference(),
            arguments,
            output_type,
        )))
    }

    /// Resolve and invoke an aggregate function
    pub fn aggregate(
        &self,
        name: &str,
        arguments: Vec<Expression>,
    ) -> PlanResult<AggregateFunctionInvocation> {
        let types = argument_types(&arguments);
        let sig = self.resolve(FunctionKind::Aggregate, name, &types)?;
        let output_type = sig.output_type(&types)?;
        Ok(AggregateFunctionInvocation::new(
            sig.reference(),
            arguments,
            output_type,
        ))
    }
}

fn argument_types(arguments: &[Expression]) -> Vec<Type> {
    arguments.iter().map(|arg| arg.get_type().clone()).collect()
}

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;
