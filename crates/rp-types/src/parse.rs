//! Type-string parsing for concrete and parameterized types
//!
//! Accepts the canonical lowercase spelling produced by `Display`
//! (`varchar<10>?`, `decimal<P,S>`, `struct<i32,list<string>>`), with
//! case-insensitive keywords and an optional trailing `?` for nullable.

use crate::error::{TypeError, TypeResult};
use crate::parameterized::ParameterizedType;
use crate::types::{Nullability, Type, TypeCreator, DEFAULT_TIMESTAMP_PRECISION};

/// A type string split into keyword, optional `<...>` parameters and nullability
struct Signature<'a> {
    /// Keyword exactly as written
    raw_base: &'a str,
    /// Lowercased keyword
    base: String,
    /// Top-level parameters, if the string carried `<...>`
    params: Option<Vec<&'a str>>,
    nullability: Nullability,
}

impl Signature<'_> {
    fn param_count(&self) -> usize {
        self.params.as_ref().map_or(0, Vec::len)
    }
}

fn parse_error(input: &str, message: impl Into<String>) -> TypeError {
    TypeError::Parse {
        input: input.to_string(),
        message: message.into(),
    }
}

/// Split `input` into keyword, parameters and nullability
fn split_signature(input: &str) -> TypeResult<Signature<'_>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(parse_error(input, "empty type string"));
    }

    let (body, nullability) = match trimmed.strip_suffix('?') {
        Some(rest) => (rest.trim_end(), Nullability::Nullable),
        None => (trimmed, Nullability::Required),
    };

    let Some(open) = body.find('<') else {
        return Ok(Signature {
            raw_base: body,
            base: body.to_lowercase(),
            params: None,
            nullability,
        });
    };

    if !body.ends_with('>') {
        return Err(parse_error(input, "missing closing '>'"));
    }
    let raw_base = body[..open].trim();
    let inner = &body[open + 1..body.len() - 1];
    let params: Vec<&str> = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(inner, ',')
            .into_iter()
            .map(str::trim)
            .collect()
    };
    if params.iter().any(|p| p.is_empty()) {
        return Err(parse_error(input, "empty type parameter"));
    }

    Ok(Signature {
        raw_base,
        base: raw_base.to_lowercase(),
        params: Some(params),
        nullability,
    })
}

/// Split a string on a delimiter, but only at the top level (not inside `<...>`)
fn split_top_level(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    log::warn!("Unbalanced closing '>' in type string: {:?}", s);
                    depth = 0;
                }
            }
            c if c == delimiter && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn expect_params(input: &str, sig: &Signature<'_>, expected: usize) -> TypeResult<()> {
    let found = sig.param_count();
    if found != expected {
        return Err(parse_error(
            input,
            format!(
                "'{}' takes {expected} parameter(s), found {found}",
                sig.base
            ),
        ));
    }
    Ok(())
}

fn int_param<T: std::str::FromStr>(input: &str, param: &str) -> TypeResult<T> {
    param
        .parse()
        .map_err(|_| parse_error(input, format!("expected an integer parameter, found '{param}'")))
}

/// Parse a concrete type string such as `varchar<255>?` or `map<string,i64>`
pub fn parse_type(input: &str) -> TypeResult<Type> {
    let sig = split_signature(input)?;
    let creator = TypeCreator::of(sig.nullability);
    let params = sig.params.clone().unwrap_or_default();

    if let Some(name) = sig.raw_base.strip_prefix("u!") {
        expect_params(input, &sig, 0)?;
        return creator.user_defined(name);
    }

    let simple = |ty: Type| -> TypeResult<Type> {
        expect_params(input, &sig, 0)?;
        Ok(ty)
    };

    match sig.base.as_str() {
        "boolean" | "bool" => simple(creator.boolean()),
        "i8" => simple(creator.i8()),
        "i16" => simple(creator.i16()),
        "i32" => simple(creator.i32()),
        "i64" => simple(creator.i64()),
        "fp32" => simple(creator.fp32()),
        "fp64" => simple(creator.fp64()),
        "string" => simple(creator.string()),
        "binary" => simple(creator.binary()),
        "date" => simple(creator.date()),
        "time" => simple(creator.time()),
        "interval_year" => simple(creator.interval_year()),
        "uuid" => simple(creator.uuid()),
        "timestamp" => {
            expect_params(input, &sig, 0)?;
            creator.timestamp(DEFAULT_TIMESTAMP_PRECISION)
        }
        "timestamp_tz" => {
            expect_params(input, &sig, 0)?;
            creator.timestamp_tz(DEFAULT_TIMESTAMP_PRECISION)
        }
        "fixedchar" => {
            expect_params(input, &sig, 1)?;
            creator.fixed_char(int_param(input, params[0])?)
        }
        "varchar" => {
            expect_params(input, &sig, 1)?;
            creator.var_char(int_param(input, params[0])?)
        }
        "fixedbinary" => {
            expect_params(input, &sig, 1)?;
            creator.fixed_binary(int_param(input, params[0])?)
        }
        "precision_timestamp" => {
            expect_params(input, &sig, 1)?;
            creator.timestamp(int_param(input, params[0])?)
        }
        "precision_timestamp_tz" => {
            expect_params(input, &sig, 1)?;
            creator.timestamp_tz(int_param(input, params[0])?)
        }
        "interval_day" => {
            expect_params(input, &sig, 1)?;
            creator.interval_day(int_param(input, params[0])?)
        }
        "interval_compound" => {
            expect_params(input, &sig, 1)?;
            creator.interval_compound(int_param(input, params[0])?)
        }
        "decimal" => {
            expect_params(input, &sig, 2)?;
            creator.decimal(int_param(input, params[0])?, int_param(input, params[1])?)
        }
        "struct" => {
            let fields = params
                .iter()
                .map(|p| parse_type(p))
                .collect::<TypeResult<Vec<_>>>()?;
            Ok(creator.structure(fields))
        }
        "list" => {
            expect_params(input, &sig, 1)?;
            Ok(creator.list(parse_type(params[0])?))
        }
        "map" => {
            expect_params(input, &sig, 2)?;
            Ok(creator.map(parse_type(params[0])?, parse_type(params[1])?))
        }
        other => Err(parse_error(input, format!("unknown type '{other}'"))),
    }
}

/// Parse a parameterized type string such as `varchar<L1>`, `decimal<P,10>?` or `any1`
///
/// Strings whose parameters are all integers resolve to
/// [`ParameterizedType::Concrete`]. Unknown bare identifiers become
/// [`ParameterizedType::StringLiteral`]; placeholders carry no nullability,
/// so `any1?` is the same placeholder as `any1`.
pub fn parse_parameterized_type(input: &str) -> TypeResult<ParameterizedType> {
    let sig = split_signature(input)?;
    let params = sig.params.clone().unwrap_or_default();
    let nullability = sig.nullability;
    let symbolic = params.iter().any(|p| p.parse::<u32>().is_err());

    let symbol = |index: usize| params[index].to_string();

    match sig.base.as_str() {
        "fixedchar" | "varchar" | "fixedbinary" if symbolic => {
            expect_params(input, &sig, 1)?;
            let length = symbol(0);
            Ok(match sig.base.as_str() {
                "fixedchar" => ParameterizedType::FixedChar {
                    length,
                    nullability,
                },
                "varchar" => ParameterizedType::VarChar {
                    length,
                    nullability,
                },
                _ => ParameterizedType::FixedBinary {
                    length,
                    nullability,
                },
            })
        }
        "decimal" if symbolic => {
            expect_params(input, &sig, 2)?;
            Ok(ParameterizedType::Decimal {
                precision: symbol(0),
                scale: symbol(1),
                nullability,
            })
        }
        "precision_timestamp" | "precision_timestamp_tz" | "interval_day"
        | "interval_compound"
            if symbolic =>
        {
            expect_params(input, &sig, 1)?;
            let precision = symbol(0);
            Ok(match sig.base.as_str() {
                "precision_timestamp" => ParameterizedType::Timestamp {
                    precision,
                    nullability,
                },
                "precision_timestamp_tz" => ParameterizedType::TimestampTz {
                    precision,
                    nullability,
                },
                "interval_day" => ParameterizedType::IntervalDay {
                    precision,
                    nullability,
                },
                _ => ParameterizedType::IntervalCompound {
                    precision,
                    nullability,
                },
            })
        }
        "struct" | "list" | "map" => {
            let children = params
                .iter()
                .map(|p| parse_parameterized_type(p))
                .collect::<TypeResult<Vec<_>>>()?;
            if children.iter().all(ParameterizedType::is_concrete) {
                return parse_type(input).map(ParameterizedType::Concrete);
            }
            let mut children = children.into_iter();
            match sig.base.as_str() {
                "struct" => Ok(ParameterizedType::Struct {
                    fields: children.collect(),
                    nullability,
                }),
                "list" => {
                    expect_params(input, &sig, 1)?;
                    let element = children
                        .next()
                        .ok_or_else(|| parse_error(input, "missing list element"))?;
                    Ok(ParameterizedType::List {
                        element: Box::new(element),
                        nullability,
                    })
                }
                _ => {
                    expect_params(input, &sig, 2)?;
                    match (children.next(), children.next()) {
                        (Some(key), Some(value)) => Ok(ParameterizedType::Map {
                            key: Box::new(key),
                            value: Box::new(value),
                            nullability,
                        }),
                        _ => Err(parse_error(input, "map takes a key and a value type")),
                    }
                }
            }
        }
        _ => match parse_type(input) {
            Ok(ty) => Ok(ParameterizedType::Concrete(ty)),
            Err(err) => {
                if sig.params.is_none() && is_identifier(sig.raw_base) {
                    Ok(ParameterizedType::StringLiteral {
                        value: sig.raw_base.to_string(),
                    })
                } else {
                    Err(err)
                }
            }
        },
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
