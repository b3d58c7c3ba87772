//! Parsing of per-field directive strings into rule tokens.
//!
//! Grammar:
//!
//! ```text
//! directive := rule (',' rule)*
//! rule      := 'required' | 'deprecated'
//!            | 'expect:' alt (';' alt)*
//!            | 'call:' identifier
//!            | 're:' pattern
//! ```
//!
//! Directives are parsed once per node visit and never cached across calls.

use crate::error::{Cause, CheckError};
use serde::Serialize;

/// A single parsed rule token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// The field must be present and non-default.
    Required,
    /// Advisory: the field should no longer be used.
    Deprecated,
    /// The rendered value must be one of the alternatives.
    Expect {
        /// Allowed rendered values. A trailing `;` contributes an empty
        /// alternative, which accepts the empty string.
        alternatives: Vec<String>,
    },
    /// Delegate to a named method on the parent record.
    Call {
        /// Method name resolved through the record's lookup.
        method: String,
    },
    /// The rendered value must match a regular expression.
    Matches {
        /// The raw pattern, compiled at evaluation time.
        pattern: String,
    },
}

/// The ordered rule list attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    rules: Vec<Rule>,
}

impl Directive {
    /// Parse a raw directive string, e.g. `"required,expect:info;debug"`.
    ///
    /// Tokens are split on top-level `,` and are not trimmed. The first
    /// malformed token fails the parse: an empty `expect:`/`call:`/`re:`
    /// payload is `bad syntax`, an unrecognized token is `unknown check`;
    /// both name the field and carry the offending token.
    pub fn parse(field: &str, raw: &str) -> Result<Self, CheckError> {
        let rules = raw
            .split(',')
            .map(|token| parse_rule(field, token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The parsed rules in directive order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

fn parse_rule(field: &str, token: &str) -> Result<Rule, CheckError> {
    match token {
        "required" => Ok(Rule::Required),
        "deprecated" => Ok(Rule::Deprecated),
        _ => {
            if let Some(payload) = token.strip_prefix("expect:") {
                if payload.is_empty() {
                    return Err(bad_syntax(field, token));
                }
                Ok(Rule::Expect {
                    alternatives: payload.split(';').map(str::to_owned).collect(),
                })
            } else if let Some(name) = token.strip_prefix("call:") {
                if name.is_empty() {
                    return Err(bad_syntax(field, token));
                }
                Ok(Rule::Call {
                    method: name.to_owned(),
                })
            } else if let Some(pattern) = token.strip_prefix("re:") {
                if pattern.is_empty() {
                    return Err(bad_syntax(field, token));
                }
                Ok(Rule::Matches {
                    pattern: pattern.to_owned(),
                })
            } else {
                Err(CheckError::new(Cause::UnknownCheck, field).with_value(token))
            }
        }
    }
}

fn bad_syntax(field: &str, token: &str) -> CheckError {
    CheckError::new(Cause::BadSyntax, field).with_value(token)
}
