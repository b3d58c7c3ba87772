//! Rule evaluators applied to each visited node.
//!
//! Each evaluator consumes the node's dereferenced value and its field
//! metadata and returns `Ok(())` or one classified error. Evaluators are
//! pure; the `deprecated` advisory side channel is handled by the checker.

use crate::directive::Rule;
use crate::error::{Cause, CheckError};
use crate::value::MethodLookup;
use crate::walk::{FieldMeta, Node};
use regex::Regex;

pub(crate) fn evaluate(rule: &Rule, node: &Node<'_>, field: &FieldMeta) -> Result<(), CheckError> {
    match rule {
        Rule::Required => required(node, field),
        Rule::Deprecated => deprecated(node, field),
        Rule::Expect { alternatives } => expect(node, field, alternatives),
        Rule::Call { method } => call(node, field, method),
        Rule::Matches { pattern } => matches(node, field, pattern),
    }
}

fn required(node: &Node<'_>, field: &FieldMeta) -> Result<(), CheckError> {
    if node.value().is_default() {
        return Err(CheckError::new(Cause::ValueRequired, field.name));
    }
    Ok(())
}

fn deprecated(node: &Node<'_>, field: &FieldMeta) -> Result<(), CheckError> {
    if node.value().is_default() {
        return Ok(());
    }
    Err(CheckError::new(Cause::Deprecated, field.name))
}

fn expect(node: &Node<'_>, field: &FieldMeta, alternatives: &[String]) -> Result<(), CheckError> {
    let value = node.value();
    // An absent value renders <nil> and never matches, even against a
    // literal <nil> alternative.
    if value.is_absent() {
        return Err(CheckError::new(Cause::ValueUnexpected, field.name).with_value(value.render()));
    }
    let rendered = value.render();
    if !alternatives.iter().any(|alt| *alt == rendered) {
        return Err(CheckError::new(Cause::ValueUnexpected, field.name).with_value(rendered));
    }
    Ok(())
}

fn call(node: &Node<'_>, field: &FieldMeta, method: &str) -> Result<(), CheckError> {
    let Some(parent) = node.parent() else {
        return Err(
            CheckError::new(Cause::MethodNotFound, field.name).with_value(format!("call:{method}"))
        );
    };
    match parent.method(method) {
        MethodLookup::Missing => Err(
            CheckError::new(Cause::MethodNotFound, field.name).with_value(format!("call:{method}"))
        ),
        MethodLookup::WrongSignature => Err(CheckError::new(
            Cause::WrongSignatureMethod,
            field.name,
        )
        .with_value(format!("call:{method}"))),
        MethodLookup::Found(check) => check(field.name, node.value()),
    }
}

fn matches(node: &Node<'_>, field: &FieldMeta, pattern: &str) -> Result<(), CheckError> {
    let re = Regex::new(pattern).map_err(|e| {
        // A broken pattern is a misconfigured directive; surface the
        // compile error alongside the field.
        CheckError::new(Cause::BadSyntax, field.name).with_value(e.to_string())
    })?;
    let rendered = node.value().render();
    if !re.is_match(&rendered) {
        return Err(CheckError::new(Cause::NoMatch, field.name).with_value(pattern));
    }
    Ok(())
}
