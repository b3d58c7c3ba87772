//! Value-graph abstraction: shapes, records, and capabilities.
//!
//! A value participates in validation by exposing its [`Shape`] through the
//! [`Reflect`] trait. The shape set is closed: scalars, optional/pointer
//! indirections, records, sequences, and maps. Concrete record types
//! implement [`Record`] to publish their fields (with directives) and their
//! `call:` rule targets; [`Checkable`] adds the self-check capability.

use crate::error::CheckError;
use std::fmt::{self, Write as _};

/// Owned snapshot of a terminal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A boolean. Never considered default by `required`.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A single character.
    Char(char),
}

impl Scalar {
    /// Whether the value equals its type's default.
    ///
    /// Booleans are never default: `false` must not trip `required`.
    pub fn is_default(&self) -> bool {
        match self {
            Scalar::Bool(_) => false,
            Scalar::Int(v) => *v == 0,
            Scalar::Uint(v) => *v == 0,
            Scalar::Float(v) => *v == 0.0,
            Scalar::Str(s) => s.is_empty(),
            Scalar::Char(c) => *c == '\0',
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Uint(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Char(c) => write!(f, "{c}"),
        }
    }
}

/// The resolved kind of a value, as exposed by [`Reflect::shape`].
pub enum Shape<'v> {
    /// A terminal value.
    Scalar(Scalar),
    /// An optional or pointer indirection; `None` is an absent value.
    Optional(Option<&'v dyn Reflect>),
    /// A record with named, directive-carrying fields.
    Record(&'v dyn Record),
    /// An ordered sequence of elements.
    Sequence(Vec<&'v dyn Reflect>),
    /// Keyed entries in one fixed, per-run order.
    Map(Vec<(String, &'v dyn Reflect)>),
}

/// A value that can expose its shape to the traversal.
///
/// Std scalars, containers, and pointers are covered by the crate; implement
/// this (and usually [`Record`]) for your own types.
pub trait Reflect {
    /// Resolve this value's shape. Must be cheap; must not mutate.
    fn shape(&self) -> Shape<'_>;

    /// The self-check capability, when this value carries one.
    fn as_checkable(&self) -> Option<&dyn Checkable> {
        None
    }
}

/// One field of a record, in declaration order.
pub struct Field<'v> {
    /// Field name as it appears in errors.
    pub name: &'static str,
    /// Raw directive string, e.g. `"required,expect:info;debug"`.
    pub directive: Option<&'static str>,
    /// The field's value.
    pub value: &'v dyn Reflect,
}

impl<'v> Field<'v> {
    /// A field without a directive.
    pub fn new(name: &'static str, value: &'v dyn Reflect) -> Self {
        Self {
            name,
            directive: None,
            value,
        }
    }

    /// A field carrying a directive string.
    pub fn with_directive(
        name: &'static str,
        directive: &'static str,
        value: &'v dyn Reflect,
    ) -> Self {
        Self {
            name,
            directive: Some(directive),
            value,
        }
    }
}

/// Target of a `call:` rule: invoked with the field name and the field's
/// dereferenced value, returning the field's error if any.
pub type FieldCheckFn<'r> = Box<dyn Fn(&str, Value<'_>) -> Result<(), CheckError> + 'r>;

/// Outcome of resolving a `call:` target by name on a record.
pub enum MethodLookup<'r> {
    /// No target registered under the name.
    Missing,
    /// A target exists under the name but does not meet the
    /// (field name, field value) -> optional error contract.
    WrongSignature,
    /// A conforming target.
    Found(FieldCheckFn<'r>),
}

/// A record value: named fields plus `call:` rule targets.
pub trait Record: Reflect {
    /// The record's type name, used for diagnostics on unnamed nodes.
    fn type_name(&self) -> &'static str;

    /// The record's fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Resolve a `call:` rule target by name.
    fn method(&self, name: &str) -> MethodLookup<'_> {
        let _ = name;
        MethodLookup::Missing
    }
}

/// Outcome of a value's self-check.
pub enum Verdict {
    /// The value is valid.
    Pass,
    /// Abort the entire run, discard accumulated findings, report success.
    Skip,
    /// The value is invalid; the error propagates verbatim.
    Fail(CheckError),
}

/// Self-validation capability, invoked before a node's directive rules.
pub trait Checkable {
    /// Check this value.
    fn check(&self) -> Verdict;
}

/// The dereferenced value at a traversal position.
///
/// Absent when an optional/pointer chain ended in `None`. The inner value,
/// when present, is already stripped of indirections.
#[derive(Clone, Copy)]
pub struct Value<'v>(Option<&'v dyn Reflect>);

impl<'v> Value<'v> {
    pub(crate) fn absent() -> Self {
        Self(None)
    }

    pub(crate) fn present(value: &'v dyn Reflect) -> Self {
        Self(Some(value))
    }

    /// Whether the value is absent.
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// The underlying value, when present.
    pub fn get(&self) -> Option<&'v dyn Reflect> {
        self.0
    }

    /// The value's shape, when present.
    pub fn shape(&self) -> Option<Shape<'v>> {
        self.0.map(Reflect::shape)
    }

    /// Whether the value is absent or equals its type's default.
    ///
    /// Recursive: a record is default iff every field is default; a sequence
    /// or map is default iff empty; booleans are never default.
    pub fn is_default(&self) -> bool {
        match self.0 {
            None => true,
            Some(value) => shape_is_default(&value.shape()),
        }
    }

    /// Render the value for error messages and allow-list membership.
    ///
    /// Absent values render as the literal `<nil>`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self.0 {
            None => out.push_str("<nil>"),
            Some(value) => render_shape(&value.shape(), &mut out),
        }
        out
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.render()).finish()
    }
}

fn shape_is_default(shape: &Shape<'_>) -> bool {
    match shape {
        Shape::Scalar(s) => s.is_default(),
        Shape::Optional(None) => true,
        Shape::Optional(Some(inner)) => shape_is_default(&inner.shape()),
        Shape::Record(record) => record
            .fields()
            .iter()
            .all(|f| shape_is_default(&f.value.shape())),
        Shape::Sequence(items) => items.is_empty(),
        Shape::Map(entries) => entries.is_empty(),
    }
}

fn render_shape(shape: &Shape<'_>, out: &mut String) {
    match shape {
        Shape::Scalar(s) => {
            let _ = write!(out, "{s}");
        }
        Shape::Optional(None) => out.push_str("<nil>"),
        Shape::Optional(Some(inner)) => render_shape(&inner.shape(), out),
        Shape::Record(record) => {
            out.push('{');
            for (i, field) in record.fields().iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                render_shape(&field.value.shape(), out);
            }
            out.push('}');
        }
        Shape::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                render_shape(&item.shape(), out);
            }
            out.push(']');
        }
        Shape::Map(entries) => {
            out.push_str("map[");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                render_shape(&value.shape(), out);
            }
            out.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_defaults() {
        assert!(Scalar::Int(0).is_default());
        assert!(!Scalar::Int(5).is_default());
        assert!(Scalar::Str(String::new()).is_default());
        assert!(!Scalar::Str("x".to_string()).is_default());
        assert!(Scalar::Float(0.0).is_default());
        // false is not a default: `required` must accept it
        assert!(!Scalar::Bool(false).is_default());
        assert!(!Scalar::Bool(true).is_default());
    }

    #[test]
    fn absent_value_is_default_and_renders_nil() {
        let value = Value::absent();
        assert!(value.is_absent());
        assert!(value.is_default());
        assert_eq!(value.render(), "<nil>");
    }

    #[test]
    fn present_scalar_renders_plain() {
        let n = 42_i64;
        let value = Value::present(&n);
        assert!(!value.is_absent());
        assert!(!value.is_default());
        assert_eq!(value.render(), "42");
    }

    #[test]
    fn sequence_defaults_on_empty_only() {
        let empty: Vec<i64> = Vec::new();
        assert!(Value::present(&empty).is_default());

        // a sequence of zeros is non-default: emptiness is what counts
        let zeros = vec![0_i64, 0];
        assert!(!Value::present(&zeros).is_default());
        assert_eq!(Value::present(&zeros).render(), "[0 0]");
    }
}
