//! # graphcheck
//!
//! Declarative validation for nested value graphs. Rules live in directive
//! strings attached to record fields; values may additionally carry a
//! self-check. A check linearizes the graph into a pre-order node sequence
//! and evaluates every node's rules, aggregating findings under a
//! configurable mode and severity filter.
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphcheck::prelude::*;
//!
//! struct Config {
//!     enabled: bool,
//!     listen: String,
//!     log_level: String,
//! }
//!
//! impl Reflect for Config {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Record(self)
//!     }
//!
//!     fn as_checkable(&self) -> Option<&dyn Checkable> {
//!         Some(self)
//!     }
//! }
//!
//! impl Record for Config {
//!     fn type_name(&self) -> &'static str {
//!         "Config"
//!     }
//!
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("Enabled", &self.enabled),
//!             Field::with_directive("Listen", "required", &self.listen),
//!             Field::with_directive("LogLevel", "required,expect:info;debug;error", &self.log_level),
//!         ]
//!     }
//! }
//!
//! impl Checkable for Config {
//!     fn check(&self) -> Verdict {
//!         if !self.enabled {
//!             return Verdict::Skip;
//!         }
//!         Verdict::Pass
//!     }
//! }
//!
//! fn main() {
//!     let config = Config { enabled: true, listen: String::new(), log_level: "warn".into() };
//!     for finding in graphcheck::check_all(&config) {
//!         eprintln!("{finding}");
//!     }
//!     // value required: Listen
//!     // unexpected value: LogLevel warn
//! }
//! ```
//!
//! ## Directive rules
//!
//! - `required` - the field must be present and non-default
//! - `deprecated` - advisory; warns when the field is in use
//! - `expect:<a>;<b>` - the rendered value must be one of the alternatives
//! - `call:<name>` - delegate to a method on the enclosing record
//! - `re:<pattern>` - the rendered value must match the pattern
//!
//! ## Findings
//!
//! Findings render as `"<cause>: <field> <value>"` (the value part only when
//! one is attached). Errors returned by self-checks and `call:` targets
//! render verbatim. `deprecated` findings are WARNING class and are also
//! routed to an injectable [`DeprecationObserver`]; everything else is ERROR
//! class.

mod checker;
mod directive;
mod error;
mod reflect;
mod rules;
mod value;
mod walk;


pub use checker::{check, check_all, Checker, DeprecationObserver, Mode, TracingObserver};
pub use directive::{Directive, Rule};
pub use error::{filter_by_severity, Cause, CheckError, Severity, SeverityFilter};
pub use value::{
    Checkable, Field, FieldCheckFn, MethodLookup, Record, Reflect, Scalar, Shape, Value, Verdict,
};
pub use walk::{walk, FieldMeta, Node};

/// Prelude module for glob imports.
pub mod prelude {
    pub use crate::checker::{check, check_all, Checker, DeprecationObserver, Mode};
    pub use crate::directive::{Directive, Rule};
    pub use crate::error::{filter_by_severity, Cause, CheckError, Severity, SeverityFilter};
    pub use crate::value::{
        Checkable, Field, MethodLookup, Record, Reflect, Scalar, Shape, Value, Verdict,
    };
    pub use crate::walk::{walk, Node};
}
