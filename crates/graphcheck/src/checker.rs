//! Check orchestration: traversal driving, rule evaluation, aggregation.

use crate::directive::Directive;
use crate::error::{Cause, CheckError, SeverityFilter};
use crate::rules;
use crate::value::{Reflect, Verdict};
use crate::walk::{walk, Node};
use serde::Serialize;

/// Aggregation mode: stop at the first retained finding, or collect all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Return as soon as the first retained finding is seen.
    First,
    /// Visit every node and return the full ordered list.
    All,
}

/// Observer for `deprecated` advisories.
///
/// Notified whenever a deprecated field carries a non-default value,
/// independent of the checker's severity filter.
pub trait DeprecationObserver: Send + Sync {
    /// A deprecated field was found in use.
    fn deprecated(&self, field: &str);
}

/// Default observer: routes advisories through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DeprecationObserver for TracingObserver {
    fn deprecated(&self, field: &str) {
        tracing::warn!(
            field,
            "deprecated parameter discouraged from use; a better alternative exists"
        );
    }
}

/// Configurable validation driver over a value graph.
///
/// ## Example
///
/// ```rust,ignore
/// use graphcheck::{Checker, Mode, SeverityFilter};
///
/// let checker = Checker::new(Mode::All, SeverityFilter::ALL);
/// for finding in checker.check(&config) {
///     eprintln!("{finding}");
/// }
/// ```
pub struct Checker {
    mode: Mode,
    filter: SeverityFilter,
    observer: Box<dyn DeprecationObserver>,
}

enum Flow {
    Continue,
    Stop,
    SkipAll,
}

impl Checker {
    /// Create a checker with the given aggregation mode and severity filter.
    pub fn new(mode: Mode, filter: SeverityFilter) -> Self {
        Self {
            mode,
            filter,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the `deprecated` advisory observer.
    pub fn with_observer(mut self, observer: impl DeprecationObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Validate the graph rooted at `value`.
    ///
    /// Returns the retained findings in traversal order; an empty list is
    /// success. A self-check returning [`Verdict::Skip`] aborts the run and
    /// reports success regardless of findings accumulated so far.
    pub fn check(&self, value: &dyn Reflect) -> Vec<CheckError> {
        let nodes = match walk(value) {
            Ok(nodes) => nodes,
            Err(err) => return vec![err],
        };

        let mut found = Vec::new();
        for node in &nodes {
            match self.visit(node, &mut found) {
                Flow::Continue => {}
                Flow::Stop => break,
                Flow::SkipAll => return Vec::new(),
            }
        }
        found
    }

    fn visit(&self, node: &Node<'_>, found: &mut Vec<CheckError>) -> Flow {
        // Self-check runs before directive rules.
        if let Some(checkable) = node.value().get().and_then(Reflect::as_checkable) {
            match checkable.check() {
                Verdict::Pass => {}
                Verdict::Skip => return Flow::SkipAll,
                Verdict::Fail(err) => {
                    if self.retain(err, found) {
                        return Flow::Stop;
                    }
                }
            }
        }

        let Some(field) = node.field().copied() else {
            return Flow::Continue;
        };
        let Some(raw) = field.directive else {
            return Flow::Continue;
        };

        // Parsed per visit, never cached.
        match Directive::parse(field.name, raw) {
            Err(err) => {
                if self.retain(err, found) {
                    return Flow::Stop;
                }
            }
            Ok(directive) => {
                for rule in directive.rules() {
                    if let Err(err) = rules::evaluate(rule, node, &field) {
                        if self.retain(err, found) {
                            return Flow::Stop;
                        }
                    }
                }
            }
        }
        Flow::Continue
    }

    /// Route advisories, apply the severity filter, and report whether the
    /// run should stop.
    fn retain(&self, err: CheckError, found: &mut Vec<CheckError>) -> bool {
        if err.cause() == &Cause::Deprecated {
            self.observer.deprecated(err.field());
        }
        if !self.filter.contains(err.severity()) {
            return false;
        }
        found.push(err);
        self.mode == Mode::First
    }
}

/// Validate `value`, returning the first ERROR-class finding, if any.
pub fn check(value: &dyn Reflect) -> Result<(), CheckError> {
    let mut found = Checker::new(Mode::First, SeverityFilter::ERRORS).check(value);
    match found.pop() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Validate `value`, returning every ERROR-class finding in traversal order.
pub fn check_all(value: &dyn Reflect) -> Vec<CheckError> {
    Checker::new(Mode::All, SeverityFilter::ERRORS).check(value)
}
