//! Walks a resolved control-definition tree against a target object,
//! producing a [`FormatValue`] tree; falls back to a generic property-walk
//! when no control applies.

use crate::cancel::CancellationToken;
use crate::error::{ErrorManager, FormatError};
use crate::external::{ExpressionEvaluator, ObjectSource};
use crate::indent::FrameInfo;
use crate::token::FormatValue;

/// Matches [`crate::writer::MAX_DEPTH`]; both components cut off a runaway
/// tree at the same recursion depth.
pub const MAX_DEPTH: usize = crate::writer::MAX_DEPTH;

/// How many elements of an enumerable the property-walker fallback will
/// render before truncating with an ellipsis leaf.
pub const ENUMERATION_LIMIT: usize = 100;

/// A resolved control describing how to render a compound property, prior
/// to evaluation against any particular object.
#[derive(Debug, Clone)]
pub enum ControlToken {
    Text(String),
    NewLine(u32),
    Frame(FrameInfo, Vec<ControlToken>),
    CompoundProperty {
        expr: Option<String>,
        format_directive: Option<String>,
        inner_control: Option<Vec<ControlToken>>,
        enumerate_collection: bool,
        condition_expr: Option<String>,
    },
}

/// Walks `tokens` against `object`, recording per-cell errors through
/// `errors`, honoring `cancel` at enumeration boundaries, and cutting off
/// recursion beyond [`MAX_DEPTH`].
pub struct ComplexTraversal<'a> {
    evaluator: &'a dyn ExpressionEvaluator,
    errors: &'a mut ErrorManager,
    cancel: &'a CancellationToken,
}

impl<'a> ComplexTraversal<'a> {
    pub fn new(
        evaluator: &'a dyn ExpressionEvaluator,
        errors: &'a mut ErrorManager,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            evaluator,
            errors,
            cancel,
        }
    }

    pub fn walk(&mut self, tokens: &[ControlToken], object: &dyn ObjectSource) -> Vec<FormatValue> {
        self.walk_at_depth(tokens, object, 0)
    }

    fn walk_at_depth(
        &mut self,
        tokens: &[ControlToken],
        object: &dyn ObjectSource,
        depth: usize,
    ) -> Vec<FormatValue> {
        if depth >= MAX_DEPTH {
            tracing::warn!(depth, "control traversal depth exceeded, truncating");
            return Vec::new();
        }

        let mut out = Vec::new();
        for token in tokens {
            match token {
                ControlToken::Text(s) => out.push(FormatValue::text(s.clone())),
                ControlToken::NewLine(n) => {
                    for _ in 0..*n {
                        out.push(FormatValue::NewLine);
                    }
                }
                ControlToken::Frame(frame, inner) => {
                    let children = self.walk_at_depth(inner, object, depth + 1);
                    out.push(FormatValue::framed(*frame, children));
                }
                ControlToken::CompoundProperty {
                    expr,
                    format_directive,
                    inner_control,
                    enumerate_collection,
                    condition_expr,
                } => {
                    if let Some(cond) = condition_expr {
                        if !self.evaluates_truthy(cond, object) {
                            continue;
                        }
                    }
                    self.emit_compound_property(
                        expr.as_deref(),
                        format_directive.as_deref(),
                        inner_control.as_deref(),
                        *enumerate_collection,
                        object,
                        depth,
                        &mut out,
                    );
                }
            }
        }
        out
    }

    fn evaluates_truthy(&self, expr: &str, object: &dyn ObjectSource) -> bool {
        match self.evaluator.evaluate(expr, object).into_iter().next() {
            Some(r) if r.error.is_none() => r
                .value
                .map(|v| !v.is_empty() && v != "0" && v != "false")
                .unwrap_or(false),
            _ => false,
        }
    }

    fn resolve_values(&mut self, expr: Option<&str>, object: &dyn ObjectSource) -> Vec<String> {
        match expr {
            None => object.properties().into_iter().map(|(_, v)| v).collect(),
            Some(e) => {
                let results = self.evaluator.evaluate(e, object);
                let mut values = Vec::new();
                for r in results {
                    if let Some(msg) = r.error {
                        let replacement = self
                            .errors
                            .record(FormatError::ExpressionEvaluation(msg.clone()), &msg);
                        if let Some(text) = replacement {
                            values.push(text);
                        }
                    } else if let Some(v) = r.value {
                        values.push(v);
                    }
                }
                values
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_compound_property(
        &mut self,
        expr: Option<&str>,
        directive: Option<&str>,
        inner_control: Option<&[ControlToken]>,
        enumerate_collection: bool,
        object: &dyn ObjectSource,
        depth: usize,
        out: &mut Vec<FormatValue>,
    ) {
        let values = self.resolve_values(expr, object);

        let leaf = inner_control.is_none();

        if leaf {
            if enumerate_collection {
                for v in values {
                    if v.is_empty() {
                        continue;
                    }
                    out.push(self.format_leaf(&v, directive));
                }
            } else if let Some(v) = values.into_iter().next() {
                out.push(self.format_leaf(&v, directive));
            }
            return;
        }

        let nested = inner_control.unwrap();
        if enumerate_collection {
            for v in values {
                if v.is_empty() {
                    continue;
                }
                let children = self.walk_at_depth(nested, &ScalarObject(v), depth + 1);
                out.extend(children);
            }
        } else if let Some(v) = values.into_iter().next() {
            let children = self.walk_at_depth(nested, &ScalarObject(v), depth + 1);
            out.extend(children);
        }
    }

    fn format_leaf(&mut self, value: &str, _directive: Option<&str>) -> FormatValue {
        FormatValue::property(value)
    }

    /// Renders an object with no matching view via the generic
    /// property-walker: scalars as leaves, enumerables as `[ … ]` blocks,
    /// other objects as `class <name> { name = value; … }` blocks.
    pub fn walk_fallback(&mut self, object: &dyn ObjectSource) -> Vec<FormatValue> {
        self.fallback_at_depth(object, 0)
    }

    fn fallback_at_depth(&mut self, object: &dyn ObjectSource, depth: usize) -> Vec<FormatValue> {
        if self.cancel.is_cancelled() {
            self.errors.record(FormatError::PipelineCancelled, "pipeline stopped");
            return Vec::new();
        }
        if depth >= MAX_DEPTH {
            return vec![FormatValue::property(smart_to_string(object))];
        }

        if object.is_scalar() {
            return vec![FormatValue::property(smart_to_string(object))];
        }

        if let Some(items) = object.enumerate() {
            let mut children = Vec::new();
            children.push(FormatValue::text("["));
            for (i, item) in items.iter().enumerate() {
                if self.cancel.is_cancelled() {
                    self.errors.record(FormatError::PipelineCancelled, "pipeline stopped");
                    break;
                }
                if i >= ENUMERATION_LIMIT {
                    children.push(FormatValue::text("…"));
                    break;
                }
                if i > 0 {
                    children.push(FormatValue::text(", "));
                }
                children.push(FormatValue::text(item.clone()));
            }
            children.push(FormatValue::text("]"));
            return vec![FormatValue::group(children)];
        }

        let name = object
            .type_names()
            .into_iter()
            .next()
            .unwrap_or_else(|| "Object".to_string());
        let props = object.properties();
        let mut children = Vec::new();
        children.push(FormatValue::text(format!("class {name} {{")));
        children.push(FormatValue::framed(
            FrameInfo::new(0, 2, 0),
            props
                .into_iter()
                .map(|(k, v)| FormatValue::text(format!("{k} = {v}; ")))
                .collect(),
        ));
        children.push(FormatValue::text("}"));
        vec![FormatValue::group(children)]
    }
}

fn smart_to_string(object: &dyn ObjectSource) -> String {
    object
        .properties()
        .into_iter()
        .next()
        .map(|(_, v)| v)
        .unwrap_or_default()
}

/// A scalar value wrapped as an [`ObjectSource`] so resolved compound
/// property values can recurse through [`ComplexTraversal::walk_at_depth`]
/// using the same machinery as top-level objects.
struct ScalarObject(String);

impl ObjectSource for ScalarObject {
    fn type_names(&self) -> Vec<String> {
        vec!["String".to_string()]
    }
    fn property(&self, name: &str) -> Option<String> {
        if name == "Value" {
            Some(self.0.clone())
        } else {
            None
        }
    }
    fn enumerate(&self) -> Option<Vec<String>> {
        None
    }
    fn properties(&self) -> Vec<(String, String)> {
        vec![("Value".to_string(), self.0.clone())]
    }
    fn is_scalar(&self) -> bool {
        true
    }
}
