//! Detects changes in a grouping key's rendered value across a stream of
//! objects, the signal that drives a group-header line between runs of a
//! list or table view.

use crate::external::{ExpressionEvaluator, ObjectSource};

/// Tracks the last-seen rendering of a grouping expression and reports
/// whether the current object starts a new group.
///
/// Comparison is locale-aware where the evaluator provides locale-sensitive
/// string rendering; this tracker itself only ever compares the two
/// already-rendered strings, falling back to an ASCII case-insensitive
/// compare when an exact match fails, mirroring how the host pipeline treats
/// culturally-equivalent casings as the same group.
pub struct GroupingTracker {
    expression: String,
    last: Option<String>,
}

impl GroupingTracker {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            last: None,
        }
    }

    /// Evaluates the grouping expression against `object`; returns `true` if
    /// this is the first object seen or if the rendered value differs from
    /// the previous one. If evaluation fails (no results, or the first
    /// result carries an error), the tracker is left unchanged and `false`
    /// is returned — a silent no-op, never a panic or a spurious group
    /// break (P7: idempotent on repeated failure).
    pub fn update(&mut self, evaluator: &dyn ExpressionEvaluator, object: &dyn ObjectSource) -> bool {
        let results = evaluator.evaluate(&self.expression, object);
        let Some(first) = results.into_iter().next() else {
            return false;
        };
        if first.error.is_some() {
            return false;
        }
        let Some(value) = first.value else {
            return false;
        };

        let changed = match &self.last {
            None => true,
            Some(prev) => !values_equal(prev, &value),
        };
        self.last = Some(value);
        changed
    }

    pub fn current(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn values_equal(a: &str, b: &str) -> bool {
    a == b || a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::EvalResult;

    struct StubObject;
    impl ObjectSource for StubObject {
        fn type_names(&self) -> Vec<String> {
            vec!["Stub".to_string()]
        }
        fn property(&self, _name: &str) -> Option<String> {
            None
        }
        fn enumerate(&self) -> Option<Vec<String>> {
            None
        }
    }

    struct FixedEvaluator(Vec<EvalResult>);
    impl ExpressionEvaluator for FixedEvaluator {
        fn evaluate(&self, _expr: &str, _object: &dyn ObjectSource) -> Vec<EvalResult> {
            self.0.clone()
        }
    }

    fn ok(value: &str) -> EvalResult {
        EvalResult {
            value: Some(value.to_string()),
            resolved_name: None,
            error: None,
        }
    }

    fn err(message: &str) -> EvalResult {
        EvalResult {
            value: None,
            resolved_name: None,
            error: Some(message.to_string()),
        }
    }

    #[test]
    fn first_object_always_starts_a_group() {
        let mut tracker = GroupingTracker::new("Category");
        let eval = FixedEvaluator(vec![ok("fruit")]);
        assert!(tracker.update(&eval, &StubObject));
    }

    #[test]
    fn same_value_does_not_start_a_new_group() {
        let mut tracker = GroupingTracker::new("Category");
        let eval = FixedEvaluator(vec![ok("fruit")]);
        assert!(tracker.update(&eval, &StubObject));
        assert!(!tracker.update(&eval, &StubObject));
    }

    #[test]
    fn changed_value_starts_a_new_group() {
        let mut tracker = GroupingTracker::new("Category");
        tracker.update(&FixedEvaluator(vec![ok("fruit")]), &StubObject);
        assert!(tracker.update(&FixedEvaluator(vec![ok("vegetable")]), &StubObject));
    }

    #[test]
    fn case_insensitive_fallback_treats_values_as_same_group() {
        let mut tracker = GroupingTracker::new("Category");
        tracker.update(&FixedEvaluator(vec![ok("Fruit")]), &StubObject);
        assert!(!tracker.update(&FixedEvaluator(vec![ok("FRUIT")]), &StubObject));
    }

    #[test]
    fn evaluation_failure_is_silent_and_idempotent_p7() {
        let mut tracker = GroupingTracker::new("Category");
        tracker.update(&FixedEvaluator(vec![ok("fruit")]), &StubObject);
        let failing = FixedEvaluator(vec![err("boom")]);
        assert!(!tracker.update(&failing, &StubObject));
        assert!(!tracker.update(&failing, &StubObject));
        assert_eq!(tracker.current(), Some("fruit"));
    }

    #[test]
    fn no_results_is_silent() {
        let mut tracker = GroupingTracker::new("Category");
        let empty = FixedEvaluator(vec![]);
        assert!(!tracker.update(&empty, &StubObject));
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn reset_clears_tracked_state() {
        let mut tracker = GroupingTracker::new("Category");
        tracker.update(&FixedEvaluator(vec![ok("fruit")]), &StubObject);
        tracker.reset();
        assert_eq!(tracker.current(), None);
        assert!(tracker.update(&FixedEvaluator(vec![ok("fruit")]), &StubObject));
    }
}
