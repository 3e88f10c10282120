//! Trait contracts for the collaborators named in §6 that are explicitly out
//! of scope for this crate: the object-property evaluation engine, the
//! view/control database, localization string tables, and the line sink.
//! This crate never implements them beyond minimal in-memory stand-ins used
//! by its own tests; production implementations belong to the upstream
//! pipeline.

/// Delivers values with type identity, property lookup, and an enumeration
/// view — the upstream object pipeline's contract.
pub trait ObjectSource {
    /// Most-specific-first list of type names for this object.
    fn type_names(&self) -> Vec<String>;

    /// Looks up a named property, returning its string representation if
    /// present. Returns `None` if the property does not exist on this
    /// object (distinct from a present-but-null value, which callers
    /// represent as `Some(String::new())` or a dedicated null marker at
    /// their discretion).
    fn property(&self, name: &str) -> Option<String>;

    /// If this object is enumerable, yields its elements' string
    /// representations; `None` for non-enumerable objects.
    fn enumerate(&self) -> Option<Vec<String>>;

    /// All name/value pairs, used by the property-walker fallback when no
    /// view matches this object's type. Default empty, since most objects
    /// are only ever walked through an explicit control tree.
    fn properties(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Whether this object should be treated as a scalar leaf by the
    /// property-walker fallback rather than expanded via `properties` or
    /// `enumerate`.
    fn is_scalar(&self) -> bool {
        self.enumerate().is_none() && self.properties().is_empty()
    }
}

/// The result of evaluating one expression against one object.
#[derive(Debug, Clone)]
pub struct EvalResult {
    pub value: Option<String>,
    pub resolved_name: Option<String>,
    pub error: Option<String>,
}

/// Given an expression token and an object, yields a list of results; the
/// first is used.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expr: &str, object: &dyn ObjectSource) -> Vec<EvalResult>;
}

/// A resolvable view or control definition, as would be loaded from the
/// external XML-like format database. Left opaque here — the database
/// itself is out of scope; this crate only consumes resolved
/// [`crate::token::FormatValue`] trees or control descriptions that have
/// already been looked up through this trait.
pub trait ViewDatabase {
    fn resolve_view(&self, type_name: &str) -> Option<String>;
    fn resolve_control(&self, reference: &str) -> Option<String>;
}

/// Maps a text token to a localized string.
pub trait StringTable {
    fn lookup(&self, token: &str) -> String;
}

/// A pass-through table that returns the token unchanged, useful for tests
/// and for callers with no localization layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStringTable;

impl StringTable for IdentityStringTable {
    fn lookup(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Accepts single pre-padded, optionally styled lines. Owned by the caller;
/// the engine writes but never closes it.
pub trait LineSink {
    fn write_line(&mut self, s: &str);
}

/// A line sink that accumulates lines in memory, used throughout this
/// crate's own test suite in place of a real terminal destination.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub lines: Vec<String>,
}

impl LineSink for VecSink {
    fn write_line(&mut self, s: &str) {
        self.lines.push(s.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_string_table_passes_through() {
        let table = IdentityStringTable;
        assert_eq!(table.lookup("greeting"), "greeting");
    }

    #[test]
    fn vec_sink_accumulates_in_order() {
        let mut sink = VecSink::default();
        sink.write_line("one");
        sink.write_line("two");
        assert_eq!(sink.lines, vec!["one".to_string(), "two".to_string()]);
    }
}
