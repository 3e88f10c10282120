//! The facade selecting among table, list, and complex rendering, sharing
//! one initialization and grouping-key protocol across the three.

use crate::columns::{format_cell, solve_column_widths, Alignment, ColumnInfo};
use crate::error::{ErrorManager, ErrorPolicy};
use crate::external::{ExpressionEvaluator, ObjectSource, StringTable};
use crate::grouping::GroupingTracker;
use crate::token::FormatValue;

/// Minimum column width and inter-column separator width the solver is
/// called with when a `TableView` resolves its columns against the
/// available table width (§4.6).
pub const DEFAULT_MIN_COLUMN_WIDTH: i64 = 3;
pub const DEFAULT_COLUMN_SEPARATOR_WIDTH: i64 = 1;

/// Table column cap (§4.10): at most this many columns, even when a view
/// enumerates every property.
pub const MAX_TABLE_COLUMNS: usize = 10;

/// Header metadata produced once per distinct grouping/view switch.
#[derive(Debug, Clone)]
pub struct TableHeaderInfo {
    pub columns: Vec<ColumnInfo>,
    pub hide_header: bool,
    pub repeat_header: bool,
}

/// Shared state across all three view variants: the error policy, the
/// resolved grouping expression (if any), and the auto-size/repeat-header
/// flags read once at initialization.
pub struct ViewContext {
    pub errors: ErrorManager,
    pub grouping: Option<GroupingTracker>,
    pub auto_size: bool,
    pub repeat_header: bool,
}

impl ViewContext {
    /// Builds shared context for a render pass. `grouping_override` is the
    /// command-line override, tried before the view definition's own
    /// grouping expression.
    pub fn new(
        policy: ErrorPolicy,
        grouping_override: Option<String>,
        grouping_from_view: Option<String>,
        auto_size: bool,
        repeat_header: bool,
    ) -> Self {
        let expr = grouping_override.or(grouping_from_view);
        Self {
            errors: ErrorManager::new(policy),
            grouping: expr.map(GroupingTracker::new),
            auto_size,
            repeat_header,
        }
    }

    /// Renders the group-start token tree for a new group's first object,
    /// via a labelled text field and the value's string rendering, or
    /// `None` if no grouping is configured.
    pub fn generate_group_start(
        &self,
        label: &str,
        table: &dyn StringTable,
        value: &str,
    ) -> Option<Vec<FormatValue>> {
        if self.grouping.is_none() {
            return None;
        }
        Some(vec![
            FormatValue::text(table.lookup(label)),
            FormatValue::text(": "),
            FormatValue::property(value.to_string()),
            FormatValue::NewLine,
        ])
    }
}

/// The behavior that differs across table/list/complex: producing header
/// metadata and per-object payload tokens. [`ViewContext`] carries what they
/// share.
pub trait ViewVariant {
    fn generate_start_data(&mut self, first_object: &dyn ObjectSource) -> Option<TableHeaderInfo>;
    fn generate_payload(
        &mut self,
        object: &dyn ObjectSource,
        evaluator: &dyn ExpressionEvaluator,
    ) -> Vec<FormatValue>;
}

/// Renders objects as rows of a column table, inferring columns and
/// alignment from the first object when the view defines none.
pub struct TableView {
    explicit_columns: Option<Vec<ColumnInfo>>,
    is_remote: bool,
    table_width: i64,
    resolved: Option<Vec<ColumnInfo>>,
}

impl TableView {
    pub fn new(explicit_columns: Option<Vec<ColumnInfo>>, is_remote: bool, table_width: i64) -> Self {
        Self {
            explicit_columns,
            is_remote,
            table_width,
            resolved: None,
        }
    }

    /// Runs the column-width solver over `columns` against this view's
    /// table width, writing the solved width back into each column so both
    /// the header and every row format against the same resolution.
    fn resolve_widths(&self, columns: Vec<ColumnInfo>) -> Vec<ColumnInfo> {
        let raw: Vec<i64> = columns.iter().map(|c| c.width).collect();
        let solved = solve_column_widths(
            &raw,
            self.table_width,
            DEFAULT_MIN_COLUMN_WIDTH,
            DEFAULT_COLUMN_SEPARATOR_WIDTH,
        );
        columns
            .into_iter()
            .zip(solved)
            .map(|(c, w)| ColumnInfo::new(c.label, w, c.alignment))
            .collect()
    }

    fn infer_columns(&self, first_object: &dyn ObjectSource) -> Vec<ColumnInfo> {
        let mut props = first_object.properties();
        props.truncate(MAX_TABLE_COLUMNS);
        let mut columns: Vec<ColumnInfo> = props
            .into_iter()
            .map(|(name, value)| ColumnInfo::new(name, 0, infer_alignment(&value)))
            .collect();
        if self.is_remote {
            if columns.len() >= MAX_TABLE_COLUMNS {
                columns.pop();
            }
            columns.push(ColumnInfo::new("ComputerName", 0, Alignment::Left));
        }
        columns
    }
}

fn infer_alignment(value: &str) -> Alignment {
    if value.parse::<f64>().is_ok() {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

impl ViewVariant for TableView {
    fn generate_start_data(&mut self, first_object: &dyn ObjectSource) -> Option<TableHeaderInfo> {
        let columns = match &self.explicit_columns {
            Some(cols) => {
                let mut cols = cols.clone();
                cols.truncate(MAX_TABLE_COLUMNS);
                cols
            }
            None => self.infer_columns(first_object),
        };
        let resolved = self.resolve_widths(columns);
        self.resolved = Some(resolved.clone());
        Some(TableHeaderInfo {
            columns: resolved,
            hide_header: false,
            repeat_header: false,
        })
    }

    /// Builds one row: each column's property value is truncated, padded,
    /// and aligned to its solved width (falling back to a fresh solve if
    /// `generate_start_data` was never called for this object shape), then
    /// joined with a single-cell separator matching the width solved
    /// against (§4.6).
    fn generate_payload(
        &mut self,
        object: &dyn ObjectSource,
        _evaluator: &dyn ExpressionEvaluator,
    ) -> Vec<FormatValue> {
        let columns = match &self.resolved {
            Some(cols) => cols.clone(),
            None => {
                let columns = match &self.explicit_columns {
                    Some(cols) => cols.clone(),
                    None => self.infer_columns(object),
                };
                self.resolve_widths(columns)
            }
        };

        let mut row = Vec::with_capacity(columns.len() * 2);
        for (i, c) in columns.iter().enumerate() {
            if i > 0 {
                row.push(FormatValue::text(" "));
            }
            let value = object.property(&c.label).unwrap_or_default();
            row.push(FormatValue::property(format_cell(
                &value,
                c.width,
                c.alignment,
            )));
        }
        row
    }
}

/// Renders objects as label/value lists via [`crate::list::ListWriter`],
/// which owns the actual alignment logic; this variant only resolves which
/// properties appear and in what order.
pub struct ListView {
    properties: Vec<String>,
}

impl ListView {
    pub fn new(properties: Vec<String>) -> Self {
        Self { properties }
    }
}

impl ViewVariant for ListView {
    fn generate_start_data(&mut self, _first_object: &dyn ObjectSource) -> Option<TableHeaderInfo> {
        None
    }

    fn generate_payload(
        &mut self,
        object: &dyn ObjectSource,
        _evaluator: &dyn ExpressionEvaluator,
    ) -> Vec<FormatValue> {
        self.properties
            .iter()
            .map(|name| FormatValue::property(object.property(name).unwrap_or_default()))
            .collect()
    }
}

/// Renders objects via a full control-tree walk, delegating to
/// [`crate::traversal::ComplexTraversal`].
pub struct ComplexView {
    controls: Vec<crate::traversal::ControlToken>,
}

impl ComplexView {
    pub fn new(controls: Vec<crate::traversal::ControlToken>) -> Self {
        Self { controls }
    }
}

impl ViewVariant for ComplexView {
    fn generate_start_data(&mut self, _first_object: &dyn ObjectSource) -> Option<TableHeaderInfo> {
        None
    }

    fn generate_payload(
        &mut self,
        object: &dyn ObjectSource,
        evaluator: &dyn ExpressionEvaluator,
    ) -> Vec<FormatValue> {
        let mut errors = ErrorManager::default();
        let cancel = crate::cancel::CancellationToken::new();
        let mut traversal =
            crate::traversal::ComplexTraversal::new(evaluator, &mut errors, &cancel);
        if self.controls.is_empty() {
            traversal.walk_fallback(object)
        } else {
            traversal.walk(&self.controls, object)
        }
    }
}
