//! FILENAME: core/widget-engine/src/pipeline.rs
//! PURPOSE: The render pipeline `(rows, WidgetConfig) -> RenderableResult`.
//! CONTEXT: Date range -> row filters -> aggregation -> [pivot] -> decoration.
//! Every stage is pure and infallible. The aggregation step is the only
//! boundary that catches: on failure the raw filtered rows are rendered.

use serde::Serialize;

use decoration_engine::{CellDecoration, CellDecorator};
use engine::{filter_by_date_range, PredicateEvaluator, Row};
use pivot_engine::{
    get_pivot_cell_value, pivot_table_data, try_apply_aggregations, AggregationConfig, PivotConfig, PivotResult,
    PivotedRow,
};
use widget_config::{RenderShape, WidgetConfig};

use crate::sort::{order_column_headers, sort_pivoted_rows, sort_rows};
use crate::{log_debug, log_enter, log_exit, log_warn};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Why nothing can be rendered yet. Not an error: the renderer shows a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderReason {
    NoAttributesAssigned,
    NoData,
}

/// Flat rows for a chart, plus which attributes are dimensions and measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub rows: Vec<Row>,
    pub dimensions: Vec<String>,
    pub measures: Vec<String>,
    /// False when aggregation failed and `rows` are the raw filtered rows.
    pub aggregated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
    pub aggregated: bool,
    #[serde(skip)]
    pub decorator: CellDecorator,
}

impl TableData {
    pub fn decorate(&self, row: &Row, attribute: &str) -> CellDecoration {
        self.decorator.decorate(attribute, row.value(attribute))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotData {
    #[serde(flatten)]
    pub result: PivotResult,
    pub config: PivotConfig,
    /// False when the cells come from unaggregated rows.
    pub aggregated: bool,
    #[serde(skip)]
    pub decorator: CellDecorator,
}

impl PivotData {
    pub fn cell_text(&self, row: &PivotedRow, header: &str, value_attr: Option<&str>) -> String {
        get_pivot_cell_value(
            row,
            header,
            value_attr,
            &self.config.row_attrs,
            &self.config.column_attrs,
            self.config.has_values(),
        )
    }

    /// Decoration of one value attribute at one intersection; `None` for an
    /// empty intersection.
    pub fn decorate_cell(&self, row: &PivotedRow, header: &str, value_attr: &str) -> Option<CellDecoration> {
        row.cell(header)
            .map(|cell| self.decorator.decorate(value_attr, cell.value(value_attr)))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum RenderableResult {
    Chart(ChartData),
    Table(TableData),
    Pivot(PivotData),
    Placeholder { reason: PlaceholderReason },
}

impl RenderableResult {
    pub fn placeholder(reason: PlaceholderReason) -> Self {
        RenderableResult::Placeholder { reason }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderableResult::Placeholder { .. })
    }

    pub fn as_chart(&self) -> Option<&ChartData> {
        match self {
            RenderableResult::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableData> {
        match self {
            RenderableResult::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_pivot(&self) -> Option<&PivotData> {
        match self {
            RenderableResult::Pivot(pivot) => Some(pivot),
            _ => None,
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Date range then row filters. Returns the surviving rows.
pub fn prefilter_rows(rows: &[Row], config: &WidgetConfig) -> Vec<Row> {
    let props = &config.properties;
    let mut filtered = match &props.date_range_config {
        Some(range) if range.is_active() => filter_by_date_range(rows, range),
        _ => rows.to_vec(),
    };
    if let Some(group) = &props.row_filters {
        filtered.retain(|row| PredicateEvaluator::ROW_FILTER.evaluate_group(group, row));
    }
    filtered
}

/// Aggregates, falling back to the raw rows if the aggregation is rejected.
/// Returns the rows and whether they are aggregated.
pub fn aggregate_or_raw(rows: Vec<Row>, config: &AggregationConfig) -> (Vec<Row>, bool) {
    if config.is_empty() {
        return (rows, false);
    }
    match try_apply_aggregations(&rows, config) {
        Ok(aggregated) => (aggregated, true),
        Err(e) => {
            log_warn!("PIPELINE", "aggregation failed, rendering raw rows: {}", e);
            (rows, false)
        }
    }
}

pub fn render_widget(rows: &[Row], config: &WidgetConfig) -> RenderableResult {
    log_enter!("PIPELINE", "render_widget", "kind={} rows={}", config.kind, rows.len());

    if !config.properties.has_assignments() {
        log_exit!("PIPELINE", "render_widget", "placeholder: no attributes assigned");
        return RenderableResult::placeholder(PlaceholderReason::NoAttributesAssigned);
    }
    if rows.is_empty() {
        log_exit!("PIPELINE", "render_widget", "placeholder: no data");
        return RenderableResult::placeholder(PlaceholderReason::NoData);
    }

    let filtered = prefilter_rows(rows, config);
    log_debug!("PIPELINE", "{} of {} rows pass date range and filters", filtered.len(), rows.len());

    let result = match config.kind.render_shape() {
        RenderShape::Chart => render_chart(filtered, config),
        RenderShape::Table => render_table(filtered, config),
        RenderShape::Pivot => {
            let pivot_config = config.pivot_config();
            if pivot_config.should_pivot() {
                render_pivot(filtered, config, pivot_config)
            } else {
                render_table(filtered, config)
            }
        }
    };

    log_exit!("PIPELINE", "render_widget", "{}", shape_name(&result));
    result
}

fn shape_name(result: &RenderableResult) -> &'static str {
    match result {
        RenderableResult::Chart(_) => "chart",
        RenderableResult::Table(_) => "table",
        RenderableResult::Pivot(_) => "pivot",
        RenderableResult::Placeholder { .. } => "placeholder",
    }
}

fn render_chart(rows: Vec<Row>, config: &WidgetConfig) -> RenderableResult {
    let resolved = config.resolved_attributes();
    let (mut rows, aggregated) = aggregate_or_raw(rows, &config.aggregation_config());
    if let Some(spec) = &config.properties.row_sort {
        sort_rows(&mut rows, spec);
    }
    RenderableResult::Chart(ChartData {
        rows,
        dimensions: resolved.dimensions,
        measures: resolved.measures,
        aggregated,
    })
}

/// A table without measures lists the filtered rows as they are.
fn render_table(rows: Vec<Row>, config: &WidgetConfig) -> RenderableResult {
    let resolved = config.resolved_attributes();
    let (mut rows, aggregated) = if resolved.measures.is_empty() {
        (rows, false)
    } else {
        aggregate_or_raw(rows, &config.aggregation_config())
    };
    if let Some(spec) = &config.properties.row_sort {
        sort_rows(&mut rows, spec);
    }

    let mut columns = resolved.dimensions;
    columns.extend(resolved.measures);

    let props = &config.properties;
    let decorator = CellDecorator::for_rows(
        &rows,
        &columns,
        props.column_styles.clone(),
        props.conditional_formatting_rules.clone(),
    );
    RenderableResult::Table(TableData {
        rows,
        columns,
        aggregated,
        decorator,
    })
}

/// Values are aggregated over the row and column axes before the cross-tab;
/// without value attributes the cross-tab is built from the filtered rows.
fn render_pivot(rows: Vec<Row>, config: &WidgetConfig, pivot_config: PivotConfig) -> RenderableResult {
    let (source, aggregated) = if pivot_config.has_values() {
        let mut aggregation = config.aggregation_config();
        aggregation.dimensions = pivot_config
            .row_attrs
            .iter()
            .chain(&pivot_config.column_attrs)
            .cloned()
            .collect();
        aggregate_or_raw(rows, &aggregation)
    } else {
        (rows, false)
    };

    let mut result = pivot_table_data(&source, &pivot_config);
    log_debug!(
        "PIPELINE",
        "pivot: {} rows x {} columns",
        result.pivoted_data.len(),
        result.column_headers.len()
    );

    let props = &config.properties;
    if let Some(spec) = &props.row_sort {
        sort_pivoted_rows(&mut result.pivoted_data, spec);
    }
    order_column_headers(&mut result.column_headers, props.column_sort.as_ref());

    let decorator = CellDecorator::for_pivot(
        &result,
        &pivot_config.value_attrs,
        props.column_styles.clone(),
        props.conditional_formatting_rules.clone(),
    );
    RenderableResult::Pivot(PivotData {
        result,
        config: pivot_config,
        aggregated,
        decorator,
    })
}
