//! FILENAME: core/widget-config/src/kind.rs
//! PURPOSE: Widget kinds and the registry of their attribute roles.
//! CONTEXT: Each kind maps role keys (`x`, `series`, `rows`, ...) to a
//! classification. The resolver, the validator and the render pipeline all
//! dispatch through `WidgetKind::descriptor`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// ROLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleClass {
    /// Grouping key (row axis for pivot tables).
    Dimension,
    /// Grouping key spread into dynamic columns.
    ColumnDimension,
    /// Aggregated value.
    Measure,
}

impl RoleClass {
    pub fn is_dimension(&self) -> bool {
        matches!(self, RoleClass::Dimension | RoleClass::ColumnDimension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub key: &'static str,
    pub class: RoleClass,
}

const fn dimension(key: &'static str) -> RoleSpec {
    RoleSpec {
        key,
        class: RoleClass::Dimension,
    }
}

const fn column_dimension(key: &'static str) -> RoleSpec {
    RoleSpec {
        key,
        class: RoleClass::ColumnDimension,
    }
}

const fn measure(key: &'static str) -> RoleSpec {
    RoleSpec {
        key,
        class: RoleClass::Measure,
    }
}

/// Shape of the data handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderShape {
    /// Aggregated rows plus dimension/measure names.
    Chart,
    /// Aggregated rows decorated cell by cell.
    Table,
    /// Cross-tab decorated cell by cell.
    Pivot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub roles: &'static [RoleSpec],
    pub render_shape: RenderShape,
}

impl WidgetDescriptor {
    pub fn role(&self, key: &str) -> Option<&RoleSpec> {
        self.roles.iter().find(|r| r.key == key)
    }

    pub fn role_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.roles.iter().map(|r| r.key)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

static XY_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("x"), dimension("series"), measure("y")],
    render_shape: RenderShape::Chart,
};

static COMBO_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("x"), dimension("series"), measure("y"), measure("y2")],
    render_shape: RenderShape::Chart,
};

static CATEGORY_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("category"), measure("value")],
    render_shape: RenderShape::Chart,
};

static SCATTER_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("label"), dimension("series"), measure("x"), measure("y")],
    render_shape: RenderShape::Chart,
};

static BUBBLE_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[
        dimension("label"),
        dimension("series"),
        measure("x"),
        measure("y"),
        measure("size"),
    ],
    render_shape: RenderShape::Chart,
};

static RADAR_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("category"), dimension("series"), measure("value")],
    render_shape: RenderShape::Chart,
};

static GAUGE_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[measure("value")],
    render_shape: RenderShape::Chart,
};

static FUNNEL_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("stage"), measure("value")],
    render_shape: RenderShape::Chart,
};

static TREEMAP_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("category"), dimension("subcategory"), measure("value")],
    render_shape: RenderShape::Chart,
};

static HEATMAP_CHART: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("x"), dimension("y"), measure("value")],
    render_shape: RenderShape::Chart,
};

static TABLE: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("columns"), measure("values")],
    render_shape: RenderShape::Table,
};

static PIVOT_TABLE: WidgetDescriptor = WidgetDescriptor {
    roles: &[dimension("rows"), column_dimension("columns"), measure("values")],
    render_shape: RenderShape::Pivot,
};

// ============================================================================
// WIDGET KIND
// ============================================================================

/// Every widget kind that renders aggregated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidgetKind {
    #[default]
    BarChart,
    LineChart,
    AreaChart,
    PieChart,
    DonutChart,
    ScatterChart,
    BubbleChart,
    ComboChart,
    RadarChart,
    GaugeChart,
    FunnelChart,
    WaterfallChart,
    TreemapChart,
    HeatmapChart,
    Table,
    PivotTable,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 16] = [
        WidgetKind::BarChart,
        WidgetKind::LineChart,
        WidgetKind::AreaChart,
        WidgetKind::PieChart,
        WidgetKind::DonutChart,
        WidgetKind::ScatterChart,
        WidgetKind::BubbleChart,
        WidgetKind::ComboChart,
        WidgetKind::RadarChart,
        WidgetKind::GaugeChart,
        WidgetKind::FunnelChart,
        WidgetKind::WaterfallChart,
        WidgetKind::TreemapChart,
        WidgetKind::HeatmapChart,
        WidgetKind::Table,
        WidgetKind::PivotTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::BarChart => "bar-chart",
            WidgetKind::LineChart => "line-chart",
            WidgetKind::AreaChart => "area-chart",
            WidgetKind::PieChart => "pie-chart",
            WidgetKind::DonutChart => "donut-chart",
            WidgetKind::ScatterChart => "scatter-chart",
            WidgetKind::BubbleChart => "bubble-chart",
            WidgetKind::ComboChart => "combo-chart",
            WidgetKind::RadarChart => "radar-chart",
            WidgetKind::GaugeChart => "gauge-chart",
            WidgetKind::FunnelChart => "funnel-chart",
            WidgetKind::WaterfallChart => "waterfall-chart",
            WidgetKind::TreemapChart => "treemap-chart",
            WidgetKind::HeatmapChart => "heatmap-chart",
            WidgetKind::Table => "table",
            WidgetKind::PivotTable => "pivot-table",
        }
    }

    /// Recognizes `bar-chart` as well as the short `bar`, case-insensitively.
    pub fn from_known(name: &str) -> Option<WidgetKind> {
        let name = name.trim().to_ascii_lowercase();
        let short = name.strip_suffix("-chart").unwrap_or(&name);
        let kind = match short {
            "bar" => WidgetKind::BarChart,
            "line" => WidgetKind::LineChart,
            "area" => WidgetKind::AreaChart,
            "pie" => WidgetKind::PieChart,
            "donut" | "doughnut" => WidgetKind::DonutChart,
            "scatter" => WidgetKind::ScatterChart,
            "bubble" => WidgetKind::BubbleChart,
            "combo" => WidgetKind::ComboChart,
            "radar" => WidgetKind::RadarChart,
            "gauge" => WidgetKind::GaugeChart,
            "funnel" => WidgetKind::FunnelChart,
            "waterfall" => WidgetKind::WaterfallChart,
            "treemap" => WidgetKind::TreemapChart,
            "heatmap" => WidgetKind::HeatmapChart,
            "table" => WidgetKind::Table,
            "pivot-table" | "pivot" => WidgetKind::PivotTable,
            _ => return None,
        };
        Some(kind)
    }

    /// Unknown kinds degrade to a bar chart.
    pub fn parse(name: &str) -> WidgetKind {
        WidgetKind::from_known(name).unwrap_or_default()
    }

    pub fn descriptor(&self) -> &'static WidgetDescriptor {
        match self {
            WidgetKind::BarChart | WidgetKind::LineChart | WidgetKind::AreaChart => &XY_CHART,
            WidgetKind::ComboChart => &COMBO_CHART,
            WidgetKind::PieChart | WidgetKind::DonutChart | WidgetKind::WaterfallChart => &CATEGORY_CHART,
            WidgetKind::ScatterChart => &SCATTER_CHART,
            WidgetKind::BubbleChart => &BUBBLE_CHART,
            WidgetKind::RadarChart => &RADAR_CHART,
            WidgetKind::GaugeChart => &GAUGE_CHART,
            WidgetKind::FunnelChart => &FUNNEL_CHART,
            WidgetKind::TreemapChart => &TREEMAP_CHART,
            WidgetKind::HeatmapChart => &HEATMAP_CHART,
            WidgetKind::Table => &TABLE,
            WidgetKind::PivotTable => &PIVOT_TABLE,
        }
    }

    pub fn render_shape(&self) -> RenderShape {
        self.descriptor().render_shape
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for WidgetKind {
    fn from(name: &str) -> Self {
        WidgetKind::parse(name)
    }
}

impl Serialize for WidgetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WidgetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(WidgetKind::parse(&name))
    }
}
