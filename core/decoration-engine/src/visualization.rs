//! FILENAME: core/decoration-engine/src/visualization.rs
//! PURPOSE: Visualization hints derived from a scaled percentage.
//! CONTEXT: The renderer draws these; this module only decides widths,
//! colors and icon bands.

use serde::{Deserialize, Serialize};

use engine::Color;

/// Base color used when a column style does not set one (blue-500).
pub const DEFAULT_BASE_COLOR: Color = Color::new(59, 130, 246);

/// Lower edge of the "good" icon band.
pub const ICON_GOOD_THRESHOLD: f64 = 70.0;
/// Lower edge of the "warning" icon band.
pub const ICON_WARNING_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualizationKind {
    DataBar,
    ColorScale,
    IconSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconBand {
    Good,
    Warning,
    Bad,
}

impl IconBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= ICON_GOOD_THRESHOLD {
            IconBand::Good
        } else if percent >= ICON_WARNING_THRESHOLD {
            IconBand::Warning
        } else {
            IconBand::Bad
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Visualization {
    #[serde(rename_all = "camelCase")]
    DataBar { width_percent: f64, color: String },
    #[serde(rename_all = "camelCase")]
    ColorScale { background: String },
    IconSet { band: IconBand },
}

/// Background alpha of a color-scale cell: 0.1 at 0%, 0.4 at 100%.
pub fn color_scale_alpha(percent: f64) -> f64 {
    0.1 + percent.clamp(0.0, 100.0) / 100.0 * 0.3
}

pub fn visualize(kind: VisualizationKind, percent: f64, base: Color) -> Visualization {
    match kind {
        VisualizationKind::DataBar => Visualization::DataBar {
            width_percent: percent,
            color: base.to_css(),
        },
        VisualizationKind::ColorScale => Visualization::ColorScale {
            background: base.to_rgba_css(color_scale_alpha(percent)),
        },
        VisualizationKind::IconSet => Visualization::IconSet {
            band: IconBand::from_percent(percent),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_bands() {
        assert_eq!(IconBand::from_percent(100.0), IconBand::Good);
        assert_eq!(IconBand::from_percent(70.0), IconBand::Good);
        assert_eq!(IconBand::from_percent(69.9), IconBand::Warning);
        assert_eq!(IconBand::from_percent(30.0), IconBand::Warning);
        assert_eq!(IconBand::from_percent(29.9), IconBand::Bad);
    }

    #[test]
    fn test_color_scale() {
        assert!((color_scale_alpha(0.0) - 0.1).abs() < 1e-12);
        assert!((color_scale_alpha(50.0) - 0.25).abs() < 1e-12);
        assert_eq!(
            visualize(VisualizationKind::ColorScale, 100.0, DEFAULT_BASE_COLOR),
            Visualization::ColorScale {
                background: "rgba(59, 130, 246, 0.4)".into()
            }
        );
    }

    #[test]
    fn test_data_bar() {
        let bar = visualize(VisualizationKind::DataBar, 42.5, Color::new(255, 0, 0));
        assert_eq!(
            bar,
            Visualization::DataBar {
                width_percent: 42.5,
                color: "#ff0000".into()
            }
        );
    }
}
