//! FILENAME: core/widget-engine/src/session.rs
//! PURPOSE: Memoizes the last render of one widget.
//! CONTEXT: Polling data sources often deliver the same payload again. The
//! session keys its cached result on content fingerprints of the dataset and
//! the configuration, so an unchanged pair is not recomputed.

use engine::Dataset;
use widget_config::WidgetConfig;

use crate::log_debug;
use crate::pipeline::{render_widget, RenderableResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderKey {
    dataset: u64,
    config: u64,
}

#[derive(Debug, Default)]
pub struct WidgetSession {
    key: Option<RenderKey>,
    cached: Option<RenderableResult>,
    recomputes: u64,
}

impl WidgetSession {
    pub fn new() -> Self {
        WidgetSession::default()
    }

    /// Renders, or returns the cached result when neither input changed.
    pub fn render(&mut self, dataset: &Dataset, config: &WidgetConfig) -> &RenderableResult {
        let key = RenderKey {
            dataset: dataset.fingerprint(),
            config: config.fingerprint(),
        };

        if self.key != Some(key) {
            self.cached = None;
        }

        match self.cached.take() {
            Some(result) => {
                log_debug!("SESSION", "reusing render for dataset {:016x}", key.dataset);
                self.cached.insert(result)
            }
            None => {
                self.key = Some(key);
                self.recomputes += 1;
                self.cached.insert(render_widget(dataset.rows(), config))
            }
        }
    }

    /// Forces the next `render` to recompute.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.cached = None;
    }

    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}
