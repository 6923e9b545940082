//! `rentabilidad.toml` configuration
//!
//! Every key is optional. Missing keys take the built-in defaults and
//! unknown keys are rejected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rentabilidad_curves::{CurveBuilder, DEFAULT_MAX_TASK_DAYS};
use rentabilidad_ingest::{ProgressLayout, ScheduleColumns, ScheduleLayout};
use rentabilidad_render::{ExcelRenderer, SvgChartRenderer, TextRenderer};
use serde::Deserialize;
use tracing::debug;

/// File picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "rentabilidad.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schedule: ScheduleConfig,
    pub progress: ProgressLayout,
    pub chart: ChartConfig,
}

/// `[schedule]` section
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    pub sheet: String,
    pub header_row: u32,
    pub max_task_days: i64,
    pub columns: ScheduleColumns,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let layout = ScheduleLayout::default();
        Self {
            sheet: layout.sheet,
            header_row: layout.header_row,
            max_task_days: DEFAULT_MAX_TASK_DAYS,
            columns: layout.columns,
        }
    }
}

/// `[chart]` section
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub currency: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let chart = SvgChartRenderer::default();
        Self {
            width: chart.width,
            height: chart.height,
            title: chart.title,
            currency: chart.currency,
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load `explicit` if given, else `rentabilidad.toml` in `dir` when it
    /// exists, else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&source)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn schedule_layout(&self) -> ScheduleLayout {
        ScheduleLayout {
            sheet: self.schedule.sheet.clone(),
            header_row: self.schedule.header_row,
            columns: self.schedule.columns.clone(),
        }
    }

    pub fn progress_layout(&self) -> ProgressLayout {
        self.progress.clone()
    }

    pub fn curve_builder(&self) -> CurveBuilder {
        CurveBuilder::new().max_task_days(self.schedule.max_task_days)
    }

    pub fn chart_renderer(&self) -> SvgChartRenderer {
        SvgChartRenderer::new()
            .size(self.chart.width, self.chart.height)
            .title(self.chart.title.as_str())
            .currency(self.chart.currency.as_str())
    }

    pub fn excel_renderer(&self) -> ExcelRenderer {
        ExcelRenderer::new().currency(self.chart.currency.as_str())
    }

    pub fn text_renderer(&self) -> TextRenderer {
        TextRenderer::new()
            .title(self.chart.title.as_str())
            .currency(self.chart.currency.as_str())
    }
}
