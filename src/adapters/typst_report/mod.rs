//! Typst report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom file via `template_path`), resolves all
//! `{{PLACEHOLDER}}` markers by calling helpers from `chart_svg` and `tables`,
//! and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::assistant::{AssistantConfig, Assessment};
use crate::domain::error::TacticalError;
use crate::ports::report_port::ReportPort;

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub assessment: &'a Assessment,
    pub config: &'a AssistantConfig,
}

/// Wrap an SVG document in a Typst `image.decode` call, or fall back to an
/// italic note when there is nothing to draw.
fn embed_svg(svg: &str, empty_note: &str) -> String {
    if svg.is_empty() {
        format!("_{}_", empty_note)
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let series = &ctx.assessment.series;
    let mut output = template.to_string();

    let title = format!(
        "{} {} Tactical Report",
        series.symbol(),
        series.timeframe()
    );
    output = output.replace("{{TITLE}}", &title);

    let summary = tables::render_signal_summary(ctx.assessment, ctx.config);
    output = output.replace("{{SIGNAL_SUMMARY}}", &summary);

    let backtest = tables::render_assessment_backtest(ctx.assessment);
    output = output.replace("{{BACKTEST_TABLE}}", &backtest);

    let closes: Vec<Option<f64>> = series.bars().iter().map(|b| Some(b.close())).collect();
    let price_svg = chart_svg::generate_line_svg(&closes, "#1d3557", &[]);
    output = output.replace("{{PRICE_CHART_SVG}}", &embed_svg(&price_svg, "No price data."));

    let rsi: Vec<Option<f64>> = series.bars().iter().map(|b| b.rsi).collect();
    let rsi_svg = chart_svg::generate_line_svg(
        &rsi,
        "#6a4c93",
        &[
            (ctx.config.rule.oversold, "#2a9d8f"),
            (ctx.config.rule.overbought, "#e63946"),
        ],
    );
    output = output.replace("{{RSI_CHART_SVG}}", &embed_svg(&rsi_svg, "RSI not yet defined."));

    let histogram: Vec<Option<f64>> = series.bars().iter().map(|b| b.macd_histogram).collect();
    let macd_svg = chart_svg::generate_histogram_svg(&histogram);
    output = output.replace(
        "{{MACD_CHART_SVG}}",
        &embed_svg(&macd_svg, "MACD histogram not yet defined."),
    );

    let trade_log = tables::render_trade_log(&ctx.assessment.backtest.trades);
    output = output.replace("{{TRADE_LOG}}", &trade_log);

    output
}

pub struct TypstReportAdapter {
    template_path: Option<PathBuf>,
}

impl TypstReportAdapter {
    pub fn new(template_path: Option<PathBuf>) -> Self {
        Self { template_path }
    }

    fn load_template(&self) -> Result<String, TacticalError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| TacticalError::Report {
                reason: format!("failed to read template {}: {}", path.display(), e),
            }),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        assessment: &Assessment,
        config: &AssistantConfig,
        output_path: &Path,
    ) -> Result<(), TacticalError> {
        let template = self.load_template()?;
        let markup = resolve(&template, &ReportContext { assessment, config });
        fs::write(output_path, markup).map_err(|e| TacticalError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        info!(path = %output_path.display(), "wrote Typst report");
        Ok(())
    }
}
