//! Default Typst report template.
//!
//! Built-in Typst report markup with `{{PLACEHOLDER}}` substitution. A custom
//! template may use any subset of the same placeholders.

const TEMPLATE: &str = r#"#set page(paper: "a4", margin: (x: 1.8cm, y: 2cm))
#set text(font: "New Computer Modern", size: 10pt)
#set table(stroke: 0.5pt + gray, inset: 5pt)

= {{TITLE}}

== Current Signal

{{SIGNAL_SUMMARY}}

== Price

{{PRICE_CHART_SVG}}

== RSI

{{RSI_CHART_SVG}}

== MACD Histogram

{{MACD_CHART_SVG}}

== Backtest

{{BACKTEST_TABLE}}

== Trade Log

{{TRADE_LOG}}
"#;

pub fn template() -> &'static str {
    TEMPLATE
}
