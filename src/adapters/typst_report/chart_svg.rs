//! SVG chart rendering for reports.
//!
//! Charts share one canvas size and map the series index to x. Undefined
//! points (indicator warm-up) break the line instead of dropping to zero.

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 220.0;
const PAD_LEFT: f64 = 60.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 20.0;
const PAD_BOTTOM: f64 = 30.0;

struct Frame {
    count: usize,
    min: f64,
    max: f64,
}

impl Frame {
    fn new(count: usize, min: f64, max: f64) -> Self {
        let (min, max) = if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        };
        Self { count, min, max }
    }

    fn x(&self, i: usize) -> f64 {
        let plot_w = WIDTH - PAD_LEFT - PAD_RIGHT;
        if self.count > 1 {
            PAD_LEFT + (i as f64 / (self.count - 1) as f64) * plot_w
        } else {
            PAD_LEFT + plot_w / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        let plot_h = HEIGHT - PAD_TOP - PAD_BOTTOM;
        PAD_TOP + plot_h - ((value - self.min) / (self.max - self.min)) * plot_h
    }

    fn axes(&self, svg: &mut String) {
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#999" stroke-width="1"/>"##,
            PAD_LEFT,
            PAD_TOP,
            PAD_LEFT,
            HEIGHT - PAD_BOTTOM
        ));
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#999" stroke-width="1"/>"##,
            PAD_LEFT,
            HEIGHT - PAD_BOTTOM,
            WIDTH - PAD_RIGHT,
            HEIGHT - PAD_BOTTOM
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"##,
            PAD_LEFT - 5.0,
            PAD_TOP + 4.0,
            format_axis(self.max)
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"##,
            PAD_LEFT - 5.0,
            HEIGHT - PAD_BOTTOM + 4.0,
            format_axis(self.min)
        ));
    }

    fn guide(&self, svg: &mut String, value: f64, color: &str) {
        let y = self.y(value);
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1" stroke-dasharray="4,3"/>"#,
            PAD_LEFT,
            y,
            WIDTH - PAD_RIGHT,
            y,
            color
        ));
    }
}

fn format_axis(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn open_svg() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        WIDTH, HEIGHT, WIDTH, HEIGHT
    )
}

fn bounds(values: &[Option<f64>], guides: &[(f64, &str)]) -> Option<(f64, f64)> {
    let defined = values
        .iter()
        .flatten()
        .copied()
        .chain(guides.iter().map(|(v, _)| *v));
    let (min, max) = defined.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    min.is_finite().then_some((min, max))
}

/// Line chart of `values`, with dashed horizontal `guides` (value, color).
///
/// Returns an empty string when no value is defined.
pub fn generate_line_svg(values: &[Option<f64>], color: &str, guides: &[(f64, &str)]) -> String {
    if values.iter().all(Option::is_none) {
        return String::new();
    }
    let Some((min, max)) = bounds(values, guides) else {
        return String::new();
    };
    let frame = Frame::new(values.len(), min, max);

    let mut svg = open_svg();
    frame.axes(&mut svg);
    for (value, guide_color) in guides {
        frame.guide(&mut svg, *value, guide_color);
    }

    // One polyline per run of defined points.
    let mut run: Vec<String> = Vec::new();
    let flush = |run: &mut Vec<String>, svg: &mut String| {
        if run.len() > 1 {
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
                run.join(" "),
                color
            ));
        }
        run.clear();
    };
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => run.push(format!("{:.1},{:.1}", frame.x(i), frame.y(*v))),
            None => flush(&mut run, &mut svg),
        }
    }
    flush(&mut run, &mut svg);

    svg.push_str("</svg>");
    svg
}

/// Bar chart around zero: positive bars green, negative red.
pub fn generate_histogram_svg(values: &[Option<f64>]) -> String {
    if values.iter().all(Option::is_none) {
        return String::new();
    }
    let Some((min, max)) = bounds(values, &[(0.0, "")]) else {
        return String::new();
    };
    let frame = Frame::new(values.len(), min, max);
    let zero = frame.y(0.0);
    let bar_w = ((WIDTH - PAD_LEFT - PAD_RIGHT) / values.len().max(1) as f64 * 0.8).max(1.0);

    let mut svg = open_svg();
    frame.axes(&mut svg);
    frame.guide(&mut svg, 0.0, "#666");

    for (i, value) in values.iter().enumerate() {
        let Some(v) = value else { continue };
        let y = frame.y(*v);
        let (top, height) = if y < zero { (y, zero - y) } else { (zero, y - zero) };
        let color = if *v >= 0.0 { "#2a9d8f" } else { "#e63946" };
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            frame.x(i) - bar_w / 2.0,
            top,
            bar_w,
            height,
            color
        ));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_svg_empty_for_undefined_series() {
        assert!(generate_line_svg(&[], "blue", &[]).is_empty());
        assert!(generate_line_svg(&[None, None], "blue", &[]).is_empty());
    }

    #[test]
    fn line_svg_has_polyline() {
        let svg = generate_line_svg(&[Some(1.0), Some(2.0), Some(3.0)], "blue", &[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains(r#"stroke="blue""#));
    }

    #[test]
    fn line_svg_breaks_on_gaps() {
        let values = [None, Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)];
        let svg = generate_line_svg(&values, "purple", &[]);
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn line_svg_draws_guides() {
        let svg = generate_line_svg(&[Some(40.0), Some(60.0)], "purple", &[(30.0, "green"), (70.0, "red")]);
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
        // guides widen the range to include them
        assert!(svg.contains(">70.00<"));
        assert!(svg.contains(">30.00<"));
    }

    #[test]
    fn line_svg_flat_series() {
        let svg = generate_line_svg(&[Some(5.0), Some(5.0)], "blue", &[]);
        assert!(svg.contains("<polyline"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn histogram_svg_colors_by_sign() {
        let svg = generate_histogram_svg(&[None, Some(0.5), Some(-0.25)]);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("#2a9d8f"));
        assert!(svg.contains("#e63946"));
    }

    #[test]
    fn histogram_svg_empty_without_values() {
        assert!(generate_histogram_svg(&[None]).is_empty());
    }

    #[test]
    fn large_axis_values_have_no_decimals() {
        let svg = generate_line_svg(&[Some(36500.0), Some(36600.0)], "blue", &[]);
        assert!(svg.contains(">36600<"));
    }
}
