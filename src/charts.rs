use crate::ui::escape_html;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 320.0;
const TOP: f64 = 24.0;
const PADDING_BOTTOM: f64 = 40.0;
const PADDING_RIGHT: f64 = 24.0;
const TICKS: usize = 4;

pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Vertical bars, one per point, with `axis_label` formatting the y ticks
/// and tooltips.
pub fn bar_chart(points: &[ChartPoint], axis_label: impl Fn(f64) -> String) -> String {
    let placeholder;
    let points = if points.is_empty() {
        placeholder = [ChartPoint {
            label: "—".to_string(),
            value: 0.0,
        }];
        &placeholder[..]
    } else {
        points
    };

    let left = 110.0;
    let max = nice_max(points.iter().map(|point| point.value));
    let plot_height = HEIGHT - TOP - PADDING_BOTTOM;
    let plot_width = WIDTH - left - PADDING_RIGHT;
    let y = |value: f64| HEIGHT - PADDING_BOTTOM - value.max(0.0) / max * plot_height;

    let mut svg = grid(left, max, &axis_label);

    let slot = plot_width / points.len() as f64;
    let gap = (slot * 0.2).min(16.0);
    let bar_width = slot - gap;
    for (index, point) in points.iter().enumerate() {
        let x = left + index as f64 * slot + gap / 2.0;
        let top = y(point.value);
        let height = (HEIGHT - PADDING_BOTTOM - top).max(0.0);
        svg.push_str(&format!(
            r#"<rect class="chart-bar" x="{x:.2}" y="{top:.2}" width="{bar_width:.2}" height="{height:.2}" rx="8"><title>{label}: {value}</title></rect>"#,
            label = escape_html(&point.label),
            value = escape_html(&axis_label(point.value)),
        ));
        svg.push_str(&format!(
            r#"<text class="chart-label" x="{cx:.2}" y="{ly:.2}" text-anchor="middle">{label}</text>"#,
            cx = x + bar_width / 2.0,
            ly = HEIGHT - PADDING_BOTTOM + 18.0,
            label = escape_html(&point.label),
        ));
    }

    wrap(&svg, "Ventas por mes")
}

/// A polyline through the points with a dot and tooltip on each one.
pub fn line_chart(points: &[ChartPoint], axis_label: impl Fn(f64) -> String) -> String {
    if points.is_empty() {
        return wrap(
            r#"<text class="chart-label" x="50%" y="50%" text-anchor="middle">Sin datos</text>"#,
            "Ventas del producto",
        );
    }

    let left = 56.0;
    let max = nice_max(points.iter().map(|point| point.value));
    let plot_height = HEIGHT - TOP - PADDING_BOTTOM;
    let x_step = if points.len() > 1 {
        (WIDTH - left - PADDING_RIGHT) / (points.len() - 1) as f64
    } else {
        0.0
    };
    let x = |index: usize| left + index as f64 * x_step;
    let y = |value: f64| HEIGHT - PADDING_BOTTOM - value.max(0.0) / max * plot_height;

    let mut svg = grid(left, max, &axis_label);

    let path = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{command} {:.2} {:.2}", x(index), y(point.value))
        })
        .collect::<Vec<_>>()
        .join(" ");
    svg.push_str(&format!(r#"<path class="chart-line" d="{path}" />"#));

    let label_every = if points.len() > 8 { 2 } else { 1 };
    for (index, point) in points.iter().enumerate() {
        svg.push_str(&format!(
            r#"<circle class="chart-point" cx="{:.2}" cy="{:.2}" r="4"><title>{}: {}</title></circle>"#,
            x(index),
            y(point.value),
            escape_html(&point.label),
            escape_html(&axis_label(point.value)),
        ));
        if index % label_every == 0 {
            svg.push_str(&format!(
                r#"<text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                x(index),
                HEIGHT - PADDING_BOTTOM + 18.0,
                escape_html(&point.label),
            ));
        }
    }

    wrap(&svg, "Ventas del producto")
}

fn grid(left: f64, max: f64, axis_label: &impl Fn(f64) -> String) -> String {
    let plot_height = HEIGHT - TOP - PADDING_BOTTOM;
    let mut out = String::new();
    for tick in 0..=TICKS {
        let value = max * tick as f64 / TICKS as f64;
        let y = HEIGHT - PADDING_BOTTOM - plot_height * tick as f64 / TICKS as f64;
        out.push_str(&format!(
            r#"<line class="chart-grid" x1="{left}" y1="{y:.2}" x2="{x2}" y2="{y:.2}" />"#,
            x2 = WIDTH - PADDING_RIGHT,
        ));
        out.push_str(&format!(
            r#"<text class="chart-label" x="{lx}" y="{ty:.2}" text-anchor="end">{label}</text>"#,
            lx = left - 10.0,
            ty = y + 4.0,
            label = escape_html(&axis_label(value)),
        ));
    }
    out
}

/// Upper bound for the y axis; never zero so scaling stays finite.
fn nice_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0_f64, f64::max);
    if max <= 0.0 { 1.0 } else { max }
}

fn wrap(body: &str, label: &str) -> String {
    format!(
        r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{label}">{body}</svg>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, value: f64) -> ChartPoint {
        ChartPoint {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn bar_chart_labels_every_bar() {
        let svg = bar_chart(
            &[point("Ene 2025", 500.0), point("Feb 2025", 1000.0)],
            |v| format!("{v:.0}"),
        );
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains(">Ene 2025</text>"));
        assert!(svg.contains(">Feb 2025</text>"));
        assert!(svg.contains("<title>Feb 2025: 1000</title>"));
    }

    #[test]
    fn empty_bar_chart_shows_placeholder_bar() {
        let svg = bar_chart(&[], |v| format!("{v:.0}"));
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(">—</text>"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = bar_chart(&[point("<b>", 1.0)], |v| format!("{v}"));
        assert!(svg.contains("&lt;b&gt;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn line_chart_draws_path_through_points() {
        let svg = line_chart(
            &[point("1 Ene 2025", 2.0), point("2 Ene 2025", 4.0)],
            |v| format!("{v:.0}"),
        );
        assert!(svg.contains(r#"d="M 56.00 "#));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn single_point_line_chart_is_finite() {
        let svg = line_chart(&[point("hoy", 0.0)], |v| format!("{v:.0}"));
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn empty_line_chart_says_so() {
        assert!(line_chart(&[], |v| format!("{v}")).contains("Sin datos"));
    }
}
