//! SVG price chart
//!
//! Renders closing prices as a line with a gradient fill underneath. Pure
//! string construction; empty input renders as an empty string rather than
//! an error.

use crate::models::PriceHistory;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;
const GRIDLINES: usize = 5;

const COLOR_UP: &str = "#34c759";
const COLOR_DOWN: &str = "#ff3b30";

/// Render the price history as an SVG document
///
/// Empty history produces an empty string. A single point is drawn centered
/// with no line segments.
pub fn render(history: &PriceHistory) -> String {
    let closes = history.closes();
    if closes.is_empty() {
        return String::new();
    }
    let dates = history.dates();
    let n = closes.len();

    let first = closes[0];
    let last = closes[n - 1];
    let color = if last >= first { COLOR_UP } else { COLOR_DOWN };

    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut y_min = min * 0.98;
    let mut y_max = max * 1.02;
    if (y_max - y_min).abs() < f64::EPSILON {
        // Flat series: open the range so the scale stays finite
        y_min -= 1.0;
        y_max += 1.0;
    }

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let x_at = |i: usize| -> f64 {
        if n == 1 {
            MARGIN_LEFT + plot_width / 2.0
        } else {
            MARGIN_LEFT + plot_width * i as f64 / (n - 1) as f64
        }
    };
    let y_at =
        |price: f64| -> f64 { MARGIN_TOP + plot_height * (1.0 - (price - y_min) / (y_max - y_min)) };

    let mut svg = format!(
        "<svg viewBox=\"0 0 {WIDTH} {HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" \
         preserveAspectRatio=\"xMidYMid meet\">\n"
    );

    svg.push_str(&format!(
        "  <defs>\n    <linearGradient id=\"chartGradient\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\n\
         \x20     <stop offset=\"0%\" stop-color=\"{color}\" stop-opacity=\"0.25\"/>\n\
         \x20     <stop offset=\"100%\" stop-color=\"{color}\" stop-opacity=\"0\"/>\n\
         \x20   </linearGradient>\n  </defs>\n"
    ));

    // Horizontal gridlines with price labels
    for g in 0..GRIDLINES {
        let frac = g as f64 / (GRIDLINES - 1) as f64;
        let price = y_max - frac * (y_max - y_min);
        let y = MARGIN_TOP + frac * plot_height;
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" \
             stroke=\"#e5e5ea\" stroke-width=\"1\"/>\n",
            WIDTH - MARGIN_RIGHT
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"12\" \
             fill=\"#8e8e93\">{price:.2}</text>\n",
            MARGIN_LEFT - 8.0,
            y + 4.0
        ));
    }

    // X-axis date labels at a stride that caps them at five
    let stride = std::cmp::max(1, n.div_ceil(5));
    for (i, date) in dates.iter().enumerate().step_by(stride) {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" \
             fill=\"#8e8e93\">{date}</text>\n",
            x_at(i),
            HEIGHT - MARGIN_BOTTOM + 20.0
        ));
    }

    // Gradient fill under the line
    let mut area = format!("M {:.1} {:.1}", x_at(0), y_at(closes[0]));
    for (i, &close) in closes.iter().enumerate().skip(1) {
        area.push_str(&format!(" L {:.1} {:.1}", x_at(i), y_at(close)));
    }
    area.push_str(&format!(
        " L {:.1} {:.1} L {:.1} {:.1} Z",
        x_at(n - 1),
        MARGIN_TOP + plot_height,
        x_at(0),
        MARGIN_TOP + plot_height
    ));
    svg.push_str(&format!("  <path d=\"{area}\" fill=\"url(#chartGradient)\"/>\n"));

    // Price line
    let mut line = format!("M {:.1} {:.1}", x_at(0), y_at(closes[0]));
    for (i, &close) in closes.iter().enumerate().skip(1) {
        line.push_str(&format!(" L {:.1} {:.1}", x_at(i), y_at(close)));
    }
    svg.push_str(&format!(
        "  <path d=\"{line}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2.5\" \
         stroke-linejoin=\"round\" stroke-linecap=\"round\"/>\n"
    ));

    // End-point marker
    svg.push_str(&format!(
        "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{color}\"/>\n",
        x_at(n - 1),
        y_at(last)
    ));

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::NaiveDate;

    fn history(closes: &[f64]) -> PriceHistory {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2025, 6, 1)
                    .and_then(|d| d.checked_add_days(chrono::Days::new(i as u64)))
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceHistory {
            ticker: "AAPL".to_string(),
            period: "3mo".to_string(),
            points,
        }
    }

    #[test]
    fn test_empty_history_renders_empty() {
        assert_eq!(render(&history(&[])), "");
    }

    #[test]
    fn test_svg_structure() {
        let svg = render(&history(&[100.0, 101.0, 102.0]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox"));
        assert!(svg.contains("chartGradient"));
        assert!(svg.contains("<path"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<text"));
    }

    #[test]
    fn test_rising_series_is_green() {
        let svg = render(&history(&[100.0, 110.0]));
        assert!(svg.contains(COLOR_UP));
        assert!(!svg.contains(COLOR_DOWN));
    }

    #[test]
    fn test_falling_series_is_red() {
        let svg = render(&history(&[110.0, 100.0]));
        assert!(svg.contains(COLOR_DOWN));
        assert!(!svg.contains(COLOR_UP));
    }

    #[test]
    fn test_flat_series_is_green_and_finite() {
        let svg = render(&history(&[100.0, 100.0, 100.0]));
        assert!(svg.contains(COLOR_UP));
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_single_point_is_centered() {
        let svg = render(&history(&[100.0]));
        // Horizontal center of the plot area
        let center = MARGIN_LEFT + (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 2.0;
        assert!(svg.contains(&format!("cx=\"{center:.1}\"")));
        assert!(!svg.contains(" L "));
    }

    fn date_label_count(svg: &str) -> usize {
        svg.lines()
            .filter(|l| l.contains("text-anchor=\"middle\""))
            .count()
    }

    #[test]
    fn test_label_stride_caps_date_labels() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let svg = render(&history(&closes));
        let date_labels = date_label_count(&svg);
        assert!(date_labels <= 5);
        assert!(date_labels >= 4);
    }

    #[test]
    fn test_label_cap_holds_for_short_series() {
        // Lengths just above the per-label stride boundary
        for n in [2usize, 5, 6, 7, 11] {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            let svg = render(&history(&closes));
            assert!(
                date_label_count(&svg) <= 5,
                "series of length {n} exceeded five date labels"
            );
        }
    }
}
