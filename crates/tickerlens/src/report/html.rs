//! HTML rendering for the analysis report
//!
//! The inline markdown converter is a line-oriented state machine: the
//! current block kind (paragraph, bullet list, numbered list) is tracked
//! explicitly, so list closing tags follow from state rather than from
//! peeking at previous lines.

use super::markdown::{ParsedReport, section_meta};
use crate::Result;
use crate::models::InvestmentSummary;
use chrono::Local;
use regex::Regex;
use std::path::PathBuf;
use tracing::info;

/// Escape HTML-significant characters
///
/// Ampersand first so entity prefixes are not double-escaped.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convert inline emphasis markers inside one line
///
/// Bold runs before italic so `**x**` is not eaten as two italics.
fn inline(text: &str) -> String {
    let mut out = escape(text);
    let rules: [(&str, &str); 4] = [
        (r"\*\*([^*]+?)\*\*", "<strong>$1</strong>"),
        (r"__([^_]+?)__", "<strong>$1</strong>"),
        (r"\*([^*]+?)\*", "<em>$1</em>"),
        (r"_([^_]+?)_", "<em>$1</em>"),
    ];
    for (pattern, replacement) in rules {
        if let Ok(re) = Regex::new(pattern) {
            out = re.replace_all(&out, replacement).into_owned();
        }
    }
    style_recommendation(&out)
}

/// Wrap recommendation verdicts in styled badge spans
fn style_recommendation(html: &str) -> String {
    let Ok(re) = Regex::new(r"(?i)<strong>Recommendation:</strong>\s*\[?(BUY|HOLD|SELL)\]?")
    else {
        return html.to_string();
    };
    re.replace_all(html, |caps: &regex::Captures<'_>| {
        let verdict = caps[1].to_uppercase();
        let class = verdict.to_lowercase();
        format!(
            "<strong>Recommendation:</strong> <span class=\"recommendation {class}\">{verdict}</span>"
        )
    })
    .into_owned()
}

/// Block kind currently open in the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Bullet,
    Numbered,
}

/// Convert a markdown section body to HTML
pub fn markdown_to_html(text: &str) -> String {
    let numbered = Regex::new(r"^\d+\.\s+(.*)$").ok();

    let mut out = String::new();
    let mut block = Block::None;

    let mut close_block = |out: &mut String, block: &mut Block| {
        match *block {
            Block::Bullet => out.push_str("</ul>\n"),
            Block::Numbered => out.push_str("</ol>\n"),
            Block::None => {}
        }
        *block = Block::None;
    };

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            close_block(&mut out, &mut block);
            continue;
        }

        if let Some(heading) = line.strip_prefix("### ") {
            close_block(&mut out, &mut block);
            out.push_str(&format!(
                "<h3 class=\"subsection-title\">{}</h3>\n",
                inline(heading)
            ));
            continue;
        }

        if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            if block != Block::Bullet {
                close_block(&mut out, &mut block);
                out.push_str("<ul>\n");
                block = Block::Bullet;
            }
            out.push_str(&format!("<li>{}</li>\n", inline(item)));
            continue;
        }

        if let Some(item) = numbered
            .as_ref()
            .and_then(|re| re.captures(line))
            .map(|caps| caps[1].to_string())
        {
            if block != Block::Numbered {
                close_block(&mut out, &mut block);
                out.push_str("<ol>\n");
                block = Block::Numbered;
            }
            out.push_str(&format!("<li>{}</li>\n", inline(&item)));
            continue;
        }

        close_block(&mut out, &mut block);
        out.push_str(&format!("<p>{}</p>\n", inline(line)));
    }

    close_block(&mut out, &mut block);
    out
}

/// Render the complete self-contained HTML document
pub fn render_document(
    report: &ParsedReport,
    summary: &InvestmentSummary,
    chart_svg: &str,
    chart_period: &str,
) -> String {
    let now = Local::now();
    let date = now.format("%B %d, %Y");
    let time = now.format("%H:%M");
    let ticker = escape(&report.ticker);

    let mut sections_html = String::new();
    for (index, section) in report.sections.iter().enumerate() {
        let (icon, class) = section_meta(&section.title);
        sections_html.push_str(&format!(
            "    <section class=\"card {class}\">\n\
             \x20     <button class=\"card-header\" onclick=\"toggle({index})\">\n\
             \x20       <span class=\"card-icon\">{icon}</span>\n\
             \x20       <span class=\"card-title\">{}</span>\n\
             \x20       <span class=\"chevron\" id=\"chevron-{index}\">\u{25BE}</span>\n\
             \x20     </button>\n\
             \x20     <div class=\"card-body\" id=\"body-{index}\">\n{}\
             \x20     </div>\n\
             \x20   </section>\n",
            escape(&section.title),
            markdown_to_html(&section.body),
        ));
    }

    let chart_html = if chart_svg.is_empty() {
        String::new()
    } else {
        format!(
            "    <section class=\"card chart-card\">\n\
             \x20     <div class=\"chart-meta\"><span>{ticker}</span><span>{}</span></div>\n\
             {chart_svg}\
             \x20   </section>\n",
            escape(chart_period)
        )
    };

    let badge_class = match summary.recommendation.as_str() {
        "BUY" => "buy",
        "SELL" => "sell",
        _ => "hold",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{ticker} Analysis - TickerLens</title>
<style>
{STYLE}
</style>
</head>
<body>
  <header>
    <div class="brand">TickerLens</div>
    <div class="ticker-badge">{ticker}</div>
    <div class="meta">{date} &middot; {time}</div>
  </header>
  <main>
    <section class="summary">
      <div class="badge {badge_class}">{rec}</div>
      <div class="summary-fields">
        <div><span class="field-label">Confidence</span>{confidence}</div>
        <div><span class="field-label">Price Target</span>{target}</div>
      </div>
    </section>
{chart_html}{sections_html}  </main>
  <footer>
    <button onclick="setAll(true)">Expand all</button>
    <button onclick="setAll(false)">Collapse all</button>
    <p>Generated by TickerLens. Not investment advice.</p>
  </footer>
  <script>
{SCRIPT}
  </script>
</body>
</html>
"#,
        rec = escape(&summary.recommendation),
        confidence = escape(&summary.confidence),
        target = escape(&summary.price_target),
    )
}

const STYLE: &str = r#"  :root { color-scheme: light; }
  * { box-sizing: border-box; }
  body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
         background: #f5f5f7; color: #1d1d1f; }
  header { background: #1d1d1f; color: #f5f5f7; padding: 28px 24px; display: flex;
           align-items: baseline; gap: 16px; }
  .brand { font-size: 22px; font-weight: 700; letter-spacing: -0.3px; }
  .ticker-badge { background: #0071e3; border-radius: 980px; padding: 4px 14px;
                  font-weight: 600; font-size: 15px; }
  .meta { margin-left: auto; color: #a1a1a6; font-size: 14px; }
  main { max-width: 860px; margin: 24px auto; padding: 0 16px; }
  .summary { background: #fff; border-radius: 18px; padding: 20px 24px; display: flex;
             align-items: center; gap: 24px; margin-bottom: 16px;
             box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
  .badge { border-radius: 980px; padding: 8px 22px; font-size: 17px; font-weight: 700; color: #fff; }
  .badge.buy { background: #34c759; }
  .badge.sell { background: #ff3b30; }
  .badge.hold { background: #ff9500; }
  .summary-fields { display: flex; gap: 32px; font-size: 15px; }
  .field-label { display: block; color: #86868b; font-size: 12px; text-transform: uppercase;
                 letter-spacing: 0.5px; }
  .card { background: #fff; border-radius: 18px; margin-bottom: 16px; overflow: hidden;
          box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
  .card-header { width: 100%; display: flex; align-items: center; gap: 12px; padding: 16px 24px;
                 background: none; border: none; font: inherit; font-size: 17px; font-weight: 600;
                 cursor: pointer; text-align: left; }
  .card-icon { font-size: 20px; }
  .chevron { margin-left: auto; transition: transform 0.2s; }
  .chevron.closed { transform: rotate(-90deg); }
  .card-body { padding: 0 24px 20px; line-height: 1.6; font-size: 15px; }
  .card-body.hidden { display: none; }
  .subsection-title { font-size: 15px; margin: 18px 0 6px; color: #515154; }
  .recommendation { border-radius: 6px; padding: 1px 8px; font-weight: 700; color: #fff; }
  .recommendation.buy { background: #34c759; }
  .recommendation.sell { background: #ff3b30; }
  .recommendation.hold { background: #ff9500; }
  .chart-card { padding: 20px 24px; }
  .chart-meta { display: flex; justify-content: space-between; color: #86868b;
                font-size: 13px; margin-bottom: 8px; }
  footer { max-width: 860px; margin: 0 auto 40px; padding: 0 16px; color: #86868b;
           font-size: 13px; }
  footer button { border: 1px solid #d2d2d7; background: #fff; border-radius: 8px;
                  padding: 6px 14px; margin-right: 8px; cursor: pointer; font-size: 13px; }"#;

const SCRIPT: &str = r#"  function toggle(i) {
    document.getElementById('body-' + i).classList.toggle('hidden');
    document.getElementById('chevron-' + i).classList.toggle('closed');
  }
  function setAll(open) {
    document.querySelectorAll('.card-body').forEach(function (el) {
      el.classList.toggle('hidden', !open);
    });
    document.querySelectorAll('.chevron').forEach(function (el) {
      el.classList.toggle('closed', !open);
    });
  }"#;

/// Write the document under `reports_dir` and return its path
///
/// Filename: `{TICKER}_analysis_{YYYY-MM-DD_HHMMSS}.html`. The directory is
/// created on demand.
pub fn save_report(reports_dir: &str, ticker: &str, html: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(reports_dir)?;
    let stamp = Local::now().format("%Y-%m-%d_%H%M%S");
    let path = PathBuf::from(reports_dir).join(format!("{ticker}_analysis_{stamp}.html"));
    std::fs::write(&path, html)?;
    info!(path = %path.display(), "Report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::markdown::Section;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_inline_bold_before_italic() {
        assert_eq!(inline("**bold** and *italic*"), "<strong>bold</strong> and <em>italic</em>");
        assert_eq!(inline("__b__ _i_"), "<strong>b</strong> <em>i</em>");
    }

    #[test]
    fn test_recommendation_badge() {
        let html = inline("**Recommendation:** BUY (High Confidence)");
        assert!(html.contains("<span class=\"recommendation buy\">BUY</span>"));

        let html = inline("**Recommendation:** sell");
        assert!(html.contains("<span class=\"recommendation sell\">SELL</span>"));
    }

    #[test]
    fn test_bullet_list() {
        let html = markdown_to_html("intro\n- one\n- two\n\nafter");
        assert!(html.contains("<p>intro</p>"));
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn test_numbered_list_closes_with_ol() {
        let html = markdown_to_html("1. first\n2. second\n");
        assert!(html.contains("<ol>"));
        assert!(html.contains("</ol>"));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn test_adjacent_lists_of_different_kinds() {
        // Switching list kind must close the open list first
        let html = markdown_to_html("- a\n1. b\n");
        let ul_close = html.find("</ul>").unwrap();
        let ol_open = html.find("<ol>").unwrap();
        assert!(ul_close < ol_open);
    }

    #[test]
    fn test_subsection_heading() {
        let html = markdown_to_html("### Momentum\nbody");
        assert!(html.contains("<h3 class=\"subsection-title\">Momentum</h3>"));
    }

    #[test]
    fn test_round_trip_text_preserved() {
        let body = "Strong quarter with expanding margins.\nVolume was elevated.";
        let html = markdown_to_html(body);
        let stripped = Regex::new(r"<[^>]+>")
            .unwrap()
            .replace_all(&html, "")
            .to_string();
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&stripped), normalize(body));
    }

    #[test]
    fn test_render_document_structure() {
        let report = ParsedReport {
            ticker: "AAPL".to_string(),
            sections: vec![Section {
                title: "Technical Analysis".to_string(),
                body: "**Recommendation:** BUY".to_string(),
            }],
        };
        let summary = InvestmentSummary {
            recommendation: "BUY".to_string(),
            confidence: "High".to_string(),
            price_target: "$150".to_string(),
            thesis: "Solid.".to_string(),
        };

        let html = render_document(&report, &summary, "<svg></svg>", "3mo");
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("class=\"badge buy\""));
        assert!(html.contains("Technical Analysis"));
        assert!(html.contains("<svg></svg>"));
        assert!(html.contains("TickerLens"));
    }

    #[test]
    fn test_render_document_without_chart() {
        let report = ParsedReport {
            ticker: "AAPL".to_string(),
            sections: vec![],
        };
        let html = render_document(&report, &InvestmentSummary::default(), "", "3mo");
        assert!(!html.contains("chart-card"));
    }

    #[test]
    fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let reports_dir = dir.path().join("reports");
        let path = save_report(
            reports_dir.to_str().unwrap(),
            "AAPL",
            "<html></html>",
        )
        .unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("AAPL_analysis_"));
        assert!(name.ends_with(".html"));
    }
}
