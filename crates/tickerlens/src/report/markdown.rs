//! Markdown report aggregation and section parsing

use crate::models::AnalysisState;
use regex::Regex;

/// Report title prefix; the section parser keys off the same text
const TITLE_PREFIX: &str = "# Stock Analysis Report:";
const FOOTER: &str = "*Generated by TickerLens*";

/// Section titles recognized by the parser, in report order
pub const SECTION_TITLES: [&str; 5] = [
    "Technical Analysis",
    "Fundamental Analysis",
    "News & Sentiment Analysis",
    "Macro Analysis",
    "AI Investment Outlook",
];

/// Concatenate available sections into the final markdown report
///
/// Absent analyses are skipped entirely; their headings never appear.
pub fn aggregate(state: &AnalysisState) -> String {
    let mut report = format!("{TITLE_PREFIX} {}\n\n", state.decision.ticker);

    let sections = [
        ("Technical Analysis", &state.technical_analysis),
        ("Fundamental Analysis", &state.fundamental_analysis),
        ("News & Sentiment Analysis", &state.news_analysis),
        ("Macro Analysis", &state.macro_analysis),
        ("AI Investment Outlook", &state.ai_outlook),
    ];

    for (title, body) in sections {
        if let Some(text) = body {
            report.push_str(&format!("## {title}\n\n{}\n\n", text.trim()));
        }
    }

    report.push_str(&format!("---\n{FOOTER}\n"));
    report
}

/// One parsed report section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Ticker and sections recovered from an aggregated report
#[derive(Debug, Clone, Default)]
pub struct ParsedReport {
    pub ticker: String,
    pub sections: Vec<Section>,
}

/// Parse an aggregated markdown report back into sections
///
/// Only the titles in [`SECTION_TITLES`] start sections. Any other `##`
/// heading inside a recognized section is demoted to `###` body text; one
/// appearing before the first recognized section is dropped. Title, `---`,
/// and footer lines never reach section bodies. Empty bodies are valid.
pub fn parse(markdown: &str) -> ParsedReport {
    let ticker = Regex::new(r"#\s*Stock Analysis Report:\s*(\w+)")
        .ok()
        .and_then(|re| re.captures(markdown))
        .map_or_else(|| "UNKNOWN".to_string(), |caps| caps[1].to_string());

    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in markdown.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            let heading = heading.trim();
            if SECTION_TITLES.contains(&heading) {
                if let Some((title, body)) = current.take() {
                    sections.push(finish_section(title, body));
                }
                current = Some((heading.to_string(), Vec::new()));
            } else if let Some((_, body)) = &mut current {
                // Unrecognized subheading: demote so it stays inside the section
                body.push(format!("### {heading}"));
            }
            continue;
        }

        if line.starts_with("# ") || line.starts_with("---") || line.starts_with("*Generated") {
            continue;
        }

        if let Some((_, body)) = &mut current {
            body.push(line.to_string());
        }
    }

    if let Some((title, body)) = current {
        sections.push(finish_section(title, body));
    }

    ParsedReport { ticker, sections }
}

fn finish_section(title: String, body: Vec<String>) -> Section {
    Section {
        title,
        body: body.join("\n").trim().to_string(),
    }
}

/// Icon and CSS class for a section title
pub fn section_meta(title: &str) -> (&'static str, &'static str) {
    match title {
        "Technical Analysis" => ("\u{1F4C8}", "technical"),
        "Fundamental Analysis" => ("\u{1F4CA}", "fundamental"),
        "News & Sentiment Analysis" => ("\u{1F4F0}", "news"),
        "Macro Analysis" => ("\u{1F30D}", "macro"),
        "AI Investment Outlook" => ("\u{1F3AF}", "outlook"),
        _ => ("\u{1F4CB}", "technical"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouterDecision;

    fn state_with(
        technical: Option<&str>,
        fundamental: Option<&str>,
        news: Option<&str>,
        macro_: Option<&str>,
        outlook: Option<&str>,
    ) -> AnalysisState {
        let mut state = AnalysisState::new("q");
        state.decision = RouterDecision {
            ticker: "AAPL".to_string(),
            ..RouterDecision::default()
        };
        state.technical_analysis = technical.map(String::from);
        state.fundamental_analysis = fundamental.map(String::from);
        state.news_analysis = news.map(String::from);
        state.macro_analysis = macro_.map(String::from);
        state.ai_outlook = outlook.map(String::from);
        state
    }

    #[test]
    fn test_aggregate_skips_absent_sections() {
        let state = state_with(Some("Up."), None, None, None, Some("**Recommendation:** BUY"));
        let report = aggregate(&state);

        assert!(report.starts_with("# Stock Analysis Report: AAPL"));
        assert!(report.contains("## Technical Analysis"));
        assert!(!report.contains("## Fundamental Analysis"));
        assert!(!report.contains("## News & Sentiment Analysis"));
        assert!(report.contains("## AI Investment Outlook"));
        assert!(report.contains("*Generated by TickerLens*"));
    }

    #[test]
    fn test_round_trip_preserves_count_and_order() {
        let state = state_with(Some("T"), Some("F"), None, Some("M"), Some("O"));
        let parsed = parse(&aggregate(&state));

        assert_eq!(parsed.ticker, "AAPL");
        let titles: Vec<&str> = parsed.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Technical Analysis",
                "Fundamental Analysis",
                "Macro Analysis",
                "AI Investment Outlook"
            ]
        );
        assert_eq!(parsed.sections[0].body, "T");
    }

    #[test]
    fn test_parse_without_title_yields_unknown() {
        let parsed = parse("just some text\n\nmore text");
        assert_eq!(parsed.ticker, "UNKNOWN");
        assert!(parsed.sections.is_empty());
    }

    #[test]
    fn test_unrecognized_heading_demoted_inside_section() {
        let markdown = "# Stock Analysis Report: TSLA\n\n\
            ## Technical Analysis\n\nIntro.\n\n## Momentum Detail\n\nStill technical.\n";
        let parsed = parse(markdown);

        assert_eq!(parsed.sections.len(), 1);
        assert!(parsed.sections[0].body.contains("### Momentum Detail"));
        assert!(parsed.sections[0].body.contains("Still technical."));
    }

    #[test]
    fn test_unrecognized_heading_before_first_section_dropped() {
        let markdown =
            "# Stock Analysis Report: TSLA\n\n## Preamble\n\nnoise\n\n## Technical Analysis\n\nBody.";
        let parsed = parse(markdown);

        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].title, "Technical Analysis");
        assert!(!parsed.sections[0].body.contains("noise"));
    }

    #[test]
    fn test_empty_section_body_is_valid() {
        let markdown = "# Stock Analysis Report: TSLA\n\n## Technical Analysis\n\n## Macro Analysis\n\nM.";
        let parsed = parse(markdown);

        assert_eq!(parsed.sections.len(), 2);
        assert_eq!(parsed.sections[0].body, "");
        assert_eq!(parsed.sections[1].body, "M.");
    }

    #[test]
    fn test_footer_lines_never_reach_bodies() {
        let state = state_with(Some("T"), None, None, None, None);
        let parsed = parse(&aggregate(&state));
        assert!(!parsed.sections[0].body.contains("Generated by"));
        assert!(!parsed.sections[0].body.contains("---"));
    }

    #[test]
    fn test_section_meta() {
        assert_eq!(section_meta("AI Investment Outlook").1, "outlook");
        assert_eq!(section_meta("Something Else").1, "technical");
    }
}
