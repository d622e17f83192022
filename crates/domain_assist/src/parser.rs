//! Response parsing
//!
//! Turns the model's free text back into plan fields. This is a line-based
//! keyword heuristic: each header line switches the current section and
//! everything below it accumulates there. Output the heuristic does not
//! recognise ends up in empty sections and the default schedule, never in
//! an error.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use domain_cases::{HoursSchedule, SuggestedFields, DEFAULT_DAILY_HOURS, DEFAULT_PROGRESSION};

static HOURS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:hours?|hrs?)\b").expect("hours pattern is valid")
});

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•+]|\d+[.)])\s+").expect("bullet pattern is valid"));

const MAX_DAILY_HOURS: Decimal = dec!(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    SuitableDuties,
    DutiesToAvoid,
    Restrictions,
    Hours,
    Notes,
}

/// Plan fields recovered from a completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSuggestion {
    pub fields: SuggestedFields,
    /// Review / next-step lines
    pub notes: Vec<String>,
    /// Lines before the first recognised header
    pub preamble: Vec<String>,
    pub base_daily_hours: Decimal,
    /// False when the default daily hours were used
    pub hours_detected: bool,
    pub raw: String,
}

impl PlanSuggestion {
    /// True when no duty or restriction section was recognised
    pub fn is_empty(&self) -> bool {
        self.fields.suitable_duties.is_empty()
            && self.fields.duties_to_avoid.is_empty()
            && self.fields.restrictions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub key_points: Vec<String>,
}

/// Strips markdown decoration from a line
fn clean(line: &str) -> &str {
    line.trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
}

fn is_bullet(line: &str) -> bool {
    BULLET_RE.is_match(line)
}

fn strip_bullet(line: &str) -> &str {
    match BULLET_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

fn classify(header: &str) -> Option<Section> {
    let lower = header.to_lowercase();
    if lower.contains("avoid") {
        Some(Section::DutiesToAvoid)
    } else if lower.contains("duties") || lower.contains("tasks") {
        Some(Section::SuitableDuties)
    } else if lower.contains("restriction") || lower.contains("limitation") {
        Some(Section::Restrictions)
    } else if lower.contains("hours")
        && ["schedule", "progression", "graduated", "plan"].iter().any(|k| lower.contains(k))
    {
        Some(Section::Hours)
    } else if lower.contains("review") || lower.contains("next step") {
        Some(Section::Notes)
    } else {
        None
    }
}

/// Longest bare line, in words, still read as a section title
const MAX_PLAIN_HEADER_WORDS: usize = 6;

/// Returns the section and any inline content when `line` is a header
///
/// A header is a markdown heading, a fully bold line, a non-dash line whose
/// text before the first ':' names a section, or a short bare title such as
/// `Suitable Duties`. Bullets and sentences are never bare titles.
fn detect_header(line: &str) -> Option<(Section, &str)> {
    let trimmed = line.trim();
    let heading = trimmed.starts_with('#');
    let bold = trimmed.starts_with("**");
    let dash_bullet = trimmed.starts_with('-') || trimmed.starts_with('•') || trimmed.starts_with("* ");

    let text = clean(strip_bullet(trimmed));
    let (label, rest) = match text.split_once(':') {
        Some((label, rest)) => (label, rest.trim().trim_start_matches(['*', '_']).trim()),
        None => (text, ""),
    };

    let has_colon = text.contains(':');
    let bare_title = !is_bullet(trimmed)
        && !text.ends_with('.')
        && label.split_whitespace().count() <= MAX_PLAIN_HEADER_WORDS;
    if !(heading || bold || (has_colon && !dash_bullet) || bare_title) {
        return None;
    }
    classify(label).map(|section| (section, rest))
}

fn push_content(target: &mut Vec<String>, line: &str) {
    let item = clean(strip_bullet(line.trim()));
    if !item.is_empty() {
        target.push(item.to_string());
    }
}

/// First plausible daily-hours figure in `text`
///
/// Values outside (0, 24] are ignored.
pub fn extract_base_hours(text: &str) -> Option<Decimal> {
    HOURS_RE
        .captures_iter(text)
        .filter_map(|caps| Decimal::from_str(&caps[1]).ok())
        .find(|hours| *hours > Decimal::ZERO && *hours <= MAX_DAILY_HOURS)
}

/// Splits a plan completion into suggested fields
pub fn parse_plan_response(text: &str) -> PlanSuggestion {
    let mut section = Section::Preamble;
    let mut preamble = Vec::new();
    let mut suitable = Vec::new();
    let mut avoid = Vec::new();
    let mut restrictions = Vec::new();
    let mut hours_lines: Vec<String> = Vec::new();
    let mut notes = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let content = match detect_header(line) {
            Some((next, inline)) => {
                section = next;
                if inline.is_empty() {
                    continue;
                }
                inline
            }
            None => line,
        };

        let target = match section {
            Section::Preamble => &mut preamble,
            Section::SuitableDuties => &mut suitable,
            Section::DutiesToAvoid => &mut avoid,
            Section::Restrictions => &mut restrictions,
            Section::Hours => &mut hours_lines,
            Section::Notes => &mut notes,
        };
        push_content(target, content);
    }

    // Prefer a figure from the hours section, then anywhere in the text
    let detected = extract_base_hours(&hours_lines.join("\n")).or_else(|| extract_base_hours(text));
    let base_daily_hours = detected.unwrap_or(DEFAULT_DAILY_HOURS);

    PlanSuggestion {
        fields: SuggestedFields {
            suitable_duties: suitable,
            duties_to_avoid: avoid,
            restrictions,
            schedule: Some(HoursSchedule::from_base_hours(base_daily_hours, &DEFAULT_PROGRESSION)),
        },
        notes,
        preamble,
        base_daily_hours,
        hours_detected: detected.is_some(),
        raw: text.to_string(),
    }
}

/// Splits an insights completion into a summary and key points
pub fn parse_insights(text: &str) -> Insights {
    let mut summary: Vec<&str> = Vec::new();
    let mut key_points = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_bullet(line) {
            push_content(&mut key_points, line);
            continue;
        }
        let cleaned = clean(line);
        // Bare headings like "Key risks:" carry no content
        if cleaned.is_empty() || line.starts_with('#') || cleaned.ends_with(':') {
            continue;
        }
        summary.push(cleaned);
    }

    Insights {
        summary: summary.join(" "),
        key_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_with_inline_content() {
        let parsed = parse_plan_response("Restrictions: no lifting over 5kg");
        assert_eq!(parsed.fields.restrictions, vec!["no lifting over 5kg"]);
    }

    #[test]
    fn test_bullet_mentioning_avoid_stays_in_section() {
        let text = "Restrictions:\n- Avoid lifting above shoulder height\n- Seated work only";
        let parsed = parse_plan_response(text);
        assert_eq!(parsed.fields.restrictions.len(), 2);
        assert!(parsed.fields.duties_to_avoid.is_empty());
    }

    #[test]
    fn test_markdown_headings() {
        let text = "## Suitable Duties\n* Data entry\n## Duties to Avoid\n* Ladder work";
        let parsed = parse_plan_response(text);
        assert_eq!(parsed.fields.suitable_duties, vec!["Data entry"]);
        assert_eq!(parsed.fields.duties_to_avoid, vec!["Ladder work"]);
    }

    #[test]
    fn test_bare_title_headers() {
        let text = "Suitable Duties\n- Data entry\n- Filing\nDuties to Avoid\n- Ladder work\nRestrictions\n- No lifting over 5kg";
        let parsed = parse_plan_response(text);
        assert_eq!(parsed.fields.suitable_duties, vec!["Data entry", "Filing"]);
        assert_eq!(parsed.fields.duties_to_avoid, vec!["Ladder work"]);
        assert_eq!(parsed.fields.restrictions, vec!["No lifting over 5kg"]);
        assert!(parsed.preamble.is_empty());
    }

    #[test]
    fn test_sentence_naming_a_section_is_content() {
        let text = "Restrictions\nThe worker should avoid heavy duties for now.\n- No lifting";
        let parsed = parse_plan_response(text);
        assert_eq!(parsed.fields.restrictions.len(), 2);
        assert!(parsed.fields.duties_to_avoid.is_empty());
    }

    #[test]
    fn test_out_of_range_hours_are_ignored() {
        assert_eq!(extract_base_hours("38 hours per week, 6 hours per day"), Some(dec!(6)));
        assert_eq!(extract_base_hours("0 hrs"), None);
        assert_eq!(extract_base_hours("7.5 hrs"), Some(dec!(7.5)));
    }

    #[test]
    fn test_insights_split() {
        let insights = parse_insights(
            "The worker is progressing well.\nKey risks:\n- Delayed specialist review\n1. Book follow-up",
        );
        assert_eq!(insights.summary, "The worker is progressing well.");
        assert_eq!(insights.key_points, vec!["Delayed specialist review", "Book follow-up"]);
    }
}
