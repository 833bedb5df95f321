//! Numbered-sequence scripts.
//!
//! A script written as a numbered list ("1. ...", "2) ...", "3 - ...") is
//! already a scene list and skips analysis.

use regex::Regex;
use std::sync::OnceLock;

/// A number followed by `.` or `)` and whitespace, or by `-`/`:` with
/// whitespace after it. "3.5 million" is not a marker.
fn marker() -> &'static Option<Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^\d+[.)]\s|^\d+\s*[-:]\s").ok())
}

/// The marker plus any whitespace after it, for stripping.
fn strip_marker() -> &'static Option<Regex> {
    static STRIP: OnceLock<Option<Regex>> = OnceLock::new();
    STRIP.get_or_init(|| Regex::new(r"^(?:\d+[.)]|\d+\s*[-:])\s+").ok())
}

fn non_empty_lines(script: &str) -> impl Iterator<Item = &str> {
    script.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// True when the script has at least two non-empty lines and at least half
/// of them start with a number marker.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::is_sequence_format;
///
/// assert!(is_sequence_format("1. Dawn over the harbor\n2. The ferry leaves"));
/// assert!(!is_sequence_format("1. Just one line"));
/// assert!(!is_sequence_format("It was a dark night.\nRain fell.\n1. A note"));
/// ```
pub fn is_sequence_format(script: &str) -> bool {
    let Some(marker) = marker() else {
        return false;
    };
    let lines: Vec<&str> = non_empty_lines(script).collect();
    if lines.len() < 2 {
        return false;
    }
    let numbered = lines.iter().filter(|line| marker.is_match(line)).count();
    numbered >= 2 && numbered * 2 >= lines.len()
}

/// Non-empty lines with their number markers stripped.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::extract_sequence_descriptions;
///
/// let scenes = extract_sequence_descriptions("1. Dawn\n\n2) Noon\n3 - Dusk\n4: Night");
/// assert_eq!(scenes, vec!["Dawn", "Noon", "Dusk", "Night"]);
/// ```
pub fn extract_sequence_descriptions(script: &str) -> Vec<String> {
    non_empty_lines(script)
        .map(|line| match strip_marker() {
            Some(marker) => marker.replace(line, "").trim().to_string(),
            None => line.to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_numbered_counts_as_sequence() {
        let script = "Opening\n1. Kitchen at dawn\n2. Market\nClosing";
        assert!(is_sequence_format(script));
    }

    #[test]
    fn prose_with_dates_is_not_a_sequence() {
        let script = "In 1988 she moved to Seoul.\nShe opened a shop.\nIt failed.";
        assert!(!is_sequence_format(script));
    }

    #[test]
    fn decimal_prose_is_not_a_sequence() {
        let script = "3.5 million people watched.\n2.1 percent voted.\nThe end.";
        assert!(!is_sequence_format(script));
    }

    #[test]
    fn extraction_leaves_decimals_intact() {
        let scenes = extract_sequence_descriptions("1. Rooftop\n3.5 million people watched.");
        assert_eq!(scenes, vec!["Rooftop", "3.5 million people watched."]);
    }

    #[test]
    fn extraction_keeps_unnumbered_lines() {
        let scenes = extract_sequence_descriptions("1. Rooftop\nA quiet street\n2. Subway");
        assert_eq!(scenes, vec!["Rooftop", "A quiet street", "Subway"]);
    }
}
