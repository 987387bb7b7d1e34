//! Small Markdown and text helpers shared by the renderer and the CLI.

const SECOND: f64 = 1000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Column alignment tokens, left-aligned first column and centered after.
const TABLE_ALIGN: [&str; 4] = [":---", ":---:", ":---:", ":---:"];

/// Render rows as a Markdown table. The header row is always emitted, even
/// when `headers` is empty, so the alignment row has something to attach to.
#[must_use]
pub fn render_markdown_table<S: AsRef<str>>(rows: &[Vec<S>], headers: &[S]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let columns = first.len().min(TABLE_ALIGN.len());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_row(headers));
    lines.push(table_row(&TABLE_ALIGN[..columns]));
    lines.extend(rows.iter().map(|cells| table_row(cells)));
    lines.join("\n")
}

fn table_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<&str> = cells.iter().map(|cell| cell.as_ref()).collect();
    format!("| {} |", cells.join(" | "))
}

/// Wrap `content` in a collapsible `<details>` block labelled by `summary`.
#[must_use]
pub fn render_accordion(summary: &str, content: &str, open: bool) -> String {
    let state = if open { "open" } else { "" };
    let content = content.trim();
    format!("<details {state}><summary><strong>{summary}</strong></summary>\n\n{content}\n\n</details>")
}

/// Wrap `code` in a fenced code block tagged with `lang` (may be empty).
#[must_use]
pub fn render_code_block(code: &str, lang: &str) -> String {
    format!("```{lang}\n{code}\n```")
}

/// Format a millisecond duration as e.g. "2 hours, 15 minutes, 5 seconds".
///
/// Seconds keep one decimal place only when there are no larger units;
/// otherwise they are rounded to the nearest whole second. Zero-valued units
/// are left out entirely.
#[must_use]
pub fn format_duration(milliseconds: f64) -> String {
    let mut remaining = milliseconds;

    let days = (remaining / DAY).floor();
    remaining %= DAY;

    let hours = (remaining / HOUR).floor();
    remaining %= HOUR;

    let minutes = (remaining / MINUTE).floor();
    remaining %= MINUTE;

    let seconds = if days == 0.0 && hours == 0.0 && minutes == 0.0 {
        (remaining / SECOND * 10.0).round() / 10.0
    } else {
        (remaining / SECOND).round()
    };

    [
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
        (seconds, "second"),
    ]
    .into_iter()
    .filter(|&(value, _)| value != 0.0)
    .map(|(value, unit)| format!("{} {}", format_number(value), pluralize(unit, value)))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Uppercase the first character and leave the rest untouched.
#[must_use]
pub fn upper_case_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Append an `s` to `word` unless `count` is exactly one.
#[must_use]
pub fn pluralize(word: &str, count: f64) -> String {
    if count == 1.0 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Print a number with at most one decimal, dropping a trailing `.0`.
fn format_number(value: f64) -> String {
    let s = format!("{value:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- format_duration -----------------------------------------------------

    #[test]
    fn test_format_duration_milliseconds() {
        assert_eq!(format_duration(500.0), "0.5 seconds");
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(3000.0), "3 seconds");
        assert_eq!(format_duration(1000.0), "1 second");
    }

    #[test]
    fn test_format_duration_fractional_seconds() {
        assert_eq!(format_duration(1118.34), "1.1 seconds");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(330000.0), "5 minutes, 30 seconds");
        assert_eq!(format_duration(60000.0), "1 minute");
    }

    #[test]
    fn test_format_duration_rounds_seconds_with_minutes() {
        assert_eq!(format_duration(61400.0), "1 minute, 1 second");
    }

    #[test]
    fn test_format_duration_hours() {
        // (5*1000)+(15*1000*60)+(2*1000*60*60)
        assert_eq!(format_duration(8105000.0), "2 hours, 15 minutes, 5 seconds");
        assert_eq!(format_duration(3600000.0), "1 hour");
    }

    #[test]
    fn test_format_duration_days() {
        // (8*1000)+(36*1000*60)+(13*1000*60*60)+(3*1000*60*60*24)
        assert_eq!(
            format_duration(308168000.0),
            "3 days, 13 hours, 36 minutes, 8 seconds"
        );
        assert_eq!(format_duration(86400000.0), "1 day");
    }

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(0.0), "");
    }

    // -- text helpers --------------------------------------------------------

    #[test]
    fn test_upper_case_first() {
        assert_eq!(upper_case_first("lorem"), "Lorem");
        assert_eq!(upper_case_first("failed tests"), "Failed tests");
        assert_eq!(upper_case_first(""), "");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("test", 1.0), "test");
        assert_eq!(pluralize("test", 0.0), "tests");
        assert_eq!(pluralize("suite", 2.0), "suites");
        assert_eq!(pluralize("second", 0.5), "seconds");
    }

    // -- markdown ------------------------------------------------------------

    #[test]
    fn test_render_markdown_table() {
        let rows = vec![vec!["A", "B"], vec!["C", "D"]];
        assert_eq!(
            render_markdown_table(&rows, &[]),
            "|  |\n| :--- | :---: |\n| A | B |\n| C | D |"
        );
    }

    #[test]
    fn test_render_markdown_table_with_headers() {
        let rows = vec![vec!["1", "2", "3"]];
        assert_eq!(
            render_markdown_table(&rows, &["X", "Y", "Z"]),
            "| X | Y | Z |\n| :--- | :---: | :---: |\n| 1 | 2 | 3 |"
        );
    }

    #[test]
    fn test_render_markdown_table_empty() {
        let rows: Vec<Vec<&str>> = vec![];
        assert_eq!(render_markdown_table(&rows, &[]), "");
    }

    #[test]
    fn test_render_accordion() {
        assert_eq!(
            render_accordion("Failed tests", "\n  a\n  b\n", true),
            "<details open><summary><strong>Failed tests</strong></summary>\n\na\n  b\n\n</details>"
        );
        assert!(render_accordion("Skipped", "x", false).starts_with("<details >"));
    }

    #[test]
    fn test_render_code_block() {
        assert_eq!(render_code_block("npx playwright test", ""), "```\nnpx playwright test\n```");
        assert_eq!(render_code_block("ls", "sh"), "```sh\nls\n```");
    }
}
