//! Status icons for the rendered summary: octicon image links or plain emoji.

use clap::ValueEnum;

const ICON_SIZE: u32 = 14;

/// Neutral color for icons without a status color.
const DEFAULT_COLOR: &str = "abb4bf";

const OCTICONS: &[(&str, &str)] = &[
    ("failed", "stop"),
    ("passed", "check-circle"),
    ("flaky", "alert"),
    ("skipped", "skip"),
    ("stats", "pulse"),
    ("duration", "clock"),
    ("link", "link-external"),
    ("report", "package"),
    ("commit", "git-pull-request"),
    ("info", "info"),
];

const EMOJIS: &[(&str, &str)] = &[
    ("failed", "❌"),
    ("passed", "✅"),
    ("flaky", "⚠️"),
    ("skipped", "⏭️"),
    ("info", "ℹ️"),
];

const COLORS: &[(&str, &str)] = &[
    ("failed", "da3633"),
    ("passed", "3fb950"),
    ("flaky", "d29922"),
    ("skipped", "0967d9"),
];

/// Visual style of the icons in the rendered summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IconStyle {
    /// Colored octicons served by an external icon service.
    #[default]
    Octicons,
    /// Plain emoji characters.
    Emojis,
}

impl IconStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconStyle::Octicons => "octicons",
            IconStyle::Emojis => "emojis",
        }
    }
}

impl std::fmt::Display for IconStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
}

/// Render the icon for `status`. Unknown statuses render as an empty string.
#[must_use]
pub fn render_icon(status: &str, style: IconStyle) -> String {
    match style {
        IconStyle::Emojis => lookup(EMOJIS, status).unwrap_or_default().to_string(),
        IconStyle::Octicons => match lookup(OCTICONS, status) {
            Some(icon) => {
                let color = lookup(COLORS, status).unwrap_or(DEFAULT_COLOR);
                octicon_url(icon, status, color)
            }
            None => String::new(),
        },
    }
}

fn octicon_url(icon: &str, label: &str, color: &str) -> String {
    format!("![{label}](https://icongr.am/octicons/{icon}.svg?size={ICON_SIZE}&color={color})")
}
