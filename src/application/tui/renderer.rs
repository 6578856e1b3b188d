use super::theme::Theme;
use crate::domain::{DiaryEntry, ImportSummary};

/// Plain terminal output for the non-interactive commands.
pub struct EntryRenderer {
    theme: Theme,
    color: bool,
}

impl EntryRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme, color: true }
    }

    /// Renderer that emits no escape codes, for pipes and tests.
    pub fn plain() -> Self {
        Self {
            theme: Theme::default(),
            color: false,
        }
    }

    fn date(&self, text: &str) -> String {
        if self.color {
            self.theme.colors.date.colorize_bold(text)
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            self.theme.colors.dimmed.colorize(text)
        } else {
            text.to_string()
        }
    }

    pub fn render_entry(&self, entry: &DiaryEntry) -> String {
        format!("=== {} ===\n{}\n", self.date(&entry.display_date()), entry.text)
    }

    pub fn render_list(&self, entries: &[DiaryEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", self.dimmed("No entries found."));
        }

        let mut out = String::new();
        for entry in entries {
            let mut lines = entry.text.lines();
            let first = lines.next().unwrap_or("");
            out.push_str(&format!("{}  {}\n", self.date(&entry.display_date()), first));
            for line in lines {
                out.push_str(&format!("             {}\n", line));
            }
        }
        out
    }

    pub fn render_missing(&self, iso_date: &str) -> String {
        format!("{}\n", self.dimmed(&format!("No entry for {}", iso_date)))
    }

    pub fn render_import(&self, summary: &ImportSummary) -> String {
        format!("Diary imported: {}\n", summary)
    }
}
