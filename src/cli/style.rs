//! Terminal styling helpers

use owo_colors::{OwoColorize, Stream, Style};

/// Semantic styles for CLI output
pub trait Stylize {
    /// Success
    fn success(&self) -> String;
    /// Warning
    fn warn(&self) -> String;
    /// De-emphasized detail
    fn muted(&self) -> String;
    /// Highlighted value
    fn accent(&self) -> String;
}

fn styled(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

impl<T: AsRef<str>> Stylize for T {
    fn success(&self) -> String {
        styled(self.as_ref(), Style::new().green())
    }

    fn warn(&self) -> String {
        styled(self.as_ref(), Style::new().yellow())
    }

    fn muted(&self) -> String {
        styled(self.as_ref(), Style::new().dimmed())
    }

    fn accent(&self) -> String {
        styled(self.as_ref(), Style::new().cyan().bold())
    }
}
