//! ANSI styling for rendered events.

use colored::{Color, Colorize};

use crate::event::ConsoleMethod;

/// Width the type tag is padded to inside its brackets.
const TAG_WIDTH: usize = 10;

/// Applies colors when enabled, passes text through otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// `[LOG       ]`-style tag, colored per method.
    pub fn tag(&self, method: ConsoleMethod) -> String {
        let label = format!(
            "[{:<width$}]",
            method.as_str().to_uppercase(),
            width = TAG_WIDTH
        );
        self.paint(&label, color_for(method))
    }
}

pub fn color_for(method: ConsoleMethod) -> Color {
    match method {
        ConsoleMethod::Error => Color::Red,
        ConsoleMethod::Warn => Color::Yellow,
        ConsoleMethod::Info => Color::Cyan,
        ConsoleMethod::Debug => Color::BrightBlack,
        ConsoleMethod::Table => Color::Magenta,
        ConsoleMethod::Log => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_fixed_width() {
        let style = Style::new(false);
        assert_eq!(style.tag(ConsoleMethod::Log), "[LOG       ]");
        assert_eq!(style.tag(ConsoleMethod::Table), "[TABLE     ]");
    }

    #[test]
    fn test_plain_style_leaves_text_alone() {
        let style = Style::new(false);
        assert_eq!(style.dim("ts"), "ts");
        assert_eq!(style.paint("x", Color::Red), "x");
    }
}
