//! Interactive prompt utilities.

use dialoguer::{theme::ColorfulTheme, Select as DialoguerSelect};
use std::io::{self, IsTerminal};

/// Check if interactive prompts are available.
#[must_use]
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Selection prompt, used by `depot resolve` to ask Accept/Decline/Abandon
/// for each proposed solution.
pub struct Select<T> {
    message: String,
    items: Vec<T>,
    default: Option<usize>,
}

impl<T: std::fmt::Display> Select<T> {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            items: Vec::new(),
            default: None,
        }
    }

    #[must_use]
    pub fn items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn default(mut self, index: usize) -> Self {
        self.default = Some(index);
        self
    }

    /// Show the prompt and get the selected index; falls back to the
    /// configured default (or `0`) when stdin/stdout isn't a terminal.
    pub fn prompt(&self) -> io::Result<usize> {
        if !is_interactive() {
            return Ok(self.default.unwrap_or(0));
        }

        let theme = get_theme();
        let mut prompt = DialoguerSelect::with_theme(&theme)
            .with_prompt(&self.message)
            .items(&self.items);

        if let Some(default) = self.default {
            prompt = prompt.default(default);
        }

        prompt.interact().map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_falls_back_to_default() {
        let select = Select::new("pick one").items(["a", "b", "c"]).default(1);
        assert_eq!(select.prompt().unwrap(), 1);
    }
}
