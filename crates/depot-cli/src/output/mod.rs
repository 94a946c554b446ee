//! Terminal output helpers: colored status lines, tables, and interactive
//! prompts, with `NO_COLOR`/TTY-aware graceful degradation.

pub mod prompt;
pub mod table;

use std::io::{stderr, stdout, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

static IS_TTY: std::sync::LazyLock<bool> =
    std::sync::LazyLock::new(|| stdout().is_terminal() && stderr().is_terminal());

static NO_COLOR: std::sync::LazyLock<bool> =
    std::sync::LazyLock::new(|| std::env::var("NO_COLOR").is_ok());

/// Decide whether ANSI colors should be used, honoring an explicit
/// `--color`/`--no-color` flag over TTY detection and `NO_COLOR`.
pub fn init(force_ansi: Option<bool>) {
    let colors = force_ansi.unwrap_or(*IS_TTY && !*NO_COLOR);
    COLOR_ENABLED.store(colors, Ordering::Relaxed);
}

#[must_use]
pub fn colors_enabled() -> bool {
    COLOR_ENABLED.load(Ordering::Relaxed)
}

/// Print a success message.
pub fn success(text: &str) {
    use owo_colors::OwoColorize;
    if colors_enabled() {
        println!("{} {text}", "==>".green().bold());
    } else {
        println!("==> {text}");
    }
}

/// Print a warning message.
pub fn warning(text: &str) {
    use owo_colors::OwoColorize;
    if colors_enabled() {
        eprintln!("{} {}", "warning:".yellow().bold(), text.yellow());
    } else {
        eprintln!("warning: {text}");
    }
}

/// Print an error message.
pub fn error(text: &str) {
    use owo_colors::OwoColorize;
    if colors_enabled() {
        eprintln!("{} {}", "error:".red().bold(), text.red());
    } else {
        eprintln!("error: {text}");
    }
}

/// Format a duration for display, e.g. in a "resolved in Nms" footer.
#[must_use]
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        format!("{:.0}us", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.2}s")
    }
}
