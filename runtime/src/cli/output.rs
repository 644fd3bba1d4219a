//! Shared CLI output formatting.

use std::io::IsTerminal;

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() || std::env::var("TOPLOADER_NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    pub fn cyan(&self, s: &str) -> String {
        self.paint(CYAN, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print a branded header for CLI output.
pub fn print_header(s: &Styled) {
    eprintln!(
        "  {} {}",
        s.bold("Toploader"),
        s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    eprintln!();
}

/// Print a section header (e.g., "Frames", "History").
pub fn print_section(s: &Styled, title: &str) {
    println!("  {}", s.bold(title));
}

/// Text rendering of a progress fraction, e.g. `[██░░░░░░]  25%`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled),
        (fraction * 100.0).round() as u32
    )
}

/// Check if --quiet mode is active.
pub fn is_quiet() -> bool {
    std::env::var("TOPLOADER_QUIET").is_ok()
}

/// Check if --json mode is active.
pub fn is_json() -> bool {
    std::env::var("TOPLOADER_JSON").is_ok()
}

/// Print JSON output to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[\u{2591}\u{2591}\u{2591}\u{2591}]   0%");
        assert_eq!(progress_bar(0.5, 4), "[\u{2588}\u{2588}\u{2591}\u{2591}]  50%");
        assert_eq!(progress_bar(1.7, 4), "[\u{2588}\u{2588}\u{2588}\u{2588}] 100%");
    }
}
