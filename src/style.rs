use colored::{ColoredString, Colorize};
use tracing::Level;

/// Colored level label. `INFO` and `WARN` carry a trailing space so the
/// column lines up with the five-letter labels.
pub fn level_label(level: &Level) -> ColoredString {
    match *level {
        Level::TRACE => "TRACE".bright_black(),
        Level::DEBUG => "DEBUG".magenta(),
        Level::INFO => "INFO ".blue(),
        Level::WARN => "WARN ".yellow(),
        Level::ERROR => "ERROR".red(),
    }
}

pub fn timestamp(formatted: &str) -> ColoredString {
    formatted.green()
}

pub fn function(name: &str) -> ColoredString {
    name.cyan()
}
