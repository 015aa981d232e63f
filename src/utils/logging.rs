// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored terminal output helpers

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    colored::control::set_override(colored_output);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

/// A filled square in the given `#rrggbb` color followed by `msg`.
/// Unparseable colors fall back to an uncolored square.
pub fn format_swatch(hex: &str, msg: &str) -> String {
    match parse_hex(hex) {
        Some((r, g, b)) => format!("{} {}", "■".truecolor(r, g, b), msg),
        None => format!("■ {}", msg),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#1f77b4"), Some((0x1f, 0x77, 0xb4)));
        assert_eq!(parse_hex("1f77b4"), None);
        assert_eq!(parse_hex("#zz77b4"), None);
    }

    #[test]
    fn test_format_swatch_keeps_message() {
        assert!(format_swatch("#ff7f0e", "cluster 1").ends_with("cluster 1"));
        assert!(format_swatch("bad", "cluster 2").ends_with("cluster 2"));
    }
}
