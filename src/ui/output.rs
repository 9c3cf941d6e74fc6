//! Status lines for CLI output

use console::style;

/// Title line for a command
pub fn intro(title: &str) {
    println!("{}", style(title).cyan().bold());
}

/// A completed step
pub fn step_ok(message: &str) {
    println!("  {} {}", style("[OK]").green(), message);
}

/// A recovered problem, with a suggestion
pub fn step_warn_hint(message: &str, hint: &str) {
    println!("  {} {} - {}", style("[WARN]").yellow(), message, style(hint).dim());
}

/// Informational line
pub fn step_info(message: &str) {
    println!("  {} {}", style("[INFO]").cyan(), message);
}

/// Aligned key/value line
pub fn key_value(key: &str, value: &str) {
    println!("  {:<10} {}", style(key).dim(), value);
}
