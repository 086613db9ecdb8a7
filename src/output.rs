//! Console output helpers shared by the interactive menus

use crate::types::{CertStatus, ProjectStatus};
use colored::Colorize;
use console::Term;

/// Clear the terminal and print a panel-style heading
pub fn heading(title: &str) {
    let term = Term::stdout();
    let _ = term.clear_screen();
    let width = title.chars().count() + 4;
    println!("{}", format!("┌{}┐", "─".repeat(width)).bold());
    println!("{}", format!("│  {}  │", title).bold());
    println!("{}", format!("└{}┘", "─".repeat(width)).bold());
    println!();
}

/// Print a framed multi-line info panel
pub fn panel(title: &str, body: &str) {
    let inner = body
        .lines()
        .map(str::len)
        .chain(std::iter::once(title.len()))
        .max()
        .unwrap_or(0)
        + 2;
    println!("{}", format!("╭─ {} {}", title, "─".repeat(inner.saturating_sub(title.len()))).cyan());
    for line in body.lines() {
        println!("{} {}", "│".cyan(), line);
    }
    println!("{}", format!("╰{}", "─".repeat(inner + 3)).cyan());
}

/// Render rows as a fixed-width table with a header
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("  {}", header_line.join("  ").bold().cyan());
    println!(
        "  {}",
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("──")
            .dimmed()
    );

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_visible(cell, widths.get(i).copied().unwrap_or(0)))
            .collect();
        println!("  {}", line.join("  "));
    }
}

// Column math has to ignore ANSI color codes in cells.
fn visible_width(cell: &str) -> usize {
    console::measure_text_width(cell)
}

fn pad_visible(cell: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(cell));
    format!("{}{}", cell, " ".repeat(pad))
}

/// Colored status dot + text for a certificate status
pub fn cert_status_cell(status: CertStatus) -> String {
    match status {
        CertStatus::Active => format!("{} active", "●".green()),
        CertStatus::Pending => format!("{} pending", "●".yellow()),
        CertStatus::Failed => format!("{} failed", "●".red()),
    }
}

/// Colored label for a project's aggregate container status
pub fn project_status_cell(status: ProjectStatus) -> String {
    match status {
        ProjectStatus::Running => "Running".green().to_string(),
        ProjectStatus::Partial => "Partial".yellow().to_string(),
        ProjectStatus::Stopped => "Stopped".red().to_string(),
        ProjectStatus::NotCreated => "Not Created".dimmed().to_string(),
        ProjectStatus::Unknown => "Unknown".dimmed().to_string(),
    }
}

/// Print a success line
pub fn success(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

/// Print a warning line
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message.yellow());
}

/// Print a failure line
pub fn failure(message: &str) {
    println!("{} {}", "❌".red(), message.red());
}

/// Print an informational line
pub fn info(message: &str) {
    println!("{}", message.cyan());
}

/// Block until the user presses Enter
pub fn pause() {
    use std::io::{BufRead, Write};
    print!("\n{}", "Press Enter to continue".dimmed());
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
