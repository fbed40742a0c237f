use crate::digest::Digest;
use std::fmt::Write;

/// Colour is an explicit input, never ambient state; the binary decides
/// from the terminal, tests pass `Plain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Plain,
    Ansi,
}

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render the three report sections as fixed-width text. Empty sections
/// still print their headers so downstream scripting sees a stable shape.
pub fn render(digest: &Digest, color: ColorMode) -> String {
    let mut out = String::new();
    section(&mut out, color, "Top endpoints");
    frequency_table(&mut out, &digest.endpoints);
    out.push('\n');
    section(&mut out, color, "Top clients");
    frequency_table(&mut out, &digest.clients);
    out.push('\n');
    section(&mut out, color, "Slowest operations");
    slow_table(&mut out, digest);
    out
}

fn section(out: &mut String, color: ColorMode, title: &str) {
    match color {
        ColorMode::Ansi => {
            let _ = writeln!(out, "{BOLD}== {title} =={RESET}");
        }
        ColorMode::Plain => {
            let _ = writeln!(out, "== {title} ==");
        }
    }
}

fn frequency_table(out: &mut String, entries: &[crate::freq::FrequencyEntry]) {
    for e in entries {
        let _ = writeln!(out, "{:>7}  {}", e.count, e.value);
    }
}

fn slow_table(out: &mut String, digest: &Digest) {
    let _ = writeln!(out, "{:>9} | {:<6} | {}", "duration", "status", "endpoint");
    let _ = writeln!(out, "{}-+-{}-+-{}", "-".repeat(9), "-".repeat(6), "-".repeat(8));
    for op in &digest.slowest {
        let _ = writeln!(out, "{:>9} | {:<6} | {}", op.duration_millis, op.status, op.endpoint);
    }
}
