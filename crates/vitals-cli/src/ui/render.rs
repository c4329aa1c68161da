//! Rendering primitives for CLI output.

use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, symbols, Badge};

/// Inner width of report banners and section rules.
pub const REPORT_WIDTH: usize = 44;

/// Render a header line for a command.
///
/// Pretty mode: "Vitals · command (context)"
/// Plain mode: "vitals command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Vitals", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("vitals {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Boxed title for the long-form reports.
pub fn banner(ctx: &UiContext, title: &str) -> String {
    let (tl, tr, bl, br, h, v) = if ctx.unicode {
        ("\u{2554}", "\u{2557}", "\u{255A}", "\u{255D}", "\u{2550}", "\u{2551}")
    } else {
        ("+", "+", "+", "+", "=", "|")
    };
    let len = title.chars().count().min(REPORT_WIDTH);
    let left = (REPORT_WIDTH - len) / 2;
    let right = REPORT_WIDTH - len - left;
    let title = styled(title, styles::bold(), ctx.color);
    format!(
        "{tl}{rule}{tr}\n{v}{}{}{}{v}\n{bl}{rule}{br}",
        " ".repeat(left),
        title,
        " ".repeat(right),
        rule = h.repeat(REPORT_WIDTH),
    )
}

/// Section title followed by a rule.
pub fn section(ctx: &UiContext, title: &str) -> String {
    format!(
        "{}\n{}",
        styled(title, styles::bold(), ctx.color),
        divider(ctx)
    )
}

/// Thin rule under section titles.
pub fn divider(ctx: &UiContext) -> String {
    symbols::RULE.get(ctx.unicode).repeat(REPORT_WIDTH)
}

/// Closing rule of a report.
pub fn footer_rule(ctx: &UiContext) -> String {
    symbols::DOUBLE_RULE.get(ctx.unicode).repeat(REPORT_WIDTH)
}

/// Horizontal bar of `width` cells, `pct` (clamped to 0..=100) filled.
pub fn bar(ctx: &UiContext, pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64) as usize;
    let filled = filled.min(width);
    format!(
        "{}{}",
        symbols::BAR_FULL.get(ctx.unicode).repeat(filled),
        symbols::BAR_EMPTY.get(ctx.unicode).repeat(width - filled)
    )
}

/// Solid run of `len` bar cells, used by the weekday and month charts.
pub fn solid(ctx: &UiContext, len: usize) -> String {
    symbols::BAR_FULL.get(ctx.unicode).repeat(len)
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a borderless table.
///
/// Pretty mode: dim header row, two-space column gaps
/// Plain mode: tab-separated values, no header
pub fn simple_table(ctx: &UiContext, headers: &[&str], rows: &[Vec<String>]) -> String {
    if ctx.mode.is_pretty() {
        let mut table = ComfyTable::new();
        table.load_preset(comfy_table::presets::NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(u16::try_from(ctx.width).unwrap_or(u16::MAX));

        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|h| {
                let cell = Cell::new(h);
                if ctx.color {
                    cell.add_attribute(Attribute::Dim)
                } else {
                    cell
                }
            })
            .collect();
        table.set_header(header_cells);

        for i in 0..headers.len() {
            if let Some(column) = table.column_mut(i) {
                column.set_padding((0, 2));
            }
        }
        for row in rows {
            table.add_row(row);
        }
        table.to_string()
    } else {
        rows.iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print to stdout unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Write an error and its hint to stderr.
///
/// Cron and launchd mail stderr, so outside a terminal the lines are
/// `error=` / `hint=` pairs.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    let error_hint = error_hint.map(|h| h.trim_start_matches("Hint:").trim());
    if ctx.mode.is_pretty() {
        eprintln!("{}", badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            eprintln!("{}", hint(ctx, h));
        }
    } else {
        eprintln!("error={}", message);
        if let Some(h) = error_hint {
            eprintln!("hint={}", h);
        }
    }
}
