//! String formatting utilities for UI rendering.

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Thousands separators: `10500` -> `10,500`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Abbreviated count: `9300` -> `9.3k`, `10000` -> `10k`, `1200000` -> `1.2M`.
pub fn format_number_short(n: u64) -> String {
    fn trimmed(value: f64, suffix: &str) -> String {
        let text = format!("{:.1}", value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        format!("{}{}", text, suffix)
    }

    if n >= 1_000_000 {
        trimmed(n as f64 / 1_000_000.0, "M")
    } else if n >= 1_000 {
        trimmed(n as f64 / 1_000.0, "k")
    } else {
        n.to_string()
    }
}

/// Relative age: `?` (negative), `now`, `Nm`, `Nh`, `Nd`.
pub fn format_time_ago(minutes: i64) -> String {
    if minutes < 0 {
        "?".to_string()
    } else if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 1440 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / 1440)
    }
}

/// `27000` seconds -> `7h 30m`.
pub fn format_hours_minutes(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

/// Signed number with an explicit `+` for non-negative values.
pub fn signed(value: f64, precision: usize) -> String {
    if value >= 0.0 {
        format!("+{:.*}", precision, value)
    } else {
        format!("{:.*}", precision, value)
    }
}

/// Goal values keep one decimal when whole: `7.0`, `7.5`, `75.0`.
pub fn format_goal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Format a byte count as a human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes > MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes > KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration in seconds as human-readable string.
pub fn format_duration_secs(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}
