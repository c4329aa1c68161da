//! UI primitives for the Vitals CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges, styles, report glyphs
//! - **Render**: Headers, banners, bars, tables, hints
//! - **Progress**: Spinners and progress bars
//! - **Format**: Number, size and age formatting
//!
//! Widget and notification text is a fixed protocol and does not go
//! through this layer; see [`crate::views`].

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, banner, bar, blank_line, divider, footer_rule, header, hint, kv, print, print_error,
    section, simple_table, solid,
};

pub use progress::{ProgressBar, Spinner};

pub use format::{format_bytes, format_number, format_number_short, format_time_ago};
