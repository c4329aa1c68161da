//! Text renderers over store data.
//!
//! - **widget**: SwiftBar plugin text
//! - **summary**: end-of-day notification and markdown log entry
//! - **reports**: goal progress and the long-form analysis reports

pub mod reports;
pub mod summary;
pub mod widget;
