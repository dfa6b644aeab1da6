//! HTML templates, embedded at compile time using `include_str!`.

/// The single client page: create form plus task list.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
