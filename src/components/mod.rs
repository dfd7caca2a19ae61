//! UI Components
//!
//! Reusable Leptos components.

mod confirm_button;
mod data_table;
mod google_button;
mod markdown_view;
mod pagination;
mod progress_bar;
mod row_actions;
mod status_toggle;
mod sticky_header;
mod toast_viewport;

pub use confirm_button::ConfirmButton;
pub use data_table::{Column, DataTable};
pub use google_button::GoogleSignInButton;
pub use markdown_view::MarkdownView;
pub use pagination::{page_window, PageItem, Pagination};
pub use progress_bar::ProgressBar;
pub use row_actions::RowActions;
pub use status_toggle::StatusToggle;
pub use sticky_header::StickyHeader;
pub use toast_viewport::ToastViewport;
