// ============================================================================
// DOM MODULE - Helpers para enlazar las plantillas del servidor desde Rust
// ============================================================================

pub mod element;
pub mod builder;
pub mod events;
pub mod files;
pub mod modal;

pub use element::*;
pub use builder::{ElementBuilder, message_row, text_cell};
pub use events::{on_change, on_click, on_delegated_click, on_event, on_input, on_submit};
pub use files::{read_as_data_url, selected_files};
pub use modal::{hide_modal, show_modal};
