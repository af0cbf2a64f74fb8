//! Terminal UI: page loop, stdin intake and the transcript view.

pub mod app;
pub mod input;
pub mod terminal_view;

pub use app::TerminalApp;
pub use terminal_view::TerminalView;
