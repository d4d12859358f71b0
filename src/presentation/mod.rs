pub mod app_theme;
mod results_view;

pub use results_view::{render_output, ShellOutput};
