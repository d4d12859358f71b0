#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod adapters;
mod app;
mod core;
mod global_constants;
mod presentation;

use iced::{application, Size};

fn main() -> iced::Result {
    env_logger::init();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_NAME);

    application(
        app::VisionStudioApp::build,
        app::VisionStudioApp::handle_update,
        app::VisionStudioApp::render_view,
    )
    .title(app::VisionStudioApp::window_title)
    .subscription(app::VisionStudioApp::handle_subscription)
    .window_size(Size::new(1100.0, 800.0))
    .run()
}
