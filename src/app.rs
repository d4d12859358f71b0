use std::sync::Arc;

use iced::{window, Element, Task};

use crate::adapters::AzureVisionService;
use crate::core::errors::VisionError;
use crate::core::interfaces::adapters::VisionService;
use crate::core::models::VisionSettings;
use crate::core::orchestrators::app_orchestrator::{AppOrchestrator, OrchestratorMessage};
use crate::global_constants;

pub struct VisionStudioApp {
    orchestrator: AppOrchestrator,
}

impl VisionStudioApp {
    pub fn build() -> (Self, Task<OrchestratorMessage>) {
        log::info!("[APP] Initializing application");

        let settings = VisionSettings::load().unwrap_or_else(|e| {
            log::warn!("[APP] Failed to load settings: {}, using defaults", e);
            let mut settings = VisionSettings::default();
            settings.apply_overrides(|name| std::env::var(name).ok());
            settings
        });

        let vision_service = if settings.is_service_configured() {
            AzureVisionService::new(&settings)
                .map(|service| Arc::new(service) as Arc<dyn VisionService>)
        } else {
            Err(VisionError::Config(
                global_constants::STATUS_NOT_CONFIGURED.to_string(),
            ))
        };

        match &vision_service {
            Ok(_) => log::info!("[APP] Vision service client initialized"),
            Err(e) => log::error!("[APP] Vision service not available: {}", e),
        }

        let orchestrator = AppOrchestrator::build(vision_service, settings);

        (Self { orchestrator }, Task::none())
    }

    pub fn window_title(&self) -> String {
        self.orchestrator.get_window_title()
    }

    pub fn handle_update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        self.orchestrator.update(message)
    }

    pub fn render_view(&self) -> Element<'_, OrchestratorMessage> {
        self.orchestrator.render_view()
    }

    pub fn handle_subscription(&self) -> iced::Subscription<OrchestratorMessage> {
        iced::event::listen_with(|event, _status, _id| {
            if let iced::Event::Window(window::Event::FileDropped(path)) = event {
                return Some(OrchestratorMessage::FileDropped(path));
            }
            None
        })
    }
}
