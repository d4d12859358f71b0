use std::path::PathBuf;
use std::sync::Arc;

use iced::widget::{
    button, column, container, image, pick_list, row, scrollable, text, text_input, Space,
};
use iced::{Alignment, Background, Color, Element, Length, Task};

use crate::core::errors::VisionError;
use crate::core::interfaces::adapters::{ThumbnailRequest, VisionService};
use crate::core::models::{AppMode, ExtractedText, ImageBuffer, ThemeMode, VisionSettings};
use crate::core::services::text_extraction_poller::{
    CancellationHandle, CancellationSignal, PollPolicy,
};
use crate::core::services::vision_flows::{
    FaceAnalysisOutcome, ImageAnalysisOutcome, ThumbnailOutcome, VisionFlows,
};
use crate::global_constants;
use crate::presentation::app_theme;
use crate::presentation::{render_output, ShellOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Idle,
    Busy,
    Ready,
    Error,
}

struct LoadedImage {
    buffer: ImageBuffer,
    preview: image::Handle,
}

pub struct AppOrchestrator {
    flows: Result<VisionFlows, String>,
    settings: VisionSettings,
    mode: AppMode,
    file_path_input: String,
    loaded_image: Option<LoadedImage>,
    output: ShellOutput,
    status: String,
    status_kind: StatusKind,
    request_generation: u64,
    request_in_flight: bool,
    cancellation: Option<CancellationHandle>,
}

#[derive(Clone)]
pub enum OrchestratorMessage {
    ModeSelected(AppMode),
    FilePathChanged(String),
    LoadFile,
    FileDropped(PathBuf),
    FileLoaded(u64, Result<ImageBuffer, String>),
    AnalysisComplete(u64, Result<ImageAnalysisOutcome, String>),
    ThumbnailComplete(u64, Result<ThumbnailOutcome, String>),
    FacesComplete(u64, Result<FaceAnalysisOutcome, String>),
    TextExtracted(u64, Result<ExtractedText, String>),
    CancelRequest,
    ToggleTheme,
}

impl std::fmt::Debug for OrchestratorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorMessage::ModeSelected(mode) => write!(f, "ModeSelected({})", mode),
            OrchestratorMessage::FilePathChanged(_) => write!(f, "FilePathChanged"),
            OrchestratorMessage::LoadFile => write!(f, "LoadFile"),
            OrchestratorMessage::FileDropped(path) => write!(f, "FileDropped({:?})", path),
            OrchestratorMessage::FileLoaded(generation, result) => {
                write!(f, "FileLoaded({}, {:?})", generation, result.is_ok())
            }
            OrchestratorMessage::AnalysisComplete(generation, result) => {
                write!(f, "AnalysisComplete({}, {:?})", generation, result.is_ok())
            }
            OrchestratorMessage::ThumbnailComplete(generation, result) => {
                write!(f, "ThumbnailComplete({}, {:?})", generation, result.is_ok())
            }
            OrchestratorMessage::FacesComplete(generation, result) => {
                write!(f, "FacesComplete({}, {:?})", generation, result.is_ok())
            }
            OrchestratorMessage::TextExtracted(generation, result) => {
                write!(f, "TextExtracted({}, {:?})", generation, result.is_ok())
            }
            OrchestratorMessage::CancelRequest => write!(f, "CancelRequest"),
            OrchestratorMessage::ToggleTheme => write!(f, "ToggleTheme"),
        }
    }
}

fn describe_failure(error: VisionError) -> String {
    if error.is_transport() {
        log::warn!("[ORCHESTRATOR] Vision service call failed, not retrying: {}", error);
    }
    error.to_string()
}

impl AppOrchestrator {
    pub fn build(
        vision_service: Result<Arc<dyn VisionService>, VisionError>,
        settings: VisionSettings,
    ) -> Self {
        let flows = vision_service
            .map(|service| {
                VisionFlows::new(
                    service,
                    ThumbnailRequest {
                        width: settings.thumbnail_width,
                        height: settings.thumbnail_height,
                        smart_cropping: settings.smart_cropping,
                    },
                    PollPolicy::from_settings(&settings),
                )
            })
            .map_err(|error| {
                log::warn!("[ORCHESTRATOR] Vision service unavailable: {}", error);
                error.to_string()
            });

        Self {
            flows,
            settings,
            mode: AppMode::default(),
            file_path_input: String::new(),
            loaded_image: None,
            output: ShellOutput::Empty,
            status: global_constants::STATUS_CHOOSE_APPLICATION.to_string(),
            status_kind: StatusKind::Idle,
            request_generation: 0,
            request_in_flight: false,
            cancellation: None,
        }
    }

    pub fn get_window_title(&self) -> String {
        match self.mode {
            AppMode::Unselected => global_constants::APPLICATION_NAME.to_string(),
            mode => format!("{} - {}", global_constants::APPLICATION_NAME, mode),
        }
    }

    pub fn update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        log::info!("[ORCHESTRATOR] Received message: {:?}", message);

        match message {
            OrchestratorMessage::ModeSelected(mode) => self.handle_mode_selected(mode),
            OrchestratorMessage::FilePathChanged(path) => {
                self.file_path_input = path;
                Task::none()
            }
            OrchestratorMessage::LoadFile => self.handle_load_file(),
            OrchestratorMessage::FileDropped(path) => self.handle_file_dropped(path),
            OrchestratorMessage::FileLoaded(generation, result) => {
                self.handle_file_loaded(generation, result)
            }
            OrchestratorMessage::AnalysisComplete(generation, result) => {
                self.handle_flow_complete(generation, result, ShellOutput::from_analysis)
            }
            OrchestratorMessage::ThumbnailComplete(generation, result) => {
                self.handle_flow_complete(generation, result, ShellOutput::from_thumbnail)
            }
            OrchestratorMessage::FacesComplete(generation, result) => {
                self.handle_flow_complete(generation, result, ShellOutput::from_faces)
            }
            OrchestratorMessage::TextExtracted(generation, result) => {
                self.handle_flow_complete(generation, result, ShellOutput::Text)
            }
            OrchestratorMessage::CancelRequest => self.handle_cancel_request(),
            OrchestratorMessage::ToggleTheme => self.handle_toggle_theme(),
        }
    }

    fn handle_mode_selected(&mut self, mode: AppMode) -> Task<OrchestratorMessage> {
        if mode == self.mode {
            return Task::none();
        }

        log::info!("[ORCHESTRATOR] Switching mode from {} to {}", self.mode, mode);

        self.abandon_request();
        self.mode = mode;
        self.file_path_input.clear();
        self.loaded_image = None;
        self.output = ShellOutput::Empty;
        if mode.accepts_uploads() {
            self.set_status(StatusKind::Ready, global_constants::STATUS_READY_FOR_IMAGE);
        } else {
            self.set_status(StatusKind::Idle, global_constants::STATUS_CHOOSE_APPLICATION);
        }

        Task::none()
    }

    fn handle_file_dropped(&mut self, path: PathBuf) -> Task<OrchestratorMessage> {
        if !self.mode.accepts_uploads() {
            log::warn!("[ORCHESTRATOR] Ignoring dropped file, no application selected");
            return Task::none();
        }

        self.file_path_input = path.display().to_string();
        self.handle_load_file()
    }

    fn handle_load_file(&mut self) -> Task<OrchestratorMessage> {
        if !self.mode.accepts_uploads() {
            self.set_status(StatusKind::Idle, global_constants::STATUS_CHOOSE_APPLICATION);
            return Task::none();
        }

        let path = PathBuf::from(self.file_path_input.trim());
        if path.as_os_str().is_empty() {
            self.set_status(StatusKind::Idle, "Enter the path of a .png or .jpg image");
            return Task::none();
        }

        self.abandon_request();
        self.request_generation += 1;
        self.request_in_flight = true;
        self.output = ShellOutput::Empty;
        self.set_status(StatusKind::Busy, format!("Loading {}", path.display()));

        let generation = self.request_generation;

        Task::future(async move {
            let result = ImageBuffer::read_from_path(&path)
                .await
                .map_err(|error| error.to_string());
            OrchestratorMessage::FileLoaded(generation, result)
        })
    }

    fn handle_file_loaded(
        &mut self,
        generation: u64,
        result: Result<ImageBuffer, String>,
    ) -> Task<OrchestratorMessage> {
        if generation != self.request_generation {
            log::debug!("[ORCHESTRATOR] Dropping stale file load {}", generation);
            return Task::none();
        }

        match result {
            Ok(buffer) => {
                log::info!(
                    "[ORCHESTRATOR] Loaded {} ({} bytes)",
                    buffer.file_name,
                    buffer.len()
                );

                let preview = image::Handle::from_bytes(buffer.to_request_body());
                self.loaded_image = Some(LoadedImage {
                    buffer: buffer.clone(),
                    preview,
                });
                self.dispatch_flow(buffer)
            }
            Err(error) => {
                log::error!("[ORCHESTRATOR] Failed to load image: {}", error);
                self.request_in_flight = false;
                self.loaded_image = None;
                self.set_status(StatusKind::Error, format!("Error: {}", error));
                self.output = ShellOutput::Failure(error);
                Task::none()
            }
        }
    }

    fn dispatch_flow(&mut self, buffer: ImageBuffer) -> Task<OrchestratorMessage> {
        let flows = match &self.flows {
            Ok(flows) => flows.clone(),
            Err(error) => {
                let error = error.clone();
                log::error!("[ORCHESTRATOR] Cannot run {}: {}", self.mode, error);
                self.request_in_flight = false;
                self.set_status(StatusKind::Error, global_constants::STATUS_NOT_CONFIGURED);
                self.output = ShellOutput::Failure(error);
                return Task::none();
            }
        };

        let (cancellation, signal) = CancellationSignal::pair();
        self.cancellation = Some(cancellation);
        self.request_in_flight = true;

        let generation = self.request_generation;
        let file_name = buffer.file_name.clone();

        match self.mode {
            AppMode::ImageAnalysis => {
                self.set_status(StatusKind::Busy, format!("Analyzing {}", file_name));
                Task::future(async move {
                    let result = signal
                        .run_until_cancelled(flows.analyze_image(&buffer))
                        .await
                        .map_err(describe_failure);
                    OrchestratorMessage::AnalysisComplete(generation, result)
                })
            }
            AppMode::ThumbnailImage => {
                self.set_status(StatusKind::Busy, format!("Generating thumbnail for {}", file_name));
                Task::future(async move {
                    let result = signal
                        .run_until_cancelled(flows.generate_thumbnail(&buffer))
                        .await
                        .map_err(describe_failure);
                    OrchestratorMessage::ThumbnailComplete(generation, result)
                })
            }
            AppMode::FaceAnalysis => {
                self.set_status(StatusKind::Busy, format!("Detecting faces in {}", file_name));
                Task::future(async move {
                    let result = signal
                        .run_until_cancelled(flows.detect_faces(&buffer))
                        .await
                        .map_err(describe_failure);
                    OrchestratorMessage::FacesComplete(generation, result)
                })
            }
            AppMode::Ocr => {
                self.set_status(StatusKind::Busy, format!("Reading text from {}", file_name));
                Task::future(async move {
                    let result = flows
                        .read_text(&buffer, signal)
                        .await
                        .map_err(describe_failure);
                    OrchestratorMessage::TextExtracted(generation, result)
                })
            }
            AppMode::Unselected => {
                self.request_in_flight = false;
                self.cancellation = None;
                Task::none()
            }
        }
    }

    fn handle_flow_complete<T>(
        &mut self,
        generation: u64,
        result: Result<T, String>,
        into_output: impl FnOnce(T) -> ShellOutput,
    ) -> Task<OrchestratorMessage> {
        if generation != self.request_generation || !self.request_in_flight {
            log::debug!("[ORCHESTRATOR] Dropping stale result {}", generation);
            return Task::none();
        }

        self.request_in_flight = false;
        self.cancellation = None;

        match result {
            Ok(outcome) => {
                log::info!("[ORCHESTRATOR] {} finished", self.mode);
                self.output = into_output(outcome);
                self.set_status(StatusKind::Ready, format!("{} complete", self.mode));
            }
            Err(error) => {
                log::error!("[ORCHESTRATOR] {} failed: {}", self.mode, error);
                self.set_status(StatusKind::Error, format!("Error: {}", error));
                self.output = ShellOutput::Failure(error);
            }
        }

        Task::none()
    }

    fn handle_cancel_request(&mut self) -> Task<OrchestratorMessage> {
        if !self.request_in_flight {
            return Task::none();
        }

        self.abandon_request();
        self.set_status(StatusKind::Idle, "Request cancelled");
        Task::none()
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_kind = kind;
        self.status = message.into();
    }

    /// Cancels whatever is running and makes any result it still produces stale.
    fn abandon_request(&mut self) {
        if let Some(cancellation) = self.cancellation.take() {
            log::info!("[ORCHESTRATOR] Cancelling in-flight request");
            cancellation.cancel();
        }
        if self.request_in_flight {
            self.request_generation += 1;
            self.request_in_flight = false;
        }
    }

    fn handle_toggle_theme(&mut self) -> Task<OrchestratorMessage> {
        self.settings.theme_mode = match self.settings.theme_mode {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        };

        if let Err(error) = self.settings.save_theme_mode() {
            log::error!("[ORCHESTRATOR] Failed to save settings: {}", error);
        }
        Task::none()
    }

    pub fn render_view(&self) -> Element<'_, OrchestratorMessage> {
        let theme = app_theme::get_theme(&self.settings.theme_mode);

        let title = text(global_constants::APPLICATION_TITLE).size(30);
        let subtitle = text(global_constants::APPLICATION_HEADER)
            .size(15)
            .style(|_theme: &iced::Theme| iced::widget::text::Style {
                color: Some(Color::from_rgba(0.6, 0.6, 0.6, 1.0)),
            });

        let theme_label = match self.settings.theme_mode {
            ThemeMode::Dark => "Light theme",
            ThemeMode::Light => "Dark theme",
        };
        let theme_btn = button(text(theme_label).size(13))
            .padding([6, 14])
            .style(app_theme::secondary_button_style)
            .on_press(OrchestratorMessage::ToggleTheme);

        let header_section = row![
            column![title, subtitle].spacing(4),
            Space::new().width(Length::Fill),
            theme_btn,
        ]
        .align_y(Alignment::Center);

        let mode_selector = pick_list(
            AppMode::ALL,
            Some(self.mode),
            OrchestratorMessage::ModeSelected,
        )
        .width(Length::Fixed(280.0));

        let mut content = column![header_section, mode_selector]
            .spacing(16)
            .padding(32);

        if let Some(heading) = self.mode.heading() {
            content = content.push(text(heading).size(20));
        }

        if self.mode.accepts_uploads() {
            content = content.push(self.render_file_intake());
        }

        content = content.push(self.render_status_indicator());

        if self.mode.accepts_uploads() {
            content = content.push(self.render_workspace());
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                let palette = theme.palette();
                iced::widget::container::Style {
                    background: Some(Background::Color(palette.background)),
                    text_color: Some(palette.text),
                    ..Default::default()
                }
            })
            .into()
    }

    fn render_file_intake(&self) -> Element<'_, OrchestratorMessage> {
        let path_input = text_input(global_constants::FILE_PATH_PLACEHOLDER, &self.file_path_input)
            .on_input(OrchestratorMessage::FilePathChanged)
            .on_submit(OrchestratorMessage::LoadFile)
            .padding(10)
            .width(Length::Fill);

        let load_btn = button(text("Load image").size(14))
            .padding([10, 24])
            .style(app_theme::primary_button_style)
            .on_press(OrchestratorMessage::LoadFile);

        let mut intake = row![path_input, load_btn]
            .spacing(12)
            .align_y(Alignment::Center);

        if self.request_in_flight {
            intake = intake.push(
                button(text("Cancel").size(14))
                    .padding([10, 24])
                    .style(app_theme::danger_button_style)
                    .on_press(OrchestratorMessage::CancelRequest),
            );
        }

        intake.into()
    }

    fn render_status_indicator(&self) -> Element<'_, OrchestratorMessage> {
        let status_color = match self.status_kind {
            StatusKind::Busy => app_theme::STATUS_BUSY,
            StatusKind::Error => app_theme::STATUS_ERROR,
            StatusKind::Ready => app_theme::STATUS_OK,
            StatusKind::Idle => app_theme::STATUS_IDLE,
        };

        let status_text = row![
            text("●")
                .size(12)
                .style(move |_theme: &iced::Theme| iced::widget::text::Style {
                    color: Some(status_color),
                }),
            text(&self.status).size(13),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        container(status_text).into()
    }

    fn render_workspace(&self) -> Element<'_, OrchestratorMessage> {
        let preview: Element<'_, OrchestratorMessage> = match &self.loaded_image {
            Some(loaded) => column![
                text(loaded.buffer.file_name.as_str()).size(14),
                image(loaded.preview.clone()).width(Length::Fill),
            ]
            .spacing(8)
            .into(),
            None => text("No image loaded").size(13).into(),
        };

        let theme_mode = self.settings.theme_mode.clone();
        let output_panel = container(scrollable(
            container(render_output(&self.output)).padding(16),
        ))
        .width(Length::FillPortion(3))
        .height(Length::Fill)
        .style(move |_theme| app_theme::panel_style(&theme_mode));

        row![
            container(preview).width(Length::FillPortion(2)),
            output_panel
        ]
        .spacing(20)
        .height(Length::Fill)
        .into()
    }
}
