use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{column, container, image, row, scrollable, text, Column, Stack};
use iced::{Alignment, Color, Element, Padding};

use crate::core::models::{AnnotatedImage, ExtractedText};
use crate::core::services::analysis_presenter::{AnalysisReport, FaceReport};
use crate::core::services::vision_flows::{
    FaceAnalysisOutcome, ImageAnalysisOutcome, ThumbnailOutcome,
};
use crate::global_constants;

const MUTED_TEXT: Color = Color::from_rgba(0.6, 0.6, 0.6, 1.0);
const LABEL_TEXT: Color = Color::BLACK;

/// Label text pinned to the tab the annotator drew, in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub text: String,
    pub x: u32,
    pub y: u32,
}

/// An annotated canvas ready for display, with each label placed at its box corner.
#[derive(Debug, Clone)]
pub struct AnnotatedPreview {
    pub handle: image::Handle,
    pub labels: Vec<PlacedLabel>,
}

impl AnnotatedPreview {
    pub fn from_annotated_image(annotated: AnnotatedImage) -> Self {
        let labels = annotated
            .annotations
            .iter()
            .filter(|instruction| !instruction.label.is_empty())
            .map(|instruction| {
                let (x, y) = instruction.label_origin();
                PlacedLabel {
                    text: instruction.label.clone(),
                    x: x + global_constants::LABEL_TAB_PADDING,
                    y,
                }
            })
            .collect();
        let (width, height, pixels) = annotated.into_rgba_parts();

        Self {
            handle: image::Handle::from_rgba(width, height, pixels),
            labels,
        }
    }
}

/// What the output area currently shows.
#[derive(Debug, Clone, Default)]
pub enum ShellOutput {
    #[default]
    Empty,
    Analysis {
        report: AnalysisReport,
        annotated: Option<AnnotatedPreview>,
    },
    Thumbnail {
        handle: image::Handle,
        width: u32,
        height: u32,
    },
    Faces {
        report: FaceReport,
        annotated: Option<AnnotatedPreview>,
    },
    Text(ExtractedText),
    Failure(String),
}

impl ShellOutput {
    pub fn from_analysis(outcome: ImageAnalysisOutcome) -> Self {
        ShellOutput::Analysis {
            report: outcome.report,
            annotated: outcome
                .annotated_image
                .map(AnnotatedPreview::from_annotated_image),
        }
    }

    pub fn from_faces(outcome: FaceAnalysisOutcome) -> Self {
        ShellOutput::Faces {
            report: outcome.report,
            annotated: outcome
                .annotated_image
                .map(AnnotatedPreview::from_annotated_image),
        }
    }

    pub fn from_thumbnail(outcome: ThumbnailOutcome) -> Self {
        ShellOutput::Thumbnail {
            handle: image::Handle::from_bytes(outcome.encoded),
            width: outcome.width,
            height: outcome.height,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, ShellOutput::Empty)
    }

    /// Every line of text the output area renders, in display order.
    #[cfg(test)]
    pub fn text_lines(&self) -> Vec<String> {
        match self {
            ShellOutput::Empty => Vec::new(),
            ShellOutput::Analysis { report, annotated } => {
                let mut lines = Vec::new();
                for section in &report.sections {
                    lines.push(format!("{}:", section.heading));
                    lines.extend(section.lines.iter().cloned());
                }
                lines.extend(annotated_labels(annotated));
                lines
            }
            ShellOutput::Thumbnail { width, height, .. } => {
                vec![format!("Thumbnail ({}x{})", width, height)]
            }
            ShellOutput::Faces { report, annotated } => {
                let mut lines = vec![report.summary.clone()];
                lines.extend(annotated_labels(annotated));
                lines
            }
            ShellOutput::Text(extracted) if extracted.is_empty() => {
                vec![global_constants::MESSAGE_NO_TEXT.to_string()]
            }
            ShellOutput::Text(extracted) => extracted.lines.clone(),
            ShellOutput::Failure(message) => vec![message.clone()],
        }
    }
}

#[cfg(test)]
fn annotated_labels(annotated: &Option<AnnotatedPreview>) -> Vec<String> {
    annotated
        .iter()
        .flat_map(|preview| preview.labels.iter())
        .map(|label| format!("[box] {}", label.text))
        .collect()
}

fn muted<'a>(content: &'a str) -> iced::widget::Text<'a> {
    text(content)
        .size(13)
        .style(|_theme: &iced::Theme| iced::widget::text::Style {
            color: Some(MUTED_TEXT),
        })
}

/// The canvas at its natural size with every label laid over its tab.
fn render_annotated<'a, Message: 'a>(preview: &'a AnnotatedPreview) -> Element<'a, Message> {
    let mut layers: Vec<Element<'a, Message>> = vec![image(preview.handle.clone()).into()];
    layers.extend(preview.labels.iter().map(|label| {
        container(
            text(label.text.as_str())
                .size(global_constants::LABEL_TEXT_SIZE)
                .style(|_theme: &iced::Theme| iced::widget::text::Style {
                    color: Some(LABEL_TEXT),
                }),
        )
        .padding(Padding {
            top: label.y as f32,
            right: 0.0,
            bottom: 0.0,
            left: label.x as f32,
        })
        .into()
    }));

    let legend = Column::with_children(
        preview
            .labels
            .iter()
            .map(|label| muted(label.text.as_str()).into()),
    )
    .spacing(2);

    column![
        scrollable(Stack::with_children(layers)).direction(Direction::Horizontal(
            Scrollbar::new()
        )),
        legend
    ]
    .spacing(8)
    .into()
}

fn render_report<'a, Message: 'a>(report: &'a AnalysisReport) -> Element<'a, Message> {
    Column::with_children(report.sections.iter().map(|section| {
        let lines = Column::with_children(
            section
                .lines
                .iter()
                .map(|line| text(line.as_str()).size(14).into()),
        )
        .spacing(2);

        column![text(section.heading.as_str()).size(18), lines]
            .spacing(4)
            .into()
    }))
    .spacing(14)
    .into()
}

pub fn render_output<'a, Message: 'a>(output: &'a ShellOutput) -> Element<'a, Message> {
    match output {
        ShellOutput::Empty => container(muted("Results will appear here")).into(),
        ShellOutput::Analysis { report, annotated } => {
            let mut content = column![render_report(report)].spacing(16);
            if let Some(preview) = annotated {
                content = content.push(render_annotated(preview));
            }
            content.into()
        }
        ShellOutput::Thumbnail {
            handle,
            width,
            height,
        } => column![
            text("Thumbnail").size(18),
            image(handle.clone()),
            muted("Generated by the vision service"),
            text(format!("{} x {} px", width, height)).size(13),
        ]
        .spacing(8)
        .align_x(Alignment::Start)
        .into(),
        ShellOutput::Faces { report, annotated } => {
            let mut content = column![text(report.summary.as_str()).size(18)].spacing(12);
            if let Some(preview) = annotated {
                content = content.push(render_annotated(preview));
            }
            content.into()
        }
        ShellOutput::Text(extracted) if extracted.is_empty() => {
            text(global_constants::MESSAGE_NO_TEXT).size(14).into()
        }
        ShellOutput::Text(extracted) => column![
            text("Extracted text").size(18),
            Column::with_children(
                extracted
                    .lines
                    .iter()
                    .map(|line| text(line.as_str()).size(14).into()),
            )
            .spacing(2),
        ]
        .spacing(8)
        .into(),
        ShellOutput::Failure(message) => row![text(message.as_str())
            .size(14)
            .style(|_theme: &iced::Theme| iced::widget::text::Style {
                color: Some(Color::from_rgb(1.0, 0.3, 0.3)),
            })]
        .into(),
    }
}
