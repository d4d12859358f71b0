use std::sync::Arc;

use crate::core::errors::VisionError;
use crate::core::interfaces::adapters::{ThumbnailRequest, VisionService};
use crate::core::models::{AnnotatedImage, ExtractedText, ImageBuffer, VisualFeature};
use crate::core::services::analysis_presenter::{
    present_analysis, present_faces, AnalysisReport, FaceReport,
};
use crate::core::services::image_annotator::{annotate, decode_image};
use crate::core::services::text_extraction_poller::{
    CancellationSignal, PollPolicy, TextExtractionPoller,
};

#[derive(Debug, Clone)]
pub struct ImageAnalysisOutcome {
    pub report: AnalysisReport,
    /// Present only when at least one object was detected.
    pub annotated_image: Option<AnnotatedImage>,
}

#[derive(Debug, Clone)]
pub struct FaceAnalysisOutcome {
    pub report: FaceReport,
    pub annotated_image: Option<AnnotatedImage>,
}

#[derive(Debug, Clone)]
pub struct ThumbnailOutcome {
    pub encoded: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// The four request flows behind the shell's modes, sharing one injected service handle.
#[derive(Clone)]
pub struct VisionFlows {
    vision_service: Arc<dyn VisionService>,
    thumbnail_request: ThumbnailRequest,
    poll_policy: PollPolicy,
}

impl VisionFlows {
    pub fn new(
        vision_service: Arc<dyn VisionService>,
        thumbnail_request: ThumbnailRequest,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            vision_service,
            thumbnail_request,
            poll_policy,
        }
    }

    pub async fn analyze_image(
        &self,
        image: &ImageBuffer,
    ) -> Result<ImageAnalysisOutcome, VisionError> {
        log::info!("[FLOWS] Analyzing {}", image.file_name);

        let analysis = self
            .vision_service
            .analyze_image(image, &VisualFeature::IMAGE_ANALYSIS)
            .await?;
        let report = present_analysis(&analysis);

        let annotated_image = if report.object_annotations.is_empty() {
            None
        } else {
            Some(annotate(image, &report.object_annotations)?)
        };

        Ok(ImageAnalysisOutcome {
            report,
            annotated_image,
        })
    }

    pub async fn detect_faces(
        &self,
        image: &ImageBuffer,
    ) -> Result<FaceAnalysisOutcome, VisionError> {
        log::info!("[FLOWS] Face detection for {}", image.file_name);

        let analysis = self
            .vision_service
            .analyze_image(image, &VisualFeature::FACE_ANALYSIS)
            .await?;
        let report = present_faces(&analysis);

        let annotated_image = if report.face_annotations.is_empty() {
            None
        } else {
            Some(annotate(image, &report.face_annotations)?)
        };

        Ok(FaceAnalysisOutcome {
            report,
            annotated_image,
        })
    }

    pub async fn generate_thumbnail(
        &self,
        image: &ImageBuffer,
    ) -> Result<ThumbnailOutcome, VisionError> {
        log::info!(
            "[FLOWS] Generating {}x{} thumbnail for {}",
            self.thumbnail_request.width,
            self.thumbnail_request.height,
            image.file_name
        );

        let encoded = self
            .vision_service
            .generate_thumbnail(image, self.thumbnail_request)
            .await?;
        let decoded = decode_image(&encoded)?;

        Ok(ThumbnailOutcome {
            width: decoded.width(),
            height: decoded.height(),
            encoded,
        })
    }

    pub async fn read_text(
        &self,
        image: &ImageBuffer,
        cancellation: CancellationSignal,
    ) -> Result<ExtractedText, VisionError> {
        log::info!("[FLOWS] Reading text from {}", image.file_name);

        TextExtractionPoller::new(Arc::clone(&self.vision_service), self.poll_policy)
            .extract_text(image, cancellation)
            .await
    }
}
