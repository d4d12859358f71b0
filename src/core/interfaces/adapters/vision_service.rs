use async_trait::async_trait;

use crate::core::errors::VisionError;
use crate::core::models::{
    AnalysisResult, ImageBuffer, OperationHandle, ReadOperationResult, VisualFeature,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub width: u32,
    pub height: u32,
    pub smart_cropping: bool,
}

/// The remote vision API as the flows see it.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn analyze_image(
        &self,
        image: &ImageBuffer,
        features: &[VisualFeature],
    ) -> Result<AnalysisResult, VisionError>;

    /// Returns the encoded thumbnail bytes.
    async fn generate_thumbnail(
        &self,
        image: &ImageBuffer,
        request: ThumbnailRequest,
    ) -> Result<Vec<u8>, VisionError>;

    async fn submit_text_extraction(
        &self,
        image: &ImageBuffer,
    ) -> Result<OperationHandle, VisionError>;

    async fn get_text_extraction_status(
        &self,
        handle: &OperationHandle,
    ) -> Result<ReadOperationResult, VisionError>;
}
