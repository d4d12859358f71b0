mod analysis;
mod annotation;
mod app_mode;
mod image_buffer;
mod image_format;
mod read_result;
mod user_settings;

pub use analysis::{AnalysisResult, BoundingRect, LandmarkResult, VisualFeature};
#[cfg(test)]
pub use analysis::{
    AdultInfo, Category, CategoryDetail, DetectedBrand, DetectedObject, FaceDescription,
    FaceRectangle, ImageCaption, ImageDescription, ImageTag,
};
pub use annotation::{AnnotatedImage, AnnotationStyle, DrawInstruction};
pub use app_mode::AppMode;
pub use image_buffer::ImageBuffer;
pub use image_format::ImageFormat;
pub use read_result::{ExtractedText, OperationHandle, ReadOperationResult, ReadStatus};
#[cfg(test)]
pub use read_result::{ReadAnalyzeResult, ReadLine, ReadPage};
pub use user_settings::{ThemeMode, VisionSettings};
