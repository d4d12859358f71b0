use std::fmt;

/// The entries of the mode selector, including the placeholder shown before a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Unselected,
    ImageAnalysis,
    ThumbnailImage,
    FaceAnalysis,
    Ocr,
}

impl AppMode {
    pub const ALL: [AppMode; 5] = [
        AppMode::Unselected,
        AppMode::ImageAnalysis,
        AppMode::ThumbnailImage,
        AppMode::FaceAnalysis,
        AppMode::Ocr,
    ];

    pub fn accepts_uploads(&self) -> bool {
        !matches!(self, AppMode::Unselected)
    }

    pub fn heading(&self) -> Option<&'static str> {
        match self {
            AppMode::Unselected => None,
            AppMode::ImageAnalysis => Some("Application : Image Analysis"),
            AppMode::ThumbnailImage => Some("Application : Thumbnail Image"),
            AppMode::FaceAnalysis => Some("Application : Face Analysis"),
            AppMode::Ocr => Some("Application : OCR"),
        }
    }
}

impl Default for AppMode {
    fn default() -> Self {
        AppMode::Unselected
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::Unselected => write!(f, "--- Choose application ---"),
            AppMode::ImageAnalysis => write!(f, "Image Analysis"),
            AppMode::ThumbnailImage => write!(f, "Thumbnail Image"),
            AppMode::FaceAnalysis => write!(f, "Face Analysis"),
            AppMode::Ocr => write!(f, "OCR"),
        }
    }
}
