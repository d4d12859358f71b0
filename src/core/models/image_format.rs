use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    PNG,
    JPEG,
}

impl ImageFormat {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = ["png", "jpg", "jpeg"];

    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Png) => Some(ImageFormat::PNG),
            Ok(image::ImageFormat::Jpeg) => Some(ImageFormat::JPEG),
            _ => None,
        }
    }

    pub fn codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::PNG => image::ImageFormat::Png,
            ImageFormat::JPEG => image::ImageFormat::Jpeg,
        }
    }

    pub fn has_accepted_extension(file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, extension)| {
                Self::ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(extension))
            })
            .unwrap_or(false)
    }
}
