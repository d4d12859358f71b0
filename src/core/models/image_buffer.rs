use std::path::Path;

use crate::core::errors::VisionError;
use crate::core::models::ImageFormat;

/// The encoded bytes of one uploaded image, read from disk exactly once.
///
/// The preview handle and every request body are derived from these bytes, so nothing
/// downstream needs to re-open the file. A buffer only exists for bytes that fully decode.
#[derive(Clone)]
pub struct ImageBuffer {
    pub file_name: String,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    encoded_data: Vec<u8>,
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("dimensions", &(self.width, self.height))
            .field("size_bytes", &self.encoded_data.len())
            .finish()
    }
}

impl ImageBuffer {
    pub fn build_from_encoded_bytes(
        file_name: impl Into<String>,
        encoded_data: Vec<u8>,
    ) -> Result<Self, VisionError> {
        let file_name = file_name.into();
        let format = ImageFormat::sniff(&encoded_data).ok_or_else(|| {
            VisionError::Decode(format!("{} is not a PNG or JPEG image", file_name))
        })?;

        let decoded = image::load_from_memory_with_format(&encoded_data, format.codec())
            .map_err(|error| {
                log::warn!("[IMAGE_BUFFER] {} does not decode: {}", file_name, error);
                VisionError::Decode(format!("{}: {}", file_name, error))
            })?;

        log::debug!(
            "[IMAGE_BUFFER] building buffer for {}: {:?} {}x{}, {} bytes",
            file_name,
            format,
            decoded.width(),
            decoded.height(),
            encoded_data.len()
        );

        Ok(Self {
            file_name,
            format,
            width: decoded.width(),
            height: decoded.height(),
            encoded_data,
        })
    }

    pub async fn read_from_path(path: &Path) -> Result<Self, VisionError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !ImageFormat::has_accepted_extension(&file_name) {
            return Err(VisionError::Decode(format!(
                "{} is not a .png, .jpg or .jpeg file",
                file_name
            )));
        }

        log::info!("[IMAGE_BUFFER] Reading {:?}", path);
        let encoded_data = tokio::fs::read(path).await?;

        Self::build_from_encoded_bytes(file_name, encoded_data)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.encoded_data
    }

    pub fn len(&self) -> usize {
        self.encoded_data.len()
    }

    pub fn to_request_body(&self) -> Vec<u8> {
        self.encoded_data.clone()
    }
}
