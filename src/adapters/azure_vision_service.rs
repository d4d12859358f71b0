use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::core::errors::VisionError;
use crate::core::interfaces::adapters::{ThumbnailRequest, VisionService};
use crate::core::models::{
    AnalysisResult, ImageBuffer, OperationHandle, ReadOperationResult, VisionSettings,
    VisualFeature,
};
use crate::global_constants;

const OCTET_STREAM: &str = "application/octet-stream";

/// Azure AI Vision v3.2 over REST, keyed by subscription header.
pub struct AzureVisionService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AzureVisionService {
    pub fn new(settings: &VisionSettings) -> Result<Self, VisionError> {
        let endpoint = settings.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(VisionError::Config(format!(
                "{} is not set",
                global_constants::ENV_AI_SERVICE_ENDPOINT
            )));
        }
        if settings.api_key.trim().is_empty() {
            return Err(VisionError::Config(format!(
                "{} is not set",
                global_constants::ENV_AI_SERVICE_KEY
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        log::info!("[AZURE_VISION] Vision client ready for {}", endpoint);

        Ok(Self {
            client,
            base_url: format!("{}/{}", endpoint, global_constants::VISION_API_PATH),
            api_key: settings.api_key.trim().to_string(),
        })
    }

    fn post_image(&self, url: &str, image: &ImageBuffer) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header(global_constants::SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(image.to_request_body())
    }

    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, VisionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        log::error!("[AZURE_VISION] Service returned {}: {}", status, message);

        Err(VisionError::ServiceStatus {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, VisionError> {
        let response_text = response.text().await?;
        log::debug!("[AZURE_VISION] Response body: {} bytes", response_text.len());

        serde_json::from_str(&response_text)
            .map_err(|error| VisionError::InvalidResponse(error.to_string()))
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = &json["error"];
    let message = error["message"].as_str()?;

    Some(match error["code"].as_str() {
        Some(code) => format!("{} ({})", message, code),
        None => message.to_string(),
    })
}

#[async_trait]
impl VisionService for AzureVisionService {
    async fn analyze_image(
        &self,
        image: &ImageBuffer,
        features: &[VisualFeature],
    ) -> Result<AnalysisResult, VisionError> {
        let url = format!(
            "{}/analyze?visualFeatures={}",
            self.base_url,
            VisualFeature::join_for_query(features)
        );
        log::info!(
            "[AZURE_VISION] Analyzing {} ({} bytes)",
            image.file_name,
            image.len()
        );

        let response = self.post_image(&url, image).send().await?;
        let response = self.check_response(response).await?;
        self.parse_json(response).await
    }

    async fn generate_thumbnail(
        &self,
        image: &ImageBuffer,
        request: ThumbnailRequest,
    ) -> Result<Vec<u8>, VisionError> {
        let url = format!(
            "{}/generateThumbnail?width={}&height={}&smartCropping={}",
            self.base_url, request.width, request.height, request.smart_cropping
        );
        log::info!("[AZURE_VISION] Requesting thumbnail for {}", image.file_name);

        let response = self.post_image(&url, image).send().await?;
        let response = self.check_response(response).await?;
        let thumbnail = response.bytes().await?;

        Ok(thumbnail.to_vec())
    }

    async fn submit_text_extraction(
        &self,
        image: &ImageBuffer,
    ) -> Result<OperationHandle, VisionError> {
        let url = format!("{}/read/analyze", self.base_url);
        log::info!("[AZURE_VISION] Submitting {} for text extraction", image.file_name);

        let response = self.post_image(&url, image).send().await?;
        let response = self.check_response(response).await?;

        let operation_location = response
            .headers()
            .get(global_constants::OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(VisionError::MissingOperationLocation)?;

        let handle = OperationHandle::from_operation_location(operation_location)
            .ok_or(VisionError::MissingOperationLocation)?;

        log::info!("[AZURE_VISION] Read operation accepted: {}", handle);
        Ok(handle)
    }

    async fn get_text_extraction_status(
        &self,
        handle: &OperationHandle,
    ) -> Result<ReadOperationResult, VisionError> {
        let url = format!("{}/read/analyzeResults/{}", self.base_url, handle.as_str());

        let response = self
            .client
            .get(&url)
            .header(global_constants::SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        let operation: ReadOperationResult = self.parse_json(response).await?;

        log::debug!("[AZURE_VISION] Read operation {} is {}", handle, operation.status);
        Ok(operation)
    }
}
