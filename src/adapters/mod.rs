mod azure_vision_service;

pub use azure_vision_service::AzureVisionService;
