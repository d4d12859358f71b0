#![allow(dead_code)]

pub const APPLICATION_NAME: &str = "Vision Studio - Desktop";
pub const APPLICATION_TITLE: &str = "EHTP - Cloud Computing";
pub const APPLICATION_HEADER: &str = "App for testing Azure AI Service";

pub const CONFIG_DIRECTORY_NAME: &str = "vision-studio-pc";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const ENV_AI_SERVICE_ENDPOINT: &str = "AI_SERVICE_ENDPOINT";
pub const ENV_AI_SERVICE_KEY: &str = "AI_SERVICE_KEY";

pub const VISION_API_PATH: &str = "vision/v3.2";
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 100;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const MIN_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;
pub const DEFAULT_MAX_POLL_WAIT_SECS: u64 = 180;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const LABEL_TAB_HEIGHT: u32 = 14;
pub const LABEL_TAB_CHAR_WIDTH: u32 = 7;
pub const LABEL_TAB_PADDING: u32 = 2;
pub const LABEL_TEXT_SIZE: f32 = 10.0;

pub const STATUS_CHOOSE_APPLICATION: &str = "Choose an application in the selector to begin";
pub const STATUS_READY_FOR_IMAGE: &str = "Ready - load a .png or .jpg image";
pub const STATUS_NOT_CONFIGURED: &str =
    "Vision service not configured - set AI_SERVICE_ENDPOINT and AI_SERVICE_KEY";

pub const MESSAGE_NO_FACES: &str = "No faces detected.";
pub const MESSAGE_NO_TEXT: &str = "No text found.";

pub const FILE_PATH_PLACEHOLDER: &str = "Path to a .png or .jpg image, or drop a file here";
