use serde::{Deserialize, Serialize};

/// Features that can be requested from the analyze endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualFeature {
    Description,
    Tags,
    Categories,
    Brands,
    Objects,
    Adult,
    Faces,
}

impl VisualFeature {
    pub const IMAGE_ANALYSIS: [VisualFeature; 6] = [
        VisualFeature::Description,
        VisualFeature::Tags,
        VisualFeature::Categories,
        VisualFeature::Brands,
        VisualFeature::Objects,
        VisualFeature::Adult,
    ];

    pub const FACE_ANALYSIS: [VisualFeature; 1] = [VisualFeature::Faces];

    pub fn as_query_value(&self) -> &'static str {
        match self {
            VisualFeature::Description => "Description",
            VisualFeature::Tags => "Tags",
            VisualFeature::Categories => "Categories",
            VisualFeature::Brands => "Brands",
            VisualFeature::Objects => "Objects",
            VisualFeature::Adult => "Adult",
            VisualFeature::Faces => "Faces",
        }
    }

    pub fn join_for_query(features: &[VisualFeature]) -> String {
        features
            .iter()
            .map(VisualFeature::as_query_value)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Analyze response. Every field defaults so a partial response never fails to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub description: ImageDescription,
    pub tags: Vec<ImageTag>,
    pub categories: Vec<Category>,
    pub brands: Vec<DetectedBrand>,
    pub objects: Vec<DetectedObject>,
    pub faces: Vec<FaceDescription>,
    pub adult: AdultInfo,
    pub metadata: Option<ImageMetadata>,
    pub request_id: Option<String>,
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDescription {
    pub tags: Vec<String>,
    pub captions: Vec<ImageCaption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCaption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTag {
    pub name: String,
    pub confidence: f64,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub name: String,
    pub score: f64,
    pub detail: Option<CategoryDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDetail {
    pub landmarks: Vec<LandmarkResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkResult {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedBrand {
    pub name: String,
    pub confidence: f64,
    pub rectangle: Option<BoundingRect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedObject {
    #[serde(rename = "object")]
    pub name: String,
    pub confidence: f64,
    pub rectangle: BoundingRect,
    pub parent: Option<Box<ObjectHierarchy>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectHierarchy {
    #[serde(rename = "object")]
    pub name: String,
    pub confidence: f64,
    pub parent: Option<Box<ObjectHierarchy>>,
}

/// Pixel-space box as the service sends it for objects and brands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceDescription {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub face_rectangle: FaceRectangle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceRectangle {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl From<FaceRectangle> for BoundingRect {
    fn from(face: FaceRectangle) -> Self {
        BoundingRect::new(face.left, face.top, face.width, face.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdultInfo {
    pub is_adult_content: bool,
    pub is_racy_content: bool,
    pub is_gory_content: bool,
    pub adult_score: f64,
    pub racy_score: f64,
    pub gore_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
}
