use crate::core::models::{
    AnalysisResult, AnnotationStyle, BoundingRect, DrawInstruction, LandmarkResult,
};
use crate::global_constants;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    fn new(heading: &str, lines: Vec<String>) -> Self {
        Self {
            heading: heading.to_string(),
            lines,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub sections: Vec<ReportSection>,
    pub object_annotations: Vec<DrawInstruction>,
}

impl AnalysisReport {
    #[cfg(test)]
    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections
            .iter()
            .find(|section| section.heading == heading)
    }

    #[cfg(test)]
    pub fn headings(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.heading.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceReport {
    pub summary: String,
    pub face_annotations: Vec<DrawInstruction>,
}

pub const HEADING_DESCRIPTION: &str = "Description";
pub const HEADING_TAGS: &str = "Tags";
pub const HEADING_CATEGORIES: &str = "Categories";
pub const HEADING_LANDMARKS: &str = "Landmarks";
pub const HEADING_BRANDS: &str = "Brands";
pub const HEADING_OBJECTS: &str = "Objects in image";
pub const HEADING_MODERATION: &str = "Moderation ratings";

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

fn quoted_with_confidence(name: &str, confidence: f64) -> String {
    format!(
        "\"{}\" (confidence: {})",
        name,
        format_confidence(confidence)
    )
}

/// Formats an analyze response into display sections, in the fixed order the shell shows them.
pub fn present_analysis(analysis: &AnalysisResult) -> AnalysisReport {
    let mut report = AnalysisReport::default();

    let captions: Vec<String> = analysis
        .description
        .captions
        .iter()
        .map(|caption| quoted_with_confidence(&caption.text, caption.confidence))
        .collect();
    if !captions.is_empty() {
        report
            .sections
            .push(ReportSection::new(HEADING_DESCRIPTION, captions));
    }

    if !analysis.tags.is_empty() {
        let lines = analysis
            .tags
            .iter()
            .map(|tag| format!("- {}", quoted_with_confidence(&tag.name, tag.confidence)))
            .collect();
        report.sections.push(ReportSection::new(HEADING_TAGS, lines));
    }

    if !analysis.categories.is_empty() {
        let mut landmarks: Vec<&LandmarkResult> = Vec::new();
        let mut lines = Vec::with_capacity(analysis.categories.len());

        for category in &analysis.categories {
            lines.push(format!(
                "- {}",
                quoted_with_confidence(&category.name, category.score)
            ));

            let category_landmarks = category
                .detail
                .as_ref()
                .map(|detail| detail.landmarks.as_slice())
                .unwrap_or_default();

            for landmark in category_landmarks {
                if !landmarks.contains(&landmark) {
                    landmarks.push(landmark);
                }
            }
        }

        report
            .sections
            .push(ReportSection::new(HEADING_CATEGORIES, lines));

        if !landmarks.is_empty() {
            log::debug!("[PRESENTER] {} distinct landmarks", landmarks.len());
            let landmark_lines = landmarks
                .iter()
                .map(|landmark| {
                    format!(
                        "- {}",
                        quoted_with_confidence(&landmark.name, landmark.confidence)
                    )
                })
                .collect();
            report
                .sections
                .push(ReportSection::new(HEADING_LANDMARKS, landmark_lines));
        }
    }

    if !analysis.brands.is_empty() {
        let lines = analysis
            .brands
            .iter()
            .map(|brand| format!("- {}", quoted_with_confidence(&brand.name, brand.confidence)))
            .collect();
        report
            .sections
            .push(ReportSection::new(HEADING_BRANDS, lines));
    }

    if !analysis.objects.is_empty() {
        let mut lines = Vec::with_capacity(analysis.objects.len());

        for detected_object in &analysis.objects {
            lines.push(format!(
                "- {} (confidence: {})",
                detected_object.name,
                format_confidence(detected_object.confidence)
            ));
            report.object_annotations.push(DrawInstruction::new(
                detected_object.rectangle,
                detected_object.name.clone(),
                AnnotationStyle::Object,
            ));
        }

        report
            .sections
            .push(ReportSection::new(HEADING_OBJECTS, lines));
    }

    let moderation = &analysis.adult;
    report.sections.push(ReportSection::new(
        HEADING_MODERATION,
        vec![
            format!("Adult: {}", moderation.is_adult_content),
            format!("Racy: {}", moderation.is_racy_content),
            format!("Gore: {}", moderation.is_gory_content),
        ],
    ));

    log::debug!(
        "[PRESENTER] Built {} sections, {} object annotations",
        report.sections.len(),
        report.object_annotations.len()
    );

    report
}

pub fn present_faces(analysis: &AnalysisResult) -> FaceReport {
    if analysis.faces.is_empty() {
        return FaceReport {
            summary: global_constants::MESSAGE_NO_FACES.to_string(),
            face_annotations: vec![],
        };
    }

    let face_annotations = analysis
        .faces
        .iter()
        .map(|face| {
            let rectangle = BoundingRect::from(face.face_rectangle);
            DrawInstruction::new(
                rectangle,
                format!(
                    "Person at approximately {}, {}",
                    rectangle.x, rectangle.y
                ),
                AnnotationStyle::Face,
            )
        })
        .collect();

    FaceReport {
        summary: format!("{} faces detected.", analysis.faces.len()),
        face_annotations,
    }
}
