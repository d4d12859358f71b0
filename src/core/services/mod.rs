pub mod analysis_presenter;
pub mod image_annotator;
pub mod text_extraction_poller;
pub mod vision_flows;
