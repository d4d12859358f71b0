use image::{Rgba, RgbaImage};

use crate::core::models::BoundingRect;
use crate::global_constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStyle {
    Object,
    Face,
}

impl AnnotationStyle {
    pub const CYAN: Rgba<u8> = Rgba([0, 255, 255, 255]);
    pub const LIGHT_GREEN: Rgba<u8> = Rgba([144, 238, 144, 255]);

    pub fn color(&self) -> Rgba<u8> {
        match self {
            AnnotationStyle::Object => Self::CYAN,
            AnnotationStyle::Face => Self::LIGHT_GREEN,
        }
    }

    pub fn stroke_width(&self) -> u32 {
        match self {
            AnnotationStyle::Object => 3,
            AnnotationStyle::Face => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub rectangle: BoundingRect,
    pub label: String,
    pub style: AnnotationStyle,
}

impl DrawInstruction {
    pub fn new(rectangle: BoundingRect, label: impl Into<String>, style: AnnotationStyle) -> Self {
        Self {
            rectangle,
            label: label.into(),
            style,
        }
    }

    /// Top-left corner of the label tab: just above the box when it fits, inside it otherwise.
    pub fn label_origin(&self) -> (u32, u32) {
        let tab_height = global_constants::LABEL_TAB_HEIGHT;
        let y = self
            .rectangle
            .y
            .checked_sub(tab_height)
            .unwrap_or(self.rectangle.y);
        (self.rectangle.x, y)
    }

    pub fn label_tab_size(&self) -> (u32, u32) {
        let characters = u32::try_from(self.label.chars().count()).unwrap_or(u32::MAX);
        let width = characters
            .saturating_mul(global_constants::LABEL_TAB_CHAR_WIDTH)
            .saturating_add(global_constants::LABEL_TAB_PADDING * 2);
        (width, global_constants::LABEL_TAB_HEIGHT)
    }
}

/// Decoded canvas with outlines burned in, plus the instructions that produced them.
#[derive(Clone)]
pub struct AnnotatedImage {
    pub canvas: RgbaImage,
    pub annotations: Vec<DrawInstruction>,
}

impl std::fmt::Debug for AnnotatedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatedImage")
            .field("width", &self.canvas.width())
            .field("height", &self.canvas.height())
            .field("annotations", &self.annotations.len())
            .finish()
    }
}

impl AnnotatedImage {
    pub fn into_rgba_parts(self) -> (u32, u32, Vec<u8>) {
        let (width, height) = self.canvas.dimensions();
        (width, height, self.canvas.into_raw())
    }
}
