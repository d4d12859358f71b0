use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::core::errors::VisionError;
use crate::core::models::{AnnotatedImage, BoundingRect, DrawInstruction, ImageBuffer};

pub fn decode_image(encoded: &[u8]) -> Result<DynamicImage, VisionError> {
    Ok(image::load_from_memory(encoded)?)
}

/// Decodes the buffer and burns every instruction into the pixels.
///
/// Nothing is returned when decoding fails, so callers never see a half-drawn canvas.
pub fn annotate(
    image: &ImageBuffer,
    instructions: &[DrawInstruction],
) -> Result<AnnotatedImage, VisionError> {
    let mut canvas = decode_image(image.bytes())?.to_rgba8();

    log::debug!(
        "[ANNOTATOR] Drawing {} annotations on {} ({}x{})",
        instructions.len(),
        image.file_name,
        canvas.width(),
        canvas.height()
    );

    for instruction in instructions {
        let color = instruction.style.color();
        draw_rectangle_outline(
            &mut canvas,
            &instruction.rectangle,
            instruction.style.stroke_width(),
            color,
        );
        draw_label_tab(&mut canvas, instruction, color);
    }

    Ok(AnnotatedImage {
        canvas,
        annotations: instructions.to_vec(),
    })
}

/// Outline from (x, y) to (x + w, y + h) inclusive, with the stroke growing inward.
fn draw_rectangle_outline(
    canvas: &mut RgbaImage,
    rectangle: &BoundingRect,
    stroke_width: u32,
    color: Rgba<u8>,
) {
    for inset in 0..stroke_width {
        let shrink = inset.saturating_mul(2);
        let width = rectangle.w.saturating_add(1).saturating_sub(shrink);
        let height = rectangle.h.saturating_add(1).saturating_sub(shrink);
        if width == 0 || height == 0 {
            break;
        }

        let outline = Rect::at(
            to_coordinate(rectangle.x.saturating_add(inset)),
            to_coordinate(rectangle.y.saturating_add(inset)),
        )
        .of_size(width, height);
        draw_hollow_rect_mut(canvas, outline, color);
    }
}

/// Solid tab at the label origin; the label text itself is laid over it by the view.
fn draw_label_tab(canvas: &mut RgbaImage, instruction: &DrawInstruction, color: Rgba<u8>) {
    if instruction.label.is_empty() {
        return;
    }

    let (x, y) = instruction.label_origin();
    let (width, height) = instruction.label_tab_size();
    let tab = Rect::at(to_coordinate(x), to_coordinate(y)).of_size(width, height);
    draw_filled_rect_mut(canvas, tab, color);
}

fn to_coordinate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
