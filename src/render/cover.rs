use crate::assets::decode::DecodedImage;
use crate::foundation::core::Rect;
use crate::foundation::error::PosecardResult;
use crate::render::shape::{rounded_clip, with_clip};
use crate::render::surface::Surface;

/// Rectangle a `src_width` x `src_height` image is drawn into so it covers `dest`.
///
/// The image keeps its aspect ratio and the overflowing axis is centered, so the result always
/// contains `dest`. Degenerate sources return `dest` unchanged.
pub fn cover_fit(src_width: u32, src_height: u32, dest: Rect) -> Rect {
    if src_width == 0 || src_height == 0 || dest.height() <= 0.0 {
        return dest;
    }
    let img_ratio = f64::from(src_width) / f64::from(src_height);
    let target_ratio = dest.width() / dest.height();

    if img_ratio > target_ratio {
        let draw_h = dest.height();
        let draw_w = draw_h * img_ratio;
        let x = dest.x0 + (dest.width() - draw_w) / 2.0;
        Rect::new(x, dest.y0, x + draw_w, dest.y0 + draw_h)
    } else {
        let draw_w = dest.width();
        let draw_h = draw_w / img_ratio;
        let y = dest.y0 + (dest.height() - draw_h) / 2.0;
        Rect::new(dest.x0, y, dest.x0 + draw_w, y + draw_h)
    }
}

/// Draw `image` cover-fitted into `dest`, clipped to a rounded rectangle of `radius`.
///
/// Surfaces without rounded rects get a square clip.
pub fn draw_cover_image<S: Surface + ?Sized>(
    surface: &mut S,
    image: &DecodedImage,
    dest: Rect,
    radius: f64,
) -> PosecardResult<()> {
    let drawn = cover_fit(image.width, image.height, dest);
    let clip = rounded_clip(surface, dest, radius);
    with_clip(surface, clip, |s| s.draw_image(image, drawn))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
