use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::assets::loader::LoadError;

const MAX_DIM: u32 = 16_384;

/// Parse SVG bytes and rasterize them at the document's intrinsic size.
///
/// The compositor scales every image with cover-fit afterwards, so the intrinsic size only has
/// to be large enough to keep the aspect ratio and a sensible amount of detail.
pub fn rasterize_svg(bytes: &[u8]) -> Result<DecodedImage, LoadError> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| LoadError::decode(format!("parse svg tree: {e}")))?;

    let (width, height) = raster_size(&tree)?;
    let rgba8_premul = rasterize_to_premul_rgba8(&tree, width, height)?;
    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn raster_size(tree: &usvg::Tree) -> Result<(u32, u32), LoadError> {
    fn to_px(v: f32) -> Result<u32, LoadError> {
        if !v.is_finite() || v <= 0.0 {
            return Err(LoadError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let w = to_px(size.width())?;
    let h = to_px(size.height())?;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(LoadError::decode(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

fn rasterize_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, LoadError> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LoadError::decode("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
