use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::assets::decode::{DecodedImage, unpremultiply_rgba8_in_place};
use crate::assets::fonts::{FaceSlot, FontBook, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{PosecardError, PosecardResult};
use crate::render::surface::{ClipShape, Surface, SurfaceProvider, TextAlign, TextStyle};

/// Creates [`CpuSurface`]s sharing one [`FontBook`].
#[derive(Clone, Debug)]
pub struct CpuSurfaceProvider {
    fonts: Arc<FontBook>,
}

impl CpuSurfaceProvider {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts: Arc::new(fonts),
        }
    }
}

impl SurfaceProvider for CpuSurfaceProvider {
    type Surface = CpuSurface;

    fn create(&self, width: u32, height: u32) -> PosecardResult<CpuSurface> {
        CpuSurface::new(width, height, &self.fonts)
    }
}

/// Surface rasterized on the CPU by `vello_cpu`, with text shaped by `parley`.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    text: TextLayoutEngine,
    fonts: HashMap<FaceSlot, vello_cpu::peniko::FontData>,
    clip_depth: usize,
}

impl CpuSurface {
    /// Allocate a surface. Each side must be within `1..=65535` pixels.
    pub fn new(width: u32, height: u32, book: &FontBook) -> PosecardResult<Self> {
        let to_side = |v: u32| -> PosecardResult<u16> {
            u16::try_from(v)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| {
                    PosecardError::surface_unavailable(format!(
                        "cpu surface of {width}x{height} px not possible (each side must be 1..=65535)"
                    ))
                })
        };
        let w = to_side(width)?;
        let h = to_side(height)?;

        let mut fonts = HashMap::new();
        for slot in FaceSlot::ALL {
            if let Some((_, face)) = book.resolve(slot) {
                let blob = vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone());
                fonts.insert(slot, vello_cpu::peniko::FontData::new(blob, face.index));
            }
        }

        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            text: TextLayoutEngine::new(book),
            fonts,
            clip_depth: 0,
        })
    }

    fn shape(
        &mut self,
        text: &str,
        style: &TextStyle,
    ) -> Option<(FaceSlot, parley::Layout<TextBrushRgba8>)> {
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };
        self.text
            .layout_line(style.face_slot(), text, style.size_px, brush)
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8) {
        let rows = rect.height().ceil().max(1.0) as u32;
        let Ok(ramp) = gradient_column(top, bottom, rows) else {
            self.fill_rect(rect, top);
            return;
        };
        self.ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0))
                * vello_cpu::kurbo::Affine::scale_non_uniform(
                    rect.width(),
                    rect.height() / f64::from(rows),
                ),
        );
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(ramp);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 1.0, f64::from(rows)));
    }

    fn supports_round_rect(&self) -> bool {
        true
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        let path = round_rect_path(rect, radius);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&path);
    }

    fn push_clip(&mut self, shape: ClipShape) {
        let path = match shape {
            ClipShape::Rect(r) => rect_to_cpu(r).to_path(0.1),
            ClipShape::RoundRect { rect, radius } => round_rect_path(rect, radius),
        };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.push_clip_layer(&path);
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> PosecardResult<()> {
        let paint = image_to_cpu(image)?;
        let sx = dest.width() / f64::from(image.width);
        let sy = dest.height() / f64::from(image.height);
        self.ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
                * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
        );
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f64 {
        self.shape(text, style)
            .map(|(_, layout)| f64::from(layout.width()))
            .unwrap_or(0.0)
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let Some((slot, layout)) = self.shape(text, style) else {
            return;
        };
        let Some(font) = self.fonts.get(&slot) else {
            return;
        };

        let width = f64::from(layout.width());
        let baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        let x0 = match style.align {
            TextAlign::Left => at.x,
            TextAlign::Center => at.x - width / 2.0,
        };

        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x0, at.y - baseline)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn encode_png(&mut self) -> PosecardResult<Vec<u8>> {
        while self.clip_depth > 0 {
            self.pop_clip();
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let mut rgba = pixmap.data_as_u8_slice_mut().to_vec();
        unpremultiply_rgba8_in_place(&mut rgba);
        let img = image::RgbaImage::from_raw(u32::from(self.width), u32::from(self.height), rgba)
            .ok_or_else(|| PosecardError::export("rendered pixel buffer has unexpected size"))?;

        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| PosecardError::export(format!("encode png: {e}")))?;
        Ok(out)
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn round_rect_path(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let max_radius = rect.width().min(rect.height()) / 2.0;
    vello_cpu::kurbo::RoundedRect::new(
        rect.x0,
        rect.y0,
        rect.x1,
        rect.y1,
        radius.clamp(0.0, max_radius.max(0.0)),
    )
    .to_path(0.1)
}

fn gradient_column(top: Rgba8, bottom: Rgba8, rows: u32) -> PosecardResult<vello_cpu::Image> {
    let mut bytes = Vec::with_capacity((rows as usize) * 4);
    let last = (rows.max(1) - 1) as f32;
    for y in 0..rows {
        let t = if last <= 0.0 { 0.0 } else { (y as f32) / last };
        let lerp = |a: u8, b: u8| -> u8 {
            let af = a as f32;
            let bf = b as f32;
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        let c = Rgba8::new(
            lerp(top.r, bottom.r),
            lerp(top.g, bottom.g),
            lerp(top.b, bottom.b),
            lerp(top.a, bottom.a),
        );
        bytes.extend_from_slice(&c.to_premul());
    }
    premul_bytes_to_image(&bytes, 1, rows)
}

fn image_to_cpu(image: &DecodedImage) -> PosecardResult<vello_cpu::Image> {
    premul_bytes_to_image(&image.rgba8_premul, image.width, image.height)
}

fn premul_bytes_to_image(bytes: &[u8], width: u32, height: u32) -> PosecardResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosecardError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosecardError::validation("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PosecardError::validation("image byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
