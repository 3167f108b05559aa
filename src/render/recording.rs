use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{PosecardError, PosecardResult};
use crate::render::surface::{ClipShape, Surface, SurfaceProvider, TextStyle};

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    Gradient {
        rect: Rect,
        top: Rgba8,
        bottom: Rgba8,
    },
    FillRoundRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
    },
    PushClip(ClipShape),
    PopClip,
    Image {
        width: u32,
        height: u32,
        dest: Rect,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Everything drawn on one surface created by a [`RecordingProvider`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordedCanvas {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
    pub encoded: bool,
}

impl RecordedCanvas {
    /// Text runs in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn text_op(&self, needle: &str) -> Option<(Point, TextStyle)> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, at, style } if text == needle => Some((*at, *style)),
            _ => None,
        })
    }

    /// `(source width, source height, destination)` for every drawn image.
    pub fn images(&self) -> Vec<(u32, u32, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image {
                    width,
                    height,
                    dest,
                } => Some((*width, *height, *dest)),
                _ => None,
            })
            .collect()
    }

    pub fn round_rects(&self) -> Vec<(Rect, f64, Rgba8)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRoundRect {
                    rect,
                    radius,
                    color,
                } => Some((*rect, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(Rect, Rgba8)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Net clip depth after all ops; `0` when every push was popped.
    pub fn clip_balance(&self) -> i64 {
        self.ops.iter().fold(0, |depth, op| match op {
            DrawOp::PushClip(_) => depth + 1,
            DrawOp::PopClip => depth - 1,
            _ => depth,
        })
    }
}

type Canvases = Arc<Mutex<Vec<RecordedCanvas>>>;

fn lock(canvases: &Canvases) -> MutexGuard<'_, Vec<RecordedCanvas>> {
    canvases.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Provider of [`RecordingSurface`]s. Keeps every canvas it handed out for later inspection.
///
/// Text is measured as `chars * size * 0.5` and encoding yields a 1x1 transparent PNG, so layout
/// can be checked without fonts or a rasterizer.
#[derive(Clone, Debug)]
pub struct RecordingProvider {
    canvases: Canvases,
    round_rect: bool,
    fail_encode: bool,
    available: bool,
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            canvases: Arc::new(Mutex::new(Vec::new())),
            round_rect: true,
            fail_encode: false,
            available: true,
        }
    }

    /// A provider whose `create` always fails with `SurfaceUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Surfaces report `supports_round_rect() == false`.
    pub fn without_round_rect(mut self) -> Self {
        self.round_rect = false;
        self
    }

    /// Surfaces fail `encode_png` with an export error.
    pub fn failing_encode(mut self) -> Self {
        self.fail_encode = true;
        self
    }

    pub fn canvases(&self) -> Vec<RecordedCanvas> {
        lock(&self.canvases).clone()
    }

    pub fn last_canvas(&self) -> Option<RecordedCanvas> {
        lock(&self.canvases).last().cloned()
    }
}

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn create(&self, width: u32, height: u32) -> PosecardResult<RecordingSurface> {
        if !self.available || width == 0 || height == 0 {
            return Err(PosecardError::surface_unavailable(format!(
                "recording surface of {width}x{height} px refused"
            )));
        }
        let mut canvases = lock(&self.canvases);
        canvases.push(RecordedCanvas {
            width,
            height,
            ..RecordedCanvas::default()
        });
        Ok(RecordingSurface {
            width,
            height,
            slot: canvases.len() - 1,
            canvases: Arc::clone(&self.canvases),
            round_rect: self.round_rect,
            fail_encode: self.fail_encode,
        })
    }
}

/// Surface that records draw calls into its provider.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    slot: usize,
    canvases: Canvases,
    round_rect: bool,
    fail_encode: bool,
}

impl RecordingSurface {
    fn record(&self, op: DrawOp) {
        if let Some(canvas) = lock(&self.canvases).get_mut(self.slot) {
            canvas.ops.push(op);
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.record(DrawOp::FillRect { rect, color });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8) {
        self.record(DrawOp::Gradient { rect, top, bottom });
    }

    fn supports_round_rect(&self) -> bool {
        self.round_rect
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.record(DrawOp::FillRoundRect {
            rect,
            radius,
            color,
        });
    }

    fn push_clip(&mut self, shape: ClipShape) {
        self.record(DrawOp::PushClip(shape));
    }

    fn pop_clip(&mut self) {
        self.record(DrawOp::PopClip);
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> PosecardResult<()> {
        self.record(DrawOp::Image {
            width: image.width,
            height: image.height,
            dest,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f64 {
        text.chars().count() as f64 * f64::from(style.size_px) * 0.5
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.record(DrawOp::Text {
            text: text.to_owned(),
            at,
            style: *style,
        });
    }

    fn encode_png(&mut self) -> PosecardResult<Vec<u8>> {
        if self.fail_encode {
            return Err(PosecardError::export("recording surface refused to encode"));
        }
        if let Some(canvas) = lock(&self.canvases).get_mut(self.slot) {
            canvas.encoded = true;
        }
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(1, 1))
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| PosecardError::export(format!("encode png: {e}")))?;
        Ok(out)
    }
}
