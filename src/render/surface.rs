use crate::assets::decode::DecodedImage;
use crate::assets::fonts::{FaceSlot, Weight};
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::PosecardResult;

/// Horizontal anchoring of a text run relative to its `x` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Font and fill for one `fill_text`/`measure_text` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub weight: Weight,
    pub italic: bool,
    pub color: Rgba8,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(size_px: f32, weight: Weight) -> Self {
        Self {
            size_px,
            weight,
            italic: false,
            color: Rgba8::WHITE,
            align: TextAlign::Left,
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub fn face_slot(&self) -> FaceSlot {
        FaceSlot {
            weight: self.weight,
            italic: self.italic,
        }
    }
}

/// Shape of a clip region pushed with [`Surface::push_clip`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    Rect(Rect),
    RoundRect { rect: Rect, radius: f64 },
}

/// 2-D drawing capability the composers paint onto.
///
/// Coordinates are canvas pixels with the origin in the top-left corner. Text is positioned on
/// its alphabetic baseline.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Fill `rect` with a linear gradient from `top` (at `rect.y0`) to `bottom` (at `rect.y1`).
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8);

    /// Whether [`Surface::fill_round_rect`] and rounded [`ClipShape`]s are available.
    fn supports_round_rect(&self) -> bool;

    /// Only called when [`Surface::supports_round_rect`] is true.
    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Rgba8);

    /// Push a clip region. Every push must be paired with one [`Surface::pop_clip`].
    fn push_clip(&mut self, shape: ClipShape);
    fn pop_clip(&mut self);

    /// Draw `image` stretched into `dest`.
    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> PosecardResult<()>;

    /// Advance width of `text` in pixels.
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f64;

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Serialize the current pixels losslessly as PNG.
    fn encode_png(&mut self) -> PosecardResult<Vec<u8>>;
}

/// Factory for surfaces, injected into the compositor.
pub trait SurfaceProvider {
    type Surface: Surface;

    /// Create a surface of `width` x `height` pixels, or fail with
    /// [`crate::PosecardError::SurfaceUnavailable`].
    fn create(&self, width: u32, height: u32) -> PosecardResult<Self::Surface>;
}
