use crate::foundation::core::{Rect, Rgba8};
use crate::render::surface::{ClipShape, Surface};

/// Rounded clip for `rect`, or a square one when the surface cannot round corners.
pub fn rounded_clip<S: Surface + ?Sized>(surface: &S, rect: Rect, radius: f64) -> ClipShape {
    if surface.supports_round_rect() && radius > 0.0 {
        ClipShape::RoundRect { rect, radius }
    } else {
        ClipShape::Rect(rect)
    }
}

/// Fill a pill (badge background). Square corners when rounding is unsupported.
pub fn fill_pill<S: Surface + ?Sized>(surface: &mut S, rect: Rect, radius: f64, color: Rgba8) {
    if surface.supports_round_rect() {
        surface.fill_round_rect(rect, radius, color);
    } else {
        surface.fill_rect(rect, color);
    }
}

/// Run `draw` inside a clip. The clip is popped whatever `draw` returns.
pub fn with_clip<S, T>(surface: &mut S, shape: ClipShape, draw: impl FnOnce(&mut S) -> T) -> T
where
    S: Surface + ?Sized,
{
    surface.push_clip(shape);
    let out = draw(surface);
    surface.pop_clip();
    out
}
