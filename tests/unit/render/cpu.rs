use super::*;
use crate::assets::fonts::Weight;

fn surface(w: u32, h: u32) -> CpuSurface {
    CpuSurfaceProvider::new(FontBook::empty())
        .create(w, h)
        .unwrap()
}

fn pixels(surface: &mut CpuSurface) -> image::RgbaImage {
    let png = surface.encode_png().unwrap();
    image::load_from_memory(&png).unwrap().to_rgba8()
}

#[test]
fn rejects_empty_and_oversized_canvases() {
    let provider = CpuSurfaceProvider::new(FontBook::empty());
    for (w, h) in [(0, 10), (10, 0), (70_000, 10), (10, 70_000)] {
        let err = provider.create(w, h).err().unwrap();
        assert!(matches!(err, PosecardError::SurfaceUnavailable(_)), "{w}x{h}");
    }
}

#[test]
fn untouched_surface_is_transparent() {
    let mut s = surface(4, 4);
    let img = pixels(&mut s);
    assert_eq!(img.dimensions(), (4, 4));
    assert!(img.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn rect_fill_covers_interior() {
    let mut s = surface(16, 16);
    s.fill_rect(Rect::new(4.0, 4.0, 12.0, 12.0), Rgba8::rgb(200, 10, 20));
    let img = pixels(&mut s);
    assert_eq!(img.get_pixel(8, 8).0, [200, 10, 20, 255]);
    assert_eq!(img.get_pixel(1, 1).0[3], 0);
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let mut s = surface(8, 64);
    s.fill_vertical_gradient(
        Rect::new(0.0, 0.0, 8.0, 64.0),
        Rgba8::rgb(0, 0, 0),
        Rgba8::rgb(255, 255, 255),
    );
    let img = pixels(&mut s);
    let top = img.get_pixel(4, 1).0[0];
    let mid = img.get_pixel(4, 32).0[0];
    let bottom = img.get_pixel(4, 62).0[0];
    assert!(top < mid && mid < bottom, "{top} {mid} {bottom}");
    assert!(top < 30);
    assert!(bottom > 225);
}

#[test]
fn round_rect_leaves_corners_empty() {
    let mut s = surface(40, 40);
    s.fill_round_rect(Rect::new(0.0, 0.0, 40.0, 40.0), 16.0, Rgba8::WHITE);
    let img = pixels(&mut s);
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(20, 20).0, [255, 255, 255, 255]);
}

#[test]
fn clip_limits_later_fills() {
    let mut s = surface(20, 20);
    s.push_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 10.0, 20.0)));
    s.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), Rgba8::rgb(0, 255, 0));
    s.pop_clip();
    let img = pixels(&mut s);
    assert_eq!(img.get_pixel(5, 10).0, [0, 255, 0, 255]);
    assert_eq!(img.get_pixel(15, 10).0[3], 0);
}

#[test]
fn unbalanced_clip_does_not_break_encoding() {
    let mut s = surface(8, 8);
    s.pop_clip();
    s.push_clip(ClipShape::RoundRect {
        rect: Rect::new(0.0, 0.0, 8.0, 8.0),
        radius: 2.0,
    });
    s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::WHITE);
    assert!(s.encode_png().is_ok());
}

#[test]
fn image_is_stretched_into_destination() {
    let src = DecodedImage::from_straight_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut s = surface(40, 20);
    s.draw_image(&src, Rect::new(0.0, 0.0, 40.0, 20.0)).unwrap();
    let img = pixels(&mut s);
    let left = img.get_pixel(2, 10).0;
    let right = img.get_pixel(37, 10).0;
    assert!(left[0] > 200 && left[2] < 60, "{left:?}");
    assert!(right[2] > 200 && right[0] < 60, "{right:?}");
}

#[test]
fn text_without_fonts_is_a_no_op() {
    let mut s = surface(32, 32);
    let style = TextStyle::new(20.0, Weight::Bold);
    assert_eq!(s.measure_text("POSE", &style), 0.0);
    s.fill_text("POSE", Point::new(2.0, 20.0), &style);
    let img = pixels(&mut s);
    assert!(img.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn text_renders_with_system_font_if_present() {
    let book = FontBook::discover(&[]);
    if book.is_empty() {
        return;
    }
    let mut s = CpuSurface::new(200, 60, &book).unwrap();
    let style = TextStyle::new(32.0, Weight::Black);
    let width = s.measure_text("POSE #1", &style);
    if width <= 0.0 {
        return;
    }
    s.fill_text("POSE #1", Point::new(100.0, 45.0), &style.centered());
    let img = pixels(&mut s);
    assert!(img.pixels().any(|p| p.0[3] > 0));
}
