use super::*;
use crate::render::recording::{DrawOp, RecordingProvider};
use crate::render::surface::{ClipShape, SurfaceProvider};

fn covers(drawn: Rect, dest: Rect) -> bool {
    const EPS: f64 = 1e-9;
    drawn.x0 <= dest.x0 + EPS
        && drawn.y0 <= dest.y0 + EPS
        && drawn.x1 + EPS >= dest.x1
        && drawn.y1 + EPS >= dest.y1
}

fn image(w: u32, h: u32) -> DecodedImage {
    DecodedImage::from_straight_rgba8(w, h, vec![255; (w * h * 4) as usize]).unwrap()
}

#[test]
fn wider_source_is_cropped_horizontally() {
    let dest = Rect::new(50.0, 250.0, 1030.0, 970.0);
    let drawn = cover_fit(1600, 900, dest);
    assert_eq!(drawn.y0, dest.y0);
    assert_eq!(drawn.height(), dest.height());
    let expected_w = 720.0 * (1600.0 / 900.0);
    assert!((drawn.width() - expected_w).abs() < 1e-9);
    assert!((drawn.x0 - (dest.x0 + (dest.width() - expected_w) / 2.0)).abs() < 1e-9);
}

#[test]
fn taller_source_is_cropped_vertically() {
    let dest = Rect::new(100.0, 480.0, 550.0, 1080.0);
    let drawn = cover_fit(600, 1600, dest);
    assert_eq!(drawn.x0, dest.x0);
    assert_eq!(drawn.width(), dest.width());
    let expected_h = 450.0 / (600.0 / 1600.0);
    assert!((drawn.height() - expected_h).abs() < 1e-9);
    assert!((drawn.y0 - (dest.y0 + (dest.height() - expected_h) / 2.0)).abs() < 1e-9);
}

#[test]
fn drawn_rect_covers_and_keeps_aspect() {
    let dests = [
        Rect::new(0.0, 0.0, 300.0, 400.0),
        Rect::new(10.0, 20.0, 990.0, 740.0),
        Rect::new(5.0, 5.0, 6.0, 105.0),
    ];
    let sources = [(1, 1), (3, 2), (2, 3), (4000, 10), (10, 4000), (300, 400)];
    for dest in dests {
        for (w, h) in sources {
            let drawn = cover_fit(w, h, dest);
            assert!(covers(drawn, dest), "{w}x{h} into {dest:?} gave {drawn:?}");
            let src_ratio = f64::from(w) / f64::from(h);
            let drawn_ratio = drawn.width() / drawn.height();
            assert!((src_ratio - drawn_ratio).abs() / src_ratio < 1e-9);
        }
    }
}

#[test]
fn degenerate_source_falls_back_to_dest() {
    let dest = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(cover_fit(0, 10, dest), dest);
}

#[test]
fn draw_clips_to_rounded_dest_and_restores() {
    let provider = RecordingProvider::new();
    let mut s = provider.create(100, 100).unwrap();
    let dest = Rect::new(10.0, 10.0, 60.0, 90.0);
    draw_cover_image(&mut s, &image(4, 4), dest, 12.0).unwrap();

    let ops = provider.last_canvas().unwrap().ops;
    assert_eq!(ops.len(), 3);
    assert_eq!(ops[0], DrawOp::PushClip(ClipShape::RoundRect { rect: dest, radius: 12.0 }));
    assert!(matches!(ops[1], DrawOp::Image { width: 4, height: 4, .. }));
    assert_eq!(ops[2], DrawOp::PopClip);
}

#[test]
fn square_clip_without_round_rect_support() {
    let provider = RecordingProvider::new().without_round_rect();
    let mut s = provider.create(100, 100).unwrap();
    let dest = Rect::new(0.0, 0.0, 50.0, 50.0);
    draw_cover_image(&mut s, &image(2, 1), dest, 30.0).unwrap();

    let canvas = provider.last_canvas().unwrap();
    assert_eq!(canvas.ops[0], DrawOp::PushClip(ClipShape::Rect(dest)));
    assert_eq!(canvas.clip_balance(), 0);
}
