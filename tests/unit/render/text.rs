use super::*;
use crate::assets::fonts::Weight;
use crate::render::recording::RecordingProvider;
use crate::render::surface::SurfaceProvider;

fn per_char(s: &str) -> f64 {
    s.chars().count() as f64 * 10.0
}

#[test]
fn greedy_fill_breaks_on_overflow() {
    let lines = wrap_lines("uno dos tres cuatro", 80.0, per_char);
    assert_eq!(lines, vec!["uno dos", "tres", "cuatro"]);
}

#[test]
fn long_word_sits_alone() {
    let lines = wrap_lines("a extraordinariamente b", 50.0, per_char);
    assert_eq!(lines, vec!["a", "extraordinariamente", "b"]);
}

#[test]
fn long_first_word_is_kept() {
    assert_eq!(
        wrap_lines("supercalifragilistico ok", 30.0, per_char),
        vec!["supercalifragilistico", "ok"]
    );
}

#[test]
fn empty_and_blank_input_yield_no_lines() {
    assert!(wrap_lines("", 100.0, per_char).is_empty());
    assert!(wrap_lines("   \n\t ", 100.0, per_char).is_empty());
}

#[test]
fn no_line_exceeds_limit_unless_single_word() {
    let text = "Buen trabajo con las proporciones del torso aunque la cabeza queda un poco \
                grande y los hombros podrian relajarse mas para transmitir movimiento";
    for max in [40.0, 75.0, 120.0, 300.0] {
        for line in wrap_lines(text, max, per_char) {
            assert!(
                per_char(&line) <= max || !line.contains(' '),
                "{line:?} exceeds {max}"
            );
        }
    }
}

#[test]
fn wrapping_preserves_words_in_order() {
    let text = "el gesto   tiene\nmucha energia";
    let joined = wrap_lines(text, 60.0, per_char).join(" ");
    assert_eq!(joined, "el gesto tiene mucha energia");
}

#[test]
fn draw_advances_baseline_per_line() {
    let provider = RecordingProvider::new();
    let mut s = provider.create(400, 400).unwrap();
    // 14px italic measures 7px per char.
    let style = TextStyle::new(14.0, Weight::Regular).italic();
    let last = draw_wrapped(
        &mut s,
        "\"linea uno linea dos\"",
        Point::new(610.0, 860.0),
        70.0,
        20.0,
        &style,
    );

    let canvas = provider.last_canvas().unwrap();
    assert_eq!(canvas.texts(), vec!["\"linea uno", "linea dos\""]);
    assert_eq!(canvas.text_op("linea dos\"").unwrap().0, Point::new(610.0, 880.0));
    assert_eq!(last, 880.0);
}

#[test]
fn draw_of_empty_text_draws_nothing() {
    let provider = RecordingProvider::new();
    let mut s = provider.create(10, 10).unwrap();
    let style = TextStyle::new(14.0, Weight::Regular);
    assert_eq!(draw_wrapped(&mut s, "", Point::new(1.0, 2.0), 50.0, 20.0, &style), 2.0);
    assert!(provider.last_canvas().unwrap().ops.is_empty());
}
