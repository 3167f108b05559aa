use crate::foundation::core::Point;
use crate::render::surface::{Surface, TextStyle};

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Words are split on whitespace and never broken, so a word wider than `max_width` sits alone
/// on its own line.
pub fn wrap_lines(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            out.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Draw `text` wrapped to `max_width`, first baseline at `(x, y)`.
///
/// Returns the baseline of the last drawn line (`y` when nothing was drawn).
pub fn draw_wrapped<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    origin: Point,
    max_width: f64,
    line_height: f64,
    style: &TextStyle,
) -> f64 {
    let lines = wrap_lines(text, max_width, |candidate| {
        surface.measure_text(candidate, style)
    });
    let mut baseline = origin.y;
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            baseline += line_height;
        }
        surface.fill_text(line, Point::new(origin.x, baseline), style);
    }
    baseline
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
