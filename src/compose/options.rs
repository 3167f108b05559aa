use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::foundation::error::{PosecardError, PosecardResult};

/// Upper bound on drawings per pose, on the card and in a session section.
pub const MAX_DRAWINGS_PER_POSE: usize = 4;

/// A rounded rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub radius: f64,
}

impl RoundedBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            radius,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Geometry of the per-pose portrait card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PoseCardLayout {
    pub width: u32,
    pub height: u32,
    pub title_y: f64,
    pub subtitle_y: f64,
    /// Reference image band.
    pub band: RoundedBox,
    pub reference_pill: RoundedBox,
    pub margin: f64,
    pub columns: u32,
    pub column_gap: f64,
    pub row_gap: f64,
    /// Space between the reference band and the first card row.
    pub grid_gap: f64,
    pub card_height: f64,
    pub card_radius: f64,
    pub max_cards: usize,
    /// Cards whose bottom edge would pass `height - bottom_guard` are not placed.
    pub bottom_guard: f64,
    /// Footer baseline distance from the bottom edge.
    pub footer_offset: f64,
}

impl Default for PoseCardLayout {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            title_y: 130.0,
            subtitle_y: 180.0,
            band: RoundedBox::new(50.0, 250.0, 980.0, 720.0, 48.0),
            reference_pill: RoundedBox::new(90.0, 290.0, 200.0, 64.0, 20.0),
            margin: 50.0,
            columns: 2,
            column_gap: 30.0,
            row_gap: 30.0,
            grid_gap: 60.0,
            card_height: 440.0,
            card_radius: 40.0,
            max_cards: 4,
            bottom_guard: 60.0,
            footer_offset: 70.0,
        }
    }
}

impl PoseCardLayout {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn card_width(&self) -> f64 {
        let columns = f64::from(self.columns.max(1));
        (f64::from(self.width) - 2.0 * self.margin - (columns - 1.0) * self.column_gap) / columns
    }

    /// Rectangles of the first `count` cards (at most `max_cards`), stopping at the first card
    /// that would cross the bottom guard.
    pub fn card_slots(&self, count: usize) -> Vec<Rect> {
        let columns = self.columns.max(1) as usize;
        let card_w = self.card_width();
        let top = self.band.y + self.band.height + self.grid_gap;
        let limit = f64::from(self.height) - self.bottom_guard;

        let mut slots = Vec::new();
        for i in 0..count.min(self.max_cards) {
            let col = (i % columns) as f64;
            let row = (i / columns) as f64;
            let x = self.margin + col * (card_w + self.column_gap);
            let y = top + row * (self.card_height + self.row_gap);
            if y + self.card_height > limit {
                break;
            }
            slots.push(Rect::new(x, y, x + card_w, y + self.card_height));
        }
        slots
    }
}

/// Geometry of the full-session memory canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionLayout {
    pub width: u32,
    pub header_height: u32,
    pub section_height: u32,
    pub footer_height: u32,
    pub margin_x: f64,
    pub title_y: f64,
    pub stats_y: f64,
    /// Separator rule distance above each section.
    pub separator_offset: f64,
    pub separator_width: f64,
    /// Offset of the reference and drawing row below the section label.
    pub content_top: f64,
    pub reference_width: f64,
    pub reference_height: f64,
    pub reference_radius: f64,
    /// Gap between the reference and the first drawing.
    pub reference_gap: f64,
    pub drawing_width: f64,
    pub drawing_height: f64,
    pub drawing_gap: f64,
    pub drawing_radius: f64,
    pub max_drawings: usize,
    pub feedback_line_height: f64,
    pub footer_offset: f64,
}

impl Default for SessionLayout {
    fn default() -> Self {
        Self {
            width: 1920,
            header_height: 400,
            section_height: 920,
            footer_height: 200,
            margin_x: 100.0,
            title_y: 180.0,
            stats_y: 240.0,
            separator_offset: 50.0,
            separator_width: 2.0,
            content_top: 80.0,
            reference_width: 450.0,
            reference_height: 600.0,
            reference_radius: 40.0,
            reference_gap: 60.0,
            drawing_width: 300.0,
            drawing_height: 400.0,
            drawing_gap: 40.0,
            drawing_radius: 30.0,
            max_drawings: 4,
            feedback_line_height: 20.0,
            footer_offset: 80.0,
        }
    }
}

impl SessionLayout {
    /// `header + section * poses + footer`.
    pub fn canvas_height(&self, pose_count: usize) -> PosecardResult<u32> {
        u32::try_from(pose_count)
            .ok()
            .and_then(|n| self.section_height.checked_mul(n))
            .and_then(|s| s.checked_add(self.header_height))
            .and_then(|s| s.checked_add(self.footer_height))
            .ok_or_else(|| {
                PosecardError::validation(format!("session canvas for {pose_count} poses overflows"))
            })
    }

    pub fn section_top(&self, index: usize) -> f64 {
        f64::from(self.header_height) + f64::from(self.section_height) * index as f64
    }

    pub fn reference_rect(&self, section_top: f64) -> Rect {
        let y = section_top + self.content_top;
        Rect::new(
            self.margin_x,
            y,
            self.margin_x + self.reference_width,
            y + self.reference_height,
        )
    }

    /// Drawing rectangles of one section, left to right, at most `max_drawings`.
    pub fn drawing_slots(&self, section_top: f64, count: usize) -> Vec<Rect> {
        let x0 = self.margin_x + self.reference_width + self.reference_gap;
        let y = section_top + self.content_top;
        (0..count.min(self.max_drawings))
            .map(|j| {
                let x = x0 + j as f64 * (self.drawing_width + self.drawing_gap);
                Rect::new(x, y, x + self.drawing_width, y + self.drawing_height)
            })
            .collect()
    }
}

/// Every string drawn on the composites. `{n}`, `{total}` and `{avg}` are substituted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Labels {
    pub pose_title: String,
    pub brand: String,
    pub reference: String,
    pub session_reference: String,
    pub pose_footer: String,
    pub session_title: String,
    pub session_stats: String,
    pub session_footer: String,
    pub pose_artist_fallback: String,
    pub session_artist_fallback: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            pose_title: "POSE #{n}".to_owned(),
            brand: "SESIÓN DE DIBUJO!".to_owned(),
            reference: "REFERENCIA".to_owned(),
            session_reference: "REF".to_owned(),
            pose_footer: "CREADO CON SESIÓN DE DIBUJO!".to_owned(),
            session_title: "RECUERDO DE SESIÓN".to_owned(),
            session_stats: "TOTAL DIBUJOS: {total}   •   PUNTUACIÓN MEDIA: {avg}/10".to_owned(),
            session_footer: "SESIÓN DE DIBUJO! • TU PROCESO ES TU ARTE".to_owned(),
            pose_artist_fallback: "ARTISTA".to_owned(),
            session_artist_fallback: "Artista".to_owned(),
        }
    }
}

impl Labels {
    /// Title for the pose at `number` (1-based).
    pub fn pose_title(&self, number: usize) -> String {
        self.pose_title.replace("{n}", &number.to_string())
    }

    pub fn session_stats(&self, total: usize, average: &str) -> String {
        self.session_stats
            .replace("{total}", &total.to_string())
            .replace("{avg}", average)
    }
}

/// Palette of both composites.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background_top: Rgba8,
    pub background_bottom: Rgba8,
    pub session_base: Rgba8,
    pub placeholder: Rgba8,
    pub text: Rgba8,
    pub subtitle: Rgba8,
    pub pose_footer: Rgba8,
    pub reference_pill: Rgba8,
    pub session_reference_pill: Rgba8,
    pub name_pill: Rgba8,
    pub good_score: Rgba8,
    pub fair_score: Rgba8,
    pub accent: Rgba8,
    pub separator: Rgba8,
    pub session_stats: Rgba8,
    pub session_name: Rgba8,
    pub feedback: Rgba8,
    pub session_footer: Rgba8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_top: Rgba8::rgb(0x0f, 0x17, 0x2a),
            background_bottom: Rgba8::rgb(0x05, 0x05, 0x05),
            session_base: Rgba8::rgb(0x05, 0x05, 0x05),
            placeholder: Rgba8::rgb(0x11, 0x11, 0x11),
            text: Rgba8::WHITE,
            subtitle: Rgba8::WHITE.with_alpha(0.4),
            pose_footer: Rgba8::WHITE.with_alpha(0.1),
            reference_pill: Rgba8::rgba(37, 99, 235, 0.95),
            session_reference_pill: Rgba8::rgba(37, 99, 235, 0.9),
            name_pill: Rgba8::BLACK.with_alpha(0.6),
            good_score: Rgba8::rgba(16, 185, 129, 0.9),
            fair_score: Rgba8::rgba(245, 158, 11, 0.9),
            accent: Rgba8::rgb(0x25, 0x63, 0xeb),
            separator: Rgba8::WHITE.with_alpha(0.05),
            session_stats: Rgba8::WHITE.with_alpha(0.4),
            session_name: Rgba8::WHITE.with_alpha(0.8),
            feedback: Rgba8::WHITE.with_alpha(0.4),
            session_footer: Rgba8::WHITE.with_alpha(0.2),
        }
    }
}

/// Everything configurable about an export. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub pose_card: PoseCardLayout,
    pub session: SessionLayout,
    pub labels: Labels,
    pub theme: Theme,
    /// Scores at or above this (0..=100) get the green badge.
    pub good_score_threshold: f64,
    /// Timeout for remote image requests; none by default.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pose_card: PoseCardLayout::default(),
            session: SessionLayout::default(),
            labels: Labels::default(),
            theme: Theme::default(),
            good_score_threshold: 80.0,
            fetch_timeout_secs: None,
        }
    }
}

impl ExportOptions {
    pub fn from_reader<R: std::io::Read>(r: R) -> PosecardResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| PosecardError::serde(format!("parse export options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PosecardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosecardError::validation(format!("open export options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> PosecardResult<()> {
        let card = &self.pose_card;
        if card.width == 0 || card.height == 0 {
            return Err(PosecardError::validation("pose card canvas must be non-empty"));
        }
        if card.columns == 0 {
            return Err(PosecardError::validation("pose card grid needs at least one column"));
        }
        if !(card.card_width() > 0.0 && card.card_height > 0.0) {
            return Err(PosecardError::validation("pose card cards must have a positive size"));
        }
        if card.max_cards > MAX_DRAWINGS_PER_POSE {
            return Err(PosecardError::validation(format!(
                "pose card max_cards must be at most {MAX_DRAWINGS_PER_POSE}"
            )));
        }
        if self.session.max_drawings > MAX_DRAWINGS_PER_POSE {
            return Err(PosecardError::validation(format!(
                "session max_drawings must be at most {MAX_DRAWINGS_PER_POSE}"
            )));
        }
        if self.session.width == 0 {
            return Err(PosecardError::validation("session canvas width must be non-zero"));
        }
        if !(self.session.drawing_width > 0.0 && self.session.drawing_height > 0.0) {
            return Err(PosecardError::validation("session drawings must have a positive size"));
        }
        if !self.good_score_threshold.is_finite() {
            return Err(PosecardError::validation("good_score_threshold must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/options.rs"]
mod tests;
