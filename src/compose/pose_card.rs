use crate::assets::fonts::Weight;
use crate::compose::compositor::{Compositor, ExportReport, pose_filename};
use crate::compose::score::format_score;
use crate::export::sink::DownloadSink;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::PosecardResult;
use crate::render::cover::draw_cover_image;
use crate::render::shape::fill_pill;
use crate::render::surface::{Surface, SurfaceProvider, TextStyle};
use crate::session::model::{DrawingEvaluation, Participant};
use crate::session::summary::{PoseGroup, lookup_participant};

// Badge geometry relative to the card's top-left / top-right corner.
const NAME_PILL: (f64, f64, f64, f64, f64) = (15.0, 15.0, 160.0, 44.0, 12.0);
const NAME_TEXT: (f64, f64) = (95.0, 43.0);
const SCORE_PILL_INSET: (f64, f64, f64, f64, f64) = (115.0, 15.0, 100.0, 50.0, 12.0);
const SCORE_TEXT_INSET: (f64, f64) = (65.0, 48.0);

impl<P: SurfaceProvider> Compositor<P> {
    /// Render the portrait card for `group` (the pose at zero-based `index`) and save it as
    /// `pose-{index+1}.png`.
    ///
    /// Images that fail to load are skipped: the reference band becomes a placeholder and a
    /// drawing card disappears with its badges. Only surface and save failures are errors.
    #[tracing::instrument(
        skip(self, group, participants, sink),
        fields(pose = %group.pose.id, drawings = group.drawings.len())
    )]
    pub async fn export_pose(
        &self,
        group: &PoseGroup,
        index: usize,
        participants: &[Participant],
        sink: &mut dyn DownloadSink,
    ) -> PosecardResult<ExportReport> {
        let layout = &self.options.pose_card;
        let theme = &self.options.theme;
        let labels = &self.options.labels;

        let mut surface = self.provider.create(layout.width, layout.height)?;
        let canvas = layout.canvas().rect();
        let center_x = canvas.width() / 2.0;

        surface.fill_vertical_gradient(canvas, theme.background_top, theme.background_bottom);
        surface.fill_text(
            &labels.pose_title(index.saturating_add(1)),
            Point::new(center_x, layout.title_y),
            &TextStyle::new(52.0, Weight::Black).color(theme.text).centered(),
        );
        surface.fill_text(
            &labels.brand,
            Point::new(center_x, layout.subtitle_y),
            &TextStyle::new(24.0, Weight::Bold)
                .color(theme.subtitle)
                .centered(),
        );

        let slots = layout.card_slots(group.drawings.len());
        let drawings = &group.drawings[..slots.len()];
        tracing::debug!(
            width = layout.width,
            height = layout.height,
            placed = slots.len(),
            skipped = group.drawings.len() - slots.len(),
            "pose card layout"
        );

        let mut loads = self
            .load_batch(
                std::iter::once(group.pose.url.as_str())
                    .chain(drawings.iter().map(|d| d.drawing_thumbnail.as_str())),
            )
            .await
            .into_iter();
        let mut failed = 0;

        let band = layout.band.rect();
        let reference = match loads.next() {
            Some(Ok(img)) => draw_cover_image(&mut surface, &img, band, layout.band.radius)
                .map_err(|e| e.to_string()),
            Some(Err(err)) => Err(err.to_string()),
            None => Err("no reference source".to_owned()),
        };
        match reference {
            Ok(()) => {
                let pill = layout.reference_pill;
                fill_pill(&mut surface, pill.rect(), pill.radius, theme.reference_pill);
                surface.fill_text(
                    &labels.reference,
                    Point::new(pill.x + pill.width / 2.0, pill.y + 42.0),
                    &TextStyle::new(24.0, Weight::Black).color(theme.text).centered(),
                );
            }
            Err(error) => {
                failed += 1;
                tracing::warn!(url = %group.pose.url, %error, "reference image unavailable; drawing placeholder");
                surface.fill_rect(band, theme.placeholder);
            }
        }

        let mut placed = 0;
        for ((drawing, slot), load) in drawings.iter().zip(&slots).zip(loads) {
            let drawn = load.map_err(|e| e.to_string()).and_then(|thumb| {
                draw_cover_image(&mut surface, &thumb, *slot, layout.card_radius)
                    .map_err(|e| e.to_string())
            });
            match drawn {
                Ok(()) => {
                    self.draw_card_badges(&mut surface, drawing, *slot, participants);
                    placed += 1;
                }
                Err(error) => {
                    failed += 1;
                    tracing::warn!(evaluation = %drawing.id, %error, "drawing thumbnail unavailable; card skipped");
                }
            }
        }

        surface.fill_text(
            &labels.pose_footer,
            Point::new(center_x, canvas.height() - layout.footer_offset),
            &TextStyle::new(18.0, Weight::Bold)
                .color(theme.pose_footer)
                .centered(),
        );

        let filename = pose_filename(index);
        let png = surface.encode_png()?;
        sink.save(&filename, &png)?;
        tracing::info!(%filename, placed, failed, "pose card exported");

        Ok(ExportReport {
            filename,
            width: layout.width,
            height: layout.height,
            cards_placed: placed,
            cards_skipped: group.drawings.len() - slots.len(),
            elements_failed: failed,
        })
    }

    fn draw_card_badges<S: Surface>(
        &self,
        surface: &mut S,
        drawing: &DrawingEvaluation,
        card: Rect,
        participants: &[Participant],
    ) {
        let theme = &self.options.theme;

        let (dx, dy, w, h, r) = NAME_PILL;
        let name_pill = Rect::new(card.x0 + dx, card.y0 + dy, card.x0 + dx + w, card.y0 + dy + h);
        fill_pill(surface, name_pill, r, theme.name_pill);
        let name = lookup_participant(participants, &drawing.participant_id)
            .name_or(&self.options.labels.pose_artist_fallback)
            .to_uppercase();
        surface.fill_text(
            &name,
            Point::new(card.x0 + NAME_TEXT.0, card.y0 + NAME_TEXT.1),
            &TextStyle::new(18.0, Weight::Bold).color(theme.text).centered(),
        );

        let (inset, dy, w, h, r) = SCORE_PILL_INSET;
        let x = card.x1 - inset;
        let score_pill = Rect::new(x, card.y0 + dy, x + w, card.y0 + dy + h);
        fill_pill(surface, score_pill, r, self.score_color(drawing.score));
        surface.fill_text(
            &format_score(drawing.score),
            Point::new(card.x1 - SCORE_TEXT_INSET.0, card.y0 + SCORE_TEXT_INSET.1),
            &TextStyle::new(24.0, Weight::Black).color(theme.text).centered(),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pose_card.rs"]
mod tests;
