use crate::assets::fonts::Weight;
use crate::compose::compositor::{Compositor, ExportReport, session_filename};
use crate::compose::score::format_score;
use crate::export::sink::DownloadSink;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::PosecardResult;
use crate::render::cover::draw_cover_image;
use crate::render::shape::fill_pill;
use crate::render::surface::{Surface, SurfaceProvider, TextStyle};
use crate::render::text::draw_wrapped;
use crate::session::model::{DrawingEvaluation, Participant};
use crate::session::summary::{PoseGroup, SessionSummary, lookup_participant};

#[derive(Default)]
struct SectionTally {
    placed: usize,
    skipped: usize,
    failed: usize,
}

impl<P: SurfaceProvider> Compositor<P> {
    /// Render every practiced pose of `summary` into one tall canvas and save it as
    /// `recuerdo-sesion-{millis}.png`.
    ///
    /// Sections are stacked in summary order. Load failures are tolerated the same way as in
    /// [`Compositor::export_pose`].
    #[tracing::instrument(
        skip(self, summary, participants, sink),
        fields(poses = summary.pose_count(), evaluations = summary.stats.total_evaluations)
    )]
    pub async fn export_session(
        &self,
        summary: &SessionSummary,
        participants: &[Participant],
        sink: &mut dyn DownloadSink,
    ) -> PosecardResult<ExportReport> {
        let layout = &self.options.session;
        let theme = &self.options.theme;
        let labels = &self.options.labels;

        let width = layout.width;
        let height = layout.canvas_height(summary.pose_count())?;
        tracing::debug!(width, height, "session canvas");

        let mut surface = self.provider.create(width, height)?;
        let canvas = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));

        surface.fill_rect(canvas, theme.session_base);
        surface.fill_vertical_gradient(canvas, theme.background_top, theme.background_bottom);
        surface.fill_text(
            &labels.session_title,
            Point::new(layout.margin_x, layout.title_y),
            &TextStyle::new(80.0, Weight::Black).color(theme.text),
        );
        let stats = labels.session_stats(
            summary.stats.total_evaluations,
            &format_score(summary.stats.average_score),
        );
        surface.fill_text(
            &stats,
            Point::new(layout.margin_x, layout.stats_y),
            &TextStyle::new(30.0, Weight::Bold).color(theme.session_stats),
        );

        let mut tally = SectionTally::default();
        for (i, group) in summary.groups.iter().enumerate() {
            let section = self
                .draw_section(&mut surface, i, group, participants)
                .await;
            tally.placed += section.placed;
            tally.skipped += section.skipped;
            tally.failed += section.failed;
        }

        surface.fill_text(
            &labels.session_footer,
            Point::new(canvas.width() / 2.0, canvas.height() - layout.footer_offset),
            &TextStyle::new(24.0, Weight::Bold)
                .color(theme.session_footer)
                .centered(),
        );

        let filename = session_filename((self.clock)());
        let png = surface.encode_png()?;
        sink.save(&filename, &png)?;
        tracing::info!(%filename, placed = tally.placed, failed = tally.failed, "session memory exported");

        Ok(ExportReport {
            filename,
            width,
            height,
            cards_placed: tally.placed,
            cards_skipped: tally.skipped,
            elements_failed: tally.failed,
        })
    }

    async fn draw_section(
        &self,
        surface: &mut P::Surface,
        index: usize,
        group: &PoseGroup,
        participants: &[Participant],
    ) -> SectionTally {
        let layout = &self.options.session;
        let theme = &self.options.theme;
        let labels = &self.options.labels;
        let top = layout.section_top(index);

        let rule_y = top - layout.separator_offset;
        surface.fill_rect(
            Rect::new(
                layout.margin_x,
                rule_y - layout.separator_width / 2.0,
                f64::from(layout.width) - layout.margin_x,
                rule_y + layout.separator_width / 2.0,
            ),
            theme.separator,
        );
        surface.fill_rect(
            Rect::new(layout.margin_x, top, layout.margin_x + 10.0, top + 40.0),
            theme.accent,
        );
        surface.fill_text(
            &labels.pose_title(index + 1),
            Point::new(layout.margin_x + 30.0, top + 32.0),
            &TextStyle::new(32.0, Weight::Black).color(theme.text),
        );

        let slots = layout.drawing_slots(top, group.drawings.len());
        let drawings = &group.drawings[..slots.len()];
        let mut tally = SectionTally {
            skipped: group.drawings.len() - slots.len(),
            ..SectionTally::default()
        };

        let mut loads = self
            .load_batch(
                std::iter::once(group.pose.url.as_str())
                    .chain(drawings.iter().map(|d| d.drawing_thumbnail.as_str())),
            )
            .await
            .into_iter();

        let reference_rect = layout.reference_rect(top);
        let reference = match loads.next() {
            Some(Ok(img)) => {
                draw_cover_image(surface, &img, reference_rect, layout.reference_radius)
                    .map_err(|e| e.to_string())
            }
            Some(Err(err)) => Err(err.to_string()),
            None => Err("no reference source".to_owned()),
        };
        match reference {
            Ok(()) => {
                let pill = Rect::new(
                    reference_rect.x0 + 20.0,
                    reference_rect.y0 + 20.0,
                    reference_rect.x0 + 160.0,
                    reference_rect.y0 + 60.0,
                );
                fill_pill(surface, pill, 12.0, theme.session_reference_pill);
                surface.fill_text(
                    &labels.session_reference,
                    Point::new(reference_rect.x0 + 90.0, reference_rect.y0 + 46.0),
                    &TextStyle::new(16.0, Weight::Bold).color(theme.text).centered(),
                );
            }
            Err(error) => {
                tally.failed += 1;
                tracing::warn!(pose = %group.pose.id, %error, "reference image unavailable; drawing placeholder");
                surface.fill_rect(reference_rect, theme.placeholder);
            }
        }

        for ((drawing, slot), load) in drawings.iter().zip(&slots).zip(loads) {
            let drawn = load.map_err(|e| e.to_string()).and_then(|thumb| {
                draw_cover_image(surface, &thumb, *slot, layout.drawing_radius)
                    .map_err(|e| e.to_string())
            });
            match drawn {
                Ok(()) => {
                    self.draw_drawing_caption(surface, drawing, *slot, participants);
                    tally.placed += 1;
                }
                Err(error) => {
                    tally.failed += 1;
                    tracing::warn!(evaluation = %drawing.id, %error, "drawing thumbnail unavailable; card skipped");
                }
            }
        }
        tally
    }

    fn draw_drawing_caption<S: Surface>(
        &self,
        surface: &mut S,
        drawing: &DrawingEvaluation,
        card: Rect,
        participants: &[Participant],
    ) {
        let layout = &self.options.session;
        let theme = &self.options.theme;

        let pill = Rect::new(card.x0 + 15.0, card.y0 + 15.0, card.x0 + 85.0, card.y0 + 55.0);
        fill_pill(surface, pill, 10.0, self.score_color(drawing.score));
        surface.fill_text(
            &format_score(drawing.score),
            Point::new(card.x0 + 50.0, card.y0 + 42.0),
            &TextStyle::new(18.0, Weight::Black).color(theme.text).centered(),
        );

        let name = lookup_participant(participants, &drawing.participant_id)
            .name_or(&self.options.labels.session_artist_fallback);
        surface.fill_text(
            name,
            Point::new(card.x0, card.y1 + 35.0),
            &TextStyle::new(16.0, Weight::Bold).color(theme.session_name),
        );

        draw_wrapped(
            surface,
            &format!("\"{}\"", drawing.feedback),
            Point::new(card.x0, card.y1 + 60.0),
            layout.drawing_width,
            layout.feedback_line_height,
            &TextStyle::new(14.0, Weight::Regular)
                .italic()
                .color(theme.feedback),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/session_memory.rs"]
mod tests;
