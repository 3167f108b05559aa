use crate::assets::decode::DecodedImage;
use crate::assets::loader::{ImageLoader, LoadError};
use crate::compose::options::ExportOptions;
use crate::compose::score::is_good;
use crate::foundation::core::{Rgba8, unix_millis};
use crate::foundation::error::PosecardResult;
use crate::render::surface::SurfaceProvider;

/// Renders pose cards and session memories onto surfaces from `P`.
///
/// Each export creates its own surface, so one compositor can serve any number of exports.
pub struct Compositor<P> {
    pub(crate) provider: P,
    pub(crate) loader: ImageLoader,
    pub(crate) options: ExportOptions,
    pub(crate) clock: fn() -> u64,
}

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// Drawings painted onto the canvas.
    pub cards_placed: usize,
    /// Drawings that did not fit the layout.
    pub cards_skipped: usize,
    /// Images that failed to load (the reference included).
    pub elements_failed: usize,
}

impl<P: SurfaceProvider> Compositor<P> {
    pub fn new(provider: P, loader: ImageLoader) -> Self {
        Self {
            provider,
            loader,
            options: ExportOptions::default(),
            clock: unix_millis,
        }
    }

    /// Replace the export options after validating them.
    pub fn with_options(mut self, options: ExportOptions) -> PosecardResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Clock for the session memory filename.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Load every source concurrently. Results keep the order of `sources`.
    pub(crate) async fn load_batch(
        &self,
        sources: impl IntoIterator<Item = &str>,
    ) -> Vec<Result<DecodedImage, LoadError>> {
        futures::future::join_all(sources.into_iter().map(|src| self.loader.load(src))).await
    }

    pub(crate) fn score_color(&self, score: f64) -> Rgba8 {
        if is_good(score, self.options.good_score_threshold) {
            self.options.theme.good_score
        } else {
            self.options.theme.fair_score
        }
    }
}

/// `pose-{n}.png` for the pose at zero-based `index`.
pub fn pose_filename(index: usize) -> String {
    format!("pose-{}.png", index.saturating_add(1))
}

pub fn session_filename(millis: u64) -> String {
    format!("recuerdo-sesion-{millis}.png")
}
