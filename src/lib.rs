//! posecard renders shareable summary images for figure-drawing practice sessions.
//!
//! Two composites are produced from a session's poses, participants and scored drawings:
//!
//! - a 1080x1920 portrait card per practiced pose ([`Compositor::export_pose`])
//! - one tall "session memory" covering every pose ([`Compositor::export_session`])
//!
//! Drawing goes through an injected [`SurfaceProvider`] ([`CpuSurfaceProvider`] in production,
//! [`RecordingProvider`] in tests) and finished PNGs are handed to a [`DownloadSink`]. Images
//! that fail to load are skipped; only surface and save failures abort an export.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod export;
mod foundation;
mod render;
mod session;

pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Size, unix_millis};
pub use crate::foundation::error::{PosecardError, PosecardResult};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::fonts::{FaceSlot, FontBook, FontFace, Weight};
pub use crate::assets::loader::{
    Fetch, HttpFetcher, ImageLoader, ImageRef, LoadError, OfflineFetcher, cache_bust_url,
    decode_data_uri,
};
pub use crate::compose::compositor::{Compositor, ExportReport, pose_filename, session_filename};
pub use crate::compose::options::{
    ExportOptions, Labels, MAX_DRAWINGS_PER_POSE, PoseCardLayout, RoundedBox, SessionLayout,
    Theme,
};
pub use crate::compose::score::{format_score, is_good};
pub use crate::export::sink::{DirectorySink, DownloadSink, InMemorySink};
pub use crate::render::cover::{cover_fit, draw_cover_image};
pub use crate::render::cpu::{CpuSurface, CpuSurfaceProvider};
pub use crate::render::recording::{DrawOp, RecordedCanvas, RecordingProvider, RecordingSurface};
pub use crate::render::surface::{ClipShape, Surface, SurfaceProvider, TextAlign, TextStyle};
pub use crate::render::text::{draw_wrapped, wrap_lines};
pub use crate::session::model::{
    DrawingEvaluation, Participant, ParticipantKind, PoseImage, Profile, SessionSnapshot,
};
pub use crate::session::summary::{
    ParticipantLookup, PoseGroup, SessionStats, SessionSummary, lookup_participant,
};
