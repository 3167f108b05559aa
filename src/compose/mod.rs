//! The two composites: the per-pose portrait card and the full-session memory.

pub(crate) mod compositor;
pub(crate) mod options;
pub(crate) mod pose_card;
pub(crate) mod score;
pub(crate) mod session_memory;
