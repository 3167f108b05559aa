//! Session data handed over by the practice app, and the summary derived from it.

pub(crate) mod model;
pub(crate) mod summary;
