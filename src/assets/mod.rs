//! Image loading and decoding, fonts, and color parsing.

pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod loader;
pub(crate) mod svg_raster;
