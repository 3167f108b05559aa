//! Drawing surfaces and the drawing helpers the composers share.

pub(crate) mod cover;
pub(crate) mod cpu;
pub(crate) mod recording;
pub(crate) mod shape;
pub(crate) mod surface;
pub(crate) mod text;
