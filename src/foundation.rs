/// Straight-alpha RGBA8 color type and helpers.
pub mod color;
/// Error taxonomy shared by every engine API.
pub mod error;
