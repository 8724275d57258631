//! postercomp is a deterministic poster composition engine.
//!
//! It turns a source artwork bitmap plus a metadata record (title, year,
//! rating, media kind) into a fixed-size 1179x2556 raster poster under one
//! of two closed layout modes.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: [`SourceArtwork`] construction rejects zero-sized or
//!    undecodable bitmaps up front.
//! 2. **Layout**: a per-mode constant table ([`TraditionalLayout`] /
//!    [`ModernLayout`]) supplies every geometric offset; nothing is derived
//!    from content size.
//! 3. **Compose**: [`PosterCompositor::compose`] draws background, panel or
//!    info box, placed artwork, title/year text, and the star-rating row
//!    onto an explicit caller-owned [`Surface`], then reads back a
//!    [`ComposedPoster`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: identical inputs produce pixel-identical
//!   output; fonts are caller-supplied bytes and no system lookup happens.
//! - **No IO in the render path**: decoding is front-loaded into
//!   [`SourceArtwork`]; the compositor only touches memory.
//! - **Atomic calls**: each compose call returns a complete poster or an
//!   error, never partial output.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod artwork;
mod compose;
mod foundation;
mod geometry;
mod layout;
mod record;
mod surface;
mod text;

pub use artwork::SourceArtwork;
pub use compose::{ModernTitlePolicy, PosterCompositor, compose_batch};
pub use foundation::color::Rgba8;
pub use foundation::error::{PosterError, PosterResult, RenderStage};
pub use geometry::{STAR_INNER_RATIO, rounded_rect_path, size_to_fit, star_in_rect, star_path};
pub use layout::{
    CANVAS_HEIGHT, CANVAS_WIDTH, ModernLayout, STAR_COUNT, TraditionalLayout,
};
pub use record::{LayoutMode, MAX_RATING, MediaRecord};
pub use surface::{ComposedPoster, Surface};
pub use text::{
    MAX_TITLE_SIZE, MIN_TITLE_SIZE, ParleyTextRenderer, TextMetrics, TextRenderer, fit_font_size,
};
