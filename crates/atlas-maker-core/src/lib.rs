//! Core library for laying out images on fixed-size atlas pages.
//!
//! - Strategies: Shelf (rows), Skyline (BL/MW), Guillotine (choice + split), MaxRects
//! - Engine: [`AtlasEngine`] owns the image set and runs reset → sort → pack →
//!   page count → status for each recompute
//! - Export: templated per-image text records plus JSON metadata; the data
//!   model is serde-serializable throughout
//!
//! Quick example:
//! ```
//! use atlas_maker_core::{AtlasEngine, LayoutConfig, PackerKind, SortKey};
//!
//! # fn main() -> atlas_maker_core::Result<()> {
//! let mut engine = AtlasEngine::new();
//! engine.add_source("a.png", "/sprites/a.png", 64, 48)?;
//! engine.add_source("b.png", "/sprites/b.png", 32, 32)?;
//! let cfg = LayoutConfig {
//!     page_width: 256,
//!     page_height: 256,
//!     packer: PackerKind::Skyline,
//!     sort_key: SortKey::Area,
//!     ..Default::default()
//! };
//! let result = engine.recompute(&cfg)?;
//! println!("pages: {}", result.page_count);
//! # Ok(()) }
//! ```

pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod sorter;

pub use compositor::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use model::*;
pub use packer::{Packer, PagePlacer, Placement};

/// Convenience prelude for common types and functions.
/// Importing `atlas_maker_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::compositor::{composite_pages, CanvasCompositor};
    pub use crate::config::{
        GuillotineChoice, GuillotineSplit, LayoutConfig, LayoutConfigBuilder, MaxRectsHeuristic,
        PackerKind, SkylineHeuristic, SortKey,
    };
    pub use crate::engine::AtlasEngine;
    pub use crate::error::{AtlasError, Result};
    pub use crate::export::{render, to_json, write_all, write_to_path};
    pub use crate::model::{Angle, ImageRecord, LayoutResult, LayoutStats, Rect};
    pub use crate::packer::{Packer, PagePlacer, Placement};
}
