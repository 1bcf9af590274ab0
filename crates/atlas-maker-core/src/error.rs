use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error(
        "the largest image is bigger than the page; need at least {required_width}x{required_height}px (page is {page_width}x{page_height}px)"
    )]
    PageTooSmall {
        required_width: u32,
        required_height: u32,
        page_width: u32,
        page_height: u32,
    },
    #[error("invalid source image {name:?}: {width}x{height}")]
    InvalidImage {
        name: String,
        width: u32,
        height: u32,
    },
    #[error("invalid export reorder: {0}")]
    InvalidReorder(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;

impl AtlasError {
    /// True for the validation class of failures, which block a recompute
    /// without touching any previously published layout.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AtlasError::InvalidDimensions { .. }
                | AtlasError::PageTooSmall { .. }
                | AtlasError::InvalidImage { .. }
        )
    }
}
