use crate::config::LayoutConfig;
use crate::model::{ImageRecord, LayoutResult};

/// Host-side pixel boundary. The layout core computes placements and never
/// touches pixels; a compositor owned by the host application draws them.
///
/// Positions handed to `place_image` already include the margin shift, so
/// an implementation paints at exactly the given coordinates, rotating by
/// `record.angle` first.
pub trait CanvasCompositor {
    type Error;

    /// Opens a fresh canvas for one page, optionally filled with a uniform
    /// background color (RGBA).
    fn begin_page(
        &mut self,
        page_index: usize,
        width: u32,
        height: u32,
        background: Option<[u8; 4]>,
    ) -> std::result::Result<(), Self::Error>;

    /// Paints one source image at the given canvas position.
    fn place_image(
        &mut self,
        record: &ImageRecord,
        x: u32,
        y: u32,
    ) -> std::result::Result<(), Self::Error>;

    /// Completes the page; `merge` requests flattening its layers.
    fn finish_page(&mut self, page_index: usize, merge: bool)
        -> std::result::Result<(), Self::Error>;
}

/// Drives a compositor once per completed page, in page order. A caller
/// convenience: the core's recompute never invokes compositing itself.
pub fn composite_pages<C: CanvasCompositor>(
    result: &LayoutResult,
    cfg: &LayoutConfig,
    compositor: &mut C,
    background: Option<[u8; 4]>,
    merge: bool,
) -> std::result::Result<(), C::Error> {
    for page in 0..result.page_count {
        compositor.begin_page(page, cfg.page_width, cfg.page_height, background)?;
        for img in result.images_for_page(page) {
            let x = img.pos_x as u32 + cfg.margin;
            let y = img.pos_y as u32 + cfg.margin;
            compositor.place_image(img, x, y)?;
        }
        compositor.finish_page(page, merge)?;
    }
    Ok(())
}
