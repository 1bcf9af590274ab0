use crate::config::LayoutConfig;
use crate::error::{AtlasError, Result};
use crate::model::{ImageRecord, LayoutResult};
use crate::{packer, sorter};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Owns the discovered image set and the last published layout.
///
/// The engine is a plain command/query surface: a batch tool, a test
/// harness or a UI layer all drive it the same way. It is single-threaded;
/// callers serialize access to one instance.
#[derive(Debug, Default)]
pub struct AtlasEngine {
    images: Vec<ImageRecord>,
    next_export_index: usize,
    last: Option<LayoutResult>,
}

impl AtlasEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one discovered source image. Called by the source reader in
    /// directory-enumeration order; the export index is assigned here and
    /// only changes through [`reorder_export`](Self::reorder_export).
    pub fn add_source(
        &mut self,
        display_name: impl Into<String>,
        absolute_path: impl AsRef<Path>,
        width: u32,
        height: u32,
    ) -> Result<&ImageRecord> {
        let name = display_name.into();
        if width == 0 || height == 0 {
            return Err(AtlasError::InvalidImage {
                name,
                width,
                height,
            });
        }
        let record = ImageRecord::new(
            width,
            height,
            name,
            absolute_path.as_ref().to_path_buf(),
            self.next_export_index,
        );
        self.next_export_index += 1;
        let idx = self.images.len();
        self.images.push(record);
        Ok(&self.images[idx])
    }

    /// Discards the whole image set and any published layout, e.g. before
    /// re-scanning a different source directory.
    pub fn clear_images(&mut self) {
        self.images.clear();
        self.next_export_index = 0;
        self.last = None;
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// The layout published by the most recent successful recompute.
    pub fn last_result(&self) -> Option<&LayoutResult> {
        self.last.as_ref()
    }

    /// Largest source width/height over the current set (unrotated).
    fn greatest_dimensions(&self) -> (u32, u32) {
        let mut gw = 0;
        let mut gh = 0;
        for img in &self.images {
            gw = gw.max(img.width);
            gh = gh.max(img.height);
        }
        (gw, gh)
    }

    /// Checks the configuration against the current image set: page
    /// dimensions must be positive and large enough for the largest source
    /// image plus margin. Unrotated dimensions are used on purpose:
    /// rotation is a packing optimization, not a sizing exemption.
    pub fn validate(&self, cfg: &LayoutConfig) -> Result<()> {
        cfg.validate()?;
        let (gw, gh) = self.greatest_dimensions();
        let required_width = gw + cfg.margin;
        let required_height = gh + cfg.margin;
        if cfg.page_width < required_width || cfg.page_height < required_height {
            return Err(AtlasError::PageTooSmall {
                required_width,
                required_height,
                page_width: cfg.page_width,
                page_height: cfg.page_height,
            });
        }
        Ok(())
    }

    /// Runs one full layout pass: validate, reset, sort, pack, publish.
    ///
    /// Re-invocable any number of times; identical arguments reproduce an
    /// identical result. A validation failure returns before any state is
    /// touched, so the previously published layout stays intact.
    #[instrument(skip_all, fields(images = self.images.len(), packer = ?cfg.packer))]
    pub fn recompute(&mut self, cfg: &LayoutConfig) -> Result<&LayoutResult> {
        self.validate(cfg)?;

        for img in self.images.iter_mut() {
            img.reset_placement();
        }

        sorter::order(&mut self.images, cfg.sort_key, cfg.reverse);

        let mut packer = packer::create(cfg);
        packer.init(cfg.page_width, cfg.page_height);
        packer.set_uses_rotation(cfg.rotation_enabled);
        packer.set_margin(cfg.margin);
        packer.clear_errors();
        packer.calculate(&mut self.images);

        let page_count = self
            .images
            .iter()
            .filter(|r| r.placed)
            .map(|r| r.page_index + 1)
            .max()
            .unwrap_or(0);
        let status_message = packer.status_message().to_owned();
        info!(page_count, status = %status_message, "layout recomputed");

        let result = LayoutResult {
            images: self.images.clone(),
            page_count,
            status_message,
        };
        Ok(&*self.last.insert(result))
    }

    /// Applies a new export order. `order` lists current positions in the
    /// image sequence, one entry per image; the record at `order[i]` gets
    /// export index `i`.
    pub fn reorder_export(&mut self, order: &[usize]) -> Result<()> {
        if order.len() != self.images.len() {
            return Err(AtlasError::InvalidReorder(format!(
                "expected {} entries, got {}",
                self.images.len(),
                order.len()
            )));
        }
        let mut seen = vec![false; self.images.len()];
        for &pos in order {
            if pos >= self.images.len() || seen[pos] {
                return Err(AtlasError::InvalidReorder(format!(
                    "entry {pos} is out of range or repeated"
                )));
            }
            seen[pos] = true;
        }
        for (export_index, &pos) in order.iter().enumerate() {
            self.images[pos].export_index = export_index;
        }
        debug!("export order updated");
        Ok(())
    }
}
