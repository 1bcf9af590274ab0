use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if `self` and `r` share any area.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.x + r.w
            || r.x >= self.x + self.w
            || self.y >= r.y + r.h
            || r.y >= self.y + self.h)
    }
}

/// Placement rotation assigned by a packing strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    /// Stored upright.
    #[default]
    None,
    /// Rotated 90 degrees; width and height swap on the page.
    Quarter,
}

impl Angle {
    pub fn degrees(self) -> u32 {
        match self {
            Angle::None => 0,
            Angle::Quarter => 90,
        }
    }
    pub fn is_rotated(self) -> bool {
        matches!(self, Angle::Quarter)
    }
}

/// Position sentinel for records that are not placed on any page.
pub const UNPLACED: i32 = -1;

/// One discovered source image and, after layout, its placement.
///
/// `export_index` is assigned once at discovery time and only changes when the
/// caller reorders the export sequence; it is independent of packing order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    /// Source width in pixels (>= 1).
    pub width: u32,
    /// Source height in pixels (>= 1).
    pub height: u32,
    /// Display name used in export records and page layers.
    pub file_name: String,
    /// Absolute location of the source file; opaque to the layout core.
    pub full_path: PathBuf,
    /// Rotation applied by the packer.
    pub angle: Angle,
    /// True once a packer has assigned a position.
    pub placed: bool,
    /// Page the record was placed on; meaningful only if `placed`.
    pub page_index: usize,
    /// Row in the export file, user-reorderable.
    pub export_index: usize,
    /// Placement x, or `UNPLACED`.
    pub pos_x: i32,
    /// Placement y, or `UNPLACED`.
    pub pos_y: i32,
}

impl ImageRecord {
    pub fn new(
        width: u32,
        height: u32,
        file_name: impl Into<String>,
        full_path: impl Into<PathBuf>,
        export_index: usize,
    ) -> Self {
        Self {
            width,
            height,
            file_name: file_name.into(),
            full_path: full_path.into(),
            angle: Angle::None,
            placed: false,
            page_index: 0,
            export_index,
            pos_x: UNPLACED,
            pos_y: UNPLACED,
        }
    }

    /// Width/height as stored on the page (swapped when rotated).
    pub fn effective_size(&self) -> (u32, u32) {
        if self.angle.is_rotated() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// The occupied page rectangle, if placed.
    pub fn placed_rect(&self) -> Option<Rect> {
        if !self.placed {
            return None;
        }
        let (w, h) = self.effective_size();
        Some(Rect::new(self.pos_x as u32, self.pos_y as u32, w, h))
    }

    /// Clears every field a layout run assigns. A recompute never extends a
    /// stale layout, so this runs on all records before packing.
    pub fn reset_placement(&mut self) {
        self.pos_x = UNPLACED;
        self.pos_y = UNPLACED;
        self.placed = false;
        self.page_index = 0;
        self.angle = Angle::None;
    }
}

/// Result of one layout run: the full ordered/placed record sequence, the
/// number of pages needed to hold it, and the packer's status line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutResult {
    pub images: Vec<ImageRecord>,
    pub page_count: usize,
    pub status_message: String,
}

impl LayoutResult {
    /// Records placed on `page_index`, in layout order.
    pub fn images_for_page(&self, page_index: usize) -> impl Iterator<Item = &ImageRecord> {
        self.images
            .iter()
            .filter(move |r| r.placed && r.page_index == page_index)
    }

    /// Computes occupancy statistics for this layout.
    pub fn stats(&self, page_width: u32, page_height: u32) -> LayoutStats {
        let num_placed = self.images.iter().filter(|r| r.placed).count();
        let num_rotated = self
            .images
            .iter()
            .filter(|r| r.placed && r.angle.is_rotated())
            .count();
        let total_page_area =
            (page_width as u64) * (page_height as u64) * (self.page_count as u64);
        let used_area: u64 = self
            .images
            .iter()
            .filter(|r| r.placed)
            .map(|r| (r.width as u64) * (r.height as u64))
            .sum();
        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };
        LayoutStats {
            num_pages: self.page_count,
            num_images: self.images.len(),
            num_placed,
            num_rotated,
            total_page_area,
            used_area,
            occupancy,
        }
    }
}

/// Statistics about layout efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    pub num_pages: usize,
    pub num_images: usize,
    pub num_placed: usize,
    pub num_rotated: usize,
    /// Sum of page width * height over all pages.
    pub total_page_area: u64,
    /// Sum of placed image width * height.
    pub used_area: u64,
    /// used_area / total_page_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Images: {} ({} placed, {} rotated), Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_pages,
            self.num_images,
            self.num_placed,
            self.num_rotated,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_area)
    }
}
