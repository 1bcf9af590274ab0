use crate::config::{LayoutConfig, PackerKind};
use crate::model::{Angle, ImageRecord, Rect};
use tracing::debug;

pub mod guillotine;
pub mod maxrects;
pub mod shelf;
pub mod skyline;

pub use guillotine::GuillotinePage;
pub use maxrects::MaxRectsPage;
pub use shelf::ShelfPage;
pub use skyline::SkylinePage;

/// A packing strategy maps an ordered image sequence plus a page
/// configuration to placements and a status report.
///
/// Implementations must be deterministic for a fixed input order and
/// configuration, keep margin-expanded rectangles disjoint within a page,
/// and open a fresh page (incrementing the page index) when the current one
/// rejects a placement. Images that exceed the page outright are excluded
/// and counted, never reported as an error.
pub trait Packer {
    /// Resets all page-filling state for a fresh run on the given page size.
    fn init(&mut self, page_width: u32, page_height: u32);
    /// Whether this run may rotate images. Only effective on strategies
    /// whose `allows_rotation` capability is true.
    fn set_uses_rotation(&mut self, uses: bool);
    /// Pixels reserved on the trailing edges of every placement.
    fn set_margin(&mut self, margin: u32);
    /// Capability flag: true only for strategies that may assign a 90
    /// degree angle.
    fn allows_rotation(&self) -> bool;
    /// Resets the unplaced counter and status line before a fresh run.
    fn clear_errors(&mut self);
    /// Places images in the given order, writing placement fields in place.
    fn calculate(&mut self, images: &mut [ImageRecord]);
    /// Human-readable summary of the last run.
    fn status_message(&self) -> &str;
}

/// A spot chosen for one rectangle on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

/// One page's worth of placement state. `w`/`h` passed to `place` are
/// already margin-expanded; a rotated placement occupies `(h, w)` at the
/// returned spot.
pub trait PagePlacer {
    /// Starts an empty page of the given size.
    fn reset(&mut self, width: u32, height: u32);
    /// Finds a spot for a `w x h` rectangle, trying the upright orientation
    /// first and the rotated one only when `allow_rotation` is set. Ties
    /// prefer upright. Returns `None` when the page has no room.
    fn place(&mut self, w: u32, h: u32, allow_rotation: bool) -> Option<Placement>;
}

/// Wraps a per-page algorithm with the shared multi-page policy: overflow
/// opens the next page, oversized images degrade to "unplaced" and are
/// counted into the status message.
pub struct PagedPacker<P> {
    page: P,
    page_width: u32,
    page_height: u32,
    margin: u32,
    uses_rotation: bool,
    allows_rotation: bool,
    page_index: usize,
    unplaced: usize,
    status: String,
}

impl<P: PagePlacer> PagedPacker<P> {
    pub fn new(page: P, allows_rotation: bool) -> Self {
        Self {
            page,
            page_width: 0,
            page_height: 0,
            margin: 0,
            uses_rotation: false,
            allows_rotation,
            page_index: 0,
            unplaced: 0,
            status: String::new(),
        }
    }
}

impl<P: PagePlacer> Packer for PagedPacker<P> {
    fn init(&mut self, page_width: u32, page_height: u32) {
        self.page_width = page_width;
        self.page_height = page_height;
        self.page_index = 0;
        self.page.reset(page_width, page_height);
    }

    fn set_uses_rotation(&mut self, uses: bool) {
        self.uses_rotation = uses;
    }

    fn set_margin(&mut self, margin: u32) {
        self.margin = margin;
    }

    fn allows_rotation(&self) -> bool {
        self.allows_rotation
    }

    fn clear_errors(&mut self) {
        self.unplaced = 0;
        self.status.clear();
    }

    fn calculate(&mut self, images: &mut [ImageRecord]) {
        let page_w = self.page_width;
        let page_h = self.page_height;
        let rotate = self.uses_rotation && self.allows_rotation;
        let mut placed = 0usize;

        for img in images.iter_mut() {
            // Margin expands the trailing edges, which also keeps the
            // required gap to the page's right/bottom edges.
            let w = img.width + self.margin;
            let h = img.height + self.margin;

            let fits_upright = w <= page_w && h <= page_h;
            let fits_rotated = rotate && h <= page_w && w <= page_h;
            if !fits_upright && !fits_rotated {
                self.unplaced += 1;
                debug!(
                    name = %img.file_name,
                    width = img.width,
                    height = img.height,
                    "image exceeds page size; left unplaced"
                );
                continue;
            }

            let spot = match self.page.place(w, h, rotate) {
                Some(s) => s,
                None => {
                    self.page_index += 1;
                    self.page.reset(page_w, page_h);
                    match self.page.place(w, h, rotate) {
                        Some(s) => s,
                        None => {
                            // A fresh page rejected an image that passed the
                            // outright-fit check; count it rather than loop.
                            self.unplaced += 1;
                            continue;
                        }
                    }
                }
            };

            img.pos_x = spot.x as i32;
            img.pos_y = spot.y as i32;
            img.angle = if spot.rotated {
                Angle::Quarter
            } else {
                Angle::None
            };
            img.page_index = self.page_index;
            img.placed = true;
            placed += 1;
        }

        let pages_used = if placed > 0 { self.page_index + 1 } else { 0 };
        self.status = if self.unplaced > 0 {
            format!(
                "Placed {} of {} images on {} page(s); {} too large for the page and left unplaced",
                placed,
                images.len(),
                pages_used,
                self.unplaced,
            )
        } else {
            format!("Placed {} image(s) on {} page(s)", placed, pages_used)
        };
    }

    fn status_message(&self) -> &str {
        &self.status
    }
}

/// Resolves the configured strategy once into a boxed packer.
pub fn create(cfg: &LayoutConfig) -> Box<dyn Packer> {
    match cfg.packer {
        PackerKind::Shelf => Box::new(PagedPacker::new(ShelfPage::new(), false)),
        PackerKind::Skyline => {
            Box::new(PagedPacker::new(SkylinePage::new(cfg.skyline_heuristic), true))
        }
        PackerKind::Guillotine => Box::new(PagedPacker::new(
            GuillotinePage::new(cfg.g_choice, cfg.g_split),
            true,
        )),
        PackerKind::MaxRects => {
            Box::new(PagedPacker::new(MaxRectsPage::new(cfg.mr_heuristic), true))
        }
    }
}

// ---------- free-rectangle list helpers shared by page modes ----------

/// Drops any free rect fully contained in another.
pub(crate) fn prune_free_list(free: &mut Vec<Rect>) {
    let mut i = 0;
    while i < free.len() {
        let mut j = i + 1;
        let a = free[i];
        let mut remove_i = false;
        while j < free.len() {
            let b = free[j];
            if b.contains(&a) {
                remove_i = true;
                break;
            }
            if a.contains(&b) {
                free.remove(j);
                continue;
            }
            j += 1;
        }
        if remove_i {
            free.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Re-joins free rects that line up exactly along one axis.
pub(crate) fn merge_free_list(free: &mut Vec<Rect>) {
    let mut merged = true;
    while merged {
        merged = false;
        'outer: for i in 0..free.len() {
            for j in i + 1..free.len() {
                let a = free[i];
                let b = free[j];
                // horizontal merge (same y, height, contiguous in x)
                if a.y == b.y && a.h == b.h {
                    if a.x + a.w == b.x {
                        free[i] = Rect::new(a.x, a.y, a.w + b.w, a.h);
                        free.remove(j);
                        merged = true;
                        break 'outer;
                    } else if b.x + b.w == a.x {
                        free[i] = Rect::new(b.x, a.y, a.w + b.w, a.h);
                        free.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
                // vertical merge (same x, width, contiguous in y)
                if a.x == b.x && a.w == b.w {
                    if a.y + a.h == b.y {
                        free[i] = Rect::new(a.x, a.y, a.w, a.h + b.h);
                        free.remove(j);
                        merged = true;
                        break 'outer;
                    } else if b.y + b.h == a.y {
                        free[i] = Rect::new(a.x, b.y, a.w, a.h + b.h);
                        free.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }
}
