use super::{PagePlacer, Placement};

/// One horizontal shelf: images sit on its top edge, left to right.
#[derive(Debug, Clone, Copy)]
struct ShelfRow {
    y: u32,
    h: u32,
    used_x: u32,
}

/// First-fit shelf placement. The simplest strategy here: rows grow down
/// the page, each row as tall as the image that opened it. Never rotates.
#[derive(Debug, Default)]
pub struct ShelfPage {
    width: u32,
    height: u32,
    rows: Vec<ShelfRow>,
    next_y: u32,
}

impl ShelfPage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PagePlacer for ShelfPage {
    fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.rows.clear();
        self.next_y = 0;
    }

    fn place(&mut self, w: u32, h: u32, _allow_rotation: bool) -> Option<Placement> {
        // First fit across existing rows.
        for row in self.rows.iter_mut() {
            if h <= row.h && row.used_x + w <= self.width {
                let spot = Placement {
                    x: row.used_x,
                    y: row.y,
                    rotated: false,
                };
                row.used_x += w;
                return Some(spot);
            }
        }
        // Open a new row below the last one.
        if self.next_y + h <= self.height && w <= self.width {
            let row = ShelfRow {
                y: self.next_y,
                h,
                used_x: w,
            };
            self.next_y += h;
            self.rows.push(row);
            return Some(Placement {
                x: 0,
                y: row.y,
                rotated: false,
            });
        }
        None
    }
}
