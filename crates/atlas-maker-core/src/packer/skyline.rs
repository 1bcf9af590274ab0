use super::{PagePlacer, Placement};
use crate::config::SkylineHeuristic;

/// One horizontal segment of the skyline contour.
#[derive(Clone, Copy, Debug)]
struct SkylineNode {
    x: u32,
    y: u32,
    w: u32,
}

/// Skyline placement: the page is described by its top contour, and every
/// placement raises part of it. Supports bottom-left and min-waste node
/// selection.
pub struct SkylinePage {
    width: u32,
    height: u32,
    nodes: Vec<SkylineNode>,
    heuristic: SkylineHeuristic,
}

impl SkylinePage {
    pub fn new(heuristic: SkylineHeuristic) -> Self {
        Self {
            width: 0,
            height: 0,
            nodes: Vec::new(),
            heuristic,
        }
    }

    /// Tests whether a `w x h` rect fits starting at node `i`, spanning as
    /// many segments as its width needs. Returns the placement origin.
    fn can_put(&self, mut i: usize, w: u32, h: u32) -> Option<(u32, u32)> {
        let x = self.nodes[i].x;
        if x + w > self.width {
            return None;
        }
        let mut y = 0u32;
        let mut width_left = w;
        loop {
            y = y.max(self.nodes[i].y);
            if y + h > self.height {
                return None;
            }
            if self.nodes[i].w >= width_left {
                return Some((x, y));
            }
            width_left -= self.nodes[i].w;
            i += 1;
            if i >= self.nodes.len() {
                return None;
            }
        }
    }

    /// Area trapped below the rect: gaps between the spanned segments and
    /// the placement baseline become unusable.
    fn wasted_area_for(&self, start: usize, x: u32, y: u32, w: u32) -> u64 {
        let mut area = 0u64;
        let right = x + w;
        let mut i = start;
        while i < self.nodes.len() && self.nodes[i].x < right {
            let seg = self.nodes[i];
            let seg_right = (seg.x + seg.w).min(right);
            let use_w = seg_right.saturating_sub(seg.x.max(x));
            if seg.y < y {
                area += ((y - seg.y) as u64) * (use_w as u64);
            }
            i += 1;
        }
        area
    }

    fn find_spot(&self, w: u32, h: u32) -> Option<(usize, u32, u32)> {
        let mut best: Option<(usize, u32, u32)> = None;
        // (primary, secondary) score, lower is better
        let mut best_score = (u64::MAX, u64::MAX);
        for i in 0..self.nodes.len() {
            if let Some((x, y)) = self.can_put(i, w, h) {
                let score = match self.heuristic {
                    SkylineHeuristic::BottomLeft => ((y + h) as u64, self.nodes[i].w as u64),
                    SkylineHeuristic::MinWaste => {
                        (self.wasted_area_for(i, x, y, w), (y + h) as u64)
                    }
                };
                if score < best_score {
                    best_score = score;
                    best = Some((i, x, y));
                }
            }
        }
        best
    }

    fn split(&mut self, index: usize, x: u32, y: u32, w: u32, h: u32) {
        self.nodes.insert(index, SkylineNode { x, y: y + h, w });

        // Shrink or drop the following segments the new node now shadows.
        let i = index + 1;
        while i < self.nodes.len() {
            let prev_right = self.nodes[i - 1].x + self.nodes[i - 1].w;
            if self.nodes[i].x >= prev_right {
                break;
            }
            let shrink = prev_right - self.nodes[i].x;
            if self.nodes[i].w <= shrink {
                self.nodes.remove(i);
            } else {
                self.nodes[i].x += shrink;
                self.nodes[i].w -= shrink;
                break;
            }
        }
        self.merge();
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.nodes.len() {
            if self.nodes[i - 1].y == self.nodes[i].y {
                self.nodes[i - 1].w += self.nodes[i].w;
                self.nodes.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl PagePlacer for SkylinePage {
    fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.nodes = vec![SkylineNode { x: 0, y: 0, w: width }];
    }

    fn place(&mut self, w: u32, h: u32, allow_rotation: bool) -> Option<Placement> {
        // Upright first; the rotated candidate only wins on a strictly
        // better node, so ties keep images unrotated.
        let upright = self.find_spot(w, h);
        if let Some((i, x, y)) = upright {
            self.split(i, x, y, w, h);
            return Some(Placement {
                x,
                y,
                rotated: false,
            });
        }
        if allow_rotation && w != h {
            if let Some((i, x, y)) = self.find_spot(h, w) {
                self.split(i, x, y, h, w);
                return Some(Placement {
                    x,
                    y,
                    rotated: true,
                });
            }
        }
        None
    }
}
