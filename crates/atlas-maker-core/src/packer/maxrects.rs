use super::{prune_free_list, PagePlacer, Placement};
use crate::config::MaxRectsHeuristic;
use crate::model::Rect;

/// Maximal-rectangles placement: the free list holds every maximal empty
/// rectangle; placements subtract themselves from all overlapping free
/// rects, and contained leftovers are pruned.
pub struct MaxRectsPage {
    free: Vec<Rect>,
    heuristic: MaxRectsHeuristic,
}

impl MaxRectsPage {
    pub fn new(heuristic: MaxRectsHeuristic) -> Self {
        Self {
            free: Vec::new(),
            heuristic,
        }
    }

    fn score(&self, fr: &Rect, w: u32, h: u32) -> (i64, i64) {
        let leftover_h = fr.w as i64 - w as i64;
        let leftover_v = fr.h as i64 - h as i64;
        let short_fit = leftover_h.min(leftover_v);
        let long_fit = leftover_h.max(leftover_v);
        let area_fit = (fr.w as i64) * (fr.h as i64) - (w as i64) * (h as i64);
        match self.heuristic {
            MaxRectsHeuristic::BestAreaFit => (area_fit, short_fit),
            MaxRectsHeuristic::BestShortSideFit => (short_fit, long_fit),
            MaxRectsHeuristic::BestLongSideFit => (long_fit, short_fit),
            MaxRectsHeuristic::BottomLeft => (fr.y as i64, fr.x as i64),
        }
    }

    fn find_position(&self, w: u32, h: u32) -> Option<Rect> {
        let mut best: Option<Rect> = None;
        let mut best_score = (i64::MAX, i64::MAX);
        // tie-break: lower top edge, then smaller x
        let mut best_top = u32::MAX;
        let mut best_left = u32::MAX;

        for fr in &self.free {
            if fr.w < w || fr.h < h {
                continue;
            }
            let s = self.score(fr, w, h);
            let top = fr.y + h;
            if s < best_score
                || (s == best_score && (top < best_top || (top == best_top && fr.x < best_left)))
            {
                best_score = s;
                best_top = top;
                best_left = fr.x;
                best = Some(Rect::new(fr.x, fr.y, w, h));
            }
        }
        best
    }

    /// Subtracts `node` from every overlapping free rect, keeping the four
    /// maximal leftover strips.
    fn place_rect(&mut self, node: &Rect) {
        let mut new_free: Vec<Rect> = Vec::with_capacity(self.free.len() + 4);
        for fr in self.free.iter() {
            if !fr.intersects(node) {
                new_free.push(*fr);
                continue;
            }
            let fr_x2 = fr.x + fr.w;
            let fr_y2 = fr.y + fr.h;
            let n_x2 = node.x + node.w;
            let n_y2 = node.y + node.h;

            // above
            if node.y > fr.y {
                new_free.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
            }
            // below
            if n_y2 < fr_y2 {
                new_free.push(Rect::new(fr.x, n_y2, fr.w, fr_y2 - n_y2));
            }
            // left
            if node.x > fr.x {
                new_free.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
            }
            // right
            if n_x2 < fr_x2 {
                new_free.push(Rect::new(n_x2, fr.y, fr_x2 - n_x2, fr.h));
            }
        }
        self.free = new_free;
        prune_free_list(&mut self.free);
    }
}

impl PagePlacer for MaxRectsPage {
    fn reset(&mut self, width: u32, height: u32) {
        self.free = vec![Rect::new(0, 0, width, height)];
    }

    fn place(&mut self, w: u32, h: u32, allow_rotation: bool) -> Option<Placement> {
        if let Some(node) = self.find_position(w, h) {
            self.place_rect(&node);
            return Some(Placement {
                x: node.x,
                y: node.y,
                rotated: false,
            });
        }
        if allow_rotation && w != h {
            if let Some(node) = self.find_position(h, w) {
                self.place_rect(&node);
                return Some(Placement {
                    x: node.x,
                    y: node.y,
                    rotated: true,
                });
            }
        }
        None
    }
}
