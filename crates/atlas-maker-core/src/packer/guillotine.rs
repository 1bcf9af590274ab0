use super::{merge_free_list, prune_free_list, PagePlacer, Placement};
use crate::config::{GuillotineChoice, GuillotineSplit};
use crate::model::Rect;

/// Guillotine placement: every placement cuts its free rectangle into a
/// bottom and a right leftover along one axis, chosen by the split
/// heuristic.
pub struct GuillotinePage {
    free: Vec<Rect>,
    choice: GuillotineChoice,
    split: GuillotineSplit,
}

impl GuillotinePage {
    pub fn new(choice: GuillotineChoice, split: GuillotineSplit) -> Self {
        Self {
            free: Vec::new(),
            choice,
            split,
        }
    }

    fn score(&self, fr: &Rect, w: u32, h: u32) -> (i64, i64) {
        let area_fit = (fr.w as i64) * (fr.h as i64) - (w as i64) * (h as i64);
        let leftover_h = fr.w as i64 - w as i64;
        let leftover_v = fr.h as i64 - h as i64;
        let short_fit = leftover_h.min(leftover_v);
        let long_fit = leftover_h.max(leftover_v);
        match self.choice {
            GuillotineChoice::BestAreaFit => (area_fit, short_fit),
            GuillotineChoice::BestShortSideFit => (short_fit, long_fit),
            GuillotineChoice::BestLongSideFit => (long_fit, short_fit),
        }
    }

    fn choose(&self, w: u32, h: u32) -> Option<usize> {
        let mut best_idx = None;
        let mut best_score = (i64::MAX, i64::MAX);
        for (i, fr) in self.free.iter().enumerate() {
            if fr.w >= w && fr.h >= h {
                let s = self.score(fr, w, h);
                if s < best_score {
                    best_score = s;
                    best_idx = Some(i);
                }
            }
        }
        best_idx
    }

    fn split_leftovers(&self, fr: &Rect, placed: &Rect) -> (Option<Rect>, Option<Rect>) {
        let w_right = (fr.x + fr.w).saturating_sub(placed.x + placed.w);
        let h_bottom = (fr.y + fr.h).saturating_sub(placed.y + placed.h);

        let split_horizontal = match self.split {
            GuillotineSplit::SplitShorterLeftoverAxis => h_bottom < w_right,
            GuillotineSplit::SplitLongerLeftoverAxis => h_bottom > w_right,
            GuillotineSplit::SplitMinimizeArea => {
                (w_right as u64) * (fr.h as u64) <= (fr.w as u64) * (h_bottom as u64)
            }
            GuillotineSplit::SplitMaximizeArea => {
                (w_right as u64) * (fr.h as u64) >= (fr.w as u64) * (h_bottom as u64)
            }
        };

        let mut bottom = Rect::new(fr.x, placed.y + placed.h, 0, h_bottom);
        let mut right = Rect::new(placed.x + placed.w, fr.y, w_right, 0);
        if split_horizontal {
            bottom.w = fr.w;
            right.h = placed.h;
        } else {
            bottom.w = placed.w;
            right.h = fr.h;
        }
        let r1 = (bottom.w > 0 && bottom.h > 0).then_some(bottom);
        let r2 = (right.w > 0 && right.h > 0).then_some(right);
        (r1, r2)
    }

    fn take(&mut self, idx: usize, w: u32, h: u32) -> Placement {
        let fr = self.free.swap_remove(idx);
        let placed = Rect::new(fr.x, fr.y, w, h);
        let (a, b) = self.split_leftovers(&fr, &placed);
        if let Some(r) = a {
            self.free.push(r);
        }
        if let Some(r) = b {
            self.free.push(r);
        }
        prune_free_list(&mut self.free);
        merge_free_list(&mut self.free);
        Placement {
            x: placed.x,
            y: placed.y,
            rotated: false,
        }
    }
}

impl PagePlacer for GuillotinePage {
    fn reset(&mut self, width: u32, height: u32) {
        self.free = vec![Rect::new(0, 0, width, height)];
    }

    fn place(&mut self, w: u32, h: u32, allow_rotation: bool) -> Option<Placement> {
        if let Some(idx) = self.choose(w, h) {
            return Some(self.take(idx, w, h));
        }
        if allow_rotation && w != h {
            if let Some(idx) = self.choose(h, w) {
                let spot = self.take(idx, h, w);
                return Some(Placement {
                    rotated: true,
                    ..spot
                });
            }
        }
        None
    }
}
