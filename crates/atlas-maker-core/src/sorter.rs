use crate::config::SortKey;
use crate::model::ImageRecord;

/// Orders the image sequence in place ahead of packing.
///
/// `reverse` flips the *input* sequence before the key is applied. With a
/// stable sort that changes which of two equal-keyed images comes first, so
/// reversing is not the same as sorting descending.
///
/// `SortKey::None` preserves the current order outright; it never runs a
/// comparator. Placement fields are not touched.
pub fn order(images: &mut [ImageRecord], key: SortKey, reverse: bool) {
    if reverse {
        images.reverse();
    }
    match key {
        SortKey::None => {}
        SortKey::Width => images.sort_by_key(|r| r.width),
        SortKey::Height => images.sort_by_key(|r| r.height),
        SortKey::Area => images.sort_by_key(|r| (r.width as u64) * (r.height as u64)),
        SortKey::MaxSide => images.sort_by_key(|r| r.width.max(r.height)),
    }
}
