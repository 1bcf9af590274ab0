use atlas_maker_core::model::ImageRecord;
use atlas_maker_core::sorter;
use atlas_maker_core::SortKey;

fn img(name: &str, w: u32, h: u32, export_index: usize) -> ImageRecord {
    ImageRecord::new(w, h, name, format!("/src/{name}"), export_index)
}

fn names(images: &[ImageRecord]) -> Vec<&str> {
    images.iter().map(|r| r.file_name.as_str()).collect()
}

#[test]
fn width_sort_is_non_decreasing() {
    let mut images = vec![
        img("a", 30, 10, 0),
        img("b", 10, 50, 1),
        img("c", 20, 5, 2),
    ];
    sorter::order(&mut images, SortKey::Width, false);
    let widths: Vec<u32> = images.iter().map(|r| r.width).collect();
    assert!(widths.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(names(&images), ["b", "c", "a"]);
}

#[test]
fn none_preserves_current_order() {
    let mut images = vec![
        img("a", 30, 10, 0),
        img("b", 10, 50, 1),
        img("c", 20, 5, 2),
    ];
    sorter::order(&mut images, SortKey::None, false);
    assert_eq!(names(&images), ["a", "b", "c"]);
}

#[test]
fn none_with_reverse_flips_the_sequence() {
    let mut images = vec![
        img("a", 30, 10, 0),
        img("b", 10, 50, 1),
        img("c", 20, 5, 2),
    ];
    sorter::order(&mut images, SortKey::None, true);
    assert_eq!(names(&images), ["c", "b", "a"]);
}

/// Reversing happens on the input, before the comparator: with duplicate
/// widths the stable sort then keeps the reversed relative order, so the
/// output differs from a plain ascending sort.
#[test]
fn reverse_changes_tie_break_order_for_equal_keys() {
    let fixture = || {
        vec![
            img("first", 20, 10, 0),
            img("second", 20, 30, 1),
            img("small", 10, 10, 2),
            img("third", 20, 50, 3),
        ]
    };

    let mut forward = fixture();
    sorter::order(&mut forward, SortKey::Width, false);
    assert_eq!(names(&forward), ["small", "first", "second", "third"]);

    let mut reversed = fixture();
    sorter::order(&mut reversed, SortKey::Width, true);
    assert_eq!(names(&reversed), ["small", "third", "second", "first"]);
}

#[test]
fn area_and_max_side_sort_ascending() {
    let mut images = vec![
        img("wide", 40, 10, 0),  // area 400, max side 40
        img("tall", 8, 60, 1),   // area 480, max side 60
        img("tiny", 12, 12, 2),  // area 144, max side 12
    ];
    sorter::order(&mut images, SortKey::Area, false);
    assert_eq!(names(&images), ["tiny", "wide", "tall"]);

    let mut images = vec![
        img("wide", 40, 10, 0),
        img("tall", 8, 60, 1),
        img("tiny", 12, 12, 2),
    ];
    sorter::order(&mut images, SortKey::MaxSide, false);
    assert_eq!(names(&images), ["tiny", "wide", "tall"]);
}

#[test]
fn sorting_does_not_touch_placement_fields() {
    let mut images = vec![img("a", 30, 10, 0), img("b", 10, 50, 1)];
    images[0].pos_x = 7;
    images[0].pos_y = 9;
    images[0].placed = true;
    sorter::order(&mut images, SortKey::Height, false);
    let a = images.iter().find(|r| r.file_name == "a").unwrap();
    assert_eq!((a.pos_x, a.pos_y, a.placed), (7, 9, true));
}
