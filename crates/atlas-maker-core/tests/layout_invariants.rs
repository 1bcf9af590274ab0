use atlas_maker_core::{AtlasEngine, LayoutConfig, LayoutResult, PackerKind, SortKey};
use rand::{Rng, SeedableRng};

fn engine_with_random_images(seed: u64, count: usize) -> AtlasEngine {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut engine = AtlasEngine::new();
    for i in 0..count {
        let w = rng.gen_range(4..=64);
        let h = rng.gen_range(4..=64);
        engine
            .add_source(format!("img_{i}.png"), format!("/src/img_{i}.png"), w, h)
            .expect("valid dimensions");
    }
    engine
}

/// Margin-expanded rectangles of two placed records, page-relative.
fn expanded(r: &atlas_maker_core::ImageRecord, margin: u32) -> (i64, i64, i64, i64) {
    let (w, h) = r.effective_size();
    let x = r.pos_x as i64;
    let y = r.pos_y as i64;
    (x, y, x + (w + margin) as i64, y + (h + margin) as i64)
}

fn assert_layout_invariants(result: &LayoutResult, cfg: &LayoutConfig) {
    let placed: Vec<_> = result.images.iter().filter(|r| r.placed).collect();

    // bounds: inside the page, margin gap to the right/bottom edges
    for r in &placed {
        assert!(r.pos_x >= 0 && r.pos_y >= 0, "{} has negative pos", r.file_name);
        let (_, _, x2, y2) = expanded(r, cfg.margin);
        assert!(
            x2 <= cfg.page_width as i64 && y2 <= cfg.page_height as i64,
            "{} overflows the page: ({x2},{y2})",
            r.file_name
        );
        let (w, h) = r.effective_size();
        assert!(r.pos_x as u32 + w <= cfg.page_width);
        assert!(r.pos_y as u32 + h <= cfg.page_height);
    }

    // no-overlap: margin-expanded rects sharing a page stay disjoint
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            let (a, b) = (placed[i], placed[j]);
            if a.page_index != b.page_index {
                continue;
            }
            let (ax1, ay1, ax2, ay2) = expanded(a, cfg.margin);
            let (bx1, by1, bx2, by2) = expanded(b, cfg.margin);
            let overlap = !(ax1 >= bx2 || bx1 >= ax2 || ay1 >= by2 || by1 >= ay2);
            assert!(
                !overlap,
                "{} and {} overlap on page {}",
                a.file_name, b.file_name, a.page_index
            );
        }
    }

    // page contiguity: indices are exactly 0..page_count
    let mut seen = vec![false; result.page_count];
    for r in &placed {
        assert!(r.page_index < result.page_count);
        seen[r.page_index] = true;
    }
    assert!(seen.iter().all(|&s| s), "a page index is unused");
    let max_page = placed.iter().map(|r| r.page_index + 1).max().unwrap_or(0);
    assert_eq!(result.page_count, max_page);

    // unplaced records keep the sentinel
    for r in result.images.iter().filter(|r| !r.placed) {
        assert_eq!((r.pos_x, r.pos_y), (-1, -1));
    }
}

fn all_packers() -> [PackerKind; 4] {
    [
        PackerKind::Shelf,
        PackerKind::Skyline,
        PackerKind::Guillotine,
        PackerKind::MaxRects,
    ]
}

#[test]
fn every_strategy_keeps_margin_expanded_rects_disjoint() {
    for packer in all_packers() {
        for rotation in [false, true] {
            let mut engine = engine_with_random_images(42, 80);
            let cfg = LayoutConfig {
                page_width: 256,
                page_height: 256,
                margin: 2,
                rotation_enabled: rotation,
                sort_key: SortKey::Area,
                reverse: true,
                packer,
                ..Default::default()
            };
            let result = engine.recompute(&cfg).expect("layout succeeds").clone();
            assert_layout_invariants(&result, &cfg);
            let placed = result.images.iter().filter(|r| r.placed).count();
            assert_eq!(placed, 80, "{packer:?} must place every image");
        }
    }
}

#[test]
fn zero_margin_layouts_stay_in_bounds() {
    for packer in all_packers() {
        let mut engine = engine_with_random_images(7, 50);
        let cfg = LayoutConfig {
            page_width: 128,
            page_height: 128,
            margin: 0,
            sort_key: SortKey::MaxSide,
            packer,
            ..Default::default()
        };
        let result = engine.recompute(&cfg).expect("layout succeeds").clone();
        assert_layout_invariants(&result, &cfg);
    }
}

#[test]
fn no_images_means_no_pages() {
    let mut engine = AtlasEngine::new();
    let cfg = LayoutConfig::default();
    let result = engine.recompute(&cfg).expect("empty set is fine");
    assert_eq!(result.page_count, 0);
    assert!(result.images.is_empty());
}

#[test]
fn single_image_fills_one_page() {
    let mut engine = AtlasEngine::new();
    engine.add_source("only.png", "/src/only.png", 512, 512).unwrap();
    let cfg = LayoutConfig::default();
    let result = engine.recompute(&cfg).expect("exact fit succeeds");
    assert_eq!(result.page_count, 1);
    let img = &result.images[0];
    assert!(img.placed);
    assert_eq!((img.pos_x, img.pos_y), (0, 0));
}

#[test]
fn shelf_never_rotates_even_when_rotation_is_enabled() {
    let mut engine = engine_with_random_images(11, 40);
    let cfg = LayoutConfig {
        page_width: 256,
        page_height: 256,
        rotation_enabled: true,
        packer: PackerKind::Shelf,
        ..Default::default()
    };
    let result = engine.recompute(&cfg).expect("layout succeeds");
    assert!(result.images.iter().all(|r| !r.angle.is_rotated()));
}
