use atlas_maker_core::model::{Angle, ImageRecord};
use atlas_maker_core::packer;
use atlas_maker_core::{LayoutConfig, PackerKind};

fn img(name: &str, w: u32, h: u32) -> ImageRecord {
    ImageRecord::new(w, h, name, format!("/src/{name}"), 0)
}

fn run(kind: PackerKind, rotation: bool, images: &mut [ImageRecord]) -> String {
    let cfg = LayoutConfig {
        page_width: 16,
        page_height: 12,
        packer: kind,
        ..Default::default()
    };
    let mut packer = packer::create(&cfg);
    packer.init(cfg.page_width, cfg.page_height);
    packer.set_uses_rotation(rotation);
    packer.set_margin(0);
    packer.clear_errors();
    packer.calculate(images);
    packer.status_message().to_owned()
}

/// 8x14 only fits a 16x12 page on its side.
#[test]
fn rotating_strategies_place_a_rotated_only_fit() {
    for kind in [
        PackerKind::Skyline,
        PackerKind::Guillotine,
        PackerKind::MaxRects,
    ] {
        let mut images = vec![img("tall.png", 8, 14)];
        run(kind, true, &mut images);
        let r = &images[0];
        assert!(r.placed, "{kind:?} should place the rotated fit");
        assert_eq!(r.angle, Angle::Quarter);
        assert_eq!(r.effective_size(), (14, 8));
        let (w, h) = r.effective_size();
        assert!(r.pos_x as u32 + w <= 16);
        assert!(r.pos_y as u32 + h <= 12);
    }
}

#[test]
fn rotation_disabled_excludes_the_same_image() {
    for kind in [
        PackerKind::Skyline,
        PackerKind::Guillotine,
        PackerKind::MaxRects,
    ] {
        let mut images = vec![img("tall.png", 8, 14)];
        let status = run(kind, false, &mut images);
        assert!(!images[0].placed, "{kind:?} must not place it upright");
        assert_eq!(images[0].angle, Angle::None);
        assert!(status.contains("1"), "status should report it: {status:?}");
    }
}

/// The shelf strategy has no rotation capability, so the flag is inert.
#[test]
fn shelf_ignores_the_rotation_flag() {
    let mut images = vec![img("tall.png", 8, 14)];
    run(PackerKind::Shelf, true, &mut images);
    assert!(!images[0].placed);

    let cfg = LayoutConfig {
        packer: PackerKind::Shelf,
        ..Default::default()
    };
    assert!(!packer::create(&cfg).allows_rotation());
}

/// When both orientations fit, the upright one wins.
#[test]
fn upright_placement_is_preferred_when_both_fit() {
    for kind in [
        PackerKind::Skyline,
        PackerKind::Guillotine,
        PackerKind::MaxRects,
    ] {
        let mut images = vec![img("small.png", 6, 4)];
        run(kind, true, &mut images);
        assert!(images[0].placed);
        assert_eq!(images[0].angle, Angle::None, "{kind:?} rotated needlessly");
    }
}
