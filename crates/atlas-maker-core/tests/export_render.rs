use atlas_maker_core::export::{render, to_json, write_all, write_to_path};
use atlas_maker_core::model::{ImageRecord, LayoutResult};
use atlas_maker_core::AtlasError;
use std::io::{self, Write};

fn placed(
    name: &str,
    pos: (i32, i32),
    size: (u32, u32),
    page: usize,
    export_index: usize,
) -> ImageRecord {
    let mut r = ImageRecord::new(size.0, size.1, name, format!("/src/{name}"), export_index);
    r.pos_x = pos.0;
    r.pos_y = pos.1;
    r.page_index = page;
    r.placed = true;
    r
}

#[test]
fn records_follow_export_index_not_packing_order() {
    let images = vec![
        placed("a.png", (0, 0), (10, 10), 0, 1),
        placed("b.png", (10, 0), (5, 5), 0, 0),
    ];
    let records = render(&images, "#i:#filename,#x,#y,#width,#height,#p", 0);
    assert_eq!(
        records,
        vec![
            "0:b.png,10,0,5,5,0".to_string(),
            "1:a.png,0,0,10,10,0".to_string(),
        ]
    );
}

#[test]
fn margin_shifts_exported_positions() {
    let images = vec![placed("a.png", (4, 6), (10, 10), 0, 0)];
    let records = render(&images, "#x,#y", 3);
    assert_eq!(records, vec!["7,9".to_string()]);
}

#[test]
fn unplaced_images_are_left_out() {
    let mut unplaced = ImageRecord::new(10, 10, "skip.png", "/src/skip.png", 0);
    unplaced.reset_placement();
    let images = vec![unplaced, placed("keep.png", (0, 0), (8, 8), 0, 1)];
    let records = render(&images, "#filename", 0);
    assert_eq!(records, vec!["keep.png".to_string()]);
}

#[test]
fn a_multiline_template_still_yields_one_record_per_image() {
    let images = vec![
        placed("a.png", (0, 0), (10, 10), 0, 0),
        placed("b.png", (10, 0), (5, 5), 0, 1),
    ];
    let records = render(&images, "[frame]\nname = #filename\npos = #x,#y", 0);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], "[frame]\nname = a.png\npos = 0,0");
    assert_eq!(records[1], "[frame]\nname = b.png\npos = 10,0");
}

#[test]
fn all_token_occurrences_are_replaced() {
    let images = vec![placed("a.png", (1, 2), (3, 4), 0, 0)];
    let records = render(&images, "#p-#p-#p #width/#width", 0);
    assert_eq!(records, vec!["0-0-0 3/3".to_string()]);
}

#[test]
fn exported_width_and_height_are_the_source_dimensions() {
    // A rotated record still exports its source width/height; rotation is
    // a page-placement detail.
    let mut r = placed("rot.png", (0, 0), (8, 14), 0, 0);
    r.angle = atlas_maker_core::model::Angle::Quarter;
    let records = render(&[r], "#width,#height", 0);
    assert_eq!(records, vec!["8,14".to_string()]);
}

#[test]
fn rendering_twice_is_byte_identical() {
    let images = vec![
        placed("a.png", (0, 0), (10, 10), 0, 1),
        placed("b.png", (10, 0), (5, 5), 0, 0),
    ];
    let template = "#i -> #filename @ #x,#y (#widthx#height) page #p";
    let mut out1 = Vec::new();
    let mut out2 = Vec::new();
    write_all(&render(&images, template, 2), &mut out1).unwrap();
    write_all(&render(&images, template, 2), &mut out2).unwrap();
    assert_eq!(out1, out2);
    assert!(!out1.is_empty());
}

#[test]
fn write_all_terminates_each_record_with_a_newline() {
    let records = vec!["one".to_string(), "two\nlines".to_string()];
    let mut out = Vec::new();
    write_all(&records, &mut out).unwrap();
    assert_eq!(out, b"one\ntwo\nlines\n");
}

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("sink is full"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn a_write_failure_surfaces_as_an_io_error() {
    let records = vec!["one".to_string()];
    let err = write_all(&records, FailingSink);
    assert!(matches!(err, Err(AtlasError::Io(_))));
}

#[test]
fn write_to_path_truncates_and_rewrites() {
    let dir = std::env::temp_dir();
    let path = dir.join("atlas_maker_export_test.txt");
    write_to_path(&["first run with a long line".to_string()], &path).unwrap();
    write_to_path(&["second".to_string()], &path).unwrap();
    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(body, "second\n");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_metadata_lists_pages_and_placements() {
    let result = LayoutResult {
        images: vec![
            placed("a.png", (0, 0), (10, 10), 0, 0),
            placed("b.png", (0, 0), (5, 5), 1, 1),
        ],
        page_count: 2,
        status_message: "Placed 2 image(s) on 2 page(s)".into(),
    };
    let value = to_json(&result);
    assert_eq!(value["page_count"], 2);
    assert_eq!(value["pages"].as_array().map(|p| p.len()), Some(2));
    assert_eq!(value["pages"][0]["images"][0]["name"], "a.png");
    assert_eq!(value["pages"][1]["images"][0]["name"], "b.png");
}
