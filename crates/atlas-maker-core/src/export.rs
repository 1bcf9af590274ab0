use crate::error::Result;
use crate::model::{ImageRecord, LayoutResult};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Renders one text record per placed image from a user template.
///
/// Records come out ordered by `export_index` ascending (stable on ties),
/// independent of packing order. Within the template every occurrence of
/// the tokens `#filename`, `#i`, `#x`, `#y`, `#width`, `#height` and `#p`
/// is replaced textually; `#i` is the output row, `#x`/`#y` are the
/// placement shifted by `margin`. A template may span multiple lines and
/// still yields exactly one record per image.
pub fn render(images: &[ImageRecord], template: &str, margin: u32) -> Vec<String> {
    let mut placed: Vec<&ImageRecord> = images.iter().filter(|r| r.placed).collect();
    placed.sort_by_key(|r| r.export_index);

    placed
        .iter()
        .enumerate()
        .map(|(i, img)| {
            let pos_x = img.pos_x + margin as i32;
            let pos_y = img.pos_y + margin as i32;
            template
                .replace("#filename", &img.file_name)
                .replace("#i", &i.to_string())
                .replace("#x", &pos_x.to_string())
                .replace("#y", &pos_y.to_string())
                .replace("#width", &img.width.to_string())
                .replace("#height", &img.height.to_string())
                .replace("#p", &img.page_index.to_string())
        })
        .collect()
}

/// Writes every record as one line-terminated unit, in sequence. The first
/// write failure aborts the rest; the sink is released before the error
/// surfaces.
pub fn write_all<W: Write>(records: &[String], mut sink: W) -> Result<()> {
    for record in records {
        sink.write_all(record.as_bytes())?;
        sink.write_all(b"\n")?;
    }
    sink.flush()?;
    Ok(())
}

/// Truncates `path` and writes all records to it.
pub fn write_to_path(records: &[String], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_all(records, BufWriter::new(file))?;
    info!(path = %path.display(), records = records.len(), "export file written");
    Ok(())
}

/// Serializes the layout as a JSON object `{ pages, page_count, status }`
/// for machine consumption alongside the templated text export.
pub fn to_json(result: &LayoutResult) -> Value {
    let pages: Vec<Value> = (0..result.page_count)
        .map(|page| {
            let images: Vec<Value> = result
                .images_for_page(page)
                .map(|img| {
                    let (w, h) = img.effective_size();
                    json!({
                        "name": img.file_name,
                        "x": img.pos_x,
                        "y": img.pos_y,
                        "w": w,
                        "h": h,
                        "rotated": img.angle.is_rotated(),
                        "exportIndex": img.export_index,
                    })
                })
                .collect();
            json!({ "index": page, "images": images })
        })
        .collect();
    json!({
        "pages": pages,
        "page_count": result.page_count,
        "status": result.status_message,
    })
}
