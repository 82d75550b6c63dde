//! Anchored-image extraction from the workbook package.
//!
//! The cell reader only surfaces scalar values, so row-anchored images are
//! pulled straight from the OPC ZIP: workbook part -> active sheet part ->
//! sheet drawing part -> `xdr:*Anchor` entries -> media payloads.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cutlist_model::{AnchoredImage, EmuOffset, EmuSize, ImageData, ImageFormat};
use roxmltree::{Document, Node};
use zip::ZipArchive;

use crate::package::{parse_relationships, read_zip_part_optional, rels_for_part, resolve_target};
use crate::XlsxReadError;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Collect every image anchored on the active (first) sheet of `path`.
///
/// Best-effort by design: anchors without a resolvable picture payload are
/// skipped rather than failing the whole extraction.
pub fn extract_images(path: &Path) -> Result<Vec<AnchoredImage>, XlsxReadError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let Some(sheet_part) = active_sheet_part(&mut archive)? else {
        return Ok(Vec::new());
    };
    let Some(sheet_xml) = read_zip_part_optional(&mut archive, &sheet_part)? else {
        return Ok(Vec::new());
    };
    let sheet_xml = String::from_utf8(sheet_xml)
        .map_err(|e| XlsxReadError::Invalid(format!("worksheet xml not utf-8: {e}")))?;
    let sheet_doc = Document::parse(&sheet_xml)?;

    let drawing_rids: Vec<String> = sheet_doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "drawing")
        .filter_map(rel_id)
        .collect();
    if drawing_rids.is_empty() {
        return Ok(Vec::new());
    }

    let sheet_rels = match read_zip_part_optional(&mut archive, &rels_for_part(&sheet_part))? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => return Ok(Vec::new()),
    };

    let mut images = Vec::new();
    for drawing_rid in drawing_rids {
        let Some(rel) = sheet_rels.iter().find(|r| r.id == drawing_rid) else {
            continue;
        };
        if rel.external {
            continue;
        }
        let drawing_part = resolve_target(&sheet_part, &rel.target);
        collect_drawing_images(&mut archive, &drawing_part, &mut images)?;
    }
    Ok(images)
}

/// Part name of the first sheet in workbook order, resolved via the
/// workbook's relationships.
fn active_sheet_part<R: std::io::Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Option<String>, XlsxReadError> {
    let Some(workbook_xml) = read_zip_part_optional(archive, WORKBOOK_PART)? else {
        return Ok(None);
    };
    let workbook_xml = String::from_utf8(workbook_xml)
        .map_err(|e| XlsxReadError::Invalid(format!("workbook xml not utf-8: {e}")))?;
    let doc = Document::parse(&workbook_xml)?;
    let Some(sheet_rid) = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "sheet")
        .and_then(|n| rel_id(n))
    else {
        return Ok(None);
    };

    let Some(rels_bytes) = read_zip_part_optional(archive, &rels_for_part(WORKBOOK_PART))? else {
        return Ok(None);
    };
    let rels = parse_relationships(&rels_bytes)?;
    Ok(rels
        .iter()
        .find(|r| r.id == sheet_rid && !r.external)
        .map(|r| resolve_target(WORKBOOK_PART, &r.target)))
}

fn collect_drawing_images<R: std::io::Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    drawing_part: &str,
    images: &mut Vec<AnchoredImage>,
) -> Result<(), XlsxReadError> {
    let Some(drawing_xml) = read_zip_part_optional(archive, drawing_part)? else {
        return Ok(());
    };
    let drawing_xml = String::from_utf8(drawing_xml)
        .map_err(|e| XlsxReadError::Invalid(format!("drawing xml not utf-8: {e}")))?;
    let rels = match read_zip_part_optional(archive, &rels_for_part(drawing_part))? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => Vec::new(),
    };

    // Parse anchors first; media reads need `&mut archive` again.
    struct PendingImage {
        name: String,
        column: u32,
        row: u32,
        offset: EmuOffset,
        size: Option<EmuSize>,
        media_part: String,
    }

    let doc = Document::parse(&drawing_xml)?;
    let mut pending = Vec::new();
    for anchor in doc.root_element().children().filter(|n| {
        n.is_element()
            && matches!(n.tag_name().name(), "oneCellAnchor" | "twoCellAnchor")
    }) {
        let Some((column, row, offset)) = parse_from_marker(&anchor) else {
            continue;
        };
        let Some(pic) = anchor
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "pic")
        else {
            continue;
        };
        let Some(embed) = pic
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "blip")
            .and_then(|n| {
                n.attribute((REL_NS, "embed"))
                    .or_else(|| n.attribute("r:embed"))
            })
        else {
            continue;
        };
        let Some(rel) = rels.iter().find(|r| r.id == embed && !r.external) else {
            continue;
        };

        let name = pic
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "cNvPr")
            .and_then(|n| n.attribute("name"))
            .unwrap_or("")
            .to_string();
        // Prefer the picture transform extent; fall back to the anchor's own
        // `<xdr:ext>` (oneCellAnchor only).
        let size = emu_size(&pic).or_else(|| emu_size(&anchor));

        pending.push(PendingImage {
            name,
            column,
            row,
            offset,
            size,
            media_part: resolve_target(drawing_part, &rel.target),
        });
    }

    for entry in pending {
        let ext = entry
            .media_part
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("");
        let Some(format) = ImageFormat::from_extension(ext) else {
            log::debug!("skipping image with unsupported media type: {}", entry.media_part);
            continue;
        };
        let Some(bytes) = read_zip_part_optional(archive, &entry.media_part)? else {
            continue;
        };
        images.push(AnchoredImage {
            name: entry.name,
            column: entry.column,
            row: entry.row,
            offset: entry.offset,
            size: entry.size,
            data: ImageData::Embedded { bytes, format },
            resize_proportional: true,
        });
    }
    Ok(())
}

/// Anchor `<xdr:from>` marker as 1-based `(column, row)` plus EMU offsets.
fn parse_from_marker(anchor: &Node<'_, '_>) -> Option<(u32, u32, EmuOffset)> {
    let from = anchor
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "from")?;
    let col = marker_value(&from, "col")?;
    let row = marker_value(&from, "row")?;
    let col_off = marker_value(&from, "colOff").unwrap_or(0);
    let row_off = marker_value(&from, "rowOff").unwrap_or(0);
    Some((
        col as u32 + 1,
        row as u32 + 1,
        EmuOffset::new(col_off, row_off),
    ))
}

fn marker_value(marker: &Node<'_, '_>, name: &str) -> Option<i64> {
    marker
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .and_then(|t| t.trim().parse::<i64>().ok())
}

/// First `<a:ext cx=".." cy="..">` extent below `node`.
fn emu_size(node: &Node<'_, '_>) -> Option<EmuSize> {
    node.descendants()
        .find(|n| {
            n.is_element()
                && n.tag_name().name() == "ext"
                && n.attribute("cx").is_some()
                && n.attribute("cy").is_some()
        })
        .and_then(|n| {
            let cx = n.attribute("cx")?.trim().parse::<i64>().ok()?;
            let cy = n.attribute("cy")?.trim().parse::<i64>().ok()?;
            Some(EmuSize::new(cx, cy))
        })
}

fn rel_id(node: Node<'_, '_>) -> Option<String> {
    node.attribute((REL_NS, "id"))
        .or_else(|| node.attribute("r:id"))
        .or_else(|| node.attribute("id"))
        .map(|s| s.to_string())
}
