//! Adapter-level checks against real workbook bytes: sheets written by the
//! output writer must read back through the grid loader and the image
//! extractor.

use cutlist_model::{
    AnchoredImage, EmuOffset, EmuSize, ImageData, ImageFormat, OutputRow, OutputSheet, ScalarValue,
};
use cutlist_xlsx::{extract_images, load_grid, write_output_sheet};
use pretty_assertions::assert_eq;

// Smallest valid 1x1 RGBA PNG.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn sample_sheet() -> OutputSheet {
    OutputSheet {
        client_name: "Jan Kowalski".to_string(),
        project_name: "Kitchen".to_string(),
        header: vec![
            ScalarValue::from("Object"),
            ScalarValue::from("Length"),
            ScalarValue::from("Width"),
        ],
        rows: vec![
            OutputRow::SectionHeader("1.1".to_string()),
            OutputRow::Data {
                values: vec![
                    ScalarValue::from("1.1"),
                    ScalarValue::Number(600.0),
                    ScalarValue::Number(400.0),
                ],
                source_row: 2,
            },
        ],
        object_name_column: 1,
        images: vec![AnchoredImage {
            name: "part photo".to_string(),
            column: 4,
            row: 4,
            offset: EmuOffset::new(19050, 9525),
            size: Some(EmuSize::new(95250, 95250)),
            data: ImageData::Embedded {
                bytes: TINY_PNG.to_vec(),
                format: ImageFormat::Png,
            },
            resize_proportional: true,
        }],
    }
}

#[test]
fn written_sheet_reads_back_through_the_grid_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    write_output_sheet(&sample_sheet(), &path).unwrap();

    let loaded = load_grid(&path).unwrap();
    let grid = &loaded.grid;

    assert_eq!(
        grid.value(1, 1),
        &ScalarValue::from("Client: Jan Kowalski")
    );
    assert_eq!(grid.value(1, 2), &ScalarValue::from("Project: Kitchen"));
    // Header lands on row 2, content starts at row 3.
    assert_eq!(grid.value(2, 1), &ScalarValue::from("Object"));
    assert_eq!(grid.value(3, 1), &ScalarValue::from("1.1"));
    assert_eq!(grid.value(4, 2), &ScalarValue::Number(600.0));
}

#[test]
fn anchored_image_survives_write_and_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    write_output_sheet(&sample_sheet(), &path).unwrap();

    let images = extract_images(&path).unwrap();
    assert_eq!(images.len(), 1);
    let image = &images[0];
    assert_eq!(image.column, 4);
    assert_eq!(image.row, 4);
    match &image.data {
        ImageData::Embedded { bytes, format } => {
            assert_eq!(*format, ImageFormat::Png);
            assert!(!bytes.is_empty());
        }
        other => panic!("expected embedded payload, got {other:?}"),
    }
}

#[test]
fn workbook_without_drawings_yields_no_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.xlsx");
    let mut sheet = sample_sheet();
    sheet.images.clear();
    write_output_sheet(&sheet, &path).unwrap();

    assert!(extract_images(&path).unwrap().is_empty());
}
