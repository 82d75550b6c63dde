use std::path::Path;

use cutlist_model::{
    AnchoredImage, ImageData, OutputRow, OutputSheet, ScalarValue, DATA_START_ROW, HEADER_DEST_ROW,
};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet};

use crate::XlsxWriteError;

/// Render one assembled output sheet to an `.xlsx` file.
pub fn write_output_sheet(sheet: &OutputSheet, path: &Path) -> Result<(), XlsxWriteError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_sheet(worksheet, sheet)?;
    workbook.save(path)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &OutputSheet) -> Result<(), XlsxWriteError> {
    // Banner: bold, right-aligned, shaded, thin top border, widened columns.
    let banner = Format::new()
        .set_bold()
        .set_align(FormatAlign::Right)
        .set_border_top(FormatBorder::Thin)
        .set_background_color(Color::RGB(0xA0A0A0));
    worksheet.set_column_width(0, 30)?;
    worksheet.set_column_width(1, 20)?;
    worksheet.write_string_with_format(0, 0, &format!("Client: {}", sheet.client_name), &banner)?;
    worksheet.write_string_with_format(0, 1, &format!("Project: {}", sheet.project_name), &banner)?;

    let header = Format::new().set_bold();
    for (col, value) in sheet.header.iter().enumerate() {
        write_value(worksheet, HEADER_DEST_ROW - 1, col as u16, value, Some(&header))?;
    }

    let section = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xCCCCCC));
    let object_col = sheet.object_name_column.saturating_sub(1) as u16;
    for (index, row) in sheet.rows.iter().enumerate() {
        let dest = DATA_START_ROW - 1 + index as u32;
        match row {
            OutputRow::Spacer => {}
            OutputRow::SectionHeader(title) => {
                worksheet.write_string_with_format(dest, object_col, title, &section)?;
            }
            OutputRow::Data { values, .. } => {
                for (col, value) in values.iter().enumerate() {
                    write_value(worksheet, dest, col as u16, value, None)?;
                }
            }
        }
    }

    for image in &sheet.images {
        insert_image(worksheet, image)?;
    }
    Ok(())
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &ScalarValue,
    format: Option<&Format>,
) -> Result<(), XlsxWriteError> {
    match (value, format) {
        (ScalarValue::Empty, _) => {}
        (ScalarValue::Number(n), Some(f)) => {
            worksheet.write_number_with_format(row, col, *n, f)?;
        }
        (ScalarValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (ScalarValue::String(s), Some(f)) => {
            worksheet.write_string_with_format(row, col, s, f)?;
        }
        (ScalarValue::String(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (ScalarValue::Boolean(b), Some(f)) => {
            worksheet.write_boolean_with_format(row, col, *b, f)?;
        }
        (ScalarValue::Boolean(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn insert_image(worksheet: &mut Worksheet, anchored: &AnchoredImage) -> Result<(), XlsxWriteError> {
    let mut image = match &anchored.data {
        ImageData::Embedded { bytes, .. } => Image::new_from_buffer(bytes)?,
        ImageData::Path(path) => Image::new(path)?,
    };

    // Preserve the source visual size by scaling relative to the payload's
    // native pixel dimensions. Proportional images scale both axes by the
    // width factor so the aspect ratio survives.
    if let Some(size) = anchored.size {
        let native_width = image.width();
        let native_height = image.height();
        if native_width > 0.0 && native_height > 0.0 {
            let width_scale = size.width_px() / native_width;
            let height_scale = if anchored.resize_proportional {
                width_scale
            } else {
                size.height_px() / native_height
            };
            image = image
                .set_scale_width(width_scale)
                .set_scale_height(height_scale);
        }
    }

    worksheet.insert_image_with_offset(
        anchored.row - 1,
        anchored.column.saturating_sub(1) as u16,
        &image,
        anchored.offset.x_px(),
        anchored.offset.y_px(),
    )?;
    Ok(())
}
