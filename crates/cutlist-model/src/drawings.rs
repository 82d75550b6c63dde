use std::path::PathBuf;

/// English Metric Units per screen pixel at 96 DPI.
pub const EMU_PER_PIXEL: i64 = 9525;

/// Pixel offset of an anchored object inside its anchor cell, in EMU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmuOffset {
    pub x: i64,
    pub y: i64,
}

impl EmuOffset {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn x_px(&self) -> u32 {
        (self.x / EMU_PER_PIXEL).max(0) as u32
    }

    pub fn y_px(&self) -> u32 {
        (self.y / EMU_PER_PIXEL).max(0) as u32
    }
}

/// Extent of a drawing object in EMU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmuSize {
    pub cx: i64,
    pub cy: i64,
}

impl EmuSize {
    pub fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }

    pub fn width_px(&self) -> f64 {
        self.cx as f64 / EMU_PER_PIXEL as f64
    }

    pub fn height_px(&self) -> f64 {
        self.cy as f64 / EMU_PER_PIXEL as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Format from a media part file extension (`xl/media/image1.png`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// Image payload: either embedded binary data or a reference to a file on
/// disk. Both kinds share the same relocation behavior.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageData {
    Embedded { bytes: Vec<u8>, format: ImageFormat },
    Path(PathBuf),
}

/// An image anchored at a specific cell coordinate with pixel-level offset
/// and size. Value-cloned records: a relocated copy shares no mutable state
/// with its source.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchoredImage {
    pub name: String,
    /// Anchor column, 1-based.
    pub column: u32,
    /// Anchor row, 1-based.
    pub row: u32,
    pub offset: EmuOffset,
    /// Visual extent; `None` when the source anchor carries no explicit size.
    pub size: Option<EmuSize>,
    pub data: ImageData,
    pub resize_proportional: bool,
}

impl AnchoredImage {
    /// Independent clone re-anchored at `row`, same column and offsets.
    pub fn with_row(&self, row: u32) -> Self {
        Self {
            row,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emu_pixel_conversion() {
        assert_eq!(EmuOffset::new(19050, 0).x_px(), 2);
        assert_eq!(EmuSize::new(952500, 476250).width_px(), 100.0);
        assert_eq!(EmuSize::new(952500, 476250).height_px(), 50.0);
    }

    #[test]
    fn with_row_clones_everything_else() {
        let image = AnchoredImage {
            name: "img".to_string(),
            column: 4,
            row: 7,
            offset: EmuOffset::new(100, 200),
            size: Some(EmuSize::new(952500, 952500)),
            data: ImageData::Embedded {
                bytes: vec![1, 2, 3],
                format: ImageFormat::Png,
            },
            resize_proportional: true,
        };
        let moved = image.with_row(12);
        assert_eq!(moved.row, 12);
        assert_eq!(moved.column, image.column);
        assert_eq!(moved.offset, image.offset);
        assert_eq!(moved.data, image.data);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("svg"), None);
    }
}
