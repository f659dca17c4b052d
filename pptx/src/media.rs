//! Embedded image formats.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif];

    /// Sniff the format from magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }
}

/// Pixel size read from the image header, without decoding.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    match ImageFormat::detect(data)? {
        ImageFormat::Png => {
            let w = u32::from_be_bytes(data.get(16..20)?.try_into().ok()?);
            let h = u32::from_be_bytes(data.get(20..24)?.try_into().ok()?);
            Some((w, h))
        }
        ImageFormat::Gif => {
            let w = u16::from_le_bytes(data.get(6..8)?.try_into().ok()?);
            let h = u16::from_le_bytes(data.get(8..10)?.try_into().ok()?);
            Some((w as u32, h as u32))
        }
        ImageFormat::Jpeg => jpeg_dimensions(data),
    }
}

fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let be16 = |at: usize| -> Option<usize> {
        let b = data.get(at..at + 2)?;
        Some(u16::from_be_bytes([b[0], b[1]]) as usize)
    };

    let mut i = 2;
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        match marker {
            // fill byte
            0xFF => {
                i += 1;
                continue;
            }
            0x01 | 0xD0..=0xD9 => {
                i += 2;
                continue;
            }
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let h = be16(i + 5)?;
                let w = be16(i + 7)?;
                return Some((w as u32, h as u32));
            }
            _ => {
                let len = be16(i + 2)?;
                i += 2 + len;
            }
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 2x1 PNG header with an IHDR chunk; enough for sniffing and sizing.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
        data.extend_from_slice(&[0, 0, 0, 13]);
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&[8, 2, 0, 0, 0]);
        data
    }

    #[test]
    fn test_detect() {
        assert_eq!(ImageFormat::detect(&tiny_png()), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::detect(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"<html>"), None);
        assert_eq!(ImageFormat::detect(&[]), None);
    }

    #[test]
    fn test_png_dimensions() {
        assert_eq!(image_dimensions(&tiny_png()), Some((2, 1)));
    }

    #[test]
    fn test_gif_dimensions() {
        let data = b"GIF89a\x20\x03\x58\x02";
        assert_eq!(image_dimensions(data), Some((800, 600)));
    }

    #[test]
    fn test_jpeg_dimensions() {
        let mut data = vec![0xFF, 0xD8];
        // APP0 segment, length 16
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(&[0u8; 14]);
        // SOF0: length, precision, height 600, width 800
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08, 0x02, 0x58, 0x03, 0x20]);
        assert_eq!(image_dimensions(&data), Some((800, 600)));
    }

    #[test]
    fn test_truncated_jpeg() {
        assert_eq!(image_dimensions(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), None);
    }
}
