//! Greyscale PNG output for text bitmaps

use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::TextError;
use crate::font::Bitmap;

/// Write `bitmap` as an 8-bit single-channel PNG, creating parent directories
pub fn write_png(path: &Path, bitmap: &Bitmap) -> Result<(), TextError> {
    if bitmap.is_empty() {
        return Err(TextError::EmptyBitmap {
            width: bitmap.width,
            height: bitmap.height,
        });
    }

    let io_err = |source| TextError::ImageWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), bitmap.width, bitmap.height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&bitmap.pixels)?;
    writer.finish()?;

    info!(
        "Text bitmap saved: {} ({}x{})",
        path.display(),
        bitmap.width,
        bitmap.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let pixels = (0..width * height).map(|i| (i % 256) as u8).collect();
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    #[test]
    fn test_write_and_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textures").join("image.png");
        // Odd width: rows must not be padded
        let bitmap = gradient(37, 11);

        write_png(&path, &bitmap).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();

        assert_eq!((info.width, info.height), (37, 11));
        assert_eq!(info.color_type, png::ColorType::Grayscale);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(info.line_size, 37);
        assert_eq!(&buf[..info.buffer_size()], &bitmap.pixels[..]);
    }

    #[test]
    fn test_empty_bitmap_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let err = write_png(&path, &Bitmap::new(0, 96)).unwrap_err();
        assert!(matches!(err, TextError::EmptyBitmap { width: 0, height: 96 }));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = write_png(&blocker.join("image.png"), &gradient(2, 2)).unwrap_err();
        assert!(matches!(err, TextError::ImageWrite { .. }));
    }
}
