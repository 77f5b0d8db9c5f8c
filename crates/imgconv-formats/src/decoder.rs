use crate::codec;
use crate::metadata::ImageMetadata;
use image::{DynamicImage, ImageFormat, ImageReader};
use imgconv_common::{Error, Result, TargetFormat};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

const TEN_MB_IN_BYTES: u64 = 10 * 1024 * 1024;

/// Image decoder with memory-mapped I/O for large files
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode image from path. Every failure is reported as [`Error::Decode`]
    /// except a missing file, which stays [`Error::FileNotFound`].
    pub fn decode(path: &Path) -> Result<(DynamicImage, ImageMetadata)> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let by_extension = TargetFormat::from_path(path);
        if by_extension == Some(TargetFormat::Heic) {
            return Self::decode_with_registry(path, TargetFormat::Heic);
        }

        tracing::debug!("Decoding {path:?}");

        let file = File::open(path).map_err(|e| Error::decode(path, e))?;
        let len = file.metadata().map_err(|e| Error::decode(path, e))?.len();

        let (img, detected) = if len > TEN_MB_IN_BYTES {
            tracing::debug!("Using memory-mapped I/O for large file ({} bytes)", len);
            // SAFETY: the mapping is read-only and dropped before this function returns
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::decode(path, e))?;
            Self::decode_reader(Cursor::new(&mmap[..]), path)?
        } else {
            Self::decode_reader(BufReader::new(file), path)?
        };

        let format = detected
            .and_then(TargetFormat::from_image_format)
            .or(by_extension);
        let img_metadata = ImageMetadata::from_image(&img, format);

        tracing::debug!(
            "Decoded {}x{} {} image ({:.2}MB in memory)",
            img_metadata.width,
            img_metadata.height,
            img_metadata.format_label(),
            img_metadata.estimated_memory_mb()
        );

        Ok((img, img_metadata))
    }

    /// Content sniffing first, extension as fallback
    fn decode_reader<R: BufRead + Seek>(
        reader: R,
        path: &Path,
    ) -> Result<(DynamicImage, Option<ImageFormat>)> {
        let mut reader = ImageReader::new(reader)
            .with_guessed_format()
            .map_err(|e| Error::decode(path, e))?;

        if reader.format().is_none() {
            if let Ok(format) = ImageFormat::from_path(path) {
                reader.set_format(format);
            }
        }

        let detected = reader.format();
        let img = reader.decode().map_err(|e| Error::decode(path, e))?;
        Ok((img, detected))
    }

    fn decode_with_registry(
        path: &Path,
        format: TargetFormat,
    ) -> Result<(DynamicImage, ImageMetadata)> {
        let codec = codec::lookup(format)
            .ok_or_else(|| Error::decode(path, codec::missing_codec_reason(format)))?;

        tracing::debug!("Decoding {path:?} with {} codec", codec.name());
        let img = codec.decode(path)?;
        let metadata = ImageMetadata::from_image(&img, Some(format));
        Ok((img, metadata))
    }

    /// Quick dimension probe without decoding pixel data
    pub fn probe(path: &Path) -> Result<(u32, u32)> {
        if TargetFormat::from_path(path) == Some(TargetFormat::Heic) {
            let (_, metadata) = Self::decode(path)?;
            return Ok((metadata.width, metadata.height));
        }

        ImageReader::open(path)
            .map_err(|e| Error::decode(path, e))?
            .with_guessed_format()
            .map_err(|e| Error::decode(path, e))?
            .into_dimensions()
            .map_err(|e| Error::decode(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let temp = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .unwrap();
        let img = image::DynamicImage::new_rgb8(3, 2);
        img.save_with_format(temp.path(), image::ImageFormat::Png)
            .unwrap();

        let (_, metadata) = ImageDecoder::decode(temp.path()).unwrap();
        assert_eq!(metadata.width, 3);
        assert_eq!(metadata.height, 2);
        assert_eq!(metadata.format, Some(TargetFormat::Png));
        assert_eq!(ImageDecoder::probe(temp.path()).unwrap(), (3, 2));
    }

    #[test]
    fn test_mislabeled_extension_still_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actually_png.jpg");
        image::DynamicImage::new_rgb8(4, 4)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let (_, metadata) = ImageDecoder::decode(&path).unwrap();
        assert_eq!(metadata.format, Some(TargetFormat::Png));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = ImageDecoder::decode(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ImageDecoder::decode(Path::new("/nonexistent/nope.png")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(err.is_decode());
    }
}
