use crate::codec;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder as _};
use imgconv_common::{Error, Result, TargetFormat};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const EIGHT_MB_IN_BYTES: usize = 8 * 1024 * 1024;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Image encoder with per-format pixel layout normalization
pub struct ImageEncoder;

impl ImageEncoder {
    /// Encode image to specified format at given path with the default quality
    pub fn encode(img: &DynamicImage, output_path: &Path, format: TargetFormat) -> Result<()> {
        Self::encode_with_quality(img, output_path, format, DEFAULT_JPEG_QUALITY)
    }

    /// Encode with custom quality (JPEG and HEIC only, ignored elsewhere).
    /// Output is staged next to the destination and moved into place once
    /// fully written. A failure leaves any existing destination untouched.
    pub fn encode_with_quality(
        img: &DynamicImage,
        output_path: &Path,
        format: TargetFormat,
        quality: u8,
    ) -> Result<()> {
        let quality = quality.clamp(1, 100);
        let img = normalize_for(img, format);

        tracing::debug!(
            "Encoding {:?} {}x{} to {} at {:?}",
            img.color(),
            img.width(),
            img.height(),
            format,
            output_path
        );

        let readonly = std::fs::metadata(output_path)
            .map(|m| m.permissions().readonly())
            .unwrap_or(false);
        if readonly {
            return Err(Error::encode(output_path, "destination is read-only"));
        }

        let mut staged = stage_next_to(output_path, format)?;
        match format.to_image_format() {
            Some(_) => {
                Self::write_builtin(&img, staged.as_file_mut(), output_path, format, quality)?
            }
            None => {
                let codec = codec::lookup(format).ok_or_else(|| {
                    Error::encode(output_path, codec::missing_codec_reason(format))
                })?;
                codec.encode(&img, staged.path(), quality)?;
            }
        }

        staged
            .persist(output_path)
            .map_err(|e| Error::encode(output_path, e.error))?;
        Ok(())
    }

    fn write_builtin(
        img: &DynamicImage,
        file: &mut File,
        output_path: &Path,
        format: TargetFormat,
        quality: u8,
    ) -> Result<()> {
        let encode_err = |e: image::ImageError| Error::encode(output_path, e);
        let mut writer = BufWriter::with_capacity(EIGHT_MB_IN_BYTES, file);

        match format {
            TargetFormat::Png => {
                PngEncoder::new(&mut writer)
                    .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
                    .map_err(encode_err)?;
            }
            TargetFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut writer, quality)
                    .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
                    .map_err(encode_err)?;
            }
            other => {
                let image_format = other
                    .to_image_format()
                    .ok_or_else(|| Error::InvalidFormat(other.to_string()))?;
                img.write_to(&mut writer, image_format).map_err(encode_err)?;
            }
        }

        writer.flush().map_err(|e| Error::encode(output_path, e))?;
        Ok(())
    }
}

/// Temporary file in the destination's directory; removed on drop unless persisted
fn stage_next_to(output_path: &Path, format: TargetFormat) -> Result<NamedTempFile> {
    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let suffix = format!(".{}", format.extension());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".imgconv-").suffix(&suffix);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    builder
        .tempfile_in(dir)
        .map_err(|e| Error::encode(output_path, e))
}

/// Convert to a pixel layout the target encoder accepts
fn normalize_for(img: &DynamicImage, format: TargetFormat) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;

    let has_alpha = img.color().has_alpha();
    match format {
        TargetFormat::Jpeg => match img {
            ImageLuma8(_) | ImageRgb8(_) => Cow::Borrowed(img),
            _ if img.color().has_color() => Cow::Owned(ImageRgb8(img.to_rgb8())),
            _ => Cow::Owned(ImageLuma8(img.to_luma8())),
        },
        TargetFormat::Bmp | TargetFormat::Webp | TargetFormat::Heic => match img {
            ImageRgb8(_) | ImageRgba8(_) => Cow::Borrowed(img),
            _ if has_alpha => Cow::Owned(ImageRgba8(img.to_rgba8())),
            _ => Cow::Owned(ImageRgb8(img.to_rgb8())),
        },
        TargetFormat::Gif => match img {
            ImageRgba8(_) => Cow::Borrowed(img),
            _ => Cow::Owned(ImageRgba8(img.to_rgba8())),
        },
        TargetFormat::Png => match img {
            ImageRgb32F(_) => Cow::Owned(ImageRgb16(img.to_rgb16())),
            ImageRgba32F(_) => Cow::Owned(ImageRgba16(img.to_rgba16())),
            _ => Cow::Borrowed(img),
        },
        TargetFormat::Tiff => match img {
            ImageLumaA8(_) => Cow::Owned(ImageRgba8(img.to_rgba8())),
            ImageLumaA16(_) => Cow::Owned(ImageRgba16(img.to_rgba16())),
            _ => Cow::Borrowed(img),
        },
    }
}
