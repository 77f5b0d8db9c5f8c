use crate::codec::ExtraCodec;
use image::{DynamicImage, RgbaImage};
use imgconv_common::{Error, Result, TargetFormat};
use libheif_rs::{
    Channel, ColorSpace, CompressionFormat, EncoderQuality, HeifContext, Image, LibHeif,
    RgbChroma,
};
use std::path::Path;

/// HEIC/HEIF codec backed by the system libheif
pub struct HeicCodec;

impl ExtraCodec for HeicCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::Heic
    }

    fn name(&self) -> &'static str {
        "libheif"
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        let err = |e: libheif_rs::HeifError| Error::decode(path, e);
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;

        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_file(path_str).map_err(err)?;
        let handle = ctx.primary_image_handle().map_err(err)?;
        let decoded = lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
            .map_err(err)?;

        let planes = decoded.planes();
        let plane = planes
            .interleaved
            .ok_or_else(|| Error::decode(path, "missing interleaved plane"))?;

        let row_bytes = plane.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * plane.height as usize);
        for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }

        RgbaImage::from_raw(plane.width, plane.height, pixels)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(|| Error::decode(path, "pixel buffer size mismatch"))
    }

    fn encode(&self, img: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
        let err = |e: libheif_rs::HeifError| Error::encode(path, e);
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut image = Image::new(width, height, ColorSpace::Rgb(RgbChroma::Rgba)).map_err(err)?;
        image
            .create_plane(Channel::Interleaved, width, height, 8)
            .map_err(err)?;

        {
            let planes = image.planes_mut();
            let mut plane = planes
                .interleaved
                .ok_or_else(|| Error::encode(path, "missing interleaved plane"))?;
            let stride = plane.stride;
            let row_bytes = width as usize * 4;
            for (y, row) in rgba.as_raw().chunks(row_bytes).enumerate() {
                let start = y * stride;
                plane.data[start..start + row_bytes].copy_from_slice(row);
            }
        }

        let lib_heif = LibHeif::new();
        let mut context = HeifContext::new().map_err(err)?;
        let mut encoder = lib_heif
            .encoder_for_format(CompressionFormat::Hevc)
            .map_err(err)?;
        encoder
            .set_quality(EncoderQuality::Lossy(quality))
            .map_err(err)?;
        context
            .encode_image(&image, &mut encoder, None)
            .map_err(err)?;
        context.write_to_file(path_str).map_err(err)?;

        Ok(())
    }
}
