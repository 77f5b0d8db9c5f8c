use imgconv_common::TargetFormat;

/// Image metadata extracted during decoding
#[derive(Debug, Clone)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Detected source format, `None` for formats that are readable but not a conversion target
    pub format: Option<TargetFormat>,
    pub color_type: image::ColorType,
    pub has_alpha: bool,
}

impl ImageMetadata {
    pub fn from_image(img: &image::DynamicImage, format: Option<TargetFormat>) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            format,
            color_type: img.color(),
            has_alpha: img.color().has_alpha(),
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn estimated_memory_mb(&self) -> f32 {
        let bytes = self.pixel_count() * self.color_type.bytes_per_pixel() as usize;
        bytes as f32 / (1024.0 * 1024.0)
    }

    pub fn format_label(&self) -> &'static str {
        self.format.map(|f| f.name()).unwrap_or("unknown")
    }
}
