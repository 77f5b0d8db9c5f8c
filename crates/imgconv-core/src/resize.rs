use image::imageops::FilterType;
use image::DynamicImage;

/// Requested output dimensions. A zero in either dimension disables resizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeOptions {
    pub width: u32,
    pub height: u32,
    pub lock_aspect: bool,
}

impl ResizeOptions {
    pub fn new(width: u32, height: u32, lock_aspect: bool) -> Self {
        Self {
            width,
            height,
            lock_aspect,
        }
    }

    /// Keep original dimensions
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Output dimensions for a source of `src_width`x`src_height`, or `None` when
    /// no resize applies.
    ///
    /// With the aspect lock the dimension that would stretch the image is
    /// shrunk: a target wider than the source keeps the requested height,
    /// anything else (ties included) keeps the requested width. Results are
    /// floored and never drop below 1.
    ///
    /// Always computed from the requested size, so every file of a batch gets
    /// its own fit.
    pub fn target_for(&self, src_width: u32, src_height: u32) -> Option<(u32, u32)> {
        if !self.is_active() {
            return None;
        }

        if !self.lock_aspect || src_width == 0 || src_height == 0 {
            return Some((self.width, self.height));
        }

        let source_aspect = src_width as f64 / src_height as f64;
        let target_aspect = self.width as f64 / self.height as f64;

        let (width, height) = if target_aspect > source_aspect {
            ((self.height as f64 * source_aspect).floor() as u32, self.height)
        } else {
            (self.width, (self.width as f64 / source_aspect).floor() as u32)
        };

        Some((width.max(1), height.max(1)))
    }

    /// Resize with Lanczos3, returning the image untouched when nothing changes
    pub fn apply(&self, img: DynamicImage) -> DynamicImage {
        match self.target_for(img.width(), img.height()) {
            Some((width, height)) if (width, height) != (img.width(), img.height()) => {
                tracing::debug!(
                    "Resizing {}x{} → {}x{}",
                    img.width(),
                    img.height(),
                    width,
                    height
                );
                img.resize_exact(width, height, FilterType::Lanczos3)
            }
            _ => img,
        }
    }
}
