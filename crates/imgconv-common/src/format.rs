use crate::Error;
use std::path::Path;
use std::str::FromStr;

/// Output formats a batch can be converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
    Webp,
    Heic,
    Gif,
}

/// Format name to extension mapping, in the order formats are offered to users
pub static FORMAT_TABLE: [(&str, &str, TargetFormat); 7] = [
    ("JPEG", "jpg", TargetFormat::Jpeg),
    ("PNG", "png", TargetFormat::Png),
    ("BMP", "bmp", TargetFormat::Bmp),
    ("TIFF", "tiff", TargetFormat::Tiff),
    ("WEBP", "webp", TargetFormat::Webp),
    ("HEIC", "heic", TargetFormat::Heic),
    ("GIF", "gif", TargetFormat::Gif),
];

impl TargetFormat {
    /// All formats in table order
    pub fn all() -> impl Iterator<Item = TargetFormat> {
        FORMAT_TABLE.iter().map(|(_, _, format)| *format)
    }

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse from extension string, accepting common aliases
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::Webp),
            "heic" | "heif" => Some(Self::Heic),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Canonical upper-case name ("JPEG", "PNG", ...)
    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    /// File extension written for this format, without the dot
    pub fn extension(&self) -> &'static str {
        self.entry().1
    }

    fn entry(&self) -> &'static (&'static str, &'static str, TargetFormat) {
        FORMAT_TABLE
            .iter()
            .find(|(_, _, format)| format == self)
            .unwrap_or(&FORMAT_TABLE[0])
    }

    /// Convert to image crate's ImageFormat.
    /// HEIC has no encoder in the image crate and goes through the codec registry.
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Png => Some(image::ImageFormat::Png),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            Self::Tiff => Some(image::ImageFormat::Tiff),
            Self::Webp => Some(image::ImageFormat::WebP),
            Self::Gif => Some(image::ImageFormat::Gif),
            Self::Heic => None,
        }
    }

    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            image::ImageFormat::Tiff => Some(Self::Tiff),
            image::ImageFormat::WebP => Some(Self::Webp),
            image::ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }
}

impl FromStr for TargetFormat {
    type Err = Error;

    /// Accepts table names and extensions, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FORMAT_TABLE
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, _, format)| *format)
            .or_else(|| Self::from_extension(trimmed))
            .ok_or_else(|| Error::InvalidFormat(s.to_string()))
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(TargetFormat::from_extension("png"), Some(TargetFormat::Png));
        assert_eq!(TargetFormat::from_extension("JPG"), Some(TargetFormat::Jpeg));
        assert_eq!(TargetFormat::from_extension(".heif"), Some(TargetFormat::Heic));
        assert_eq!(TargetFormat::from_extension("unknown"), None);
    }

    #[test]
    fn test_table_extensions() {
        let exts: Vec<_> = TargetFormat::all().map(|f| f.extension()).collect();
        assert_eq!(exts, ["jpg", "png", "bmp", "tiff", "webp", "heic", "gif"]);
        assert_eq!(TargetFormat::Tiff.name(), "TIFF");
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("JPEG".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert_eq!("webp".parse::<TargetFormat>().unwrap(), TargetFormat::Webp);
        assert_eq!("tif".parse::<TargetFormat>().unwrap(), TargetFormat::Tiff);

        let err = "xcf".parse::<TargetFormat>().unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(ref s) if s == "xcf"));
    }
}
