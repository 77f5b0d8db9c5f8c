//! Process-wide registry of codecs the `image` crate does not ship.
//!
//! The registry is filled once by [`register_default_codecs`] before the
//! first conversion and never torn down.

use image::DynamicImage;
use imgconv_common::{Result, TargetFormat};
use std::path::Path;
use std::sync::OnceLock;

/// A decoder/encoder pair for a single format
pub trait ExtraCodec: Send + Sync {
    fn format(&self) -> TargetFormat;

    /// Human readable backend name, used in logs
    fn name(&self) -> &'static str;

    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    fn encode(&self, img: &DynamicImage, path: &Path, quality: u8) -> Result<()>;
}

#[derive(Default)]
pub struct CodecRegistry {
    codecs: Vec<Box<dyn ExtraCodec>>,
}

impl CodecRegistry {
    pub fn with_codecs(codecs: Vec<Box<dyn ExtraCodec>>) -> Self {
        Self { codecs }
    }

    pub fn find(&self, format: TargetFormat) -> Option<&dyn ExtraCodec> {
        self.codecs
            .iter()
            .find(|codec| codec.format() == format)
            .map(|codec| codec.as_ref())
    }

    pub fn formats(&self) -> Vec<TargetFormat> {
        self.codecs.iter().map(|codec| codec.format()).collect()
    }
}

static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();

/// Register the codecs compiled into this build. Idempotent.
pub fn register_default_codecs() -> &'static CodecRegistry {
    REGISTRY.get_or_init(|| {
        #[allow(unused_mut)]
        let mut codecs: Vec<Box<dyn ExtraCodec>> = Vec::new();

        #[cfg(feature = "heic")]
        codecs.push(Box::new(crate::heic::HeicCodec));

        let registry = CodecRegistry::with_codecs(codecs);
        tracing::debug!("Registered extra codecs: {:?}", registry.formats());
        registry
    })
}

/// Look up an extra codec, registering the defaults on first use
pub fn lookup(format: TargetFormat) -> Option<&'static dyn ExtraCodec> {
    register_default_codecs().find(format)
}

/// Error text for formats that need a codec this build lacks
pub(crate) fn missing_codec_reason(format: TargetFormat) -> String {
    format!(
        "no {} codec registered (rebuild with the `heic` feature)",
        format
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgconv_common::Error;

    struct FakeCodec;

    impl ExtraCodec for FakeCodec {
        fn format(&self) -> TargetFormat {
            TargetFormat::Heic
        }

        fn name(&self) -> &'static str {
            "fake"
        }

        fn decode(&self, path: &Path) -> Result<DynamicImage> {
            Err(Error::decode(path, "fake"))
        }

        fn encode(&self, _img: &DynamicImage, _path: &Path, _quality: u8) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_find_by_format() {
        let registry = CodecRegistry::with_codecs(vec![Box::new(FakeCodec)]);
        assert_eq!(registry.find(TargetFormat::Heic).unwrap().name(), "fake");
        assert!(registry.find(TargetFormat::Png).is_none());
        assert_eq!(registry.formats(), vec![TargetFormat::Heic]);
    }

    #[test]
    fn test_registration_is_idempotent() {
        let first = register_default_codecs() as *const CodecRegistry;
        let second = register_default_codecs() as *const CodecRegistry;
        assert_eq!(first, second);
    }

    #[cfg(not(feature = "heic"))]
    #[test]
    fn test_no_heic_without_feature() {
        assert!(lookup(TargetFormat::Heic).is_none());
        assert!(missing_codec_reason(TargetFormat::Heic).contains("HEIC"));
    }
}
