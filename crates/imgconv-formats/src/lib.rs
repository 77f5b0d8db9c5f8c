pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod metadata;

#[cfg(feature = "heic")]
pub mod heic;

pub use codec::{register_default_codecs, CodecRegistry, ExtraCodec};
pub use decoder::ImageDecoder;
pub use encoder::ImageEncoder;
pub use metadata::ImageMetadata;
