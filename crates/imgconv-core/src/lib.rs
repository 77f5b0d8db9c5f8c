pub mod batch;
pub mod converter;
pub mod resize;

pub use batch::BatchProcessor;
pub use converter::{
    BatchConverter, BatchProgress, ConversionReport, ConversionRequest, ConvertedFile, FileOutcome,
};
pub use resize::ResizeOptions;
