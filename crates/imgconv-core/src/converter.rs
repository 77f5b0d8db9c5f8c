use crate::resize::ResizeOptions;
use imgconv_common::{Error, PathManager, Result, TargetFormat};
use imgconv_formats::encoder::DEFAULT_JPEG_QUALITY;
use imgconv_formats::{register_default_codecs, ImageDecoder, ImageEncoder};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything needed to convert one batch of files
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub inputs: Vec<PathBuf>,
    pub format: TargetFormat,
    pub resize: ResizeOptions,
    /// Write outputs here instead of next to each source
    pub output_dir: Option<PathBuf>,
    /// JPEG/HEIC quality, 1-100
    pub quality: u8,
    /// Replace destinations that already exist
    pub overwrite: bool,
}

impl ConversionRequest {
    pub fn new(inputs: Vec<PathBuf>, format: TargetFormat) -> Self {
        Self {
            inputs,
            format,
            resize: ResizeOptions::none(),
            output_dir: None,
            quality: DEFAULT_JPEG_QUALITY,
            overwrite: true,
        }
    }

    pub fn with_resize(mut self, width: u32, height: u32, lock_aspect: bool) -> Self {
        self.resize = ResizeOptions::new(width, height, lock_aspect);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// A successfully written output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub destination: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Result for a single source path
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub result: Result<ConvertedFile>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.result, Err(Error::Cancelled))
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(file) => write!(
                f,
                "Converted {} -> {}",
                self.source.display(),
                file.destination.display()
            ),
            Err(Error::Cancelled) => write!(f, "Skipped {}: cancelled", self.source.display()),
            Err(e) => write!(f, "Failed to convert {}: {}", self.source.display(), e),
        }
    }
}

/// Ordered outcomes for a batch, one per input path
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub outcomes: Vec<FileOutcome>,
}

impl ConversionReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Failures excluding files skipped by cancellation
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success() && !o.is_cancelled())
            .count()
    }

    pub fn cancelled(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_cancelled()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success() && !o.is_cancelled())
    }

    /// One human readable line per input, in input order
    pub fn report_lines(&self) -> Vec<String> {
        self.outcomes.iter().map(ToString::to_string).collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }
}

/// Progress snapshot, sent before and after every file
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub current_file: Option<PathBuf>,
    pub failed: Vec<(PathBuf, String)>, // (file, error_message)
}

impl BatchProgress {
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f32 / self.total as f32) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Sequential decode → resize → encode pipeline over a list of files
#[derive(Debug, Default)]
pub struct BatchConverter {
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchConverter {
    pub fn new() -> Self {
        register_default_codecs();
        Self { cancel: None }
    }

    /// Stop between files once `flag` becomes true
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Convert every input. Per-file failures are recorded, never returned.
    pub fn convert(&self, request: &ConversionRequest) -> ConversionReport {
        self.convert_with_progress(request, |_| {})
    }

    pub fn convert_with_progress<F>(
        &self,
        request: &ConversionRequest,
        mut on_progress: F,
    ) -> ConversionReport
    where
        F: FnMut(&BatchProgress),
    {
        let total = request.inputs.len();
        tracing::info!(
            "Starting batch: {} files → {} ({:?})",
            total,
            request.format,
            request.resize
        );

        let paths = PathManager::new(request.output_dir.clone(), request.overwrite);
        let mut progress = BatchProgress {
            completed: 0,
            total,
            current_file: None,
            failed: Vec::new(),
        };
        on_progress(&progress);

        // destinations produced earlier in this batch
        let mut written = HashSet::new();
        let mut outcomes = Vec::with_capacity(total);
        for input in &request.inputs {
            let result = if self.is_cancelled() {
                Err(Error::Cancelled)
            } else {
                progress.current_file = Some(input.clone());
                on_progress(&progress);
                self.convert_file(input, request, &paths, &written)
            };

            match &result {
                Ok(file) => {
                    tracing::info!("Converted {:?} -> {:?}", input, file.destination);
                    written.insert(file.destination.clone());
                }
                Err(Error::Cancelled) => tracing::debug!("Skipping {:?}: cancelled", input),
                Err(e) => {
                    tracing::warn!("Failed to convert {:?}: {}", input, e);
                    progress.failed.push((input.clone(), e.to_string()));
                }
            }

            progress.completed += 1;
            on_progress(&progress);

            outcomes.push(FileOutcome {
                source: input.clone(),
                result,
            });
        }

        let report = ConversionReport { outcomes };
        tracing::info!(
            "Batch complete: {}/{} succeeded, {} failed, {} cancelled",
            report.succeeded(),
            total,
            report.failed(),
            report.cancelled()
        );
        report
    }

    /// Convert a single image with the request's format and resize settings.
    /// Fails without decoding when `written` already holds its destination.
    pub fn convert_file(
        &self,
        input: &Path,
        request: &ConversionRequest,
        paths: &PathManager,
        written: &HashSet<PathBuf>,
    ) -> Result<ConvertedFile> {
        paths.validate_input(input)?;

        let destination = paths.destination_for(input, request.format.extension())?;
        if written.contains(&destination) {
            return Err(Error::DuplicateDestination(destination));
        }

        let (img, metadata) = ImageDecoder::decode(input)?;
        let img = request.resize.apply(img);

        tracing::debug!(
            "Converting {}x{} {} → {}x{} {}",
            metadata.width,
            metadata.height,
            metadata.format_label(),
            img.width(),
            img.height(),
            request.format
        );

        ImageEncoder::encode_with_quality(&img, &destination, request.format, request.quality)?;

        Ok(ConvertedFile {
            destination,
            width: img.width(),
            height: img.height(),
        })
    }
}
