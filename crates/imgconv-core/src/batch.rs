use crate::converter::{BatchConverter, BatchProgress, ConversionReport, ConversionRequest};
use imgconv_common::{Error, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs a batch on the blocking pool and streams progress to async callers.
/// Files are still converted one after another.
pub struct BatchProcessor {
    converter: Arc<BatchConverter>,
}

impl BatchProcessor {
    pub fn new(converter: BatchConverter) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    /// Process batch with progress updates via channel
    pub async fn process_batch(
        &self,
        request: ConversionRequest,
        progress_tx: mpsc::UnboundedSender<BatchProgress>,
    ) -> Result<ConversionReport> {
        let converter = Arc::clone(&self.converter);

        tokio::task::spawn_blocking(move || {
            converter.convert_with_progress(&request, |progress| {
                // Receiver may have gone away; the batch still finishes
                let _ = progress_tx.send(progress.clone());
            })
        })
        .await
        .map_err(|e| Error::TaskFailed(format!("Task join error: {}", e)))
    }

    /// Convenience method: process batch, logging progress, and wait for completion
    pub async fn process_batch_logged(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionReport> {
        let (tx, mut rx) = mpsc::unbounded_channel::<BatchProgress>();

        let logger = tokio::spawn(async move {
            while let Some(progress) = rx.recv().await {
                tracing::debug!(
                    "Progress: {}/{} ({:.1}%)",
                    progress.completed,
                    progress.total,
                    progress.percentage()
                );
            }
        });

        let report = self.process_batch(request, tx).await?;
        let _ = logger.await;
        Ok(report)
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(BatchConverter::new())
    }
}
