//! Batch assembly: many independently fallible renders, one merged PDF.
//!
//! Each requested id goes through fetch, compose, encode and render on its
//! own. A failing id is logged and recorded, and the batch carries on. The
//! successful pages are concatenated in request order; a batch where nothing
//! rendered is an error rather than an empty document.

use crate::error::LabelError;
use crate::filename;
use crate::pipeline::LabelPipeline;
use chrono::Utc;
use labelpress_pdf_composer::concat_pdf_bytes;
use labelpress_types::{LabelType, OutputFormat, RenderedArtifact};
use std::fmt;
use std::time::{Duration, Instant};

/// Reason recorded for ids that were not started before the batch deadline.
pub const DEADLINE_EXCEEDED: &str = "batch deadline exceeded";

/// One id that did not make it into the merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub id: u64,
    pub reason: String,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.reason)
    }
}

/// A validated, not yet executed batch.
#[derive(Debug, Clone)]
pub struct BatchJob {
    ids: Vec<u64>,
    label_type: LabelType,
}

/// The merged document and what went into it.
#[derive(Debug, Clone)]
pub struct MergedBatch {
    pub artifact: RenderedArtifact,
    pub label_type: LabelType,
    /// Ids on the merged pages, in page order.
    pub rendered: Vec<u64>,
    pub failures: Vec<BatchFailure>,
    pub filename: String,
}

impl MergedBatch {
    pub fn requested(&self) -> usize {
        self.rendered.len() + self.failures.len()
    }

    /// `"N of M failed"`.
    pub fn report(&self) -> String {
        format!("{} of {} failed", self.failures.len(), self.requested())
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    Merged(MergedBatch),
    /// Nothing rendered.
    Failed { failures: Vec<BatchFailure> },
}

impl BatchJob {
    /// Validates the id list. Label types never fail; unknown ones were
    /// already resolved to `default` by the caller.
    pub fn new(ids: Vec<u64>, label_type: LabelType, max_assets: usize) -> Result<Self, LabelError> {
        if ids.is_empty() {
            return Err(LabelError::Validation("No asset ids provided".to_string()));
        }
        if ids.len() > max_assets {
            return Err(LabelError::Validation(format!(
                "Too many assets: {} requested, at most {} allowed",
                ids.len(),
                max_assets
            )));
        }
        Ok(Self { ids, label_type })
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    /// Renders every id and merges the successes.
    ///
    /// Individual failures never surface as `Err`; only merging the rendered
    /// pages can fail here.
    pub async fn execute(self, pipeline: &LabelPipeline) -> Result<BatchOutcome, LabelError> {
        let settings = pipeline.settings();
        let schedule = settings.schedule();
        let deadline = settings.batch_deadline();
        let label_type = self.label_type;
        let started = Instant::now();
        let requested = self.ids.len();

        log::info!(
            "Starting batch of {} {} labels ({} schedule)",
            requested,
            label_type,
            schedule
        );

        let results = schedule
            .run_all(self.ids, |id| {
                let pipeline = pipeline.clone();
                async move {
                    let result = if past(started, deadline) {
                        Err(DEADLINE_EXCEEDED.to_string())
                    } else {
                        pipeline
                            .render_label(id, label_type, OutputFormat::Pdf)
                            .await
                            .map(|label| label.artifact)
                            .map_err(|e| e.to_string())
                    };
                    (id, result)
                }
            })
            .await;

        let mut rendered = Vec::new();
        let mut pages = Vec::new();
        let mut failures = Vec::new();
        for (id, result) in results {
            match result {
                Ok(artifact) => {
                    rendered.push(id);
                    pages.push(artifact.bytes);
                }
                Err(reason) => {
                    log::warn!("Skipping asset {} in batch: {}", id, reason);
                    failures.push(BatchFailure { id, reason });
                }
            }
        }

        if pages.is_empty() {
            log::warn!("Batch failed: none of {} labels rendered", failures.len());
            return Ok(BatchOutcome::Failed { failures });
        }

        let merged = concat_pdf_bytes(&pages)?;
        let batch = MergedBatch {
            artifact: RenderedArtifact::pdf(merged, label_type.page_size()),
            label_type,
            filename: filename::batch(label_type, requested, Utc::now()),
            rendered,
            failures,
        };
        log::info!(
            "Batch merged into {} pages in {:?} ({})",
            batch.rendered.len(),
            started.elapsed(),
            batch.report()
        );
        Ok(BatchOutcome::Merged(batch))
    }

    /// Executes the batch; a batch where every id failed is an `Assembly` error.
    pub async fn run(self, pipeline: &LabelPipeline) -> Result<MergedBatch, LabelError> {
        match self.execute(pipeline).await? {
            BatchOutcome::Merged(batch) => Ok(batch),
            BatchOutcome::Failed { failures } => Err(LabelError::Assembly { failures }),
        }
    }
}

fn past(started: Instant, deadline: Option<Duration>) -> bool {
    deadline.is_some_and(|d| started.elapsed() >= d)
}

/// Runs a batch for `ids` under the pipeline's configured limits.
pub async fn render_batch(
    pipeline: &LabelPipeline,
    ids: Vec<u64>,
    label_type: &str,
) -> Result<MergedBatch, LabelError> {
    let label_type = pipeline.label_type(label_type);
    let max_assets = pipeline.settings().inventory.max_assets;
    BatchJob::new(ids, label_type, max_assets)?.run(pipeline).await
}
