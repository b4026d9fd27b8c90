//! End-to-end launch-kit pipeline:
//! intake → {research ∥ brand ∥ pricing} → gtm → website → deliverables.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use launchkit_shared::{
    Brief, Confidence, PipelineConfig, PipelineResult, RunMetadata, Scored, StageError, StageId,
    StageOutcome,
};

use crate::deliverables::{Upstream, degraded_bundle};
use crate::stages::{FanOut, IntakeRequest, StageSet};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called before a stage starts.
    fn stage_started(&self, stage: StageId);
    /// Called once a stage has settled. `confidence` is `None` for stages
    /// without a score (intake, deliverables).
    fn stage_finished(&self, stage: StageId, status: &str, confidence: Option<Confidence>);
    /// Called when the pipeline completes.
    fn done(&self, result: &PipelineResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage_started(&self, _stage: StageId) {}
    fn stage_finished(&self, _stage: StageId, _status: &str, _confidence: Option<Confidence>) {}
    fn done(&self, _result: &PipelineResult) {}
}

/// Straight-line stage executor with one fork/join point.
///
/// Research, brand, and pricing only depend on intake, so they run as
/// blocking tasks bounded by a semaphore of `workers` permits. Everything
/// else runs on the caller's task. The run never fails: stage failures are
/// carried as [`StageOutcome::Fallback`] values.
#[derive(Debug)]
pub struct Pipeline {
    stages: StageSet,
    config: PipelineConfig,
    semaphore: Arc<Semaphore>,
}

impl Pipeline {
    /// Template-backed pipeline for `config.variant`.
    pub fn new(config: PipelineConfig) -> Self {
        let stages = StageSet::for_variant(config.variant, config.review_threshold);
        Self::with_stages(config, stages)
    }

    /// Pipeline over a custom stage set.
    pub fn with_stages(config: PipelineConfig, stages: StageSet) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.workers.max(1)));
        Self {
            stages,
            config,
            semaphore,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stages(&self) -> &StageSet {
        &self.stages
    }

    /// Run every stage and collect the result document.
    #[instrument(skip_all, fields(variant = %self.config.variant, workers = self.config.workers))]
    pub async fn run(
        &self,
        request: &IntakeRequest,
        progress: &dyn ProgressReporter,
    ) -> PipelineResult {
        let start = Instant::now();
        let run_id = Uuid::now_v7();
        info!(%run_id, "starting launch-kit pipeline");

        // --- Intake ---
        progress.stage_started(StageId::Intake);
        let brief = Arc::new(self.stages.intake.normalize(request));
        progress.stage_finished(StageId::Intake, "ready", None);
        if let Some(question) = &brief.follow_up_question {
            info!(%question, "intake needs more input");
        }

        // --- Fan-out ---
        let FanOut {
            research,
            brand,
            pricing,
        } = self.fan_out(Arc::clone(&brief), progress).await;
        let brief = Arc::unwrap_or_clone(brief);

        // --- Gtm ---
        progress.stage_started(StageId::Gtm);
        let gtm = contain(StageId::Gtm, || {
            self.stages.gtm.plan(&brief, &research, &brand, Some(&pricing))
        });
        report(progress, StageId::Gtm, &gtm);

        // --- Website ---
        progress.stage_started(StageId::Website);
        let website = contain(StageId::Website, || {
            self.stages
                .website
                .render(&brief, &brand, &pricing, Some(&gtm))
        });
        report(progress, StageId::Website, &website);

        // --- Deliverables ---
        progress.stage_started(StageId::Deliverables);
        let upstream = Upstream {
            brief: &brief,
            research: &research,
            brand: &brand,
            pricing: &pricing,
            gtm: &gtm,
            website: &website,
        };
        let assembled = panic::catch_unwind(AssertUnwindSafe(|| {
            self.stages.deliverables.assemble(&upstream)
        }));
        let deliverables = match assembled {
            Ok(bundle) => {
                progress.stage_finished(StageId::Deliverables, "ready", None);
                bundle
            }
            Err(_) => {
                let stage = StageId::Deliverables;
                warn!(%stage, "stage panicked, emitting degraded bundle");
                progress.stage_finished(stage, "fallback", None);
                degraded_bundle(&upstream, &StageError::Panicked { stage })
            }
        };

        let result = PipelineResult {
            intake: brief,
            research,
            brand,
            product: pricing,
            gtm,
            website,
            deliverables,
            metadata: RunMetadata {
                run_id,
                variant: self.config.variant,
                tool_version: self.config.tool_version.clone(),
                generated_at: Utc::now(),
            },
        };

        info!(
            %run_id,
            flagged = result.deliverables.needs_review.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "pipeline complete"
        );
        progress.done(&result);
        result
    }

    /// Run research, brand, and pricing concurrently and wait for all three.
    pub async fn fan_out(&self, brief: Arc<Brief>, progress: &dyn ProgressReporter) -> FanOut {
        let research_stage = Arc::clone(&self.stages.research);
        let brand_stage = Arc::clone(&self.stages.brand);
        let pricing_stage = Arc::clone(&self.stages.pricing);

        progress.stage_started(StageId::Research);
        let research = self
            .spawn_stage(&brief, move |b| research_stage.research(b))
            .await;
        progress.stage_started(StageId::Brand);
        let brand = self
            .spawn_stage(&brief, move |b| brand_stage.brand(b, None))
            .await;
        progress.stage_started(StageId::Pricing);
        let pricing = self
            .spawn_stage(&brief, move |b| pricing_stage.price(b, None, None))
            .await;

        let (research, brand, pricing) = tokio::join!(
            join_stage(StageId::Research, research),
            join_stage(StageId::Brand, brand),
            join_stage(StageId::Pricing, pricing),
        );

        report(progress, StageId::Research, &research);
        report(progress, StageId::Brand, &brand);
        report(progress, StageId::Pricing, &pricing);

        FanOut {
            research,
            brand,
            pricing,
        }
    }

    /// Wait for a worker permit, then start `run` on the blocking pool.
    /// The permit is held until `run` returns.
    async fn spawn_stage<T, F>(&self, brief: &Arc<Brief>, run: F) -> JoinHandle<StageOutcome<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Brief) -> StageOutcome<T> + Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok();
        let brief = Arc::clone(brief);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            run(&brief)
        })
    }
}

async fn join_stage<T>(stage: StageId, handle: JoinHandle<StageOutcome<T>>) -> StageOutcome<T> {
    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(%stage, error = %e, "stage task did not complete");
            StageOutcome::from_result(Err(StageError::Panicked { stage }))
        }
    }
}

/// Run a sequential stage on the caller's task, turning a panic into a
/// `StagePanicked` fallback.
fn contain<T>(stage: StageId, run: impl FnOnce() -> StageOutcome<T>) -> StageOutcome<T> {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(%stage, "stage panicked");
            StageOutcome::from_result(Err(StageError::Panicked { stage }))
        }
    }
}

fn report<T: Scored>(progress: &dyn ProgressReporter, stage: StageId, outcome: &StageOutcome<T>) {
    debug!(%stage, status = outcome.status(), "stage finished");
    progress.stage_finished(stage, outcome.status(), Some(outcome.confidence()));
}
