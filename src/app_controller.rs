use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, JobConfig};
use crate::catalog::{CatalogRewriter, RewriteReport};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::{GoogleTranslate, Translator};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::translation::{
    DictionaryResolver, ErrorLog, ReviewSinks, TranslationCache, TranslationPipeline,
};

// @module: Application controller for catalog processing

/// Totals for one run over all jobs
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // @field: Catalogs rewritten and written
    pub files_processed: usize,
    // @field: Catalogs that could not be read or written
    pub files_failed: usize,
    // @field: Jobs whose input was missing
    pub jobs_skipped: usize,
    // @field: String counters across all catalogs
    pub strings: RewriteReport,
    pub duration: Duration,
}

/// Main application controller for catalog translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Per-string translation pipeline
    pipeline: TranslationPipeline,
    // @field: Draw progress bars
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller talking to the configured HTTP endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = GoogleTranslate::with_config(
            config.provider.endpoint.clone(),
            config.proxy_url.as_deref(),
            config.provider.timeout_secs,
            config.provider.retry_count,
            config.provider.retry_backoff_ms,
        )
        .context("Failed to create translation client")?;

        Self::with_translator(config, Arc::new(translator))
    }

    // @method: Create a controller around any translator, loading the configured stores
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Result<Self> {
        let pipeline = build_pipeline(&config, translator)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    // @method: Create a controller around a ready pipeline
    pub fn with_pipeline(config: Config, pipeline: TranslationPipeline) -> Self {
        Self {
            config,
            pipeline,
            show_progress: true,
        }
    }

    /// Disable progress bars (tests, non-interactive runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every configured job. Failures are logged and counted, never returned.
    pub async fn run(&self) -> RunSummary {
        let start_time = Instant::now();
        let multi_progress = MultiProgress::new();
        let mut summary = RunSummary::default();

        for job in self.config.effective_jobs() {
            self.run_job(&job, &multi_progress, &mut summary).await;
        }

        summary.duration = start_time.elapsed();
        self.log_summary(&summary);
        summary
    }

    /// Process one input tree (or single catalog file) into its output directory
    pub async fn run_job(&self, job: &JobConfig, multi_progress: &MultiProgress, summary: &mut RunSummary) {
        let files = if job.input.is_file() {
            vec![job.input.clone()]
        } else if job.input.is_dir() {
            match FileManager::find_files(&job.input, &self.config.extensions) {
                Ok(files) => files,
                Err(e) => {
                    error!("Failed to scan {:?}: {}", job.input, e);
                    summary.jobs_skipped += 1;
                    return;
                }
            }
        } else {
            warn!("Input does not exist, skipping job: {:?}", job.input);
            summary.jobs_skipped += 1;
            return;
        };

        if files.is_empty() {
            info!("No catalog files found in {:?}", job.input);
            return;
        }
        info!("Translating {} catalog(s) from {:?} into {:?}", files.len(), job.input, job.output);

        for file in &files {
            let output_path = FileManager::mirror_path(file, &job.input, &job.output);

            match self.process_file(file, &output_path, multi_progress).await {
                Ok(report) => {
                    summary.files_processed += 1;
                    summary.strings.merge(&report);
                }
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", file, e);
                    summary.files_failed += 1;
                }
            }
        }
    }

    /// Rewrite one catalog and write the result
    pub async fn process_file(
        &self,
        input: &Path,
        output: &Path,
        multi_progress: &MultiProgress,
    ) -> Result<RewriteReport> {
        let document = FileManager::read_to_string(input)?;

        let file_name = input
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let progress_bar = self.file_progress_bar(multi_progress, &file_name);

        let rewriter = CatalogRewriter::new(&self.pipeline, self.config.delay());
        let (rewritten, report) = rewriter.rewrite(&document, &progress_bar).await;
        progress_bar.finish_and_clear();

        FileManager::write_to_file(output, &rewritten)?;
        info!(
            "Success: {} ({} filled, {} failed)",
            output.display(),
            report.filled(),
            report.fallback
        );
        debug!("{:?}: {:?}", input, report);

        Ok(report)
    }

    fn file_progress_bar(&self, multi_progress: &MultiProgress, file_name: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} strings ({percent}%) {prefix} {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {prefix} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_prefix(file_name.to_string());
        progress_bar
    }

    fn log_summary(&self, summary: &RunSummary) {
        let strings = &summary.strings;
        info!(
            "Run completed in {}: {} file(s) processed, {} failed, {} job(s) skipped",
            Self::format_duration(summary.duration),
            summary.files_processed,
            summary.files_failed,
            summary.jobs_skipped
        );
        info!(
            "Strings: {} translated, {} cached, {} dictionary, {} exempt, {} fallback, {} already translated",
            strings.translated,
            strings.cached,
            strings.dictionary,
            strings.exempt,
            strings.fallback,
            strings.already_filled
        );

        let (hits, misses, hit_rate) = self.pipeline.cache().stats();
        info!(
            "Cache: {} entries, {} hits, {} misses ({:.1}% hit rate)",
            self.pipeline.cache().len(),
            hits,
            misses,
            hit_rate * 100.0
        );

        let reviews = self.pipeline.reviews();
        if !reviews.unchanged.is_empty() || !reviews.needs_review.is_empty() {
            info!(
                "Review lists: {} unchanged, {} needing review",
                reviews.unchanged.len(),
                reviews.needs_review.len()
            );
        }
        if !self.pipeline.error_log().is_empty() {
            warn!(
                "{} translation(s) failed, see {:?}",
                self.pipeline.error_log().len(),
                self.config.stores.error_log
            );
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Build the pipeline from the stores named in the configuration
pub fn build_pipeline(config: &Config, translator: Arc<dyn Translator>) -> Result<TranslationPipeline> {
    let stores = &config.stores;
    let words = JsonFileStore::new(&stores.words_dictionary);
    let phrases = JsonFileStore::new(&stores.phrases_dictionary);
    let dictionary = DictionaryResolver::load(&words, &phrases);

    let cache_store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&stores.cache));
    let unchanged: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&stores.unchanged));
    let needs_review: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&stores.needs_review));

    let source = language_utils::normalize_for_translator(&config.source_language)
        .map_err(|e| anyhow!("Invalid source language {}: {}", config.source_language, e))?;
    let target = language_utils::normalize_for_translator(&config.target_language)
        .map_err(|e| anyhow!("Invalid target language {}: {}", config.target_language, e))?;

    info!(
        "Loaded {} dictionary word(s) and {} phrase(s); translating {} -> {} via {}",
        dictionary.word_count(),
        dictionary.phrase_count(),
        source,
        target,
        translator.name()
    );

    Ok(TranslationPipeline::new(
        translator,
        dictionary,
        TranslationCache::load(cache_store),
        ReviewSinks::load(unchanged, needs_review),
        ErrorLog::file(&stores.error_log),
        source,
        target,
    ))
}
