//! Batch translation pipeline
//!
//! One run takes a source file through these phases:
//!
//! 1. scan the text for `$t('…')` key references
//! 2. derive English text for keys missing from the English locale file
//! 3. translate keys missing from the target locale file, a few at a time
//! 4. write both locale files
//!
//! Keys are processed in fixed-size batches. Jobs inside a batch run concurrently and
//! the batch settles once every job has either succeeded or fallen back to the English
//! text. Batches run one after another with a pause in between to stay under provider
//! rate limits. A failing key never aborts the run.
//!
//! Cancellation is cooperative: the [`CancelToken`] is checked before each batch starts,
//! so a batch already in flight always completes. A cancelled run writes nothing.

use crate::codec::TranslationFile;
use crate::config::PipelineSettings;
use crate::error::Result;
use crate::key::{TranslationKey, extract_keys};
use crate::key_format::format_key;
use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{
    DEFAULT_SOURCE_LOCALE, DEFAULT_TARGET_LOCALE, MachineTranslator, validate_translation,
};
use crate::nested::NestedMap;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shared flag asking a running pipeline to stop at the next batch boundary
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened to one key, or to a whole batch
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    KeyTranslated { key: String, text: String },
    /// Already translated, duplicate, or no English text to translate
    KeySkipped { key: String },
    KeyFellBack { key: String, reason: String },
    /// `batch` is 1-based
    BatchFinished { batch: usize, batches: usize },
}

/// Receives every event with the `(current, total)` key counters
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent, usize, usize) + Send + Sync>;

/// A key whose target slot got the English text because translation kept failing
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackWarning {
    pub key: String,
    pub source_text: String,
    pub reason: TranslationError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Keys whose generated English text was written to the English map
    pub new_keys: usize,
    /// Leaves in the English file as it was read
    pub existing_keys: usize,
    /// Leaves in the English file as it was written
    pub total_keys: usize,
    pub fallbacks: Vec<FallbackWarning>,
    pub english_path: PathBuf,
    pub target_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Stopped at a batch boundary; nothing was written
    Cancelled {
        english: NestedMap,
        target: NestedMap,
        completed_batches: usize,
    },
}

/// Result of the batching loop over one key sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub translated: usize,
    pub skipped: usize,
    pub fallbacks: Vec<FallbackWarning>,
    pub completed_batches: usize,
    pub cancelled: bool,
}

pub struct BatchTranslationPipeline {
    translator: Arc<dyn MachineTranslator>,
    settings: PipelineSettings,
    source_locale: String,
    target_locale: String,
    cancel: CancelToken,
    progress: Option<ProgressCallback>,
}

impl BatchTranslationPipeline {
    /// English to Arabic with the given scheduling settings
    pub fn new(translator: Arc<dyn MachineTranslator>, settings: PipelineSettings) -> Self {
        Self {
            translator,
            settings,
            source_locale: DEFAULT_SOURCE_LOCALE.to_string(),
            target_locale: DEFAULT_TARGET_LOCALE.to_string(),
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    pub fn with_locales(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_locale = source.into();
        self.target_locale = target.into();
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressEvent, usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Handle for cancelling this pipeline from elsewhere
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn report(&self, event: ProgressEvent, current: usize, total: usize) {
        match &event {
            ProgressEvent::KeyTranslated { key, text } => {
                info!("({}/{}) {} -> {}", current, total, key, text)
            }
            ProgressEvent::KeySkipped { key } => debug!("({}/{}) {} skipped", current, total, key),
            ProgressEvent::KeyFellBack { key, reason } => {
                warn!("({}/{}) {} kept English text: {}", current, total, key, reason)
            }
            ProgressEvent::BatchFinished { batch, batches } => {
                debug!(batch, batches, "batch finished")
            }
        }
        if let Some(callback) = &self.progress {
            callback(&event, current, total);
        }
    }

    /// Translate one text, retrying with exponential backoff.
    ///
    /// An empty or unchanged result counts as a failed attempt. Errors that cannot be
    /// fixed by retrying (bad locale, configuration) end the loop early.
    pub async fn translate_with_retry(&self, text: &str) -> TranslationResult<String> {
        let attempts = self.settings.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            let result = self
                .translator
                .translate(text, &self.source_locale, &self.target_locale)
                .await
                .and_then(|translated| validate_translation(text, &translated));

            match result {
                Ok(translated) => return Ok(translated),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        attempts,
                        provider = self.translator.provider_name(),
                        error = %e,
                        "translation attempt failed"
                    );
                    last_error = Some(e);
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.backoff(attempt)).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| TranslationError::InvalidResult("no attempt was made".to_string())))
    }

    /// Delay after the failed attempt with zero-based index `attempt`
    fn backoff(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(u32::try_from(attempt).unwrap_or(u32::MAX));
        self.settings.base_delay().saturating_mul(factor)
    }

    /// Fill `target` for every key in `keys` that has English text but no translation.
    ///
    /// Results are merged into `target` once their batch has settled; keys that keep
    /// failing get their English text. Returns early, with `cancelled` set, when the
    /// cancel token is raised before a batch starts.
    pub async fn translate_batches(
        &self,
        keys: &[String],
        english: &NestedMap,
        target: &mut NestedMap,
    ) -> BatchReport {
        let batch_size = self.settings.batch_size.max(1);
        let total = keys.len();
        let batches = total.div_ceil(batch_size);
        let mut report = BatchReport::default();
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut current = 0;

        for (index, batch) in keys.chunks(batch_size).enumerate() {
            if self.cancel.is_cancelled() {
                info!(
                    completed = index,
                    remaining = batches - index,
                    "translation cancelled"
                );
                report.cancelled = true;
                return report;
            }

            let mut jobs = Vec::with_capacity(batch.len());
            for raw in batch {
                let job = TranslationKey::parse(raw).and_then(|key| {
                    let text = english.get(key.segments()).filter(|t| !t.is_empty())?;
                    let translated = target
                        .get(key.segments())
                        .is_some_and(|existing| !existing.is_empty());
                    (!translated && claimed.insert(raw.as_str())).then_some((key, text))
                });

                match job {
                    Some((key, text)) => jobs.push(async move {
                        let result = self.translate_with_retry(text).await;
                        (key, text, result)
                    }),
                    None => {
                        current += 1;
                        report.skipped += 1;
                        self.report(ProgressEvent::KeySkipped { key: raw.clone() }, current, total);
                    }
                }
            }

            for (key, text, result) in join_all(jobs).await {
                current += 1;
                match result {
                    Ok(translated) => {
                        target.set(key.segments(), translated.clone());
                        report.translated += 1;
                        self.report(
                            ProgressEvent::KeyTranslated {
                                key: key.to_string(),
                                text: translated,
                            },
                            current,
                            total,
                        );
                    }
                    Err(reason) => {
                        target.set(key.segments(), text);
                        self.report(
                            ProgressEvent::KeyFellBack {
                                key: key.to_string(),
                                reason: reason.to_string(),
                            },
                            current,
                            total,
                        );
                        report.fallbacks.push(FallbackWarning {
                            key: key.to_string(),
                            source_text: text.to_string(),
                            reason,
                        });
                    }
                }
            }

            report.completed_batches += 1;
            self.report(
                ProgressEvent::BatchFinished {
                    batch: index + 1,
                    batches,
                },
                current,
                total,
            );

            if index + 1 < batches {
                tokio::time::sleep(self.settings.batch_delay()).await;
            }
        }

        report
    }

    /// Extract keys from `source`, translate what is missing and write both files.
    ///
    /// Only write failures are errors. Unreadable locale files start out empty and
    /// failing keys fall back to English.
    pub async fn run(
        &self,
        source: &str,
        english_file: &TranslationFile,
        target_file: &TranslationFile,
    ) -> Result<RunOutcome> {
        let keys = extract_keys(source);
        info!(
            keys = keys.len(),
            provider = self.translator.provider_name(),
            "scanned source for translation keys"
        );

        let existing_english = english_file.load();
        let (english, new_keys) = build_english(&keys, &existing_english);
        let mut target = target_file.load();

        let report = self.translate_batches(&keys, &english, &mut target).await;
        if report.cancelled {
            return Ok(RunOutcome::Cancelled {
                english,
                target,
                completed_batches: report.completed_batches,
            });
        }

        english_file.save(&english)?;
        target_file.save(&target)?;
        info!(
            english = %english_file.path.display(),
            target = %target_file.path.display(),
            translated = report.translated,
            fallbacks = report.fallbacks.len(),
            "locale files written"
        );

        Ok(RunOutcome::Completed(RunSummary {
            new_keys,
            existing_keys: existing_english.leaf_count(),
            total_keys: english.leaf_count(),
            fallbacks: report.fallbacks,
            english_path: english_file.path.clone(),
            target_path: target_file.path.clone(),
        }))
    }
}

/// Merge generated English text for `keys` into `existing`.
///
/// Returns the merged map and the number of keys whose generated text actually landed
/// in it. Anything already present in `existing` wins, including an empty string or a
/// leaf blocking the path. Malformed keys are ignored.
pub fn build_english(keys: &[String], existing: &NestedMap) -> (NestedMap, usize) {
    let mut staged = NestedMap::new();
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();

    for raw in keys {
        let Some(key) = TranslationKey::parse(raw) else {
            warn!(key = raw.as_str(), "ignoring malformed translation key");
            continue;
        };
        if !seen.insert(raw.as_str()) || existing.get(key.segments()).is_some() {
            continue;
        }
        staged.set(key.segments(), format_key(raw));
        candidates.push(key);
    }

    let merged = NestedMap::merge(existing, &staged);
    let new_keys = candidates
        .iter()
        .filter(|key| merged.get(key.segments()).is_some())
        .count();
    (merged, new_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FileFormat, TranslationFile};
    use crate::mt::mock::{MockMode, MockTranslator};
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn settings(max_retries: usize) -> PipelineSettings {
        PipelineSettings {
            batch_size: 3,
            max_retries,
            base_delay_ms: 0,
            batch_delay_ms: 0,
        }
    }

    fn pipeline(mock: &MockTranslator, max_retries: usize) -> BatchTranslationPipeline {
        BatchTranslationPipeline::new(Arc::new(mock.clone()), settings(max_retries))
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn files(dir: &TempDir) -> (TranslationFile, TranslationFile) {
        (
            TranslationFile::new(dir.path().join("locales/en.js"), "en", FileFormat::Module),
            TranslationFile::new(dir.path().join("locales/ar.js"), "ar", FileFormat::Module),
        )
    }

    #[test]
    fn test_build_english_deduplicates() {
        let keys = keys(&["home.title", "home.title"]);
        let (english, new_keys) = build_english(&keys, &NestedMap::new());
        assert_eq!(english.to_value(), json!({"home": {"title": "Title"}}));
        assert_eq!(new_keys, 1);
    }

    #[test]
    fn test_build_english_keeps_existing_text() {
        let existing = NestedMap::from_value(json!({
            "home": {"title": "Welcome home", "subtitle": ""}
        }))
        .unwrap();
        let keys = keys(&["home.title", "home.subtitle", "home.saveChanges", "a..b"]);

        let (english, new_keys) = build_english(&keys, &existing);
        assert_eq!(
            english.to_value(),
            json!({"home": {
                "title": "Welcome home",
                "subtitle": "",
                "saveChanges": "Save Changes"
            }})
        );
        assert_eq!(new_keys, 1);
    }

    #[test]
    fn test_build_english_counts_only_written_keys() {
        let existing = NestedMap::from_value(json!({
            "home": "Home",
            "menu": {"file": "File"}
        }))
        .unwrap();
        // `home.title` is blocked by a leaf, `menu` already holds a mapping
        let keys = keys(&["home.title", "menu", "about"]);

        let (english, new_keys) = build_english(&keys, &existing);
        assert_eq!(
            english.to_value(),
            json!({"home": "Home", "menu": {"file": "File"}, "about": "About"})
        );
        assert_eq!(new_keys, 1);
    }

    #[tokio::test]
    async fn test_run_keeps_empty_english_entry() {
        let dir = TempDir::new().unwrap();
        let (en_file, ar_file) = files(&dir);
        en_file
            .save(&NestedMap::from_value(json!({"home": {"subtitle": ""}})).unwrap())
            .unwrap();

        let mock = MockTranslator::new(MockMode::Suffix);
        let outcome = pipeline(&mock, 3)
            .run("$t('home.subtitle')", &en_file, &ar_file)
            .await
            .unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.new_keys, 0);
        assert_eq!(en_file.load().get(&["home", "subtitle"]), Some(""));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_backoff_doubles() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = BatchTranslationPipeline::new(
            Arc::new(mock),
            PipelineSettings {
                base_delay_ms: 500,
                ..PipelineSettings::default()
            },
        );
        assert_eq!(pipeline.backoff(0), Duration::from_millis(500));
        assert_eq!(pipeline.backoff(1), Duration::from_millis(1000));
        assert_eq!(pipeline.backoff(3), Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let mock = MockTranslator::new(MockMode::FailFirst(2));
        let pipeline = pipeline(&mock, 3);
        let english = NestedMap::from_value(json!({"home": {"title": "Title"}})).unwrap();
        let mut target = NestedMap::new();

        let report = pipeline
            .translate_batches(&keys(&["home.title"]), &english, &mut target)
            .await;

        assert_eq!(target.get(&["home", "title"]), Some("Title_ar"));
        assert!(report.fallbacks.is_empty());
        assert_eq!(report.translated, 1);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fall_back_to_english() {
        let mock = MockTranslator::new(MockMode::Error("quota exceeded".to_string()));
        let pipeline = pipeline(&mock, 2);
        let english = NestedMap::from_value(json!({"home": {"title": "Title"}})).unwrap();
        let mut target = NestedMap::new();

        let report = pipeline
            .translate_batches(&keys(&["home.title"]), &english, &mut target)
            .await;

        assert_eq!(target.get(&["home", "title"]), Some("Title"));
        assert_eq!(report.fallbacks.len(), 1);
        assert_eq!(report.fallbacks[0].key, "home.title");
        assert_eq!(report.fallbacks[0].source_text, "Title");
        assert!(!report.cancelled);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unchanged_result_is_retried_then_falls_back() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let pipeline = pipeline(&mock, 3);
        let english = NestedMap::from_value(json!({"save": "Save"})).unwrap();
        let mut target = NestedMap::new();

        let report = pipeline
            .translate_batches(&keys(&["save"]), &english, &mut target)
            .await;

        assert_eq!(mock.call_count(), 3);
        assert!(matches!(
            report.fallbacks[0].reason,
            TranslationError::InvalidResult(_)
        ));
        assert_eq!(target.get(&["save"]), Some("Save"));
    }

    #[tokio::test]
    async fn test_config_error_falls_back_without_retrying() {
        let mock = MockTranslator::new(MockMode::Fail(TranslationError::Config(
            "bad key".to_string(),
        )));
        let pipeline = pipeline(&mock, 5);
        let english = NestedMap::from_value(json!({"home": {"title": "Title"}})).unwrap();
        let mut target = NestedMap::new();

        let report = pipeline
            .translate_batches(&keys(&["home.title"]), &english, &mut target)
            .await;

        assert_eq!(mock.call_count(), 1);
        assert_eq!(report.fallbacks.len(), 1);
        assert!(matches!(
            report.fallbacks[0].reason,
            TranslationError::Config(_)
        ));
        assert_eq!(target.get(&["home", "title"]), Some("Title"));
    }

    #[tokio::test]
    async fn test_too_long_text_is_not_retried() {
        let mock = MockTranslator::new(MockMode::Fail(TranslationError::TextTooLong {
            length: 40_000,
            limit: 30_000,
        }));
        let pipeline = pipeline(&mock, 4);
        let english = NestedMap::from_value(json!({"save": "Save"})).unwrap();
        let mut target = NestedMap::new();

        let report = pipeline
            .translate_batches(&keys(&["save"]), &english, &mut target)
            .await;

        assert_eq!(mock.call_count(), 1);
        assert_eq!(target.get(&["save"]), Some("Save"));
        assert_eq!(report.fallbacks.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_translations_are_not_requested() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = pipeline(&mock, 3);
        let english =
            NestedMap::from_value(json!({"home": {"title": "Title", "subtitle": "Subtitle"}}))
                .unwrap();
        let mut target = NestedMap::from_value(json!({"home": {"title": "عنوان"}})).unwrap();

        let report = pipeline
            .translate_batches(&keys(&["home.title", "home.subtitle"]), &english, &mut target)
            .await;

        assert_eq!(mock.call_count(), 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(target.get(&["home", "title"]), Some("عنوان"));
        assert_eq!(target.get(&["home", "subtitle"]), Some("Subtitle_ar"));
    }

    #[tokio::test]
    async fn test_duplicate_keys_translated_once() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = pipeline(&mock, 3);
        let english = NestedMap::from_value(json!({"home": {"title": "Title"}})).unwrap();
        let mut target = NestedMap::new();

        let duplicates = keys(&["home.title", "home.title", "home.title", "home.title"]);
        let report = pipeline
            .translate_batches(&duplicates, &english, &mut target)
            .await;

        assert_eq!(mock.call_count(), 1);
        assert_eq!(report.translated, 1);
        assert_eq!(report.skipped, 3);
    }

    #[tokio::test]
    async fn test_cancel_between_batches() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let token = CancelToken::new();
        let trigger = token.clone();
        let pipeline = pipeline(&mock, 3)
            .with_cancel_token(token)
            .with_progress(move |event, _, _| {
                if matches!(event, ProgressEvent::BatchFinished { batch: 1, .. }) {
                    trigger.cancel();
                }
            });

        let all = keys(&["a", "b", "c", "d", "e", "f"]);
        let (english, _) = build_english(&all, &NestedMap::new());
        let mut target = NestedMap::new();
        let report = pipeline.translate_batches(&all, &english, &mut target).await;

        assert!(report.cancelled);
        assert_eq!(report.completed_batches, 1);
        assert_eq!(mock.call_count(), 3);
        assert_eq!(target.get(&["c"]), Some("C_ar"));
        assert_eq!(target.get(&["d"]), None);
    }

    #[tokio::test]
    async fn test_progress_counts_every_key() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = pipeline(&mock, 3).with_progress(move |event, current, total| {
            sink.lock().unwrap().push((event.clone(), current, total));
        });

        let all = keys(&["a", "b", "a", "c"]);
        let (english, _) = build_english(&all, &NestedMap::new());
        let mut target = NestedMap::new();
        pipeline.translate_batches(&all, &english, &mut target).await;

        let events = events.lock().unwrap();
        let counters: Vec<usize> = events
            .iter()
            .filter(|(e, _, _)| !matches!(e, ProgressEvent::BatchFinished { .. }))
            .map(|(_, current, _)| *current)
            .collect();
        assert_eq!(counters, vec![1, 2, 3, 4]);
        assert!(events.iter().all(|(_, _, total)| *total == 4));
        assert_eq!(
            events.last().map(|(e, _, _)| e.clone()),
            Some(ProgressEvent::BatchFinished {
                batch: 2,
                batches: 2
            })
        );
    }

    #[tokio::test]
    async fn test_run_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let (en_file, ar_file) = files(&dir);
        en_file
            .save(&NestedMap::from_value(json!({"home": {"title": "Welcome"}})).unwrap())
            .unwrap();

        let mock = MockTranslator::new(MockMode::Suffix);
        let source = "<template>$t('home.title')</template> $t(\"home.title\") $t('home.saveChanges')";
        let outcome = pipeline(&mock, 3)
            .run(source, &en_file, &ar_file)
            .await
            .unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.new_keys, 1);
        assert_eq!(summary.existing_keys, 1);
        assert_eq!(summary.total_keys, 2);
        assert!(summary.fallbacks.is_empty());
        assert_eq!(summary.target_path, ar_file.path);

        assert_eq!(
            en_file.load().to_value(),
            json!({"home": {"title": "Welcome", "saveChanges": "Save Changes"}})
        );
        assert_eq!(
            ar_file.load().to_value(),
            json!({"home": {"title": "Welcome_ar", "saveChanges": "Save Changes_ar"}})
        );
    }

    #[tokio::test]
    async fn test_rerun_is_stable() {
        let dir = TempDir::new().unwrap();
        let (en_file, ar_file) = files(&dir);
        let mock = MockTranslator::new(MockMode::Suffix);
        let source = "$t('nav.logOut') $t('nav.settings')";

        pipeline(&mock, 3).run(source, &en_file, &ar_file).await.unwrap();
        let first = (en_file.load(), ar_file.load());
        let calls = mock.call_count();

        pipeline(&mock, 3).run(source, &en_file, &ar_file).await.unwrap();
        assert_eq!((en_file.load(), ar_file.load()), first);
        assert_eq!(mock.call_count(), calls);
    }

    #[tokio::test]
    async fn test_cancelled_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let (en_file, ar_file) = files(&dir);
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = pipeline(&mock, 3);
        pipeline.cancel_token().cancel();

        let outcome = pipeline
            .run("$t('home.title')", &en_file, &ar_file)
            .await
            .unwrap();

        match outcome {
            RunOutcome::Cancelled {
                english,
                target,
                completed_batches,
            } => {
                assert_eq!(english.get(&["home", "title"]), Some("Title"));
                assert!(target.is_empty());
                assert_eq!(completed_batches, 0);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert!(!en_file.path.exists());
        assert!(!ar_file.path.exists());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let en_file = TranslationFile::new(blocker.join("en.js"), "en", FileFormat::Module);
        let ar_file = TranslationFile::new(dir.path().join("ar.js"), "ar", FileFormat::Module);

        let mock = MockTranslator::new(MockMode::Suffix);
        let result = pipeline(&mock, 3)
            .run("$t('home.title')", &en_file, &ar_file)
            .await;
        assert!(matches!(result, Err(crate::error::Error::Io { .. })));
    }
}
