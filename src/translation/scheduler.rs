/*!
 * Session scheduling for concurrent translation.
 *
 * The global unit sequence is ceiling-divided into contiguous partitions,
 * one per session. Sessions run concurrently as independent tasks, each
 * owning its own translation service (and therefore its own conversation
 * history); a single merge point re-globalizes the results afterwards, so
 * output order never depends on completion order.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::providers::ChatProvider;
use crate::translation::service::{ServiceSettings, TranslationService};

/// One translatable item with its stable position in the original sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// 1-based position in the original sequence, immutable
    pub global_index: usize,
    /// Original text, immutable
    pub text: String,
}

impl TranslationUnit {
    /// Create a new unit
    pub fn new(global_index: usize, text: impl Into<String>) -> Self {
        TranslationUnit {
            global_index,
            text: text.into(),
        }
    }
}

/// A contiguous slice of the global unit sequence assigned to one session
#[derive(Debug, Clone)]
pub struct SessionPartition {
    /// Global index of the partition's first unit (1-based)
    pub start_index: usize,
    /// Units of this partition, in global order
    pub units: Vec<TranslationUnit>,
}

/// Result for one unit, exactly one produced per input unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResult {
    /// 1-based position in the original sequence
    pub global_index: usize,
    /// Translated text, or the original text when translation failed
    pub text: String,
    /// Source language reported by the model, when translation succeeded
    pub source_lang: Option<String>,
    /// Whether the unit was actually translated
    pub translated: bool,
}

/// Partition units into `sessions` contiguous, non-overlapping slices.
///
/// Sizes are ceiling-divided so they differ by at most one unit; trailing
/// partitions may be empty. The partitions tile the input exactly once.
pub fn partition_units(units: &[TranslationUnit], sessions: usize) -> Vec<SessionPartition> {
    let sessions = sessions.max(1);
    let size = units.len().div_ceil(sessions);

    (0..sessions)
        .map(|i| {
            let lo = (i * size).min(units.len());
            let hi = ((i + 1) * size).min(units.len());
            SessionPartition {
                start_index: i * size + 1,
                units: units[lo..hi].to_vec(),
            }
        })
        .collect()
}

/// Run all sessions concurrently and merge their results into global order.
///
/// Each session gets its own translation service built from the shared
/// settings; only the provider client is shared, and only for stateless
/// per-call use. The progress callback receives (completed, total) counts.
pub async fn run_sessions<P>(
    provider: Arc<dyn ChatProvider>,
    settings: &ServiceSettings,
    units: Vec<TranslationUnit>,
    sessions: usize,
    progress: P,
) -> Result<Vec<UnitResult>>
where
    P: Fn(usize, usize) + Clone + Send + 'static,
{
    let total = units.len();
    let partitions = partition_units(&units, sessions);
    let completed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let service = TranslationService::new(provider.clone(), settings.clone());
        let completed = completed.clone();
        let progress = progress.clone();

        handles.push(tokio::spawn(async move {
            run_session(partition, service, total, completed, progress).await
        }));
    }

    let mut results = Vec::with_capacity(total);
    for handle in handles {
        let session_results = handle.await.context("Session worker panicked")?;
        results.extend(session_results);
    }

    // The single synchronization point that restores global order
    results.sort_by_key(|result| result.global_index);
    Ok(results)
}

/// Process one partition strictly in order, one unit at a time.
///
/// Sequential processing within the session is what preserves conversational
/// context continuity. A unit whose translation permanently fails falls back
/// to its original text; the session carries on with the next unit.
async fn run_session<P>(
    partition: SessionPartition,
    mut service: TranslationService,
    total: usize,
    completed: Arc<AtomicUsize>,
    progress: P,
) -> Vec<UnitResult>
where
    P: Fn(usize, usize),
{
    let start_index = partition.start_index;
    let mut results = Vec::with_capacity(partition.units.len());

    for (local_index, unit) in partition.units.into_iter().enumerate() {
        let global_index = start_index + local_index;

        match service.translate(&unit.text).await {
            Ok(outcome) => {
                debug!(
                    "Unit {} translated from {}",
                    global_index, outcome.source_lang
                );
                results.push(UnitResult {
                    global_index,
                    text: outcome.translated_text,
                    source_lang: Some(outcome.source_lang),
                    translated: true,
                });
            }
            Err(e) => {
                warn!(
                    "Unit {} failed permanently ({}), keeping original text",
                    global_index, e
                );
                results.push(UnitResult {
                    global_index,
                    text: unit.text,
                    source_lang: None,
                    translated: false,
                });
            }
        }

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        progress(done, total);
    }

    results
}
