//! Multi-connection segmented pull.
//!
//! Probes size and range support, splits the file into segments and runs the
//! range GETs on a small worker pool writing into a preallocated staged file.
//! Servers without size or range support get the chunked pull instead.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};

use super::chunked::download_chunked;
use super::segment::download_one_segment;
use super::CurlOptions;
use crate::fetch_head;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};
use crate::scheduler::GlobalConnectionBudget;
use crate::segmenter::{plan_segments, Segment, MIN_SEGMENT_BYTES};
use crate::storage::StagedFile;

/// Downloads `url` into `staged_path` with up to `max_segments` connections,
/// limited further by what the global budget grants. Returns the byte count.
pub fn download_segmented(
    url: &str,
    headers: &HashMap<String, String>,
    staged_path: &Path,
    max_segments: usize,
    policy: &RetryPolicy,
    curl: CurlOptions,
    budget: &GlobalConnectionBudget,
) -> Result<u64, TransferError> {
    let head = match run_with_retry(policy, |_| fetch_head::probe(url, headers)) {
        Ok(h) => Some(h),
        Err(e) => {
            tracing::debug!(url, error = %e, "HEAD probe failed, using single stream");
            None
        }
    };
    let total = match head {
        Some(ref h) if h.accept_ranges && h.content_length.unwrap_or(0) > 0 => {
            h.content_length.unwrap_or(0)
        }
        _ => {
            let _slot = budget.reserve_guard(1);
            return download_chunked(url, headers, staged_path, policy, curl);
        }
    };

    let segments = plan_segments(total, max_segments, MIN_SEGMENT_BYTES);
    let slot = budget.reserve_guard(segments.len());
    let connections = slot.granted().max(1);
    tracing::debug!(
        url,
        total,
        segments = segments.len(),
        connections,
        "segmented transfer"
    );

    let storage = StagedFile::create_sized(staged_path, total)?;

    let queue: Arc<Mutex<VecDeque<(usize, Segment)>>> =
        Arc::new(Mutex::new(segments.iter().copied().enumerate().collect()));
    let (tx, rx) = mpsc::channel();
    let workers = connections.min(segments.len());

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let storage = storage.clone();
            scope.spawn(move || loop {
                let next = match queue.lock() {
                    Ok(mut q) => q.pop_front(),
                    Err(poisoned) => poisoned.into_inner().pop_front(),
                };
                let Some((index, segment)) = next else {
                    break;
                };
                let res = run_with_retry(policy, |_| {
                    download_one_segment(url, headers, &segment, &storage, curl)
                });
                let failed = res.is_err();
                if tx.send((index, res)).is_err() || failed {
                    // Stop pulling work once anything failed; the file is lost anyway.
                    if let Ok(mut q) = queue.lock() {
                        q.clear();
                    }
                    break;
                }
            });
        }
    });
    drop(tx);

    let mut first_error = None;
    let mut received = 0u64;
    for (index, res) in rx.iter() {
        match res {
            Ok(()) => received += segments[index].len(),
            Err(e) => {
                tracing::warn!(url, segment = index, error = %e, "segment failed");
                first_error.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }
    if received != total {
        return Err(TransferError::PartialTransfer {
            expected: total,
            received,
        });
    }

    storage.sync()?;
    Ok(total)
}
