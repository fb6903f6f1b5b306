//! Batch scheduling of entry blocks across sequential or parallel workers.
//!
//! Blocks are independent and share no mutable state, so a parse can fan
//! out over contiguous batches. The only cross-worker state is one abort
//! flag: under abort-on-invalid, the first worker to hit a fatal error sets
//! it, remaining workers skip their unstarted blocks, and the error is
//! returned once every worker has exited. Regardless of scheduling, the
//! final message sequence is sorted by source line number.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Diagnostic, Error};
use crate::options::ParseOptions;
use crate::types::Message;

use super::blocks::Block;
use super::machine::{self, BlockKind};

/// Parses `blocks` (the header block excluded) into messages. Failed blocks
/// yield diagnostics in keep-going mode; in abort mode the first error is
/// returned after all in-flight work has stopped.
pub(crate) fn run(
    blocks: &[Block],
    options: &ParseOptions,
    num_plurals: usize,
) -> Result<(Vec<Message>, Vec<Diagnostic>), Error> {
    let abort = AtomicBool::new(false);

    let (mut messages, diagnostics) = if options.parallel {
        run_parallel(blocks, options, num_plurals, &abort)?
    } else {
        process_batch(blocks, options, num_plurals, &abort)?
    };

    // Sorting makes the output order independent of batch layout and worker
    // completion order. Messages without a line number sort first.
    messages.sort_by_key(|message| message.lineno.unwrap_or(0));
    Ok((messages, diagnostics))
}

fn run_parallel(
    blocks: &[Block],
    options: &ParseOptions,
    num_plurals: usize,
    abort: &AtomicBool,
) -> Result<(Vec<Message>, Vec<Diagnostic>), Error> {
    let batches = split_into_batches(blocks, batch_count(options.batch_division));
    debug!(
        blocks = blocks.len(),
        batches = batches.len(),
        "dispatching parallel parse"
    );

    let results: Vec<Result<(Vec<Message>, Vec<Diagnostic>), Error>> = batches
        .par_iter()
        .map(|batch| process_batch(batch, options, num_plurals, abort))
        .collect();

    let mut messages = Vec::new();
    let mut diagnostics = Vec::new();
    let mut first_error = None;
    for result in results {
        match result {
            Ok((mut batch_messages, mut batch_diagnostics)) => {
                messages.append(&mut batch_messages);
                diagnostics.append(&mut batch_diagnostics);
            }
            Err(error) => {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }
    // All workers have exited by now; re-raise the first fatal error.
    match first_error {
        Some(error) => Err(error),
        None => Ok((messages, diagnostics)),
    }
}

/// Processes one batch of whole blocks. Checks the abort flag before each
/// block: a block already in progress completes, but no new block starts
/// once the flag is set.
fn process_batch(
    batch: &[Block],
    options: &ParseOptions,
    num_plurals: usize,
    abort: &AtomicBool,
) -> Result<(Vec<Message>, Vec<Diagnostic>), Error> {
    let mut messages = Vec::with_capacity(batch.len());
    let mut diagnostics = Vec::new();

    for block in batch {
        if abort.load(Ordering::Relaxed) {
            debug!(start_line = block.start_line, "abort signalled, skipping remaining blocks");
            break;
        }
        match machine::process_block(block, BlockKind::Entry, num_plurals) {
            Ok(message) => messages.push(message),
            Err(error) if options.abort_on_invalid => {
                abort.store(true, Ordering::Relaxed);
                return Err(error);
            }
            Err(error) => diagnostics.push(Diagnostic::from_error(&error)),
        }
    }

    Ok((messages, diagnostics))
}

/// Number of parallel batches to cut the block list into: the available
/// cores less two, further divided when large to limit context-switch
/// overhead.
fn batch_count(batch_division: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let count = cores.saturating_sub(2).max(1);
    if count >= 5 {
        (count / batch_division.max(1)).max(1)
    } else {
        count
    }
}

/// Splits `blocks` into `num_batches` contiguous batches of near-equal
/// size, distributing the remainder over the first batches.
fn split_into_batches(blocks: &[Block], num_batches: usize) -> Vec<&[Block]> {
    let total = blocks.len();
    let batch_size = total / num_batches;
    let remainder = total % num_batches;

    let mut batches = Vec::with_capacity(num_batches);
    let mut start = 0;
    for index in 0..num_batches {
        let extra = usize::from(index < remainder);
        let end = start + batch_size + extra;
        batches.push(&blocks[start..end]);
        start = end;
    }
    batches
}
