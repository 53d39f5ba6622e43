use crate::config::MiningConfig;
use crate::core::Block;
use crate::crypto::hash::Hash256;
use crate::mining::difficulty::{meets_difficulty, validate_difficulty};
use crate::{LedgerError, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How many hashes a worker computes between cancellation checks.
const CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningResult {
    pub nonce: u64,
    pub hash: Hash256,
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Proof-of-work search over the nonce space.
///
/// With `threads > 1` worker `i` tries `start + i, start + i + threads, ...`.
/// Workers abandon nonces above the best one found so far, so the winner is
/// the smallest qualifying nonce, the same one a single thread would find.
#[derive(Debug, Clone)]
pub struct Miner {
    threads: usize,
    timeout: Option<Duration>,
    cancel: Arc<AtomicBool>,
}

impl Miner {
    /// `threads == 0` uses every available core.
    pub fn new(threads: usize) -> Self {
        let threads = if threads == 0 { num_cpus::get().max(1) } else { threads };

        Self {
            threads,
            timeout: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(config: &MiningConfig) -> Self {
        let miner = Self::new(config.threads);
        match config.timeout_secs {
            Some(secs) => miner.with_timeout(Duration::from_secs(secs)),
            None => miner,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Shared flag; storing `true` stops every search using this miner.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.cancel.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Refresh the block's Merkle root, then search nonces upward from the
    /// block's current nonce until the hash has `difficulty` leading hex zeros.
    /// On success the block carries the winning nonce and hash. On cancellation
    /// or timeout the block is left at the first untried nonce, so mining it
    /// again continues the search instead of repeating it.
    pub fn mine(&self, block: &mut Block, difficulty: u32) -> Result<MiningResult> {
        validate_difficulty(difficulty)?;
        block.update_merkle_root();

        let header = block.header.clone();
        let start_nonce = header.nonce;
        let started = Instant::now();
        let deadline = self.timeout.map(|timeout| started + timeout);

        let best = AtomicU64::new(u64::MAX);
        let attempts = AtomicU64::new(0);
        let stopped = AtomicBool::new(false);
        // Lowest nonce a stopped worker had not tried yet
        let resume = AtomicU64::new(u64::MAX);

        let search = |worker: u64| {
            let stride = self.threads as u64;
            let mut nonce = match start_nonce.checked_add(worker) {
                Some(nonce) => nonce,
                None => return,
            };
            let mut local_attempts = 0u64;

            loop {
                if local_attempts % CHECK_INTERVAL == 0 {
                    let timed_out = deadline.map_or(false, |deadline| Instant::now() >= deadline);
                    if self.is_cancelled() || timed_out || stopped.load(Ordering::Relaxed) {
                        stopped.store(true, Ordering::Relaxed);
                        resume.fetch_min(nonce, Ordering::Relaxed);
                        break;
                    }
                }

                if nonce >= best.load(Ordering::Relaxed) {
                    break;
                }

                local_attempts += 1;
                if meets_difficulty(&header.hash_with_nonce(nonce), difficulty) {
                    best.fetch_min(nonce, Ordering::Relaxed);
                    break;
                }

                nonce = match nonce.checked_add(stride) {
                    Some(next) => next,
                    None => break,
                };
            }

            attempts.fetch_add(local_attempts, Ordering::Relaxed);
        };

        if self.threads == 1 {
            search(0);
        } else {
            thread::scope(|scope| {
                for worker in 0..self.threads as u64 {
                    let search = &search;
                    scope.spawn(move || search(worker));
                }
            });
        }

        let attempts = attempts.load(Ordering::Relaxed);
        let nonce = best.load(Ordering::Relaxed);

        if nonce == u64::MAX {
            // Every nonce below `resume` has been tried, so a retry can start there
            let resume = resume.load(Ordering::Relaxed);
            if resume != u64::MAX {
                block.set_nonce(resume);
            }

            if self.is_cancelled() {
                log::warn!("Mining cancelled after {} attempts", attempts);
                return Err(LedgerError::MiningCancelled);
            }
            if stopped.load(Ordering::Relaxed) {
                log::warn!("Mining timed out after {} attempts", attempts);
                return Err(LedgerError::MiningTimedOut { attempts });
            }
            return Err(LedgerError::InvalidInput("Nonce space exhausted".to_string()));
        }

        block.set_nonce(nonce);
        let elapsed = started.elapsed();

        log::info!(
            "Block mined: hash {} nonce {} ({} attempts in {:?}, {} thread(s))",
            block.hash, nonce, attempts, elapsed, self.threads
        );

        Ok(MiningResult {
            nonce,
            hash: block.hash,
            attempts,
            elapsed,
        })
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new(1)
    }
}
