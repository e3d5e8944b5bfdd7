//! Scoped, sharded pool of reusable evaluation contexts.
//!
//! One context lives per executor (OS thread, in this implementation); the
//! pool hands out an RAII guard so a context is always returned even if the
//! caller panics or returns early, generalizing the original design's
//! thread-local storage into something the evaluator can reason about and
//! testers can construct multiple instances of.

use crate::context::EvaluationContext;
use crate::error::{EngineError, EngineResult};
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use std::ops::{Deref, DerefMut};
use std::thread::ThreadId;

#[derive(Debug)]
pub struct ContextPool {
    contexts: DashMap<ThreadId, EvaluationContext>,
    /// Upper bound on distinct executor contexts held at once. Zero means
    /// unbounded.
    max_contexts: usize,
}

impl Default for ContextPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextPool {
    /// An unbounded pool: one context per distinct calling thread, with no
    /// ceiling on how many threads may hold one at once.
    pub fn new() -> Self {
        Self {
            contexts: DashMap::new(),
            max_contexts: 0,
        }
    }

    /// A pool that refuses to grow past `max_contexts` distinct executor
    /// contexts. `0` means unbounded, matching `new()`.
    pub fn with_max_contexts(max_contexts: usize) -> Self {
        Self {
            contexts: DashMap::new(),
            max_contexts,
        }
    }

    /// Acquire this thread's context, growing it to fit `num_predicates`
    /// predicates and `num_rules` rules. The returned guard releases the
    /// context back to the pool on `Drop`.
    ///
    /// Fails with `PoolExhausted` if this thread has never held a context
    /// before and the pool already holds `max_contexts` distinct ones.
    pub fn acquire(&self, num_predicates: usize, num_rules: usize) -> EngineResult<ContextGuard<'_>> {
        let thread_id = std::thread::current().id();
        if self.max_contexts > 0 && self.contexts.len() >= self.max_contexts && !self.contexts.contains_key(&thread_id) {
            return Err(EngineError::PoolExhausted {
                max_contexts: self.max_contexts,
            });
        }
        let mut entry = self.contexts.entry(thread_id).or_default();
        entry.ensure_capacity(num_predicates, num_rules);
        Ok(ContextGuard { inner: entry })
    }

    /// Number of distinct executor contexts currently held by the pool.
    pub fn shard_count(&self) -> usize {
        self.contexts.len()
    }
}

/// RAII handle to a pooled `EvaluationContext`. The context is reset to a
/// clean state when the guard is dropped, so the next `acquire` on this
/// thread always starts from zero without the caller remembering to call
/// `reset` themselves.
pub struct ContextGuard<'a> {
    inner: RefMut<'a, ThreadId, EvaluationContext>,
}

impl Deref for ContextGuard<'_> {
    type Target = EvaluationContext;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.inner.reset();
    }
}
