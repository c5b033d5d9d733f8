//! Prefetch cache for the frame sequence.
//!
//! Slots move forward only: absent → Pending → Loaded | Failed. A slot is
//! claimed before its load is spawned, so an index never has two loads in
//! flight. Completions are keyed by index and may arrive in any order.
//! Loads are never retried and never time out; a hung load leaves its frame
//! on the placeholder forever.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use scrollreel_core::{
    FrameHandle, FrameIndex, FrameResolver, PrefetchPlan, ReelError, ReelResult,
};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::loader::FrameLoader;

/// State of one frame in the cache.
#[derive(Debug, Clone)]
pub enum FrameSlot {
    Pending,
    Loaded(FrameHandle),
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

struct CacheInner {
    slots: DashMap<FrameIndex, FrameSlot>,
    resolver: FrameResolver,
    loader: Arc<dyn FrameLoader>,
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    warmed: AtomicBool,
    idle: Notify,
}

/// Shared, cheaply cloneable handle to the frame cache.
///
/// Only the cache's own load completions write to it; everything else reads.
#[derive(Clone)]
pub struct PrefetchCache {
    inner: Arc<CacheInner>,
}

impl PrefetchCache {
    pub fn new(resolver: FrameResolver, loader: Arc<dyn FrameLoader>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                slots: DashMap::new(),
                resolver,
                loader,
                requests: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                warmed: AtomicBool::new(false),
                idle: Notify::new(),
            }),
        }
    }

    pub fn total(&self) -> u32 {
        self.inner.resolver.total()
    }

    /// Start loading `index` unless it already has a slot.
    ///
    /// Returns `Ok(true)` if a load was issued. Outside a Tokio runtime nothing
    /// is claimed and an error is returned.
    pub fn request(&self, index: FrameIndex) -> ReelResult<bool> {
        let total = self.total();
        if index.get() > total {
            return Err(ReelError::out_of_range(index.get(), total));
        }
        let runtime = current_runtime()?;

        match self.inner.slots.entry(index) {
            Entry::Occupied(_) => return Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(FrameSlot::Pending);
            }
        }
        self.inner.requests.fetch_add(1, Ordering::SeqCst);
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);

        let location = self.inner.resolver.location(index);
        let loader = self.inner.loader.clone();
        let cache = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            // The load runs in its own task so a panicking loader surfaces as a
            // JoinError here and the slot still leaves Pending.
            let load = tokio::spawn(async move { loader.load(index, &location).await });
            let result = match load.await {
                Ok(result) => result,
                Err(e) => Err(ReelError::load(index.get(), format!("load task failed: {}", e))),
            };
            // The session may be gone; the result is then simply dropped.
            if let Some(inner) = cache.upgrade() {
                inner.complete(index, result.map(|fb| FrameHandle::new(index, fb)));
            }
        });
        Ok(true)
    }

    /// Non-blocking lookup; `None` unless the frame has loaded.
    pub fn get(&self, index: FrameIndex) -> Option<FrameHandle> {
        match self.inner.slots.get(&index)?.value() {
            FrameSlot::Loaded(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn state(&self, index: FrameIndex) -> Option<FrameSlot> {
        self.inner.slots.get(&index).map(|s| s.value().clone())
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for slot in self.inner.slots.iter() {
            match slot.value() {
                FrameSlot::Pending => stats.pending += 1,
                FrameSlot::Loaded(_) => stats.loaded += 1,
                FrameSlot::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }

    /// Number of underlying loads ever issued.
    pub fn requests_issued(&self) -> usize {
        self.inner.requests.load(Ordering::SeqCst)
    }

    /// Issue the immediate tier now and schedule the deferred tier.
    ///
    /// Only the first call per cache does anything; later calls return an
    /// empty handle. Fails without side effects outside a Tokio runtime.
    pub fn warm(&self, plan: &PrefetchPlan) -> ReelResult<WarmHandle> {
        let runtime = current_runtime()?;
        if self.inner.warmed.swap(true, Ordering::SeqCst) {
            tracing::debug!("prefetch cache already warmed");
            return Ok(WarmHandle { deferred: None });
        }

        tracing::info!(
            immediate = plan.immediate.len(),
            deferred = plan.deferred.len(),
            delay_ms = plan.delay.as_millis() as u64,
            "warming frame cache"
        );
        self.request_all(&plan.immediate);

        if plan.deferred.is_empty() {
            return Ok(WarmHandle { deferred: None });
        }

        let cache = Arc::downgrade(&self.inner);
        let deferred = plan.deferred.clone();
        let delay = plan.delay;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = Weak::upgrade(&cache) {
                tracing::debug!(frames = deferred.len(), "issuing deferred prefetch tier");
                PrefetchCache { inner }.request_all(&deferred);
            }
        });
        Ok(WarmHandle {
            deferred: Some(handle),
        })
    }

    /// Wait until no load is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.inner.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    fn request_all(&self, indices: &[FrameIndex]) {
        for &index in indices {
            if let Err(e) = self.request(index) {
                tracing::warn!("skipping prefetch of frame {}: {}", index.get(), e);
            }
        }
    }
}

fn current_runtime() -> ReelResult<Handle> {
    Handle::try_current()
        .map_err(|_| ReelError::Other("frame loads require a Tokio runtime".into()))
}

impl CacheInner {
    fn complete(&self, index: FrameIndex, result: ReelResult<FrameHandle>) {
        if let Some(mut slot) = self.slots.get_mut(&index) {
            if matches!(*slot, FrameSlot::Pending) {
                *slot = match result {
                    Ok(handle) => {
                        tracing::debug!(frame = index.get(), "frame loaded");
                        FrameSlot::Loaded(handle)
                    }
                    Err(e) => {
                        tracing::warn!("frame {} failed to load: {}", index.get(), e);
                        FrameSlot::Failed(e.to_string())
                    }
                };
            }
        }
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Handle to the deferred prefetch tier of one warm-up.
#[derive(Debug)]
pub struct WarmHandle {
    deferred: Option<JoinHandle<()>>,
}

impl WarmHandle {
    /// True while the deferred tier has not been issued yet.
    pub fn is_deferred_pending(&self) -> bool {
        self.deferred.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Drop the deferred tier if its timer has not fired. Loads already in
    /// flight are left alone.
    pub fn cancel_deferred(&mut self) {
        if let Some(handle) = self.deferred.take() {
            if !handle.is_finished() {
                tracing::debug!("cancelling deferred prefetch tier");
            }
            handle.abort();
        }
    }

    /// Wait until the deferred tier has been issued (or cancelled).
    pub async fn deferred_issued(&mut self) {
        if let Some(handle) = self.deferred.take() {
            let _ = handle.await;
        }
    }
}
