use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-flight flag. Classification passes share one process-wide; the
/// scheduler keeps one per platform so warmups never overlap.
///
/// Callers that fail to acquire it skip their run; nothing is queued.
#[derive(Debug, Clone, Default)]
pub struct ClassificationGate {
    running: Arc<AtomicBool>,
}

impl ClassificationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag from idle to running. Returns `false` if a pass already
    /// holds it.
    #[must_use]
    pub fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn end(&self) {
        self.running.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Scoped variant of [`try_start`](Self::try_start): the flag is released
    /// when the guard drops, on every exit path.
    #[must_use]
    pub fn try_acquire(&self) -> Option<GateGuard> {
        self.try_start().then(|| GateGuard { gate: self.clone() })
    }
}

#[derive(Debug)]
pub struct GateGuard {
    gate: ClassificationGate,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate.end();
    }
}
