//! Early-stop signals sampled once per product page.

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use sysinfo::System;
use tracing::{debug, warn};

/// Decides whether the driver should stop starting new pages.
///
/// Implementations only read the signal they observe; they never mutate
/// pipeline state.
pub trait StopCondition {
    fn should_stop(&self) -> bool;

    /// Short human readable reading for progress output, e.g. `Memory 42.0%`.
    fn describe(&self) -> Option<String> {
        None
    }
}

impl<F> StopCondition for F
where
    F: Fn() -> bool,
{
    fn should_stop(&self) -> bool {
        self()
    }
}

/// Never stops; the run ends when every listed page has been processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStop;

impl StopCondition for NeverStop {
    fn should_stop(&self) -> bool {
        false
    }
}

type MemorySampler = Box<dyn Fn() -> Option<f64> + Send + Sync>;

/// Stops when system memory utilisation reaches a threshold percentage.
///
/// Samples through `sysinfo`. If memory cannot be read the signal reads as
/// "no pressure", and that is logged once.
pub struct MemoryPressure {
    threshold_percent: f64,
    sampler: MemorySampler,
    unavailable_logged: AtomicBool,
}

impl MemoryPressure {
    pub fn new(threshold_percent: f64) -> Self {
        let system = Mutex::new(System::new());
        Self::with_sampler(threshold_percent, move || {
            let mut system = system.lock().ok()?;
            system.refresh_memory();
            used_percent(system.used_memory(), system.total_memory())
        })
    }

    /// Uses `sampler` instead of the live system reading.
    pub fn with_sampler<F>(threshold_percent: f64, sampler: F) -> Self
    where
        F: Fn() -> Option<f64> + Send + Sync + 'static,
    {
        Self {
            threshold_percent,
            sampler: Box::new(sampler),
            unavailable_logged: AtomicBool::new(false),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold_percent
    }

    /// Current memory utilisation percentage, if it can be read.
    pub fn sample(&self) -> Option<f64> {
        let used = (self.sampler)();
        if used.is_none() && !self.unavailable_logged.swap(true, Ordering::Relaxed) {
            warn!("Memory usage is unavailable on this host, the memory threshold will not stop the run");
        }
        used
    }
}

impl fmt::Debug for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPressure")
            .field("threshold_percent", &self.threshold_percent)
            .finish_non_exhaustive()
    }
}

impl StopCondition for MemoryPressure {
    fn should_stop(&self) -> bool {
        match self.sample() {
            Some(used) if used >= self.threshold_percent => {
                debug!(
                    "Memory at {:.1}% (threshold {:.1}%)",
                    used, self.threshold_percent
                );
                true
            }
            _ => false,
        }
    }

    fn describe(&self) -> Option<String> {
        self.sample().map(|used| format!("Memory {:.1}%", used))
    }
}

/// `used / total` as a percentage; `None` when the total is unknown.
pub fn used_percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some((used as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
}
