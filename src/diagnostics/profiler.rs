use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Instant,
};

use parking_lot::Mutex;

use crate::foundation::config::MAX_CORES;

/// Number of samples in each timer's rolling window.
pub const STATISTICS_WINDOW: usize = 60;

/// Named elapsed-time buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProfileTimer {
    Loop,
    Render,
    Clear,
    VertexShader,
    PrimitiveAssembly,
    TransformToCvv,
    Rasterize,
    FragmentShader,
}

impl ProfileTimer {
    pub const ALL: [Self; 8] = [
        Self::Loop,
        Self::Render,
        Self::Clear,
        Self::VertexShader,
        Self::PrimitiveAssembly,
        Self::TransformToCvv,
        Self::Rasterize,
        Self::FragmentShader,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Named counter buckets. `CoreTasks(i)` counts tasks executed by worker `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProfileCounter {
    VertexCount,
    TaskCount,
    CoreTasks(usize),
}

impl ProfileCounter {
    fn slot(self) -> Option<usize> {
        match self {
            Self::VertexCount => Some(0),
            Self::TaskCount => Some(1),
            Self::CoreTasks(i) if i < MAX_CORES => Some(2 + i),
            Self::CoreTasks(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
struct TimerState {
    started: Option<Instant>,
    samples_ms: [f64; STATISTICS_WINDOW],
    cursor: usize,
    average_ms: f64,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            started: None,
            samples_ms: [0.0; STATISTICS_WINDOW],
            cursor: 0,
            average_ms: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct CounterState {
    current: AtomicU64,
    last: AtomicU64,
    max: AtomicU64,
}

/// Per-stage timings and task/vertex counters for an external overlay.
///
/// Timers are driven by the submitting thread. Counters are atomics because workers bump
/// their per-core task counts concurrently.
#[derive(Debug)]
pub struct Profiler {
    enabled: AtomicBool,
    timers: Mutex<Vec<TimerState>>,
    counters: Vec<CounterState>,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Profiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            timers: Mutex::new(vec![TimerState::default(); ProfileTimer::ALL.len()]),
            counters: (0..2 + MAX_CORES).map(|_| CounterState::default()).collect(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn begin(&self, timer: ProfileTimer) {
        if self.is_enabled() {
            self.timers.lock()[timer.slot()].started = Some(Instant::now());
        }
    }

    /// Accumulate the time since the matching [`Profiler::begin`] into the current sample.
    pub fn end(&self, timer: ProfileTimer) {
        if !self.is_enabled() {
            return;
        }
        let mut timers = self.timers.lock();
        let state = &mut timers[timer.slot()];
        if let Some(started) = state.started.take() {
            let cursor = state.cursor;
            state.samples_ms[cursor] += started.elapsed().as_secs_f64() * 1000.0;
        }
    }

    pub fn measure<R>(&self, timer: ProfileTimer, f: impl FnOnce() -> R) -> R {
        self.begin(timer);
        let out = f();
        self.end(timer);
        out
    }

    pub fn increase(&self, counter: ProfileCounter, amount: u64) {
        if !self.is_enabled() {
            return;
        }
        if let Some(slot) = counter.slot() {
            self.counters[slot]
                .current
                .fetch_add(amount, Ordering::Relaxed);
        }
    }

    /// Count accumulated since the last [`Profiler::update`].
    pub fn count(&self, counter: ProfileCounter) -> u64 {
        counter
            .slot()
            .map(|s| self.counters[s].current.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Count of the most recently completed window.
    pub fn last_count(&self, counter: ProfileCounter) -> u64 {
        counter
            .slot()
            .map(|s| self.counters[s].last.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn max_count(&self, counter: ProfileCounter) -> u64 {
        counter
            .slot()
            .map(|s| self.counters[s].max.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn average_ms(&self, timer: ProfileTimer) -> f64 {
        self.timers.lock()[timer.slot()].average_ms
    }

    /// Time accumulated into the in-progress sample.
    pub fn current_ms(&self, timer: ProfileTimer) -> f64 {
        let timers = self.timers.lock();
        let state = &timers[timer.slot()];
        state.samples_ms[state.cursor]
    }

    /// Close the current sample: recompute averages, roll counters, advance the window.
    pub fn update(&self) {
        let mut timers = self.timers.lock();
        for state in timers.iter_mut() {
            state.average_ms = state.samples_ms.iter().sum::<f64>() / STATISTICS_WINDOW as f64;
            state.cursor = (state.cursor + 1) % STATISTICS_WINDOW;
            state.samples_ms[state.cursor] = 0.0;
        }
        drop(timers);

        for counter in &self.counters {
            let value = counter.current.swap(0, Ordering::Relaxed);
            counter.last.store(value, Ordering::Relaxed);
            counter.max.fetch_max(value, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, cores: usize) -> ProfileSnapshot {
        ProfileSnapshot {
            timers_ms: ProfileTimer::ALL
                .iter()
                .map(|&t| (t, self.average_ms(t)))
                .collect(),
            vertex_count: self.count(ProfileCounter::VertexCount),
            task_count: self.count(ProfileCounter::TaskCount),
            core_tasks: (0..cores.min(MAX_CORES))
                .map(|i| self.count(ProfileCounter::CoreTasks(i)))
                .collect(),
        }
    }
}

/// Serializable view of the profiler for overlays and reports.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProfileSnapshot {
    pub timers_ms: Vec<(ProfileTimer, f64)>,
    pub vertex_count: u64,
    pub task_count: u64,
    pub core_tasks: Vec<u64>,
}

#[cfg(test)]
#[path = "../../tests/unit/diagnostics/profiler.rs"]
mod tests;
