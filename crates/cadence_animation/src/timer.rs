//! Repeating timer
//!
//! After an initial delay the timer fires `on_start`, then one iteration per
//! interval until the iteration count is reached. It is driven either by
//! host time through [`Timer::advance`] or by the tokio clock through
//! [`Timer::run`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Called with the zero-based iteration index
pub type IterationCallback = Box<dyn FnMut(u32) + Send>;

/// Called when a run starts or finishes
pub type LifecycleCallback = Box<dyn FnMut() + Send>;

/// Timer options
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimerConfig {
    pub delay_ms: u64,
    /// Period between iterations; clamped to at least 1ms
    pub interval_ms: u64,
    /// Total iterations, `None` repeats until stopped (`"forever"` in TOML)
    #[serde(with = "iterations")]
    pub iterations: Option<u32>,
    /// Start as soon as the timer is created
    pub autostart: bool,
    /// Run the first iteration right after the delay instead of one
    /// interval later
    pub immediate: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            interval_ms: 100,
            iterations: Some(10),
            autostart: true,
            immediate: true,
        }
    }
}

mod iterations {
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FOREVER: &str = "forever";

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(count) => serializer.serialize_u32(*count),
            None => serializer.serialize_str(FOREVER),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Count(u32),
        Word(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Count(count) => Ok(Some(count)),
            Raw::Word(word) if word == FOREVER => Ok(None),
            Raw::Word(word) => Err(de::Error::custom(format!(
                "expected an iteration count or \"{FOREVER}\", got \"{word}\""
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Delay { remaining: Duration },
    Interval { until_next: Duration },
}

pub struct Timer {
    config: TimerConfig,
    phase: Phase,
    iteration: u32,
    on_iteration: Option<IterationCallback>,
    on_start: Option<LifecycleCallback>,
    on_finish: Option<LifecycleCallback>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        let autostart = config.autostart;
        let mut timer = Self {
            config,
            phase: Phase::Idle,
            iteration: 0,
            on_iteration: None,
            on_start: None,
            on_finish: None,
        };
        if autostart {
            timer.start();
        }
        timer
    }

    pub fn on_iteration<F>(mut self, callback: F) -> Self
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.on_iteration = Some(Box::new(callback));
        self
    }

    pub fn on_start<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_finish<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// (Re)start the timer. A run in progress is finished first.
    pub fn start(&mut self) {
        if self.is_running() {
            self.stop();
        }
        tracing::trace!(delay_ms = self.config.delay_ms, "timer started");
        self.phase = Phase::Delay {
            remaining: Duration::from_millis(self.config.delay_ms),
        };
    }

    /// Stop the timer, firing `on_finish` if it was running
    pub fn stop(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.phase = Phase::Idle;
        tracing::trace!(iterations = self.iteration, "timer finished");
        if let Some(callback) = self.on_finish.as_mut() {
            callback();
        }
    }

    pub fn destroy(&mut self) {
        self.stop();
        self.on_iteration = None;
        self.on_start = None;
        self.on_finish = None;
    }

    /// Advance the timer by `elapsed`, firing every callback that falls due
    pub fn advance(&mut self, elapsed: Duration) {
        let mut budget = elapsed;

        loop {
            match self.phase {
                Phase::Idle => return,
                Phase::Delay { remaining } => {
                    if budget < remaining {
                        self.phase = Phase::Delay {
                            remaining: remaining - budget,
                        };
                        return;
                    }
                    budget -= remaining;
                    self.begin();
                }
                Phase::Interval { until_next } => {
                    if budget < until_next {
                        self.phase = Phase::Interval {
                            until_next: until_next - budget,
                        };
                        return;
                    }
                    budget -= until_next;
                    self.phase = Phase::Interval {
                        until_next: self.interval(),
                    };
                    self.fire_iteration();
                }
            }
        }
    }

    /// Time until the next callback falls due, `None` when stopped
    pub fn time_to_next_event(&self) -> Option<Duration> {
        match self.phase {
            Phase::Idle => None,
            Phase::Delay { remaining } => Some(remaining),
            Phase::Interval { until_next } => Some(until_next),
        }
    }

    /// Drive the timer on the tokio clock until it stops
    ///
    /// Each wake-up advances by the time that actually passed, so late
    /// wake-ups do not push later iterations back.
    pub async fn run(&mut self) {
        let mut last = tokio::time::Instant::now();
        while let Some(wait) = self.time_to_next_event() {
            tokio::time::sleep(wait).await;
            let now = tokio::time::Instant::now();
            self.advance(now.duration_since(last));
            last = now;
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Number of iterations fired in the current (or last) run
    pub fn current_iteration(&self) -> u32 {
        self.iteration
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.config.interval_ms.max(1))
    }

    fn begin(&mut self) {
        if let Some(callback) = self.on_start.as_mut() {
            callback();
        }

        self.iteration = 0;
        self.phase = Phase::Interval {
            until_next: self.interval(),
        };

        if self.exhausted() {
            self.stop();
            return;
        }

        if self.config.immediate {
            self.fire_iteration();
        }
    }

    fn fire_iteration(&mut self) {
        let iteration = self.iteration;
        if let Some(callback) = self.on_iteration.as_mut() {
            callback(iteration);
        }
        self.iteration = self.iteration.saturating_add(1);

        if self.exhausted() {
            self.stop();
        }
    }

    fn exhausted(&self) -> bool {
        self.config
            .iterations
            .is_some_and(|total| self.iteration >= total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl Log {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    fn logged_timer(config: TimerConfig, log: &Log) -> Timer {
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        Timer::new(config)
            .on_start(move || a.push("start"))
            .on_iteration(move |i| b.push(format!("tick {i}")))
            .on_finish(move || c.push("finish"))
    }

    #[test]
    fn test_fires_exact_iteration_count() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                delay_ms: 50,
                interval_ms: 10,
                iterations: Some(3),
                ..Default::default()
            },
            &log,
        );

        timer.advance(Duration::from_millis(49));
        assert!(log.entries().is_empty());
        assert!(timer.is_running());

        timer.advance(Duration::from_millis(1));
        assert_eq!(log.entries(), vec!["start", "tick 0"]);

        timer.advance(Duration::from_millis(100));
        assert_eq!(
            log.entries(),
            vec!["start", "tick 0", "tick 1", "tick 2", "finish"]
        );
        assert!(!timer.is_running());
        assert_eq!(timer.current_iteration(), 3);
    }

    #[test]
    fn test_not_immediate_waits_one_interval() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                interval_ms: 20,
                iterations: Some(2),
                immediate: false,
                ..Default::default()
            },
            &log,
        );

        timer.advance(Duration::ZERO);
        assert_eq!(log.entries(), vec!["start"]);

        timer.advance(Duration::from_millis(19));
        assert_eq!(log.entries(), vec!["start"]);

        timer.advance(Duration::from_millis(1));
        assert_eq!(log.entries(), vec!["start", "tick 0"]);

        timer.advance(Duration::from_millis(20));
        assert_eq!(log.entries(), vec!["start", "tick 0", "tick 1", "finish"]);
    }

    #[test]
    fn test_single_iteration_immediate() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                iterations: Some(1),
                ..Default::default()
            },
            &log,
        );
        timer.advance(Duration::from_secs(5));
        assert_eq!(log.entries(), vec!["start", "tick 0", "finish"]);
    }

    #[test]
    fn test_zero_iterations() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                iterations: Some(0),
                ..Default::default()
            },
            &log,
        );
        timer.advance(Duration::ZERO);
        assert_eq!(log.entries(), vec!["start", "finish"]);
    }

    #[test]
    fn test_no_autostart() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                autostart: false,
                ..Default::default()
            },
            &log,
        );
        assert!(!timer.is_running());
        timer.advance(Duration::from_secs(1));
        assert!(log.entries().is_empty());

        timer.start();
        timer.advance(Duration::ZERO);
        assert_eq!(log.entries(), vec!["start", "tick 0"]);
    }

    #[test]
    fn test_restart_finishes_previous_run() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                interval_ms: 10,
                iterations: None,
                ..Default::default()
            },
            &log,
        );
        timer.advance(Duration::from_millis(15));
        timer.start();
        timer.advance(Duration::ZERO);

        assert_eq!(
            log.entries(),
            vec!["start", "tick 0", "tick 1", "finish", "start", "tick 0"]
        );
    }

    #[test]
    fn test_stop_fires_finish_once() {
        let log = Log::default();
        let mut timer = logged_timer(TimerConfig::default(), &log);
        timer.stop();
        timer.stop();
        timer.destroy();
        assert_eq!(log.entries(), vec!["finish"]);
        assert_eq!(timer.time_to_next_event(), None);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                interval_ms: 0,
                iterations: None,
                ..Default::default()
            },
            &log,
        );
        timer.advance(Duration::from_millis(3));
        // start, immediate tick 0, then ticks at 1ms, 2ms and 3ms
        assert_eq!(log.entries().len(), 5);
        assert!(timer.is_running());
    }

    #[test]
    fn test_endless_counter_saturates() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                interval_ms: 1,
                iterations: None,
                ..Default::default()
            },
            &log,
        );
        timer.advance(Duration::ZERO);
        timer.iteration = u32::MAX - 1;

        timer.advance(Duration::from_millis(3));
        assert_eq!(timer.current_iteration(), u32::MAX);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_absorbs_late_wakeup() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                delay_ms: 100,
                interval_ms: 50,
                iterations: Some(3),
                ..Default::default()
            },
            &log,
        );

        let started = tokio::time::Instant::now();
        // Wake the delay sleep 30ms late; the schedule keeps its 100/150/200ms slots
        tokio::join!(timer.run(), tokio::time::advance(Duration::from_millis(130)));

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(210), "{elapsed:?}");
        assert_eq!(
            log.entries(),
            vec!["start", "tick 0", "tick 1", "tick 2", "finish"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_on_tokio_clock() {
        let log = Log::default();
        let mut timer = logged_timer(
            TimerConfig {
                delay_ms: 100,
                interval_ms: 250,
                iterations: Some(4),
                ..Default::default()
            },
            &log,
        );

        let started = tokio::time::Instant::now();
        timer.run().await;

        // delay + three intervals after the immediate iteration
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(850), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(860), "{elapsed:?}");
        assert_eq!(
            log.entries(),
            vec!["start", "tick 0", "tick 1", "tick 2", "tick 3", "finish"]
        );
    }
}
