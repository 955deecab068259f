//! Unified animation loop
//!
//! Many independent per-frame loops cost more than one loop fanning out to
//! every subscriber, so UI code shares a single [`AnimationLoop`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::timing::FrameClock;

new_key_type! {
    /// Handle returned by [`AnimationLoop::subscribe`]
    pub struct SubscriptionId;
}

/// Per-frame callback receiving `(time_ms, delta_ms)`
pub type FrameCallback = Box<dyn FnMut(f64, f64) + Send>;

/// Animation loop options
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Log the subscription count and running state periodically
    pub debug: bool,
    /// Start on the first subscription, stop when the last one leaves
    pub auto_start: bool,
    /// Frame rate used by [`AnimationLoop::run`]
    pub target_fps: u32,
    /// Frame time between two debug reports
    pub debug_interval_ms: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            debug: false,
            auto_start: true,
            target_fps: 60,
            debug_interval_ms: 2000.0,
        }
    }
}

/// Lets a subscriber (or another task) stop a loop it cannot borrow.
///
/// The request is applied at the end of the frame being delivered.
#[derive(Clone, Debug, Default)]
pub struct LoopHandle {
    stop_requested: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.stop_requested.swap(false, Ordering::AcqRel)
    }
}

/// A single frame loop shared by many subscribers
pub struct AnimationLoop {
    config: LoopConfig,
    callbacks: SlotMap<SubscriptionId, FrameCallback>,
    /// Subscription order; slot reuse makes slotmap iteration order unstable
    order: Vec<SubscriptionId>,
    running: bool,
    last_frame: Option<f64>,
    last_report: Option<f64>,
    status_reports: usize,
    handle: LoopHandle,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    pub fn with_config(config: LoopConfig) -> Self {
        tracing::debug!(?config, "new AnimationLoop");
        Self {
            config,
            callbacks: SlotMap::with_key(),
            order: Vec::new(),
            running: false,
            last_frame: None,
            last_report: None,
            status_reports: 0,
            handle: LoopHandle::default(),
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Handle that stops this loop from inside a callback
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Subscribe to the loop
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(f64, f64) + Send + 'static,
    {
        let id = self.callbacks.insert(Box::new(callback));
        self.order.push(id);

        if self.config.debug {
            tracing::debug!(subscriptions = self.order.len(), "AnimationLoop subscribe");
        }

        if self.config.auto_start && self.order.len() == 1 && !self.running {
            self.start();
        }

        id
    }

    /// Unsubscribe from the loop. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.callbacks.remove(id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);

        if self.config.debug {
            tracing::debug!(subscriptions = self.order.len(), "AnimationLoop unsubscribe");
        }

        if self.config.auto_start && self.order.is_empty() {
            self.stop();
        }

        true
    }

    /// Start the loop. The first frame after a start has a zero delta.
    pub fn start(&mut self) {
        self.running = true;
        self.last_frame = None;
        self.handle.take();
        self.report("started");
    }

    /// Stop the loop; frames delivered while stopped are ignored
    pub fn stop(&mut self) {
        self.running = false;
        self.report("stopped");
    }

    /// Stop and drop every subscription
    pub fn destroy(&mut self) {
        self.stop();
        self.callbacks.clear();
        self.order.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn subscription_count(&self) -> usize {
        self.order.len()
    }

    /// Deliver a frame at `time_ms` to every subscriber in subscription order
    pub fn on_frame(&mut self, time_ms: f64) {
        if !self.running {
            return;
        }

        let delta = self.last_frame.map_or(0.0, |previous| time_ms - previous);

        for id in &self.order {
            if let Some(callback) = self.callbacks.get_mut(*id) {
                callback(time_ms, delta);
            }
        }

        self.last_frame = Some(time_ms);

        if self.config.debug {
            let due = self
                .last_report
                .map_or(true, |at| time_ms - at >= self.config.debug_interval_ms);
            if due {
                self.last_report = Some(time_ms);
                self.status_reports += 1;
                self.report("status");
            }
        }

        if self.handle.take() {
            self.stop();
        }
    }

    /// Drive the loop at the configured `target_fps` until it stops
    pub async fn run(&mut self) {
        let mut clock = FrameClock::from_config(&self.config);
        self.run_with(&mut clock).await;
    }

    /// Drive the loop from an existing `clock` until it stops
    pub async fn run_with(&mut self, clock: &mut FrameClock) {
        while self.running {
            let time_ms = clock.next_frame().await;
            self.on_frame(time_ms);
        }
    }

    /// Periodic status reports emitted so far
    pub(crate) fn status_reports(&self) -> usize {
        self.status_reports
    }

    fn report(&self, event: &str) {
        if !self.config.debug {
            return;
        }
        tracing::debug!(
            "[AnimationLoop] {}: {} subscriptions. loop is {}running.",
            event,
            self.order.len(),
            if self.running { "" } else { "NOT " }
        );
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<(f64, f64)>>>, impl FnMut(f64, f64) + Send + 'static) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = frames.clone();
        (frames, move |time, delta| sink.lock().unwrap().push((time, delta)))
    }

    #[test]
    fn test_auto_start_on_first_subscription() {
        let mut frame_loop = AnimationLoop::new();
        assert!(!frame_loop.is_running());

        let id = frame_loop.subscribe(|_, _| {});
        assert!(frame_loop.is_running());

        assert!(frame_loop.unsubscribe(id));
        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.subscription_count(), 0);
    }

    #[test]
    fn test_manual_start_when_auto_start_disabled() {
        let mut frame_loop = AnimationLoop::with_config(LoopConfig {
            auto_start: false,
            ..Default::default()
        });
        let (frames, callback) = recorder();
        let id = frame_loop.subscribe(callback);
        assert!(!frame_loop.is_running());

        frame_loop.on_frame(16.0);
        assert!(frames.lock().unwrap().is_empty());

        frame_loop.start();
        frame_loop.on_frame(32.0);
        assert_eq!(frames.lock().unwrap().len(), 1);

        // Removing the last subscription does not stop a manual loop
        frame_loop.unsubscribe(id);
        assert!(frame_loop.is_running());
    }

    #[test]
    fn test_deltas_between_frames() {
        let mut frame_loop = AnimationLoop::new();
        let (frames, callback) = recorder();
        frame_loop.subscribe(callback);

        frame_loop.on_frame(100.0);
        frame_loop.on_frame(116.0);
        frame_loop.on_frame(150.0);

        assert_eq!(
            *frames.lock().unwrap(),
            vec![(100.0, 0.0), (116.0, 16.0), (150.0, 34.0)]
        );
    }

    #[test]
    fn test_restart_resets_delta() {
        let mut frame_loop = AnimationLoop::new();
        let (frames, callback) = recorder();
        frame_loop.subscribe(callback);

        frame_loop.on_frame(10.0);
        frame_loop.stop();
        frame_loop.on_frame(20.0);
        frame_loop.start();
        frame_loop.on_frame(500.0);

        assert_eq!(*frames.lock().unwrap(), vec![(10.0, 0.0), (500.0, 0.0)]);
    }

    #[test]
    fn test_subscription_order_survives_slot_reuse() {
        let mut frame_loop = AnimationLoop::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let calls = calls.clone();
            ids.push(frame_loop.subscribe(move |_, _| calls.lock().unwrap().push(name)));
        }
        frame_loop.unsubscribe(ids[0]);
        let late = calls.clone();
        frame_loop.subscribe(move |_, _| late.lock().unwrap().push("d"));

        frame_loop.on_frame(0.0);
        assert_eq!(*calls.lock().unwrap(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let mut frame_loop = AnimationLoop::new();
        let id = frame_loop.subscribe(|_, _| {});
        let _keep = frame_loop.subscribe(|_, _| {});
        assert!(frame_loop.unsubscribe(id));
        assert!(!frame_loop.unsubscribe(id));
        assert!(frame_loop.is_running());
    }

    #[test]
    fn test_handle_stops_from_callback() {
        let mut frame_loop = AnimationLoop::new();
        let handle = frame_loop.handle();
        let count = Arc::new(Mutex::new(0));
        let seen = count.clone();
        frame_loop.subscribe(move |_, _| {
            let mut n = seen.lock().unwrap();
            *n += 1;
            if *n == 3 {
                handle.stop();
            }
        });

        for frame in 0..10 {
            frame_loop.on_frame(frame as f64 * 16.0);
        }

        assert_eq!(*count.lock().unwrap(), 3);
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn test_debug_status_throttled_by_frame_time() {
        let mut frame_loop = AnimationLoop::with_config(LoopConfig {
            debug: true,
            debug_interval_ms: 100.0,
            ..Default::default()
        });
        frame_loop.subscribe(|_, _| {});

        // 0..=496ms at 16ms: reports at 0, 112, 224, 336 and 448
        for frame in 0..32 {
            frame_loop.on_frame(frame as f64 * 16.0);
        }
        assert_eq!(frame_loop.status_reports(), 5);
    }

    #[test]
    fn test_no_status_reports_without_debug() {
        let mut frame_loop = AnimationLoop::new();
        frame_loop.subscribe(|_, _| {});
        for frame in 0..32 {
            frame_loop.on_frame(frame as f64 * 16.0);
        }
        assert_eq!(frame_loop.status_reports(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_uses_target_fps() {
        let mut frame_loop = AnimationLoop::with_config(LoopConfig {
            target_fps: 50,
            ..Default::default()
        });
        let handle = frame_loop.handle();
        let (frames, mut record) = recorder();
        frame_loop.subscribe(move |time, delta| {
            record(time, delta);
            if time >= 59.0 {
                handle.stop();
            }
        });

        frame_loop.run().await;

        let frames = frames.lock().unwrap();
        let times: Vec<f64> = frames.iter().map(|(time, _)| *time).collect();
        assert_eq!(times.len(), 3);
        for (time, expected) in times.iter().zip([20.0, 40.0, 60.0]) {
            assert!((time - expected).abs() < 1e-3, "frame at {time}");
        }
    }

    #[test]
    fn test_destroy_clears_subscriptions() {
        let mut frame_loop = AnimationLoop::with_config(LoopConfig {
            debug: true,
            ..Default::default()
        });
        frame_loop.subscribe(|_, _| {});
        frame_loop.subscribe(|_, _| {});
        frame_loop.destroy();

        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.subscription_count(), 0);
    }
}
