use std::sync::Arc;

use log::warn;
use serde::Serialize;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::{self, Duration, Instant, MissedTickBehavior},
};

use super::{
    pomodoro::{PomodoroConfig, PomodoroCycle, PomodoroPhase},
    state::TimerState,
};

/// Delay before an auto-started phase begins running, giving the UI a moment
/// to transition.
const AUTO_START_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum TimerEvent {
    /// Emitted once per second while running, and immediately after resets
    /// and manual adjustments.
    Tick { elapsed: u64 },
    /// Emitted every time a Pomodoro phase completes, whether or not the next
    /// phase auto-starts. `phase` is the phase being entered.
    #[serde(rename_all = "camelCase")]
    PhaseCompleted {
        phase: PomodoroPhase,
        completed_count: u32,
    },
}

struct EngineState {
    timer: TimerState,
    pomodoro: Option<PomodoroCycle>,
    ticker: Option<JoinHandle<()>>,
}

/// In-memory elapsed-time engine with an optional Pomodoro overlay.
///
/// A single ticker task samples the anchor-derived elapsed value once per
/// second while running and emits [`TimerEvent`]s on the channel handed out
/// by [`TimerEngine::new`]. Handles are cheap to clone; all of them drive the
/// same state.
#[derive(Clone)]
pub struct TimerEngine {
    state: Arc<Mutex<EngineState>>,
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let engine = Self {
            state: Arc::new(Mutex::new(EngineState {
                timer: TimerState::new(),
                pomodoro: None,
                ticker: None,
            })),
            events,
        };
        (engine, receiver)
    }

    /// No-op if already running.
    pub async fn start(&self) {
        let mut guard = self.state.lock().await;
        if guard.timer.is_running() {
            return;
        }
        guard.timer.start(Instant::now());
        self.spawn_ticker(&mut guard);
    }

    /// No-op if not running; elapsed freezes at its last computed value.
    pub async fn pause(&self) {
        let mut guard = self.state.lock().await;
        if !guard.timer.is_running() {
            return;
        }
        guard.timer.pause(Instant::now());
        if let Some(handle) = guard.ticker.take() {
            handle.abort();
        }
    }

    pub async fn reset(&self) {
        let mut guard = self.state.lock().await;
        guard.timer.reset(Instant::now());
        if let Some(handle) = guard.ticker.take() {
            handle.abort();
        }
        self.emit(TimerEvent::Tick { elapsed: 0 });
    }

    /// Adjusts elapsed by `delta` seconds (clamped at zero) and emits the new
    /// value immediately.
    pub async fn add_seconds(&self, delta: i64) {
        let mut guard = self.state.lock().await;
        let elapsed = guard.timer.add_seconds(delta, Instant::now());
        self.emit(TimerEvent::Tick { elapsed });
    }

    pub async fn get_elapsed(&self) -> u64 {
        self.state.lock().await.timer.elapsed_at(Instant::now())
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.timer.is_running()
    }

    /// Switches the engine into Pomodoro mode: phase `work`, completed count
    /// zero, elapsed cleared, paused awaiting start.
    pub async fn enable_pomodoro(&self, config: PomodoroConfig) {
        let mut guard = self.state.lock().await;
        guard.pomodoro = Some(PomodoroCycle::new(config));
        guard.timer.reset(Instant::now());
        if let Some(handle) = guard.ticker.take() {
            handle.abort();
        }
        self.emit(TimerEvent::Tick { elapsed: 0 });
    }

    pub async fn disable_pomodoro(&self) {
        self.state.lock().await.pomodoro = None;
    }

    pub async fn pomodoro_phase(&self) -> Option<PomodoroPhase> {
        self.state
            .lock()
            .await
            .pomodoro
            .as_ref()
            .map(|cycle| cycle.phase)
    }

    pub async fn pomodoro_completed_count(&self) -> Option<u32> {
        self.state
            .lock()
            .await
            .pomodoro
            .as_ref()
            .map(|cycle| cycle.completed_count)
    }

    /// Forcibly returns to the work phase with elapsed cleared. Only
    /// meaningful during a break phase.
    pub async fn skip_break(&self) {
        let mut guard = self.state.lock().await;
        let now = Instant::now();
        let state = &mut *guard;
        let Some(cycle) = state.pomodoro.as_mut() else {
            return;
        };
        if !cycle.skip_break() {
            return;
        }
        let elapsed = state.timer.elapsed_at(now);
        state.timer.add_seconds(-(elapsed as i64), now);
        self.emit(TimerEvent::Tick { elapsed: 0 });
    }

    fn spawn_ticker(&self, state: &mut EngineState) {
        if let Some(handle) = state.ticker.take() {
            handle.abort();
        }

        let engine = self.clone();
        state.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !engine.on_tick().await {
                    break;
                }
            }
        }));
    }

    /// One sampling step. Returns whether the ticker should keep going.
    async fn on_tick(&self) -> bool {
        let mut guard = self.state.lock().await;
        if !guard.timer.is_running() {
            return false;
        }

        let now = Instant::now();
        guard.timer.sync(now);
        let elapsed = guard.timer.elapsed_at(now);
        self.emit(TimerEvent::Tick { elapsed });

        let state = &mut *guard;
        let Some(cycle) = state.pomodoro.as_mut() else {
            return true;
        };
        if elapsed < cycle.phase_target() {
            return true;
        }

        // Phase complete: pause, clear elapsed, advance the cycle.
        state.timer.reset(now);
        let phase = cycle.complete_phase();
        let completed_count = cycle.completed_count;
        let auto_start = cycle.auto_start_next();
        self.emit(TimerEvent::PhaseCompleted {
            phase,
            completed_count,
        });

        if auto_start {
            let engine = self.clone();
            tokio::spawn(async move {
                time::sleep(AUTO_START_DELAY).await;
                engine.start().await;
            });
        }

        false
    }

    fn emit(&self, event: TimerEvent) {
        if self.events.send(event).is_err() {
            warn!("timer event receiver dropped");
        }
    }
}
