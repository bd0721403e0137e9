mod engine;
mod pomodoro;
mod state;

pub use engine::{TimerEngine, TimerEvent};
pub use pomodoro::{PomodoroConfig, PomodoroCycle, PomodoroPhase};
pub use state::TimerState;
