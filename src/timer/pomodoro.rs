use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

/// All durations are whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroConfig {
    pub work_duration: u64,
    pub short_break: u64,
    pub long_break: u64,
    pub sessions_until_long_break: u32,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_duration: 1_500,
            short_break: 300,
            long_break: 900,
            sessions_until_long_break: 4,
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

/// Phase-cycling state of the Pomodoro overlay: `work` alternates with a
/// short break, and every `sessions_until_long_break`-th completed work phase
/// leads into a long break instead.
#[derive(Debug, Clone)]
pub struct PomodoroCycle {
    pub config: PomodoroConfig,
    pub phase: PomodoroPhase,
    pub completed_count: u32,
}

impl PomodoroCycle {
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            config,
            phase: PomodoroPhase::Work,
            completed_count: 0,
        }
    }

    /// Target duration of the current phase, in seconds.
    pub fn phase_target(&self) -> u64 {
        match self.phase {
            PomodoroPhase::Work => self.config.work_duration,
            PomodoroPhase::ShortBreak => self.config.short_break,
            PomodoroPhase::LongBreak => self.config.long_break,
        }
    }

    /// Advances past the phase that just finished and returns the new phase.
    /// Completing a work phase increments the completed count.
    pub fn complete_phase(&mut self) -> PomodoroPhase {
        self.phase = match self.phase {
            PomodoroPhase::Work => {
                self.completed_count += 1;
                let until_long = self.config.sessions_until_long_break;
                if until_long > 0 && self.completed_count % until_long == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Work,
        };
        self.phase
    }

    /// Whether the phase just entered should start automatically.
    pub fn auto_start_next(&self) -> bool {
        match self.phase {
            PomodoroPhase::Work => self.config.auto_start_work,
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => {
                self.config.auto_start_breaks
            }
        }
    }

    /// Forcibly returns to the work phase. Only meaningful during a break;
    /// returns whether anything changed.
    pub fn skip_break(&mut self) -> bool {
        match self.phase {
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => {
                self.phase = PomodoroPhase::Work;
                true
            }
            PomodoroPhase::Work => false,
        }
    }
}
