use krono::timer::{PomodoroConfig, PomodoroPhase, TimerEngine, TimerEvent};

fn short_config() -> PomodoroConfig {
    PomodoroConfig {
        work_duration: 2,
        short_break: 1,
        long_break: 3,
        sessions_until_long_break: 2,
        auto_start_breaks: false,
        auto_start_work: false,
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_arrive_once_per_second() {
    let (engine, mut events) = TimerEngine::new();

    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 3 }));

    engine.pause().await;
    assert!(!engine.is_running().await);
    assert_eq!(engine.get_elapsed().await, 3);
}

#[tokio::test(start_paused = true)]
async fn starting_twice_does_not_restart() {
    let (engine, mut events) = TimerEngine::new();

    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
}

#[tokio::test(start_paused = true)]
async fn manual_adjustments_clamp_at_zero() {
    let (engine, mut events) = TimerEngine::new();

    engine.add_seconds(90).await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 90 }));

    engine.add_seconds(-200).await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));
    assert_eq!(engine.get_elapsed().await, 0);
}

#[tokio::test(start_paused = true)]
async fn reset_stops_and_zeroes() {
    let (engine, mut events) = TimerEngine::new();

    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));

    engine.reset().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));
    assert!(!engine.is_running().await);
    assert_eq!(engine.get_elapsed().await, 0);
}

#[tokio::test(start_paused = true)]
async fn pomodoro_cycles_work_short_work_long() {
    let (engine, mut events) = TimerEngine::new();

    engine.enable_pomodoro(short_config()).await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));
    assert_eq!(engine.pomodoro_phase().await, Some(PomodoroPhase::Work));

    // First work phase runs to its 2-second target.
    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::PhaseCompleted {
            phase: PomodoroPhase::ShortBreak,
            completed_count: 1,
        })
    );
    assert!(!engine.is_running().await);
    assert_eq!(engine.get_elapsed().await, 0);

    // The short break.
    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::PhaseCompleted {
            phase: PomodoroPhase::Work,
            completed_count: 1,
        })
    );

    // The second completed work phase triggers the long break.
    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::PhaseCompleted {
            phase: PomodoroPhase::LongBreak,
            completed_count: 2,
        })
    );
    assert_eq!(engine.pomodoro_phase().await, Some(PomodoroPhase::LongBreak));
    assert_eq!(engine.pomodoro_completed_count().await, Some(2));
}

#[tokio::test(start_paused = true)]
async fn skip_break_returns_to_work_at_zero() {
    let (engine, mut events) = TimerEngine::new();

    engine.enable_pomodoro(short_config()).await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));

    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::PhaseCompleted {
            phase: PomodoroPhase::ShortBreak,
            completed_count: 1,
        })
    );

    engine.skip_break().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));
    assert_eq!(engine.pomodoro_phase().await, Some(PomodoroPhase::Work));
    assert_eq!(engine.get_elapsed().await, 0);
}

#[tokio::test(start_paused = true)]
async fn skip_break_is_a_no_op_during_work() {
    let (engine, mut events) = TimerEngine::new();

    engine.enable_pomodoro(short_config()).await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));

    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    engine.skip_break().await;
    assert_eq!(engine.pomodoro_phase().await, Some(PomodoroPhase::Work));
    // The work phase keeps running.
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
}

#[tokio::test(start_paused = true)]
async fn breaks_auto_start_when_configured() {
    let (engine, mut events) = TimerEngine::new();

    engine
        .enable_pomodoro(PomodoroConfig {
            work_duration: 1,
            auto_start_breaks: true,
            ..short_config()
        })
        .await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));

    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::PhaseCompleted {
            phase: PomodoroPhase::ShortBreak,
            completed_count: 1,
        })
    );

    // The break starts on its own after the hand-off delay; with a 1-second
    // break its first tick also completes it. Work does not auto-start.
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::PhaseCompleted {
            phase: PomodoroPhase::Work,
            completed_count: 1,
        })
    );
    assert!(!engine.is_running().await);
}

#[tokio::test(start_paused = true)]
async fn disabling_pomodoro_clears_the_cycle() {
    let (engine, mut events) = TimerEngine::new();

    engine.enable_pomodoro(short_config()).await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 0 }));
    assert_eq!(engine.pomodoro_phase().await, Some(PomodoroPhase::Work));

    engine.disable_pomodoro().await;
    assert_eq!(engine.pomodoro_phase().await, None);

    // Plain timer keeps working past any former phase target.
    engine.start().await;
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 1 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 2 }));
    assert_eq!(events.recv().await, Some(TimerEvent::Tick { elapsed: 3 }));
}
