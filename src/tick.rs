//! What a state machine sees while handling a due task.

use crate::config::GameConfig;
use crate::scheduler::TaskQueue;
use crate::sinks::{AudioSink, Cue, UiSignal, UiSink};
use std::time::Duration;

/// Borrowed view of the world's services for one dispatch.
///
/// `now` is the due time of the task being handled, not the wall clock, so
/// catch-up ticks see the time they were meant to run at.
pub struct TickContext<'a> {
    pub now: Duration,
    pub config: &'a GameConfig,
    pub tasks: &'a mut TaskQueue,
    pub audio: &'a mut dyn AudioSink,
    pub ui: &'a mut dyn UiSink,
}

impl TickContext<'_> {
    /// Plays a cue at its standard volume.
    pub fn play(&mut self, cue: Cue) {
        self.audio.play(cue, cue.volume());
    }

    pub fn play_looped(&mut self, cue: Cue) {
        self.audio.play_looped(cue, cue.volume());
    }

    pub fn stop(&mut self, cue: Cue) {
        self.audio.stop(cue);
    }

    pub fn signal(&mut self, signal: UiSignal) {
        self.ui.signal(signal);
    }
}

/// Owned services for driving one state machine in unit tests.
#[cfg(test)]
pub(crate) struct Harness {
    pub config: GameConfig,
    pub tasks: TaskQueue,
    pub audio: crate::sinks::AudioLog,
    pub ui: crate::sinks::SignalLog,
}

#[cfg(test)]
impl Harness {
    pub fn new() -> Self {
        Harness {
            config: GameConfig::default(),
            tasks: TaskQueue::new(),
            audio: crate::sinks::AudioLog::new(),
            ui: crate::sinks::SignalLog::new(),
        }
    }

    pub fn ctx(&mut self, now: Duration) -> TickContext<'_> {
        TickContext {
            now,
            config: &self.config,
            tasks: &mut self.tasks,
            audio: &mut self.audio,
            ui: &mut self.ui,
        }
    }

    /// Pops the next task due by `until`, returning it with its due time.
    pub fn next_due(&mut self, until: Duration) -> Option<(crate::scheduler::Task, Duration)> {
        self.tasks.pop_due(until).map(|due| (due.task, due.at))
    }
}
