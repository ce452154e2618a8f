//! Cooperative task scheduler
//!
//! All "concurrency" in the game is the interleaving of independently
//! scheduled periodic tasks (physics, movement, animation, world logic) and
//! one-shot delays (death and victory sequences). The scheduler is a registry
//! of those tasks, owned by the world:
//!
//! - `every()` / `after()` register a task and hand back a [`TaskId`]
//! - `cancel()` stops exactly one task; `cancel_all()` stops everything
//! - `pop_due()` yields due tasks one at a time in time order
//!
//! # Dispatch order
//!
//! The world dispatches each due task before asking for the next one. A task
//! may cancel other tasks or schedule new ones while it runs, and the next
//! `pop_due()` sees those changes immediately. No list of tasks is ever held
//! across a dispatch, so nothing is mutated while being iterated.
//!
//! Tasks are plain data ([`Task`]); the world maps each one to the entity
//! method it stands for.

use crate::entity::EntityId;
use std::time::Duration;

/// Smallest period a repeating task may have; prevents a zero period from
/// spinning forever inside one `pop_due` loop.
const MIN_PERIOD: Duration = Duration::from_micros(100);

/// Handle to a registered task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct Due<T> {
    pub id: TaskId,
    /// Simulation time at which the task was due
    pub at: Duration,
    pub task: T,
}

struct Entry<T> {
    id: TaskId,
    task: T,
    due: Duration,
    period: Option<Duration>,
}

pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
    now: Duration,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::starting_at(Duration::ZERO)
    }

    /// A scheduler whose first tasks are relative to `now`.
    pub fn starting_at(now: Duration) -> Self {
        Scheduler {
            entries: Vec::new(),
            next_id: 1,
            now,
        }
    }

    /// Current simulation time: the due time of the task being dispatched,
    /// or the last time passed to `settle()`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Registers a repeating task. The first run is one period from now.
    pub fn every(&mut self, period: Duration, task: T) -> TaskId {
        let period = period.max(MIN_PERIOD);
        self.insert(task, self.now + period, Some(period))
    }

    /// Registers a task that runs once after `delay`.
    pub fn after(&mut self, delay: Duration, task: T) -> TaskId {
        self.insert(task, self.now + delay, None)
    }

    fn insert(&mut self, task: T, due: Duration, period: Option<Duration>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            task,
            due,
            period,
        });
        id
    }

    /// Cancels one task. Returns false if it had already finished or been
    /// cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancels `id` if present; convenience for `Option<TaskId>` fields.
    pub fn cancel_opt(&mut self, id: &mut Option<TaskId>) {
        if let Some(id) = id.take() {
            self.cancel(id);
        }
    }

    /// Cancels every outstanding task and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered tasks matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.entries.iter().filter(|entry| predicate(&entry.task)).count()
    }

    /// Earliest due time among registered tasks.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Takes the earliest task due at or before `until`.
    ///
    /// Ties are broken by registration order. Repeating tasks are rescheduled
    /// one period later, so a clock that jumped ahead replays every missed
    /// tick in order. One-shot tasks are removed.
    pub fn pop_due(&mut self, until: Duration) -> Option<Due<T>> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;

        let entry = &mut self.entries[index];
        let at = entry.due;
        let id = entry.id;
        self.now = self.now.max(at);

        match entry.period {
            Some(period) => {
                entry.due += period;
                Some(Due {
                    id,
                    at,
                    task: entry.task.clone(),
                })
            }
            None => {
                let entry = self.entries.remove(index);
                Some(Due {
                    id,
                    at,
                    task: entry.task,
                })
            }
        }
    }

    /// Moves the scheduler's notion of "now" forward after a dispatch round.
    pub fn settle(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every kind of periodic or delayed work in the game.
///
/// Each variant names the entity whose state machine handles it, so the
/// world can route a due task without closures holding references into its
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Shared physics tick for the player and projectiles
    Gravity(EntityId),
    PlayerMovement,
    PlayerAnimation,
    PlayerDeathFrame,
    GameOver,
    RestartControls,
    EnemyAwaitStart(EntityId),
    EnemyWalk(EntityId),
    EnemyAnimation(EntityId),
    EnemyCollect(EntityId),
    BossAlert,
    BossWalk,
    BossHurtFrame,
    BossHurtEnd,
    BossDeathFrame,
    BossFinalize,
    ProjectileDrift(EntityId),
    ProjectileSpin(EntityId),
    ProjectileSplashFrame(EntityId),
    PickupAnimation(EntityId),
    CloudDrift(EntityId),
    WorldLogic,
}

pub type TaskQueue = Scheduler<Task>;
