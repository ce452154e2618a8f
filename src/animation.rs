use crate::sprite::{Frames, SpriteCache, SpriteKey};

/// Tracks which animation an entity is in and cycles its frames.
///
/// The frame counter is shared by every animation of the entity: switching
/// from walking to jumping continues counting instead of restarting at frame
/// zero. `set_state` only reports whether the state changed, so callers can
/// react to transitions (e.g. play a sound once on entering a state).
#[derive(Debug, Clone)]
pub struct AnimationController<S> {
    current_state: S,
    counter: usize,
}

impl<S: Copy + PartialEq> AnimationController<S> {
    pub fn new(initial: S) -> Self {
        AnimationController {
            current_state: initial,
            counter: 0,
        }
    }

    /// Returns true when `new_state` differs from the current one.
    pub fn set_state(&mut self, new_state: S) -> bool {
        if new_state != self.current_state {
            self.current_state = new_state;
            true
        } else {
            false
        }
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Picks the next frame of `frames` from the cache.
    pub fn next_frame(&mut self, frames: Frames, cache: &SpriteCache) -> Option<SpriteKey> {
        if frames.is_empty() {
            return None;
        }
        let key = frames[self.counter % frames.len()];
        self.counter = self.counter.wrapping_add(1);
        cache.get(key)
    }
}

/// What a one-shot sequence produced on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    Frame(SpriteKey),
    Finished,
}

/// Plays a list of frames exactly once (death, splash).
///
/// Each `step()` yields the next frame; the step after the last frame reports
/// `Finished`, and so does every step after that.
#[derive(Debug, Clone)]
pub struct Sequence {
    frames: Frames,
    index: usize,
}

impl Sequence {
    pub fn new(frames: Frames) -> Self {
        Sequence { frames, index: 0 }
    }

    pub fn step(&mut self) -> SequenceStep {
        match self.frames.get(self.index) {
            Some(&key) => {
                self.index += 1;
                SequenceStep::Frame(key)
            }
            None => SequenceStep::Finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK: Frames = &["w1", "w2", "w3"];
    const JUMP: Frames = &["j1", "j2"];

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum State {
        Idle,
        Walking,
    }

    #[test]
    fn test_frames_cycle() {
        let cache = SpriteCache::preload(&[WALK]);
        let mut controller = AnimationController::new(State::Idle);
        let frames: Vec<_> = (0..4).map(|_| controller.next_frame(WALK, &cache)).collect();
        assert_eq!(frames, vec![Some("w1"), Some("w2"), Some("w3"), Some("w1")]);
    }

    #[test]
    fn test_counter_shared_across_animations() {
        let cache = SpriteCache::preload(&[WALK, JUMP]);
        let mut controller = AnimationController::new(State::Idle);
        controller.next_frame(WALK, &cache);
        // Counter is at 1, so the jump animation starts on its second frame
        assert_eq!(controller.next_frame(JUMP, &cache), Some("j2"));
    }

    #[test]
    fn test_set_state_reports_transition() {
        let mut controller = AnimationController::new(State::Idle);
        assert!(controller.set_state(State::Walking));
        assert!(!controller.set_state(State::Walking));
        assert_eq!(controller.current_state(), State::Walking);
    }

    #[test]
    fn test_uncached_frame_is_skipped() {
        let cache = SpriteCache::new();
        let mut controller = AnimationController::new(State::Idle);
        assert_eq!(controller.next_frame(WALK, &cache), None);
    }

    #[test]
    fn test_sequence_plays_once() {
        let mut sequence = Sequence::new(JUMP);
        assert_eq!(sequence.step(), SequenceStep::Frame("j1"));
        assert_eq!(sequence.step(), SequenceStep::Frame("j2"));
        assert!(sequence.is_finished());
        assert_eq!(sequence.step(), SequenceStep::Finished);
        assert_eq!(sequence.step(), SequenceStep::Finished);
    }
}
