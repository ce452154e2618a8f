use crate::sinks::InputState;
use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};

/// Discrete actions outside the simulation's held-key input.
///
/// Held keys (movement, jump, throw) are sampled each frame into an
/// [`InputState`]; everything that happens once per key press is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontAction {
    Start,
    Restart,
    Home,
    ToggleMute,
    Quit,
}

/// Which screen is up decides which presses mean anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Start screen, before the first level
    Home,
    Playing,
    /// Game over or victory, before the restart controls appear
    Ended,
    /// Restart and home are offered
    RestartOffered,
}

/// InputSystem turns SDL2 events into [`FrontAction`]s and the keyboard state
/// into an [`InputState`].
pub struct InputSystem {
    pub context: InputContext,
}

impl InputSystem {
    pub fn new() -> Self {
        InputSystem {
            context: InputContext::Home,
        }
    }

    /// Polls every pending event and returns the actions they map to.
    pub fn poll_events(&self, event_pump: &mut EventPump) -> Vec<FrontAction> {
        let mut actions = Vec::new();
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => actions.push(FrontAction::Quit),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => actions.extend(self.action_for_key(key)),
                _ => {}
            }
        }
        actions
    }

    /// Maps one key press to an action in the current context.
    pub fn action_for_key(&self, key: Keycode) -> Option<FrontAction> {
        match (self.context, key) {
            (_, Keycode::Escape) => Some(FrontAction::Quit),
            (_, Keycode::M) => Some(FrontAction::ToggleMute),
            (InputContext::Home, Keycode::Return) => Some(FrontAction::Start),
            (InputContext::RestartOffered, Keycode::R | Keycode::Return) => Some(FrontAction::Restart),
            (InputContext::RestartOffered | InputContext::Playing, Keycode::H) => Some(FrontAction::Home),
            _ => None,
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples held keys: arrows or WASD to move, space to jump, up or W to throw.
pub fn sample(keyboard: &KeyboardState) -> InputState {
    let held = |codes: &[Scancode]| codes.iter().any(|code| keyboard.is_scancode_pressed(*code));
    InputState {
        left: held(&[Scancode::Left, Scancode::A]),
        right: held(&[Scancode::Right, Scancode::D]),
        jump: held(&[Scancode::Space]),
        up: held(&[Scancode::Up, Scancode::W]),
    }
}
