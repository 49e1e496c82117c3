#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Start,
    ToggleCollision,
    ToggleMaskOverlay,
    ToggleOverlay,
    Quit,
}

const ACTION_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn clear_movement(&mut self) {
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
        ] {
            self.set(action, false);
        }
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Start => 4,
            InputAction::ToggleCollision => 5,
            InputAction::ToggleMaskOverlay => 6,
            InputAction::ToggleOverlay => 7,
            InputAction::Quit => 8,
        }
    }
}

const JOYSTICK_SIZE_FRACTION: f32 = 0.22;
const JOYSTICK_MIN_SIZE_PX: f32 = 96.0;
const JOYSTICK_MAX_SIZE_PX: f32 = 180.0;
const JOYSTICK_MARGIN_PX: f32 = 24.0;

/// Screen placement of the on-screen joystick: a square widget anchored to
/// the bottom-left corner of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickWidget {
    pub center_x: f32,
    pub center_y: f32,
    pub size: f32,
}

impl JoystickWidget {
    pub fn for_window(width: u32, height: u32) -> Self {
        let shorter = width.min(height) as f32;
        let size =
            (shorter * JOYSTICK_SIZE_FRACTION).clamp(JOYSTICK_MIN_SIZE_PX, JOYSTICK_MAX_SIZE_PX);
        let half = size / 2.0;
        Self {
            center_x: JOYSTICK_MARGIN_PX + half,
            center_y: height as f32 - JOYSTICK_MARGIN_PX - half,
            size,
        }
    }

    /// The widget reacts inside its inscribed circle only.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.center_x).hypot(y - self.center_y) <= self.size / 2.0
    }

    pub fn offset_of(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.center_x, y - self.center_y)
    }
}

/// What a held pointer (mouse button or first touch) is doing this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerGesture {
    #[default]
    None,
    /// Hold-to-move on the play surface; offset from the window center.
    Drag { dx: f32, dy: f32 },
    /// Held on the joystick widget; offset from the widget center.
    Joystick { dx: f32, dy: f32, widget_size: f32 },
}
