//! Movement intent: one normalized direction plus magnitude per frame,
//! merged from held keys, pointer drags, and the virtual joystick.

/// Pixels a drag must travel from the surface center before it counts as a
/// direction.
pub const DEFAULT_DRAG_DEAD_ZONE_PX: f32 = 18.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn union(self, other: DirectionKeys) -> DirectionKeys {
        DirectionKeys {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }

    /// Maps a drag offset from the play surface center to digital
    /// directions. Each axis only engages beyond `dead_zone_px`.
    pub fn from_drag_offset(dx: f32, dy: f32, dead_zone_px: f32) -> DirectionKeys {
        DirectionKeys {
            left: dx < -dead_zone_px,
            right: dx > dead_zone_px,
            up: dy < -dead_zone_px,
            down: dy > dead_zone_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickShape {
    /// Knob travel radius as a fraction of the widget's shorter side.
    pub knob_radius_scale: f32,
    /// Input radius as a multiple of the knob radius.
    pub input_radius_mult: f32,
    pub dead_zone: f32,
    pub expo: f32,
}

impl Default for JoystickShape {
    fn default() -> Self {
        Self {
            knob_radius_scale: 0.34,
            input_radius_mult: 2.6,
            dead_zone: 0.03,
            expo: 1.15,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickState {
    /// Unit direction, zero when the pointer sits on the center.
    pub x: f32,
    pub y: f32,
    /// Shaped magnitude after dead-zone and expo.
    pub mag: f32,
    /// Raw radial ratio before shaping, only used to detect intent to move.
    pub intent_mag: f32,
    /// Knob offset in widget pixels, for drawing.
    pub knob_offset: (f32, f32),
    pub engaged: bool,
}

impl JoystickState {
    pub fn released() -> Self {
        Self::default()
    }

    /// Shapes a pointer offset from the widget center into an analog
    /// reading. `widget_size` is the widget's (width, height) in pixels.
    pub fn from_pointer_offset(
        dx: f32,
        dy: f32,
        widget_size: (f32, f32),
        shape: &JoystickShape,
    ) -> JoystickState {
        let knob_radius = widget_size.0.min(widget_size.1) * shape.knob_radius_scale;
        let input_radius = knob_radius * shape.input_radius_mult;
        let len = dx.hypot(dy);

        if len < 0.0001 || !(knob_radius > 0.0) {
            return JoystickState {
                engaged: true,
                ..JoystickState::default()
            };
        }

        let ux = dx / len;
        let uy = dy / len;
        let knob_mag = len.min(knob_radius) / knob_radius;
        let raw = len.min(input_radius) / input_radius;

        JoystickState {
            x: ux,
            y: uy,
            mag: shape_magnitude(raw, shape),
            intent_mag: raw,
            knob_offset: (ux * knob_mag * knob_radius, uy * knob_mag * knob_radius),
            engaged: true,
        }
    }
}

/// Dead-zone subtraction, renormalization to `[0, 1]`, then the expo curve.
pub fn shape_magnitude(raw: f32, shape: &JoystickShape) -> f32 {
    if raw < shape.dead_zone {
        return 0.0;
    }
    let span = (1.0 - shape.dead_zone).max(f32::EPSILON);
    let rescaled = ((raw - shape.dead_zone) / span).clamp(0.0, 1.0);
    rescaled.powf(shape.expo)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub x: f32,
    pub y: f32,
    pub mag: f32,
}

impl MoveIntent {
    pub const IDLE: MoveIntent = MoveIntent {
        x: 0.0,
        y: 0.0,
        mag: 0.0,
    };

    /// Held directions win outright over the joystick; there is no blending.
    pub fn aggregate(keys: DirectionKeys, joystick: &JoystickState) -> MoveIntent {
        let mut x = 0.0f32;
        let mut y = 0.0f32;
        if keys.left {
            x -= 1.0;
        }
        if keys.right {
            x += 1.0;
        }
        if keys.up {
            y -= 1.0;
        }
        if keys.down {
            y += 1.0;
        }

        if x != 0.0 || y != 0.0 {
            let len = x.hypot(y);
            return MoveIntent {
                x: x / len,
                y: y / len,
                mag: 1.0,
            };
        }

        if joystick.mag <= 0.0 {
            return MoveIntent::IDLE;
        }
        MoveIntent {
            x: joystick.x,
            y: joystick.y,
            mag: joystick.mag,
        }
    }
}
