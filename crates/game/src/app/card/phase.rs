/// Where the card is in its start sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Blank gate waiting for the first interaction; audio is still silent.
    #[default]
    Gate,
    Splash,
    Playing,
}

/// Side effect the scene owes when the phase moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseTransition {
    Stay,
    /// Gate left: music starts.
    ShowSplash,
    /// Splash left: dialogue resets, sounds preload, input unlocks.
    StartGame,
}

impl Phase {
    /// Enter/Space and a pointer press both advance one step. Playing is
    /// terminal.
    pub(crate) fn advance(
        self,
        start_pressed: bool,
        pointer_pressed: bool,
    ) -> (Phase, PhaseTransition) {
        if !(start_pressed || pointer_pressed) {
            return (self, PhaseTransition::Stay);
        }
        match self {
            Phase::Gate => (Phase::Splash, PhaseTransition::ShowSplash),
            Phase::Splash => (Phase::Playing, PhaseTransition::StartGame),
            Phase::Playing => (Phase::Playing, PhaseTransition::Stay),
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Phase::Gate => "gate",
            Phase::Splash => "splash",
            Phase::Playing => "playing",
        }
    }
}
