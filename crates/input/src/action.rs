use std::fmt;
use std::str::FromStr;

/// A discrete camera movement. Each action moves the camera by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraAction {
    /// Step along the view direction.
    Forward,
    /// Step against the view direction.
    Backward,
    /// Step against the right axis.
    StrafeLeft,
    /// Step along the right axis.
    StrafeRight,
    /// Step along world up.
    LiftUp,
    /// Step against world up.
    LiftDown,
}

impl CameraAction {
    pub const ALL: [CameraAction; 6] = [
        CameraAction::Forward,
        CameraAction::Backward,
        CameraAction::StrafeLeft,
        CameraAction::StrafeRight,
        CameraAction::LiftUp,
        CameraAction::LiftDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CameraAction::Forward => "forward",
            CameraAction::Backward => "backward",
            CameraAction::StrafeLeft => "strafe-left",
            CameraAction::StrafeRight => "strafe-right",
            CameraAction::LiftUp => "lift-up",
            CameraAction::LiftDown => "lift-down",
        }
    }

    /// The action that undoes this one.
    pub fn opposite(self) -> Self {
        match self {
            CameraAction::Forward => CameraAction::Backward,
            CameraAction::Backward => CameraAction::Forward,
            CameraAction::StrafeLeft => CameraAction::StrafeRight,
            CameraAction::StrafeRight => CameraAction::StrafeLeft,
            CameraAction::LiftUp => CameraAction::LiftDown,
            CameraAction::LiftDown => CameraAction::LiftUp,
        }
    }
}

impl fmt::Display for CameraAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown camera action `{0}` (expected one of: forward, backward, strafe-left, strafe-right, lift-up, lift-down)")]
pub struct ParseActionError(pub String);

impl FromStr for CameraAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        CameraAction::ALL
            .into_iter()
            .find(|action| action.name() == normalized)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
