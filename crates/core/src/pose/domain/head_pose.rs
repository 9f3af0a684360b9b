use std::fmt;

/// Discrete head-orientation category produced by pose estimation.
///
/// Closed set so the session state machine can match exhaustively;
/// `Unknown` covers missing landmarks and estimation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeadPose {
    Center,
    Left,
    Right,
    Unknown,
}

impl HeadPose {
    /// Uppercase form used in guidance text ("Please look LEFT").
    pub fn guidance_label(&self) -> &'static str {
        match self {
            HeadPose::Center => "CENTER",
            HeadPose::Left => "LEFT",
            HeadPose::Right => "RIGHT",
            HeadPose::Unknown => "UNKNOWN",
        }
    }

    /// Parses the lowercase form used by config and script files.
    pub fn parse(s: &str) -> Option<HeadPose> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Some(HeadPose::Center),
            "left" => Some(HeadPose::Left),
            "right" => Some(HeadPose::Right),
            "unknown" => Some(HeadPose::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for HeadPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeadPose::Center => "Center",
            HeadPose::Left => "Left",
            HeadPose::Right => "Right",
            HeadPose::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
