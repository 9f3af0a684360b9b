use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Frame source that synthesizes flat-color frames for a bounded number of
/// reads, then reports the stream as ended. Stands in for a camera when
/// exercising the session without hardware; an unbounded variant
/// (`unlimited`) never ends on its own.
pub struct ScriptedFrameSource {
    width: u32,
    height: u32,
    remaining: Option<usize>,
    served: usize,
    closed: bool,
}

impl ScriptedFrameSource {
    pub fn new(width: u32, height: u32, frame_limit: usize) -> Self {
        Self {
            width,
            height,
            remaining: Some(frame_limit),
            served: 0,
            closed: false,
        }
    }

    pub fn unlimited(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            remaining: None,
            served: 0,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl FrameSource for ScriptedFrameSource {
    fn current_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if !self.is_live() {
            return Ok(None);
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        let frame = Frame::filled(self.width, self.height, [40, 40, 40], self.served);
        self.served += 1;
        Ok(Some(frame))
    }

    fn is_live(&self) -> bool {
        !self.closed && self.remaining.map_or(true, |r| r > 0)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
