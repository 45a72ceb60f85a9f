use super::Error;

/// A device that can hand out an exclusive video stream.
pub trait Camera {
    fn open(&mut self) -> Result<Box<dyn MediaStream>, Error>;
}

/// An acquired stream. `stop` releases every track and must be safe to call
/// more than once.
pub trait MediaStream: Send + Sync {
    /// Grabs the current frame as PNG bytes.
    fn capture_frame(&mut self) -> Result<Vec<u8>, Error>;

    fn stop(&mut self);
}
