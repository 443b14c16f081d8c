use async_trait::async_trait;

use super::CaptureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            audio: true,
        }
    }
}

/// A live camera/microphone stream.
#[cfg_attr(test, mockall::automock)]
pub trait MediaStream: Send {
    fn track_count(&self) -> usize;
    fn stop_tracks(&mut self);
}

/// Platform capture primitive. `open` may wait on a permission prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError>;
}

/// Exclusive hold on a stream; tracks are stopped when the lease is released
/// or dropped, whichever comes first.
pub struct StreamLease {
    stream: Option<Box<dyn MediaStream>>,
}

impl StreamLease {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!(tracks = stream.track_count(), "releasing capture tracks");
            stream.stop_tracks();
        }
    }
}

impl Drop for StreamLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamLease")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_stops_tracks_once() {
        let mut stream = MockMediaStream::new();
        stream.expect_track_count().return_const(2usize);
        stream.expect_stop_tracks().times(1).return_const(());

        let mut lease = StreamLease::new(Box::new(stream));
        lease.release();
        lease.release();
        assert!(!lease.is_active());
    }

    #[test]
    fn drop_stops_tracks() {
        let mut stream = MockMediaStream::new();
        stream.expect_track_count().return_const(2usize);
        stream.expect_stop_tracks().times(1).return_const(());

        let lease = StreamLease::new(Box::new(stream));
        drop(lease);
    }
}
