use std::time::Duration;

use bytes::Bytes;

use super::device::{CaptureConstraints, CaptureDevice, MediaStream, StreamLease};
use super::media::{MediaObject, WEBM_CONTENT_TYPE};
use super::CaptureError;

pub const DEFAULT_SLICE_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
    Stopped,
    Reviewing,
}

impl RecorderState {
    pub fn as_str(self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Paused => "paused",
            RecorderState::Stopped => "stopped",
            RecorderState::Reviewing => "reviewing",
        }
    }
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recording state machine:
/// `Idle -> Recording <-> Paused -> Stopped (<-> Reviewing)`.
///
/// Slices arrive from the platform recorder at a fixed interval and are kept
/// until `stop`, which joins them into one [`MediaObject`] and releases the
/// device. `stop` finalizes once; later calls hand back the same object.
#[derive(Debug)]
pub struct Recorder {
    state: RecorderState,
    lease: Option<StreamLease>,
    slices: Vec<Bytes>,
    elapsed: Duration,
    max_duration: Duration,
    slice_interval: Duration,
    content_type: String,
    finished: Option<MediaObject>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DURATION)
    }
}

impl Recorder {
    pub fn new(max_duration: Duration) -> Self {
        Self {
            state: RecorderState::Idle,
            lease: None,
            slices: Vec::new(),
            elapsed: Duration::ZERO,
            max_duration,
            slice_interval: DEFAULT_SLICE_INTERVAL,
            content_type: WEBM_CONTENT_TYPE.to_string(),
            finished: None,
        }
    }

    pub fn with_slice_interval(mut self, interval: Duration) -> Self {
        self.slice_interval = interval;
        self
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    pub fn slice_interval(&self) -> Duration {
        self.slice_interval
    }

    pub fn remaining(&self) -> Duration {
        self.max_duration.saturating_sub(self.elapsed)
    }

    pub fn has_device(&self) -> bool {
        self.lease.as_ref().map(StreamLease::is_active).unwrap_or(false)
    }

    pub fn recording(&self) -> Option<&MediaObject> {
        self.finished.as_ref()
    }

    /// Asks the platform for a stream and starts recording on it. A refused
    /// permission leaves the recorder idle.
    pub async fn start(
        &mut self,
        device: &dyn CaptureDevice,
        constraints: &CaptureConstraints,
    ) -> Result<(), CaptureError> {
        self.expect(RecorderState::Idle, "start")?;
        let stream = device.open(constraints).await.map_err(|e| {
            tracing::warn!(error = %e, "capture device refused");
            e
        })?;
        self.begin_recording(stream)
    }

    pub fn begin_recording(&mut self, stream: Box<dyn MediaStream>) -> Result<(), CaptureError> {
        self.expect(RecorderState::Idle, "begin recording")?;
        self.lease = Some(StreamLease::new(stream));
        self.slices.clear();
        self.elapsed = Duration::ZERO;
        self.finished = None;
        self.state = RecorderState::Recording;
        tracing::info!(max_secs = self.max_duration.as_secs(), "recording started");
        Ok(())
    }

    /// Data-available event from the platform recorder. Empty slices are
    /// ignored, as are slices arriving after the recording was finalized.
    pub fn push_slice(&mut self, data: Bytes) -> bool {
        match self.state {
            RecorderState::Recording | RecorderState::Paused if !data.is_empty() => {
                self.slices.push(data);
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) -> Result<(), CaptureError> {
        self.expect(RecorderState::Recording, "pause")?;
        self.state = RecorderState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), CaptureError> {
        self.expect(RecorderState::Paused, "resume")?;
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Pause if recording, resume if paused.
    pub fn toggle_pause(&mut self) -> Result<(), CaptureError> {
        match self.state {
            RecorderState::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Advances the wall clock. Only counts while recording; returns the
    /// finished object when the maximum duration is reached.
    pub fn tick(&mut self, by: Duration) -> Option<MediaObject> {
        if self.state != RecorderState::Recording {
            return None;
        }
        self.elapsed += by;
        if self.elapsed >= self.max_duration {
            tracing::info!(elapsed_secs = self.elapsed.as_secs(), "maximum duration reached");
            return self.stop().ok();
        }
        None
    }

    pub fn stop(&mut self) -> Result<MediaObject, CaptureError> {
        match self.state {
            RecorderState::Recording | RecorderState::Paused => {
                let media = MediaObject::from_slices(&self.slices, &self.content_type);
                self.slices.clear();
                if let Some(mut lease) = self.lease.take() {
                    lease.release();
                }
                self.state = RecorderState::Stopped;
                self.finished = Some(media.clone());
                tracing::info!(
                    bytes = media.len(),
                    elapsed_secs = self.elapsed.as_secs(),
                    "recording finalized"
                );
                Ok(media)
            }
            RecorderState::Stopped | RecorderState::Reviewing => self
                .finished
                .clone()
                .ok_or(CaptureError::InvalidTransition {
                    from: self.state,
                    action: "stop",
                }),
            RecorderState::Idle => Err(CaptureError::InvalidTransition {
                from: self.state,
                action: "stop",
            }),
        }
    }

    pub fn review(&mut self) -> Result<&MediaObject, CaptureError> {
        if self.state != RecorderState::Reviewing {
            self.expect(RecorderState::Stopped, "review")?;
        }
        self.state = RecorderState::Reviewing;
        self.finished.as_ref().ok_or(CaptureError::InvalidTransition {
            from: RecorderState::Stopped,
            action: "review",
        })
    }

    pub fn end_review(&mut self) -> Result<(), CaptureError> {
        self.expect(RecorderState::Reviewing, "end review")?;
        self.state = RecorderState::Stopped;
        Ok(())
    }

    /// "Record again": drops everything and returns to idle.
    pub fn reset(&mut self) {
        if let Some(mut lease) = self.lease.take() {
            lease.release();
        }
        self.slices.clear();
        self.elapsed = Duration::ZERO;
        self.finished = None;
        self.state = RecorderState::Idle;
    }

    pub fn format_elapsed(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.elapsed),
            format_clock(self.max_duration)
        )
    }

    fn expect(&self, wanted: RecorderState, action: &'static str) -> Result<(), CaptureError> {
        if self.state == wanted {
            Ok(())
        } else {
            Err(CaptureError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }
}

/// `mm:ss`; minutes are not wrapped into hours.
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
