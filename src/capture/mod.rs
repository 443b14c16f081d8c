pub mod device;
pub mod media;
pub mod recorder;
pub mod session;

pub use device::{CaptureConstraints, CaptureDevice, MediaStream, StreamLease};
pub use media::{MediaObject, WEBM_CONTENT_TYPE};
pub use recorder::{format_clock, Recorder, RecorderState};
pub use session::RecordingSession;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("camera or microphone access was denied")]
    PermissionDenied,

    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: RecorderState,
        action: &'static str,
    },
}

impl CaptureError {
    /// Banner text for the applicant.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::PermissionDenied => {
                "Failed to access camera and microphone. Please grant permissions.".to_string()
            }
            CaptureError::DeviceUnavailable(_) => {
                "No camera or microphone could be found. Please connect a device and try again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}
