use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::device::{CaptureConstraints, CaptureDevice, MediaStream};
use super::media::MediaObject;
use super::recorder::{Recorder, RecorderState};
use super::CaptureError;

const TICK: Duration = Duration::from_secs(1);

/// A recorder plus the one-second clock that drives its elapsed counter and
/// auto-stop. Manual and automatic stops go through the same lock, so the
/// recording is finalized once no matter which fires first.
pub struct RecordingSession {
    recorder: Arc<Mutex<Recorder>>,
    ready: watch::Receiver<Option<MediaObject>>,
    notify: Arc<watch::Sender<Option<MediaObject>>>,
    clock: JoinHandle<()>,
}

impl RecordingSession {
    pub async fn start(
        device: &dyn CaptureDevice,
        constraints: &CaptureConstraints,
        max_duration: Duration,
    ) -> Result<Self, CaptureError> {
        let stream = device.open(constraints).await?;
        Self::with_stream(stream, max_duration)
    }

    pub fn with_stream(
        stream: Box<dyn MediaStream>,
        max_duration: Duration,
    ) -> Result<Self, CaptureError> {
        let mut recorder = Recorder::new(max_duration);
        recorder.begin_recording(stream)?;

        let recorder = Arc::new(Mutex::new(recorder));
        let (tx, rx) = watch::channel(None);
        let notify = Arc::new(tx);
        let clock = tokio::spawn(run_clock(recorder.clone(), notify.clone()));

        Ok(Self {
            recorder,
            ready: rx,
            notify,
            clock,
        })
    }

    pub async fn push_slice(&self, data: Bytes) -> bool {
        self.recorder.lock().await.push_slice(data)
    }

    pub async fn pause(&self) -> Result<(), CaptureError> {
        self.recorder.lock().await.pause()
    }

    pub async fn resume(&self) -> Result<(), CaptureError> {
        self.recorder.lock().await.resume()
    }

    pub async fn stop(&self) -> Result<MediaObject, CaptureError> {
        let media = self.recorder.lock().await.stop()?;
        publish(&self.notify, &media);
        Ok(media)
    }

    pub async fn state(&self) -> RecorderState {
        self.recorder.lock().await.state()
    }

    pub async fn elapsed(&self) -> Duration {
        self.recorder.lock().await.elapsed()
    }

    /// Resolves once the recording has been finalized, by either path.
    pub async fn finished(&self) -> Option<MediaObject> {
        let mut rx = self.ready.clone();
        loop {
            if let Some(media) = rx.borrow_and_update().clone() {
                return Some(media);
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<MediaObject>> {
        self.ready.clone()
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.clock.abort();
    }
}

fn publish(notify: &watch::Sender<Option<MediaObject>>, media: &MediaObject) {
    notify.send_if_modified(|current| {
        if current.is_none() {
            *current = Some(media.clone());
            true
        } else {
            false
        }
    });
}

async fn run_clock(recorder: Arc<Mutex<Recorder>>, notify: Arc<watch::Sender<Option<MediaObject>>>) {
    let mut interval = tokio::time::interval(TICK);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await;
    loop {
        interval.tick().await;
        let mut rec = recorder.lock().await;
        match rec.state() {
            RecorderState::Recording => {
                if let Some(media) = rec.tick(TICK) {
                    publish(&notify, &media);
                    break;
                }
            }
            RecorderState::Paused => {}
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::device::MockMediaStream;

    fn stream() -> Box<dyn MediaStream> {
        let mut s = MockMediaStream::new();
        s.expect_track_count().return_const(1usize);
        s.expect_stop_tracks().times(1).return_const(());
        Box::new(s)
    }

    #[tokio::test(start_paused = true)]
    async fn clock_auto_stops_at_max_duration() {
        let session = RecordingSession::with_stream(stream(), Duration::from_secs(3)).unwrap();
        session.push_slice(Bytes::from_static(b"abc")).await;

        let media = session.finished().await.expect("finalized");
        assert_eq!(media.bytes().as_ref(), b"abc");
        assert_eq!(session.state().await, RecorderState::Stopped);
        assert_eq!(session.elapsed().await, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_time_is_not_counted() {
        let session = RecordingSession::with_stream(stream(), Duration::from_secs(60)).unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        session.pause().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.elapsed().await, Duration::from_secs(2));

        session.resume().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(session.elapsed().await, Duration::from_secs(3));
        session.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn manual_stop_racing_auto_stop_finalizes_once() {
        let session = RecordingSession::with_stream(stream(), Duration::from_secs(1)).unwrap();
        session.push_slice(Bytes::from_static(b"race")).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        let manual = session.stop().await.unwrap();
        let auto = session.finished().await.unwrap();
        assert_eq!(manual, auto);
        assert_eq!(manual.bytes().as_ptr(), auto.bytes().as_ptr());
    }
}
