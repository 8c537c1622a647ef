// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera adapter running on a background thread.
//!
//! Opening a device and reading frames can block for a long time, so the
//! [`CaptureAdapter`] lives on a worker thread. The UI sends commands and
//! polls for state changes, preview frames and snapshots once per frame.

use super::{CaptureAdapter, FrameSource, Resolution, Snapshot};
use crate::error::CaptureError;
use image::RgbImage;
use std::sync::mpsc::{channel, sync_channel, Receiver, Sender, SyncSender, TryRecvError};
use std::time::Duration;

/// Pause between live preview reads.
const PREVIEW_INTERVAL: Duration = Duration::from_millis(33);

enum Command {
    Capture,
    Retry,
    Close,
}

enum Event {
    Ready,
    Failed(String),
    Captured(Result<Snapshot, CaptureError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StreamState {
    Starting,
    Active,
    Failed(String),
}

/// What arrived from the worker since the last poll.
#[derive(Default)]
pub struct StreamUpdate {
    /// Newest preview frame, if one arrived.
    pub frame: Option<RgbImage>,
    /// Result of a requested capture.
    pub captured: Option<Result<Snapshot, CaptureError>>,
}

/// Handle to a frame source running on its own thread.
///
/// Dropping the handle stops the worker, which releases the source.
pub struct CameraStream {
    commands: Sender<Command>,
    events: Receiver<Event>,
    frames: Receiver<RgbImage>,
    state: StreamState,
    capturing: bool,
    source: String,
}

impl CameraStream {
    /// Start acquiring `source` in the background. `notify` is called from
    /// the worker whenever there is something new to poll.
    pub fn spawn<S, F>(source: S, preferred: Resolution, jpeg_quality: u8, notify: F) -> Self
    where
        S: FrameSource + 'static,
        F: Fn() + Send + 'static,
    {
        let adapter = CaptureAdapter::new(source, preferred, jpeg_quality);
        let description = adapter.describe();

        let (command_tx, command_rx) = channel();
        let (event_tx, event_rx) = channel();
        // One slot: a slow UI only ever sees the newest frame.
        let (frame_tx, frame_rx) = sync_channel(1);

        std::thread::spawn(move || run(adapter, command_rx, event_tx, frame_tx, notify));

        Self {
            commands: command_tx,
            events: event_rx,
            frames: frame_rx,
            state: StreamState::Starting,
            capturing: false,
            source: description,
        }
    }

    pub fn describe(&self) -> &str {
        &self.source
    }

    pub fn is_active(&self) -> bool {
        self.state == StreamState::Active
    }

    /// A capture was requested and has not come back yet.
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Message to show in place of the preview, if acquisition failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            StreamState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Ask for a snapshot. Ignored unless the stream is live and idle.
    pub fn capture(&mut self) {
        if !self.is_active() || self.capturing {
            return;
        }
        if self.commands.send(Command::Capture).is_ok() {
            self.capturing = true;
        }
    }

    /// Re-attempt acquisition after a failure.
    pub fn retry(&mut self) {
        if self.error().is_none() {
            return;
        }
        if self.commands.send(Command::Retry).is_ok() {
            self.state = StreamState::Starting;
        }
    }

    /// Drain everything the worker sent since the last call.
    pub fn poll(&mut self) -> StreamUpdate {
        let mut update = StreamUpdate::default();

        while let Ok(event) = self.events.try_recv() {
            match event {
                Event::Ready => self.state = StreamState::Active,
                Event::Failed(message) => self.state = StreamState::Failed(message),
                Event::Captured(result) => {
                    self.capturing = false;
                    update.captured = Some(result);
                }
            }
        }
        while let Ok(frame) = self.frames.try_recv() {
            update.frame = Some(frame);
        }

        update
    }

    /// Stop the worker. The source is released on the worker thread.
    pub fn close(&mut self) {
        // The worker may already be gone.
        let _ = self.commands.send(Command::Close);
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.close();
    }
}

fn report<S: FrameSource>(adapter: &CaptureAdapter<S>, events: &Sender<Event>) -> bool {
    let event = match adapter.error() {
        Some(message) => Event::Failed(message.to_string()),
        None => Event::Ready,
    };
    events.send(event).is_ok()
}

fn run<S, F>(
    mut adapter: CaptureAdapter<S>,
    commands: Receiver<Command>,
    events: Sender<Event>,
    frames: SyncSender<RgbImage>,
    notify: F,
) where
    S: FrameSource,
    F: Fn(),
{
    adapter.activate();
    if !report(&adapter, &events) {
        return;
    }
    notify();

    let live = adapter.is_live();
    let mut previewed = false;

    loop {
        let streaming = adapter.is_active() && (live || !previewed);
        let command = if streaming {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            // Nothing to stream: sleep until the UI asks for something.
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        };

        match command {
            Some(Command::Capture) => {
                let result = adapter.capture();
                if events.send(Event::Captured(result)).is_err() {
                    break;
                }
                notify();
                continue;
            }
            Some(Command::Retry) => {
                adapter.retry();
                previewed = false;
                if !report(&adapter, &events) {
                    break;
                }
                notify();
                continue;
            }
            Some(Command::Close) => break,
            None => {}
        }

        if let Some(frame) = adapter.preview() {
            // A full slot means the UI has not shown the previous frame yet.
            if frames.try_send(frame).is_ok() {
                notify();
            }
        }
        previewed = true;
        if live {
            std::thread::sleep(PREVIEW_INTERVAL);
        }
    }

    adapter.close();
    log::debug!("Camera worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    /// Still source that fails to open a set number of times.
    struct Photo {
        failures_left: usize,
        frame: Option<RgbImage>,
        releases: Arc<AtomicUsize>,
    }

    impl Photo {
        fn new(failures_left: usize, releases: Arc<AtomicUsize>) -> Self {
            Self { failures_left, frame: None, releases }
        }
    }

    impl FrameSource for Photo {
        fn acquire(&mut self, _preferred: Resolution) -> Result<(), CaptureError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(CaptureError::Device("busy".into()));
            }
            self.frame = Some(RgbImage::from_pixel(64, 48, image::Rgb([90, 90, 90])));
            Ok(())
        }

        fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
            self.frame.clone().ok_or(CaptureError::NotActive)
        }

        fn release(&mut self) {
            if self.frame.take().is_some() {
                self.releases.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn describe(&self) -> String {
            "test photo".to_string()
        }

        fn is_live(&self) -> bool {
            false
        }
    }

    fn poll_until(stream: &mut CameraStream, mut done: impl FnMut(&CameraStream, StreamUpdate) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let update = stream.poll();
            if done(&*stream, update) {
                return;
            }
            assert!(Instant::now() < deadline, "timed out waiting for the camera worker");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_preview_then_capture() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut stream = CameraStream::spawn(Photo::new(0, releases), Resolution::PREFERRED, 90, || {});
        assert!(!stream.is_active());
        assert_eq!(stream.describe(), "test photo");

        let mut frames = 0;
        poll_until(&mut stream, |s, update| {
            frames += update.frame.is_some() as usize;
            s.is_active() && frames > 0
        });

        stream.capture();
        assert!(stream.is_capturing());
        let mut snapshot = None;
        poll_until(&mut stream, |_, update| {
            frames += update.frame.is_some() as usize;
            snapshot = update.captured;
            snapshot.is_some()
        });

        let snapshot = snapshot.unwrap().unwrap();
        assert_eq!((snapshot.width, snapshot.height), (64, 48));
        assert!(!stream.is_capturing());
        // A still photo is uploaded once, not on every poll.
        assert_eq!(frames, 1);
    }

    #[test]
    fn test_failure_then_retry() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut stream = CameraStream::spawn(Photo::new(1, releases), Resolution::PREFERRED, 90, || {});

        poll_until(&mut stream, |s, _| s.error().is_some());
        assert!(stream.error().unwrap().contains("busy"));
        stream.capture();
        assert!(!stream.is_capturing());

        stream.retry();
        assert!(stream.error().is_none());
        poll_until(&mut stream, |s, _| s.is_active());
    }

    #[test]
    fn test_drop_releases_source() {
        let releases = Arc::new(AtomicUsize::new(0));
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        let mut stream = CameraStream::spawn(
            Photo::new(0, releases.clone()),
            Resolution::PREFERRED,
            90,
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        poll_until(&mut stream, |s, _| s.is_active());
        assert!(notified.load(Ordering::SeqCst) > 0);
        drop(stream);

        let deadline = Instant::now() + Duration::from_secs(5);
        while releases.load(Ordering::SeqCst) == 0 {
            assert!(Instant::now() < deadline, "source was never released");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
