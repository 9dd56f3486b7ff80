//! Impact-sound playback: device handling, the shared hit sound, and the
//! collision observer that decides when to fire it.

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::Rng;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use crate::physics::{CollisionEvent, CollisionObserver};

/// Owner of the audio device stream. Keep it alive for as long as sounds
/// should play; handles cloned from it go silent once it drops.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    /// Open the default output device. Returns `None` with a warning when
    /// no device is available, so headless runs keep working.
    pub fn open() -> Option<AudioOutput> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(AudioOutput {
                _stream: stream,
                handle,
            }),
            Err(error) => {
                warn!(%error, "no audio output device, sound disabled");
                None
            }
        }
    }

    pub fn handle(&self) -> OutputStreamHandle {
        self.handle.clone()
    }
}

/// The shared hit sound. Triggering playback replaces the previous sink,
/// so a rapid retrigger restarts the sound from the beginning instead of
/// stacking overlapping copies.
pub struct ImpactAudio {
    handle: Option<OutputStreamHandle>,
    data: Option<Arc<[u8]>>,
    current: Mutex<Option<Sink>>,
}

impl ImpactAudio {
    /// Read the sound file for later playback. A missing device or an
    /// unreadable file degrades to the disabled state with a warning; the
    /// simulation itself is unaffected.
    pub fn new(output: Option<&AudioOutput>, sound_path: &Path) -> Self {
        let handle = output.map(AudioOutput::handle);
        let data = if handle.is_some() {
            match std::fs::read(sound_path) {
                Ok(bytes) => Some(Arc::<[u8]>::from(bytes)),
                Err(error) => {
                    warn!(path = %sound_path.display(), %error, "hit sound not loaded, sound disabled");
                    None
                }
            }
        } else {
            None
        };
        ImpactAudio {
            handle,
            data,
            current: Mutex::new(None),
        }
    }

    /// Playback permanently off. Used headless and in tests.
    pub fn disabled() -> Self {
        ImpactAudio {
            handle: None,
            data: None,
            current: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.handle.is_some() && self.data.is_some()
    }

    /// Fire-and-forget playback at `volume`, clamped to [0, 1]. Cuts off
    /// any still-playing instance.
    pub fn play(&self, volume: f32) {
        let (Some(handle), Some(data)) = (self.handle.as_ref(), self.data.as_ref()) else {
            return;
        };
        let source = match Decoder::new(Cursor::new(data.clone())) {
            Ok(source) => source,
            Err(error) => {
                warn!(%error, "hit sound decode failed");
                return;
            }
        };
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(error) => {
                warn!(%error, "audio sink unavailable");
                return;
            }
        };
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(source);
        // dropping the previous sink stops it
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(sink);
    }
}

/// Collision reaction policy: impacts harder than the threshold play the
/// hit sound at a random volume, softer contacts stay silent.
pub struct ImpactSoundPlayer {
    audio: Arc<ImpactAudio>,
    threshold: f32,
    master_volume: f32,
    triggers: AtomicU64,
}

impl ImpactSoundPlayer {
    pub fn new(audio: Arc<ImpactAudio>, threshold: f32, master_volume: f32) -> Self {
        ImpactSoundPlayer {
            audio,
            threshold,
            master_volume,
            triggers: AtomicU64::new(0),
        }
    }

    /// How many impacts have cleared the threshold so far.
    pub fn trigger_count(&self) -> u64 {
        self.triggers.load(Ordering::Relaxed)
    }
}

impl CollisionObserver for ImpactSoundPlayer {
    fn on_collision(&self, event: &CollisionEvent) {
        if event.impact_speed <= self.threshold {
            return;
        }
        self.triggers.fetch_add(1, Ordering::Relaxed);
        let volume = rand::rng().random::<f32>() * self.master_volume;
        debug!(impact = event.impact_speed, volume, "impact sound");
        self.audio.play(volume);
    }
}
