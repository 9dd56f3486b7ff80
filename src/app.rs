//! Application wiring: settings, audio, the playground and the frame loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use glam::Vec3;
use rand::Rng;
use tracing::{info, trace, warn};

use crate::assets::{spawn_load, LoadState, ModelAsset, ModelManifestLoader, SharedLoadState};
use crate::audio::{AudioOutput, ImpactAudio, ImpactSoundPlayer};
use crate::config::SimulationSettings;
use crate::playground::{FrameClock, FrameScheduler, Playground};

/// A control-surface request, delivered over a channel from whatever front
/// end is attached: the console command thread, a test, a future panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpawnSphere,
    SpawnBox,
    PushCarrier,
    Reset,
    Quit,
}

impl Action {
    /// Map a console command word to an action.
    pub fn parse(word: &str) -> Option<Action> {
        match word.trim() {
            "sphere" => Some(Action::SpawnSphere),
            "box" => Some(Action::SpawnBox),
            "push" => Some(Action::PushCarrier),
            "reset" => Some(Action::Reset),
            "quit" | "exit" => Some(Action::Quit),
            _ => None,
        }
    }
}

pub struct App {
    playground: Playground,
    clock: FrameClock,
    settings: SimulationSettings,
    actions: Receiver<Action>,
    sounds: Arc<ImpactSoundPlayer>,
    carrier_load: Option<SharedLoadState<ModelAsset>>,
    // the device stream must outlive every sink cloned from it
    _audio_output: Option<AudioOutput>,
}

impl App {
    /// Wire the subsystems together and start the carrier model load in the
    /// background. Must run inside a tokio runtime.
    pub fn new(settings: SimulationSettings, actions: Receiver<Action>) -> App {
        let audio_output = if settings.audio.enabled {
            AudioOutput::open()
        } else {
            None
        };
        let audio = Arc::new(ImpactAudio::new(
            audio_output.as_ref(),
            Path::new(&settings.audio.sound),
        ));
        let sounds = Arc::new(ImpactSoundPlayer::new(
            audio,
            settings.audio.impact_threshold,
            settings.audio.master_volume,
        ));
        let playground = Playground::new(&settings, sounds.clone());
        let carrier_load = Some(spawn_load(
            ModelManifestLoader::new(),
            PathBuf::from(&settings.carrier.manifest),
        ));
        App {
            playground,
            clock: FrameClock::new(),
            settings,
            actions,
            sounds,
            carrier_load,
            _audio_output: audio_output,
        }
    }

    /// Drive frames until the scheduler declines or a quit action arrives.
    pub async fn run(mut self, scheduler: &mut dyn FrameScheduler) -> anyhow::Result<()> {
        info!("playground running");
        while scheduler.next_frame().await {
            self.poll_carrier();
            if !self.drain_actions() {
                break;
            }
            let delta = self.clock.tick();
            match self.playground.update(delta) {
                Ok(substeps) => {
                    trace!(
                        delta,
                        substeps,
                        objects = self.playground.object_count(),
                        "frame"
                    );
                }
                Err(error) => {
                    // one bad frame must not take the loop down
                    warn!(%error, "frame update failed");
                }
            }
        }
        info!(
            triggers = self.sounds.trigger_count(),
            objects = self.playground.object_count(),
            "playground stopped"
        );
        Ok(())
    }

    /// Apply queued actions in arrival order. Returns `false` on quit.
    fn drain_actions(&mut self) -> bool {
        while let Ok(action) = self.actions.try_recv() {
            if action == Action::Quit {
                return false;
            }
            self.handle_action(action);
        }
        true
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::SpawnSphere => {
                let mut rng = rand::rng();
                let radius = rng.random::<f32>() * self.settings.spawn.sphere_radius_max;
                let position = self.random_drop_position(&mut rng);
                if let Err(error) = self.playground.spawn_sphere(radius, position) {
                    warn!(%error, "sphere spawn rejected");
                }
            }
            Action::SpawnBox => {
                let mut rng = rand::rng();
                let edge = rng.random::<f32>() * self.settings.spawn.box_size_max;
                let position = self.random_drop_position(&mut rng);
                if let Err(error) = self.playground.spawn_box(edge, edge, edge, position) {
                    warn!(%error, "box spawn rejected");
                }
            }
            Action::PushCarrier => {
                if let Err(error) = self.playground.push_carrier() {
                    warn!(%error, "push ignored");
                }
            }
            Action::Reset => self.playground.reset(),
            Action::Quit => {}
        }
    }

    fn random_drop_position(&self, rng: &mut impl Rng) -> Vec3 {
        let extent = self.settings.spawn.area_extent;
        Vec3::new(
            (rng.random::<f32>() - 0.5) * extent,
            self.settings.spawn.drop_height,
            (rng.random::<f32>() - 0.5) * extent,
        )
    }

    /// Check the carrier load slot and spawn the model once it is ready.
    /// Failures disable the carrier for the session; the rest keeps going.
    fn poll_carrier(&mut self) {
        let Some(slot) = self.carrier_load.as_ref() else {
            return;
        };
        let state = {
            let guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.clone()
        };
        match state {
            LoadState::Pending => {}
            LoadState::Ready(model) => {
                let position = self.settings.carrier.position();
                match self.playground.spawn_carrier(&model, position) {
                    Ok(_) => info!(model = %model.name, "carrier ready"),
                    Err(error) => warn!(%error, "carrier spawn failed"),
                }
                self.carrier_load = None;
            }
            LoadState::Failed(reason) => {
                warn!(%reason, "carrier unavailable, push disabled");
                self.carrier_load = None;
            }
        }
    }

    pub fn playground(&self) -> &Playground {
        &self.playground
    }

    pub fn sound_player(&self) -> &ImpactSoundPlayer {
        &self.sounds
    }
}
