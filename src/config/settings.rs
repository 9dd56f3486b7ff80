use directories::ProjectDirs;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

const CONFIG_FILE: &str = "simulation.toml";

// =============================================================================
// Simulation Configuration
// =============================================================================

/// Gravity and stepping parameters for the physics world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    pub gravity: [f32; 3],
    pub fixed_timestep: f32,
    pub max_substeps: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.87, 0.0],
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 3,
        }
    }
}

impl WorldSettings {
    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }
}

/// Default contact response between spawned surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSettings {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.3,
        }
    }
}

/// Randomization bounds for interactive spawning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSettings {
    pub sphere_radius_max: f32,
    pub box_size_max: f32,
    pub area_extent: f32,
    pub drop_height: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            sphere_radius_max: 0.5,
            box_size_max: 2.0,
            area_extent: 3.0,
            drop_height: 3.0,
        }
    }
}

/// The imported carrier model and the force used to shove it around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierSettings {
    pub manifest: String,
    pub position: [f32; 3],
    pub push_force: [f32; 3],
}

impl Default for CarrierSettings {
    fn default() -> Self {
        Self {
            manifest: "models/carrier.json".to_string(),
            position: [-20.0, 0.5, 0.0],
            push_force: [1500.0, 5.0, 0.0],
        }
    }
}

impl CarrierSettings {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn push_force(&self) -> Vec3 {
        Vec3::from_array(self.push_force)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    pub enabled: bool,
    pub sound: String,
    pub impact_threshold: f32,
    pub master_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: "sounds/hit.mp3".to_string(),
            impact_threshold: 1.4,
            master_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub world: WorldSettings,
    pub contact: ContactSettings,
    pub spawn: SpawnSettings,
    pub carrier: CarrierSettings,
    pub audio: AudioSettings,
}

pub type SimulationSettingsHandle = Arc<RwLock<SimulationSettings>>;

pub fn create_settings_handle(settings: SimulationSettings) -> SimulationSettingsHandle {
    Arc::new(RwLock::new(settings))
}

// Simulation configuration file management
fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tumblebox", "tumblebox")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

pub fn save_simulation_settings(settings: &SimulationSettings) -> std::io::Result<()> {
    if let Some(path) = config_path() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(settings)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, toml)?;
    }
    Ok(())
}

pub fn load_simulation_settings() -> Option<SimulationSettings> {
    if let Some(path) = config_path() {
        if let Ok(data) = fs::read_to_string(path) {
            if let Ok(settings) = toml::from_str::<SimulationSettings>(&data) {
                return Some(settings);
            }
        }
    }
    None
}
