pub mod settings;

// Re-export commonly used types
pub use settings::{
    create_settings_handle, load_simulation_settings, save_simulation_settings, AudioSettings,
    CarrierSettings, ContactSettings, SimulationSettings, SimulationSettingsHandle, SpawnSettings,
    WorldSettings,
};
