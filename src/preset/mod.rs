//! Standalone preset files bundling all global render settings.

pub mod manager;

pub use manager::PresetManager;

use crate::persist::{Envelope, EnvelopeError};
use crate::scene::{GraphicsHost, ProbeHost, RenderingHost};
use crate::settings::global::{
    CameraSettings, CtaaSettings, GlobalSettings, GtaoSettings, LightingSettings, PostProcessingSettings,
    SssSettings,
};
use crate::settings::skybox::SkyboxParams;
use crate::settings::{LightSetting, ReflectionProbeSetting, SkyboxSettings};
use std::path::Path;

pub const DEBUG_MIRROR_FILE: &str = "debug.json";
pub const DEFAULT_PROBE_NAME: &str = "Default Reflection Probe";

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preset blob error: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PresetError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub overwrite: bool,
    pub debug_mirror: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            debug_mirror: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Preset {
    pub global: GlobalSettings,
    pub camera: CameraSettings,
    pub lights: LightingSettings,
    pub pp: PostProcessingSettings,
    pub sss: Option<SssSettings>,
    pub skybox: SkyboxParams,
    /// Shader-specific values, absent when the active skybox shader is unknown.
    pub skybox_setting: Option<SkyboxSettings>,
    pub gtao: GtaoSettings,
    /// Absent in presets written before CTAA support.
    pub ctaa: Option<CtaaSettings>,
    pub light_settings: Vec<LightSetting>,
    pub probe_settings: Vec<ReflectionProbeSetting>,
}

impl Preset {
    pub fn capture<H: RenderingHost + ProbeHost + ?Sized>(host: &H) -> Self {
        let mut preset = Self::default();
        preset.update_parameters(host);
        preset
    }

    /// Refresh the global blocks from the host. Scene records are left as they are.
    pub fn update_parameters<H: RenderingHost + ProbeHost + ?Sized>(&mut self, host: &H) {
        let render = host.render_settings();
        self.global = render.global.clone();
        self.camera = render.camera.clone();
        self.lights = render.lighting.clone();
        self.pp = render.post_processing.clone();
        self.sss = render.sss.clone();
        self.skybox = render.skybox.clone();
        self.gtao = render.gtao.clone();
        self.ctaa = Some(render.ctaa.clone());

        self.skybox_setting = host.skybox_material().and_then(SkyboxSettings::from_material);
        if self.skybox_setting.is_none() {
            log::debug!("Active skybox shader is not captured");
        }

        self.lights.default_reflection_probe = host
            .default_probe()
            .filter(|state| state.intensity > 0.0)
            .map(|state| ReflectionProbeSetting::from_state(DEFAULT_PROBE_NAME, state));
    }

    pub fn with_scene_records(
        mut self,
        light_settings: Vec<LightSetting>,
        probe_settings: Vec<ReflectionProbeSetting>,
    ) -> Self {
        self.light_settings = light_settings;
        self.probe_settings = probe_settings;
        self
    }

    /// Push the global blocks onto the host. A missing CTAA block is filled with defaults.
    pub fn apply_parameters<H: GraphicsHost + ?Sized>(&mut self, host: &mut H) {
        let ctaa = self.ctaa.get_or_insert_with(CtaaSettings::default).clone();
        {
            let render = host.render_settings_mut();
            render.global = self.global.clone();
            render.camera = self.camera.clone();
            render.lighting = self.lights.clone();
            render.post_processing = self.pp.clone();
            if let Some(sss) = &self.sss {
                render.sss = Some(sss.clone());
            }
            render.skybox = self.skybox.clone();
            render.gtao = self.gtao.clone();
            render.ctaa = ctaa;
        }

        if let Some(skybox) = &self.skybox_setting {
            match host.skybox_material_mut() {
                Some(material) => {
                    if !skybox.apply(material) {
                        log::info!(
                            "Skipping {:?} skybox values, active shader is '{}'",
                            skybox.kind(),
                            material.shader_name()
                        );
                    }
                }
                None => log::debug!("No skybox material to apply {:?} values to", skybox.kind()),
            }
        }

        let default_probe = self.lights.default_reflection_probe.as_ref();
        host.setup_default_probe(default_probe, default_probe.is_some());
    }

    pub fn to_bytes(&self) -> crate::persist::Result<Vec<u8>> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        Ok(Envelope::PRESET.seal(&payload))
    }

    pub fn from_bytes(bytes: &[u8]) -> crate::persist::Result<Self> {
        let payload = Envelope::PRESET.open(bytes)?;
        let (preset, _) = bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
        Ok(preset)
    }

    pub fn to_debug_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the preset to `path`. Returns `Ok(false)` when the file exists and
    /// overwriting was not requested.
    pub fn save(&self, path: &Path, options: SaveOptions) -> Result<bool> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.to_bytes()?;

        if path.exists() {
            if !options.overwrite {
                log::info!("Preset {} already exists, not overwriting", path.display());
                return Ok(false);
            }
            std::fs::remove_file(path)?;
        }
        std::fs::write(path, bytes)?;

        if options.debug_mirror {
            let mirror = path.with_file_name(DEBUG_MIRROR_FILE);
            std::fs::write(&mirror, self.to_debug_json()?)?;
        }
        log::info!("Saved preset {}", path.display());
        Ok(true)
    }

    /// Read a preset without touching any live state. Failures are logged and yield `None`.
    pub fn open(path: &Path, name: &str) -> Option<Self> {
        if !path.exists() {
            log::info!("Couldn't find preset file '{}' at {}", name, path.display());
            return None;
        }
        match Self::read(path) {
            Ok(preset) => Some(preset),
            Err(err) => {
                log::error!("Couldn't open preset file '{}' at {}", name, path.display());
                log::error!("{}", err);
                None
            }
        }
    }

    /// Read and apply the preset's global blocks. Returns false, with live state
    /// untouched, when the file is missing or unreadable.
    pub fn load<H: GraphicsHost + ?Sized>(host: &mut H, path: &Path, name: &str) -> bool {
        let Some(mut preset) = Self::open(path, name) else {
            return false;
        };
        preset.apply_parameters(host);
        log::info!("Loaded preset '{}'", name);
        true
    }

    fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::{MemoryMaterial, MemoryScene};
    use crate::scene::ProbeState;
    use crate::settings::skybox::SkyboxMaterial;
    use crate::settings::SkyboxKind;

    fn tuned_scene() -> MemoryScene {
        let mut scene = MemoryScene::new();
        let render = scene.render_settings_mut();
        render.camera.field_of_view = 40.0;
        render.post_processing.set_focal_distance(3.5);
        render.gtao.enabled = true;
        render.ctaa.sharpness = 0.8;
        let mut material = MemoryMaterial::new(SkyboxKind::Procedural.shader_name());
        material.set_float("_Exposure", 2.0);
        scene.set_skybox(Some(material));
        scene
    }

    #[test]
    fn test_capture_reads_render_state_and_skybox() {
        let scene = tuned_scene();
        let preset = Preset::capture(&scene);
        assert_eq!(preset.camera.field_of_view, 40.0);
        assert_eq!(preset.pp.focal_distance(), 3.5);
        assert_eq!(preset.ctaa.as_ref().map(|ctaa| ctaa.sharpness), Some(0.8));
        assert_eq!(preset.skybox_setting.as_ref().map(SkyboxSettings::kind), Some(SkyboxKind::Procedural));
        assert!(preset.lights.default_reflection_probe.is_none());
    }

    #[test]
    fn test_default_probe_captured_only_when_lit() {
        let mut scene = MemoryScene::new();
        scene.set_default_probe(Some(ProbeState {
            intensity: 0.0,
            ..ProbeState::default()
        }));
        assert!(Preset::capture(&scene).lights.default_reflection_probe.is_none());

        scene.set_default_probe(Some(ProbeState::default()));
        let preset = Preset::capture(&scene);
        let probe = preset.lights.default_reflection_probe.unwrap();
        assert_eq!(probe.name, DEFAULT_PROBE_NAME);
        assert!(probe.hierarchy_path.is_none());
    }

    #[test]
    fn test_apply_fills_missing_ctaa_with_defaults() {
        let mut scene = tuned_scene();
        let mut preset = Preset::capture(&scene);
        preset.ctaa = None;
        preset.apply_parameters(&mut scene);
        assert_eq!(preset.ctaa, Some(CtaaSettings::default()));
        assert_eq!(scene.render_settings().ctaa, CtaaSettings::default());
    }

    #[test]
    fn test_file_roundtrip_with_debug_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evening.preset");
        let source = tuned_scene();
        let preset = Preset::capture(&source);

        assert!(preset.save(&path, SaveOptions::default()).unwrap());
        assert!(dir.path().join(DEBUG_MIRROR_FILE).exists());

        let mut target = MemoryScene::new();
        target.set_skybox(Some(MemoryMaterial::new(SkyboxKind::Procedural.shader_name())));
        assert!(Preset::load(&mut target, &path, "evening"));
        assert_eq!(target.render_settings().camera.field_of_view, 40.0);
        assert_eq!(target.render_settings().post_processing.focal_distance(), 3.5);
        assert_eq!(target.skybox_material().and_then(|m| m.float("_Exposure")), Some(2.0));
    }

    #[test]
    fn test_save_respects_overwrite_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.preset");
        let preset = Preset::default();
        let options = SaveOptions {
            overwrite: false,
            debug_mirror: false,
        };
        assert!(preset.save(&path, options).unwrap());
        assert!(!preset.save(&path, options).unwrap());
        assert!(!dir.path().join(DEBUG_MIRROR_FILE).exists());
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = MemoryScene::new();
        assert!(!Preset::load(&mut scene, &dir.path().join("nope.preset"), "nope"));
    }

    #[test]
    fn test_corrupt_file_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.preset");
        let mut bytes = Preset::default().to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x55;
        std::fs::write(&path, bytes).unwrap();

        let mut scene = tuned_scene();
        let before = scene.render_settings().clone();
        assert!(!Preset::load(&mut scene, &path, "broken"));
        assert_eq!(scene.render_settings(), &before);
    }
}
