//! Scene lifecycle glue: saving records into the host's extended data and
//! reconciling them back after the host has finished loading a scene.

pub mod reconcile;
pub mod resolver;

pub use reconcile::{
    apply_light_settings, apply_reflection_probe_settings, build_light_settings, build_reflection_probe_settings,
    import_light_settings, ReconcileReport,
};
pub use resolver::{find_mapped_setting_for_light, find_setting_for_light, ImportMap};

use crate::config::PluginConfig;
use crate::persist::{
    encode_records, ExtendedDataStore, PluginData, PluginValue, Result, DEFAULT_PROBE_FLAG_KEY, LIGHT_DATA_KEY,
    PRESET_KEY, REFLECTION_PROBE_KEY,
};
use crate::preset::Preset;
use crate::scene::GraphicsHost;
use crate::settings::{LightAliases, LightSetting, ReflectionProbeSetting};

/// Kind of scene transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOperation {
    Load,
    /// Objects from another save were merged into the current scene.
    Import,
    Clear,
}

/// A scene load waiting for the host to finish instantiating objects.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    pub operation: SceneOperation,
    pub data: Option<PluginData>,
    pub imported: ImportMap,
    frames_left: u32,
    ready: bool,
}

impl PendingLoad {
    fn due(&self) -> bool {
        self.ready || self.frames_left == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub preset_applied: bool,
    pub probes_applied: usize,
    pub default_probe: bool,
    /// `None` when the payload had no light records.
    pub lights: Option<ReconcileReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(LoadReport),
    Imported { applied: usize },
    Cleared,
}

pub struct SceneController {
    load_delay_frames: u32,
    aliases: LightAliases,
    pending: Option<PendingLoad>,
}

impl SceneController {
    pub fn new(load_delay_frames: u32) -> Self {
        Self {
            load_delay_frames,
            aliases: LightAliases::new(),
            pending: None,
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(config.load_delay_frames)
    }

    pub fn aliases(&self) -> &LightAliases {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut LightAliases {
        &mut self.aliases
    }

    pub fn on_scene_save<H, S>(&mut self, host: &mut H, store: &mut S) -> Result<()>
    where
        H: GraphicsHost + ?Sized,
        S: ExtendedDataStore + ?Sized,
    {
        let data = self.collect(host)?;
        store.set_extended_data(data);
        log::info!("Saved graphics settings to scene data");
        Ok(())
    }

    /// Queue a load. Matching runs from [`SceneController::tick`] once the
    /// host has had time to assign object ids.
    pub fn on_scene_load<S: ExtendedDataStore + ?Sized>(
        &mut self,
        operation: SceneOperation,
        store: &S,
        imported: ImportMap,
    ) {
        if self.pending.is_some() {
            log::warn!("Scene load queued while another was pending, dropping the older one");
        }
        self.pending = Some(PendingLoad {
            operation,
            data: store.extended_data(),
            imported,
            frames_left: self.load_delay_frames,
            ready: false,
        });
    }

    /// Host signal that every object of the loaded scene exists.
    pub fn mark_ready(&mut self) {
        if let Some(pending) = &mut self.pending {
            pending.ready = true;
        }
    }

    pub fn is_load_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }

    /// Advance the load deferral by one frame. Returns the outcome when a
    /// queued load ran during this tick.
    pub fn tick<H: GraphicsHost + ?Sized>(&mut self, host: &mut H) -> Option<LoadOutcome> {
        let pending = self.pending.as_mut()?;
        if !pending.due() {
            pending.frames_left -= 1;
            if !pending.due() {
                return None;
            }
        }
        let pending = self.pending.take()?;
        Some(self.run_load(host, pending))
    }

    /// Whole-scene payload as one blob, for copy and paste between scenes.
    pub fn export_setting_bytes<H: GraphicsHost + ?Sized>(&mut self, host: &mut H) -> Result<Vec<u8>> {
        self.collect(host)?.to_bytes()
    }

    /// Apply a blob from [`SceneController::export_setting_bytes`] immediately.
    pub fn import_setting_bytes<H: GraphicsHost + ?Sized>(&mut self, host: &mut H, bytes: &[u8]) -> Result<LoadReport> {
        let data = PluginData::from_bytes(bytes)?;
        Ok(self.load_data(host, &data))
    }

    fn collect<H: GraphicsHost + ?Sized>(&self, host: &mut H) -> Result<PluginData> {
        let lights = build_light_settings(host, &self.aliases);
        let probes = build_reflection_probe_settings(&*host);
        let preset = Preset::capture(&*host);

        let mut data = PluginData::new();
        data.insert(PRESET_KEY, PluginValue::Bytes(preset.to_bytes()?));
        data.insert(LIGHT_DATA_KEY, PluginValue::Bytes(encode_records(&lights)?));
        data.insert(REFLECTION_PROBE_KEY, PluginValue::Bytes(encode_records(&probes)?));
        // An unlit default probe is saved as absent.
        let default_probe = host.default_probe().is_some_and(|state| state.intensity > 0.0);
        data.insert(DEFAULT_PROBE_FLAG_KEY, PluginValue::Bool(default_probe));
        log::debug!("Collected {} light and {} probe records", lights.len(), probes.len());
        Ok(data)
    }

    fn run_load<H: GraphicsHost + ?Sized>(&mut self, host: &mut H, pending: PendingLoad) -> LoadOutcome {
        match pending.operation {
            SceneOperation::Clear => {
                self.aliases = LightAliases::new();
                host.setup_default_probe(None, false);
                LoadOutcome::Cleared
            }
            SceneOperation::Import => {
                let lights = pending
                    .data
                    .as_ref()
                    .and_then(|data| decode_or_log::<LightSetting>(data, LIGHT_DATA_KEY));
                let applied = match lights {
                    Some(lights) => import_light_settings(host, &lights, &pending.imported, &mut self.aliases),
                    None => 0,
                };
                log::info!("Applied graphics settings to {} imported lights", applied);
                LoadOutcome::Imported { applied }
            }
            SceneOperation::Load => match &pending.data {
                Some(data) => LoadOutcome::Loaded(self.load_data(host, data)),
                None => {
                    log::info!("Scene has no graphics settings");
                    LoadOutcome::Loaded(LoadReport::default())
                }
            },
        }
    }

    fn load_data<H: GraphicsHost + ?Sized>(&mut self, host: &mut H, data: &PluginData) -> LoadReport {
        let mut report = LoadReport::default();

        if let Some(bytes) = data.bytes(PRESET_KEY) {
            match Preset::from_bytes(bytes) {
                Ok(mut preset) => {
                    preset.apply_parameters(host);
                    report.preset_applied = true;
                }
                Err(err) => log::error!("Couldn't read scene render settings: {}", err),
            }
        }

        if let Some(probes) = decode_or_log::<ReflectionProbeSetting>(data, REFLECTION_PROBE_KEY) {
            report.probes_applied = apply_reflection_probe_settings(host, &probes);
        }

        report.default_probe = data.flag(DEFAULT_PROBE_FLAG_KEY);
        let default_setting = host.render_settings().lighting.default_reflection_probe.clone();
        host.setup_default_probe(default_setting.as_ref(), report.default_probe);

        if let Some(lights) = decode_or_log::<LightSetting>(data, LIGHT_DATA_KEY) {
            report.lights = Some(apply_light_settings(host, &lights, &mut self.aliases));
        }

        log::info!(
            "Applied scene graphics settings: {} probes, {} lights",
            report.probes_applied,
            report.lights.as_ref().map_or(0, |lights| lights.applied)
        );
        report
    }
}

/// Decode one record collection. Corrupt blobs are logged and skipped.
fn decode_or_log<T: serde::de::DeserializeOwned>(data: &PluginData, key: &str) -> Option<Vec<T>> {
    match data.records(key)? {
        Ok(records) => Some(records),
        Err(err) => {
            log::error!("Couldn't decode '{}': {}", key, err);
            None
        }
    }
}
