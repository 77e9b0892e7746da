//! Named presets and per-map light presets on disk.
//!
//! Layout under the preset directory:
//! `<name>.preset` for full presets, `maps/<map>.light` for map lights and
//! `maps/default/<map>.light` for the lights a map shipped with.

use super::{Preset, Result, SaveOptions};
use crate::config::PluginConfig;
use crate::controller::reconcile::{
    apply_light_settings, apply_reflection_probe_settings, build_light_settings, build_reflection_probe_settings,
    ReconcileReport,
};
use crate::persist::{decode_records, encode_records, Envelope};
use crate::scene::GraphicsHost;
use crate::settings::{LightAliases, LightSetting};
use std::path::{Path, PathBuf};

pub const PRESET_EXTENSION: &str = "preset";
pub const MAP_LIGHTS_EXTENSION: &str = "light";

#[derive(Debug, Clone)]
pub struct PresetManager {
    dir: PathBuf,
    write_debug_mirror: bool,
}

impl PresetManager {
    pub fn new(dir: impl Into<PathBuf>, write_debug_mirror: bool) -> Self {
        Self {
            dir: dir.into(),
            write_debug_mirror,
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(config.preset_dir.clone(), config.write_debug_mirror)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn preset_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, PRESET_EXTENSION))
    }

    pub fn map_lights_path(&self, map: &str, defaults: bool) -> PathBuf {
        let maps = self.dir.join("maps");
        let dir = if defaults { maps.join("default") } else { maps };
        dir.join(format!("{}.{}", map, MAP_LIGHTS_EXTENSION))
    }

    /// Preset names in the directory, sorted. A missing directory lists as empty.
    pub fn list_presets(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PRESET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Capture global settings plus the current light and probe records.
    pub fn save_preset<H: GraphicsHost + ?Sized>(
        &self,
        host: &mut H,
        aliases: &LightAliases,
        name: &str,
        overwrite: bool,
    ) -> Result<bool> {
        let lights = build_light_settings(host, aliases);
        let probes = build_reflection_probe_settings(&*host);
        let preset = Preset::capture(&*host).with_scene_records(lights, probes);
        preset.save(
            &self.preset_path(name),
            SaveOptions {
                overwrite,
                debug_mirror: self.write_debug_mirror,
            },
        )
    }

    /// Apply a named preset. Light and probe records are reconciled only when
    /// the preset carries any.
    pub fn load_preset<H: GraphicsHost + ?Sized>(&self, host: &mut H, aliases: &mut LightAliases, name: &str) -> bool {
        let Some(mut preset) = Preset::open(&self.preset_path(name), name) else {
            return false;
        };
        preset.apply_parameters(host);
        if !preset.probe_settings.is_empty() {
            apply_reflection_probe_settings(host, &preset.probe_settings);
        }
        if !preset.light_settings.is_empty() {
            apply_light_settings(host, &preset.light_settings, aliases);
        }
        log::info!("Loaded preset '{}'", name);
        true
    }

    pub fn save_map_lights<H: GraphicsHost + ?Sized>(
        &self,
        host: &mut H,
        aliases: &LightAliases,
        map: &str,
    ) -> Result<()> {
        let records = build_light_settings(host, aliases);
        self.write_map_lights(&self.map_lights_path(map, false), &records)?;
        log::info!("Saved {} lights for map '{}'", records.len(), map);
        Ok(())
    }

    /// Store the map's current lights as its defaults, unless defaults already exist.
    pub fn capture_map_defaults<H: GraphicsHost + ?Sized>(
        &self,
        host: &mut H,
        aliases: &LightAliases,
        map: &str,
    ) -> Result<bool> {
        let path = self.map_lights_path(map, true);
        if path.exists() {
            return Ok(false);
        }
        let records = build_light_settings(host, aliases);
        self.write_map_lights(&path, &records)?;
        log::info!("Captured default lights for map '{}'", map);
        Ok(true)
    }

    /// Apply saved map lights, or the map's defaults. `None` when the file is
    /// missing or unreadable; live state is untouched in that case.
    pub fn load_map_lights<H: GraphicsHost + ?Sized>(
        &self,
        host: &mut H,
        aliases: &mut LightAliases,
        map: &str,
        defaults: bool,
    ) -> Option<ReconcileReport> {
        let path = self.map_lights_path(map, defaults);
        if !path.exists() {
            log::info!("Couldn't find light preset for map '{}' at {}", map, path.display());
            return None;
        }
        let records = match read_map_lights(&path) {
            Ok(records) => records,
            Err(err) => {
                log::error!("Couldn't open light preset for map '{}' at {}", map, path.display());
                log::error!("{}", err);
                return None;
            }
        };
        Some(apply_light_settings(host, &records, aliases))
    }

    fn write_map_lights(&self, path: &Path, records: &[LightSetting]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = encode_records(records)?;
        std::fs::write(path, Envelope::MAP_LIGHTS.seal(&payload))?;
        Ok(())
    }
}

fn read_map_lights(path: &Path) -> Result<Vec<LightSetting>> {
    let bytes = std::fs::read(path)?;
    let payload = Envelope::MAP_LIGHTS.open(&bytes)?;
    Ok(decode_records(payload)?)
}
