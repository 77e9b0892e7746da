//! Matching saved records to live objects.
//!
//! Lights are resolved with an ordered strategy chain, first success wins:
//! host id plus hierarchy path, host id alone, then hierarchy path alone.
//! Probes have no host id and match by path, or by name and ordinal
//! occurrence when the saved data predates hierarchy paths.

use crate::scene::{LightHandle, LightHost, ProbeHandle, ProbeHost};
use crate::settings::{LightSetting, ReflectionProbeSetting};
use std::collections::BTreeMap;

/// Id remap produced by a cross-scene import: pre-import id to freshly assigned id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    old_to_new: BTreeMap<i32, i32>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old_key: i32, new_key: i32) {
        self.old_to_new.insert(old_key, new_key);
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    /// Pre-import id of the object that now carries `new_key`.
    pub fn old_key_for(&self, new_key: i32) -> Option<i32> {
        self.old_to_new
            .iter()
            .find(|(_, new)| **new == new_key)
            .map(|(old, _)| *old)
    }

    /// Freshly assigned ids in pre-import id order.
    pub fn new_keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.old_to_new.values().copied()
    }
}

impl FromIterator<(i32, i32)> for ImportMap {
    fn from_iter<I: IntoIterator<Item = (i32, i32)>>(iter: I) -> Self {
        Self {
            old_to_new: iter.into_iter().collect(),
        }
    }
}

/// True when the collection carries hierarchy paths. Legacy saves do not.
pub fn has_hierarchy_data(settings: &[LightSetting]) -> bool {
    settings.first().is_some_and(|setting| setting.hierarchy_path.is_some())
}

/// Resolve `light` against `settings`, ignoring candidates for which `skip` returns true.
pub fn resolve_light_index<H, F>(host: &H, light: LightHandle, settings: &[LightSetting], skip: F) -> Option<usize>
where
    H: LightHost + ?Sized,
    F: Fn(usize) -> bool,
{
    let path_matches = |setting: &LightSetting| {
        setting
            .hierarchy_path
            .as_ref()
            .is_some_and(|path| path.matches(host, light.node()))
    };
    let skip = &skip;
    let candidates = move || settings.iter().enumerate().filter(move |(index, _)| !skip(*index));

    if let Some(key) = host.object_key(light) {
        if let Some((index, _)) =
            candidates().find(|(_, setting)| setting.light_id == Some(key) && path_matches(*setting))
        {
            log::debug!("Light {} matched by key and hierarchy", key);
            return Some(index);
        }
        if let Some((index, _)) = candidates().find(|(_, setting)| setting.light_id == Some(key)) {
            log::debug!("Light {} matched by key only", key);
            return Some(index);
        }
    }

    let found = candidates().find(|(_, setting)| path_matches(*setting)).map(|(index, _)| index);
    match found {
        Some(index) => log::debug!(
            "Light '{}' matched by hierarchy only (record {})",
            host.native_name(light),
            index
        ),
        None => log::debug!("No saved settings for light '{}'", host.native_name(light)),
    }
    found
}

pub fn find_setting_for_light<'a, H: LightHost + ?Sized>(
    host: &H,
    light: LightHandle,
    settings: &'a [LightSetting],
) -> Option<&'a LightSetting> {
    resolve_light_index(host, light, settings, |_| false).map(|index| &settings[index])
}

/// Import variant: the live light carries a freshly assigned id, while the
/// saved records reference the ids from before the import.
pub fn find_mapped_setting_index<H: LightHost + ?Sized>(
    host: &H,
    light: LightHandle,
    imported: &ImportMap,
    settings: &[LightSetting],
) -> Option<usize> {
    let new_key = host.object_key(light)?;
    let old_key = imported.old_key_for(new_key)?;
    let found = settings.iter().position(|setting| setting.light_id == Some(old_key));
    if found.is_some() {
        log::debug!("Imported light matched by key, old {} new {}", old_key, new_key);
    }
    found
}

pub fn find_mapped_setting_for_light<'a, H: LightHost + ?Sized>(
    host: &H,
    light: LightHandle,
    imported: &ImportMap,
    settings: &'a [LightSetting],
) -> Option<&'a LightSetting> {
    find_mapped_setting_index(host, light, imported, settings).map(|index| &settings[index])
}

/// First record whose hierarchy path matches the probe's current position.
pub fn find_setting_for_probe<'a, H: ProbeHost + ?Sized>(
    host: &H,
    probe: ProbeHandle,
    settings: &'a [ReflectionProbeSetting],
) -> Option<&'a ReflectionProbeSetting> {
    settings.iter().find(|setting| {
        setting
            .hierarchy_path
            .as_ref()
            .is_some_and(|path| path.matches(host, probe.node()))
    })
}

/// Pair records with live probes by name, the n-th saved record of a name
/// going to the n-th live probe of that name. Extra records on either side stay unpaired.
pub fn pair_probes_by_name<'a, H: ProbeHost + ?Sized>(
    host: &H,
    settings: &'a [ReflectionProbeSetting],
) -> Vec<(ProbeHandle, &'a ReflectionProbeSetting)> {
    let probes = host.probes();
    let mut names: Vec<&str> = Vec::new();
    for setting in settings {
        if !names.contains(&setting.name.as_str()) {
            names.push(setting.name.as_str());
        }
    }

    let mut pairs = Vec::new();
    for name in names {
        let live = probes.iter().filter(|probe| host.probe_name(**probe) == name);
        let saved = settings.iter().filter(|setting| setting.name == name);
        pairs.extend(live.copied().zip(saved));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemoryScene;
    use crate::scene::LightType;
    use crate::settings::{HierarchyPath, LightAliases, PathStep};

    fn record(scene: &MemoryScene, light: LightHandle) -> LightSetting {
        LightSetting::fill_from(scene, light, &LightAliases::new())
    }

    #[test]
    fn test_key_and_path_beats_key_only() {
        let mut scene = MemoryScene::new();
        let map = scene.add_node("Map", None);
        let light = scene.add_light("Lamp", Some(map), LightType::Point, Some(5));

        let mut key_only = record(&scene, light);
        key_only.hierarchy_path = Some(HierarchyPath::new(vec![PathStep {
            index: 9,
            name: "Elsewhere".to_string(),
        }]));
        key_only.state.intensity = 1.0;
        let mut exact = record(&scene, light);
        exact.state.intensity = 2.0;

        let settings = vec![key_only, exact];
        let found = find_setting_for_light(&scene, light, &settings).unwrap();
        assert_eq!(found.state.intensity, 2.0);
    }

    #[test]
    fn test_key_only_match_when_path_differs() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Lamp", None, LightType::Point, Some(5));
        let mut saved = record(&scene, light);
        saved.hierarchy_path = Some(HierarchyPath::new(vec![PathStep {
            index: 3,
            name: "Moved".to_string(),
        }]));

        let settings = vec![saved.clone()];
        assert_eq!(find_setting_for_light(&scene, light, &settings), Some(&saved));
    }

    #[test]
    fn test_path_only_match_for_unmanaged_light() {
        let mut scene = MemoryScene::new();
        let map = scene.add_node("Map", None);
        let light = scene.add_light("Sun", Some(map), LightType::Directional, None);
        let other = scene.add_light("Fill", Some(map), LightType::Directional, None);

        let settings = vec![record(&scene, other), record(&scene, light)];
        let found = find_setting_for_light(&scene, light, &settings).unwrap();
        assert_eq!(found.light_name, "Sun");
    }

    #[test]
    fn test_no_match_returns_none() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Sun", None, LightType::Directional, Some(1));
        let other = scene.add_light("Fill", None, LightType::Directional, Some(2));
        let mut saved = record(&scene, other);
        saved.hierarchy_path = None;

        assert!(find_setting_for_light(&scene, light, &[saved]).is_none());
    }

    #[test]
    fn test_skip_excludes_claimed_records() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Sun", None, LightType::Directional, Some(1));
        let settings = vec![record(&scene, light)];
        assert_eq!(resolve_light_index(&scene, light, &settings, |_| false), Some(0));
        assert_eq!(resolve_light_index(&scene, light, &settings, |index| index == 0), None);
    }

    #[test]
    fn test_mapped_lookup_uses_pre_import_key() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Lamp", None, LightType::Point, Some(42));
        let mut saved = record(&scene, light);
        saved.light_id = Some(7);
        saved.state.range = 33.0;
        let mut decoy = saved.clone();
        decoy.light_id = Some(42);
        decoy.state.range = 1.0;

        let imported: ImportMap = [(7, 42)].into_iter().collect();
        let settings = vec![decoy, saved];
        let found = find_mapped_setting_for_light(&scene, light, &imported, &settings).unwrap();
        assert_eq!(found.state.range, 33.0);
    }

    #[test]
    fn test_mapped_lookup_requires_import_entry() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Lamp", None, LightType::Point, Some(42));
        let settings = vec![record(&scene, light)];
        assert!(find_mapped_setting_for_light(&scene, light, &ImportMap::new(), &settings).is_none());
    }

    #[test]
    fn test_probes_pair_by_name_and_occurrence() {
        let mut scene = MemoryScene::new();
        let first = scene.add_probe("Probe A", None);
        let _other = scene.add_probe("Probe B", None);
        let second = scene.add_probe("Probe A", None);

        let mut saved_first = ReflectionProbeSetting::fill_from(&scene, first);
        saved_first.hierarchy_path = None;
        saved_first.state.intensity = 0.25;
        let mut saved_second = saved_first.clone();
        saved_second.state.intensity = 0.75;

        let settings = vec![saved_first, saved_second];
        let pairs = pair_probes_by_name(&scene, &settings);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, first);
        assert_eq!(pairs[0].1.state.intensity, 0.25);
        assert_eq!(pairs[1].0, second);
        assert_eq!(pairs[1].1.state.intensity, 0.75);
    }
}
