//! Building record collections from the live scene and applying them back.
//!
//! Unmatched records and unmatched live objects are expected outcomes here,
//! not errors: saved scenes are shared between users with different content.

use super::resolver::{
    find_mapped_setting_index, find_setting_for_probe, has_hierarchy_data, pair_probes_by_name, resolve_light_index,
    ImportMap,
};
use crate::scene::{LightHandle, LightHost, LightType, ProbeHost};
use crate::settings::{LightAliases, LightSetting, ReflectionProbeSetting};

/// Outcome of [`apply_light_settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Number of live lights that received a record, placeholders included.
    pub applied: usize,
    /// Placeholder directional lights created for orphaned records, in saved order.
    pub created: Vec<LightHandle>,
    /// Indices of records that ended up on no live light.
    pub dropped: Vec<usize>,
    /// True when the collection had no hierarchy data and was paired by position.
    pub positional: bool,
}

/// Emit one record per live light: directional, then point, then spot, each
/// group in the host's discovery order.
pub fn build_light_settings<H: LightHost + ?Sized>(host: &mut H, aliases: &LightAliases) -> Vec<LightSetting> {
    host.refresh();
    host.all_lights()
        .into_iter()
        .map(|light| LightSetting::fill_from(&*host, light, aliases))
        .collect()
}

pub fn apply_light_settings<H: LightHost + ?Sized>(
    host: &mut H,
    settings: &[LightSetting],
    aliases: &mut LightAliases,
) -> ReconcileReport {
    host.refresh();
    let mut report = ReconcileReport::default();
    let mut matched = vec![false; settings.len()];

    if has_hierarchy_data(settings) {
        for light_type in LightType::GROUP_ORDER {
            for light in host.lights(light_type) {
                let Some(index) = resolve_light_index(&*host, light, settings, |index| matched[index]) else {
                    continue;
                };
                settings[index].apply_to(host, light, aliases);
                matched[index] = true;
                report.applied += 1;
            }
        }
    } else {
        // Legacy data: the n-th record goes to the n-th live light. Live lights
        // beyond the saved count keep their current values.
        report.positional = true;
        let mut records = settings.iter().enumerate();
        'groups: for light_type in LightType::GROUP_ORDER {
            for light in host.lights(light_type) {
                let Some((index, setting)) = records.next() else {
                    break 'groups;
                };
                setting.apply_to(host, light, aliases);
                matched[index] = true;
                report.applied += 1;
            }
        }
    }

    let orphans: Vec<usize> = settings
        .iter()
        .enumerate()
        .filter(|(index, setting)| !matched[*index] && setting.light_type == LightType::Directional)
        .map(|(index, _)| index)
        .collect();

    if !orphans.is_empty() && !host.inside_studio() {
        let placeholders: Vec<(LightHandle, usize)> = orphans
            .iter()
            .map(|index| {
                let setting = &settings[*index];
                log::info!(
                    "Adding placeholder light '{}' (key {:?}, path {})",
                    setting.light_name,
                    setting.light_id,
                    setting
                        .hierarchy_path
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |path| path.to_string())
                );
                (host.spawn_directional(&setting.light_name), *index)
            })
            .collect();

        host.refresh();
        let directional = host.lights(LightType::Directional);
        for (light, index) in placeholders {
            if !directional.contains(&light) {
                log::warn!("Placeholder light '{}' was not indexed", settings[index].light_name);
                continue;
            }
            settings[index].apply_to(host, light, aliases);
            matched[index] = true;
            report.applied += 1;
            report.created.push(light);
        }
    }

    report.dropped = matched
        .iter()
        .enumerate()
        .filter(|(_, applied)| !**applied)
        .map(|(index, _)| index)
        .collect();
    if !report.dropped.is_empty() {
        log::debug!("{} saved light records had no live counterpart", report.dropped.len());
    }

    aliases.flush();
    report
}

/// Apply records to freshly imported lights. Never creates lights.
pub fn import_light_settings<H: LightHost + ?Sized>(
    host: &mut H,
    settings: &[LightSetting],
    imported: &ImportMap,
    aliases: &mut LightAliases,
) -> usize {
    host.refresh();
    if !has_hierarchy_data(settings) {
        log::debug!("Skipping light import: saved data has no hierarchy paths");
        return 0;
    }

    let lights = host.all_lights();
    let mut applied = 0;
    for new_key in imported.new_keys() {
        let Some(light) = lights.iter().copied().find(|light| host.object_key(*light) == Some(new_key)) else {
            continue;
        };
        if let Some(index) = find_mapped_setting_index(&*host, light, imported, settings) {
            settings[index].apply_to(host, light, aliases);
            applied += 1;
        }
    }
    aliases.flush();
    applied
}

pub fn build_reflection_probe_settings<H: ProbeHost + ?Sized>(host: &H) -> Vec<ReflectionProbeSetting> {
    host.probes()
        .into_iter()
        .map(|probe| ReflectionProbeSetting::fill_from(host, probe))
        .collect()
}

/// Returns the number of live probes that received a record. Probes are never created.
pub fn apply_reflection_probe_settings<H: ProbeHost + ?Sized>(
    host: &mut H,
    settings: &[ReflectionProbeSetting],
) -> usize {
    let probes = host.probes();
    if probes.is_empty() || settings.is_empty() {
        return 0;
    }

    let pairs: Vec<_> = if settings[0].hierarchy_path.is_none() {
        pair_probes_by_name(&*host, settings)
            .into_iter()
            .map(|(probe, setting)| (probe, setting.clone()))
            .collect()
    } else {
        probes
            .into_iter()
            .filter_map(|probe| find_setting_for_probe(&*host, probe, settings).map(|setting| (probe, setting.clone())))
            .collect()
    };

    for (probe, setting) in &pairs {
        setting.apply_to(host, *probe);
    }
    pairs.len()
}
