use super::hierarchy::HierarchyPath;
use crate::scene::{LightHandle, LightHost, LightState, LightType};
use std::collections::HashMap;

/// Saved state of one light plus the descriptor used to find it again.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightSetting {
    /// Host object id, absent for lights the host does not manage.
    pub light_id: Option<i32>,
    /// Absent in records written before paths were captured.
    pub hierarchy_path: Option<HierarchyPath>,
    /// Display name, also used to name placeholder lights.
    pub light_name: String,
    pub light_type: LightType,
    pub state: LightState,
}

impl LightSetting {
    pub fn fill_from<H: LightHost + ?Sized>(host: &H, light: LightHandle, aliases: &LightAliases) -> Self {
        Self {
            light_id: host.object_key(light),
            hierarchy_path: Some(HierarchyPath::from_node(host, light.node())),
            light_name: aliases.name_for(light, host.native_name(light)).to_string(),
            light_type: host.light_type(light),
            state: host.light_state(light),
        }
    }

    /// Write the saved state onto `light`. A saved name that differs from the
    /// light's own name is staged as an alias until [`LightAliases::flush`].
    pub fn apply_to<H: LightHost + ?Sized>(&self, host: &mut H, light: LightHandle, aliases: &mut LightAliases) {
        host.set_light_state(light, &self.state);
        if self.light_name.is_empty() || self.light_name == host.native_name(light) {
            aliases.stage(light, None);
        } else {
            aliases.stage(light, Some(self.light_name.clone()));
        }
    }
}

/// User-facing display names for lights whose engine object keeps a different name.
#[derive(Debug, Default, Clone)]
pub struct LightAliases {
    active: HashMap<LightHandle, String>,
    staged: HashMap<LightHandle, Option<String>>,
}

impl LightAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_for<'a>(&'a self, light: LightHandle, native: &'a str) -> &'a str {
        self.active.get(&light).map(String::as_str).unwrap_or(native)
    }

    pub fn is_aliased(&self, light: LightHandle) -> bool {
        self.active.contains_key(&light)
    }

    pub fn set_alias(&mut self, light: LightHandle, name: impl Into<String>) {
        self.active.insert(light, name.into());
    }

    pub fn clear_alias(&mut self, light: LightHandle) {
        self.active.remove(&light);
    }

    /// Drop everything known about a destroyed light.
    pub fn forget(&mut self, light: LightHandle) {
        self.active.remove(&light);
        self.staged.remove(&light);
    }

    pub fn stage(&mut self, light: LightHandle, name: Option<String>) {
        self.staged.insert(light, name);
    }

    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Commit staged aliases. Returns how many entries were committed.
    pub fn flush(&mut self) -> usize {
        let count = self.staged.len();
        for (light, name) in self.staged.drain() {
            match name {
                Some(name) => {
                    self.active.insert(light, name);
                }
                None => {
                    self.active.remove(&light);
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemoryScene;

    #[test]
    fn test_fill_captures_identity_and_state() {
        let mut scene = MemoryScene::new();
        let map = scene.add_node("Map", None);
        let light = scene.add_light("Sun", Some(map), LightType::Directional, Some(12));
        let mut state = scene.light_state(light);
        state.intensity = 2.5;
        scene.set_light_state(light, &state);

        let setting = LightSetting::fill_from(&scene, light, &LightAliases::new());
        assert_eq!(setting.light_id, Some(12));
        assert_eq!(setting.light_name, "Sun");
        assert_eq!(setting.light_type, LightType::Directional);
        assert_eq!(setting.state.intensity, 2.5);
        assert!(setting.hierarchy_path.unwrap().matches(&scene, light.node()));
    }

    #[test]
    fn test_fill_uses_alias_name() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Directional Light", None, LightType::Directional, None);
        let mut aliases = LightAliases::new();
        aliases.set_alias(light, "Key Light");

        let setting = LightSetting::fill_from(&scene, light, &aliases);
        assert_eq!(setting.light_name, "Key Light");
    }

    #[test]
    fn test_apply_stages_alias_until_flush() {
        let mut scene = MemoryScene::new();
        let source = scene.add_light("Key Light", None, LightType::Point, None);
        let target = scene.add_light("Point Light", None, LightType::Point, None);
        let mut aliases = LightAliases::new();
        let setting = LightSetting::fill_from(&scene, source, &aliases);

        setting.apply_to(&mut scene, target, &mut aliases);
        assert!(!aliases.is_aliased(target));
        assert_eq!(aliases.pending(), 1);

        assert_eq!(aliases.flush(), 1);
        assert_eq!(aliases.name_for(target, "Point Light"), "Key Light");
        assert_eq!(aliases.pending(), 0);
    }

    #[test]
    fn test_apply_with_native_name_clears_alias() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Point Light", None, LightType::Point, None);
        let mut aliases = LightAliases::new();
        aliases.set_alias(light, "Old Alias");
        let mut setting = LightSetting::fill_from(&scene, light, &aliases);
        setting.light_name = "Point Light".to_string();

        setting.apply_to(&mut scene, light, &mut aliases);
        aliases.flush();
        assert!(!aliases.is_aliased(light));
    }
}
