//! egui panel listing live lights by type with an inspector for the selected one.
//!
//! The panel only mutates light state directly. Structural changes (adding,
//! destroying, map presets) are returned as [`InspectorAction`]s so the caller
//! can perform them outside the draw pass and refresh its light index.

use crate::scene::lights::ShadowResolution;
use crate::scene::{LightHandle, LightHost, LightState, LightType, RenderMode, ShadowType};
use crate::settings::global::GlobalSettings;
use crate::settings::LightAliases;

/// Prefix of lights created by the plugin rather than the map.
pub const PLACEHOLDER_PREFIX: &str = "(Graphics) ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectorAction {
    SaveMapLights,
    LoadMapLights,
    LoadDefaultMapLights,
    /// Studio only: ask the host to add one of its own lights.
    AddStudioLight(LightType),
    AddPlaceholder(String),
    Destroy(LightHandle),
}

/// First free `(Graphics) Directional Light N`, counting from 1.
pub fn placeholder_name<H: LightHost + ?Sized>(host: &H) -> String {
    let taken: Vec<&str> = host
        .lights(LightType::Directional)
        .into_iter()
        .map(|light| host.native_name(light))
        .collect();
    (1..)
        .map(|n| format!("{}Directional Light {}", PLACEHOLDER_PREFIX, n))
        .find(|name| !taken.contains(&name.as_str()))
        .unwrap_or_default()
}

pub fn is_placeholder<H: LightHost + ?Sized>(host: &H, light: LightHandle) -> bool {
    host.native_name(light).starts_with(PLACEHOLDER_PREFIX)
}

/// Perform the actions the light index can handle on its own and return the rest.
pub fn apply_actions<H: LightHost + ?Sized>(
    host: &mut H,
    aliases: &mut LightAliases,
    actions: Vec<InspectorAction>,
) -> Vec<InspectorAction> {
    let mut remaining = Vec::new();
    let mut changed = false;
    for action in actions {
        match action {
            InspectorAction::AddPlaceholder(name) => {
                let light = host.spawn_directional(&name);
                log::info!("Added light '{}'", host.native_name(light));
                changed = true;
            }
            InspectorAction::Destroy(light) => {
                log::info!("Removing light '{}'", host.native_name(light));
                aliases.forget(light);
                host.destroy_light(light);
                changed = true;
            }
            other => remaining.push(other),
        }
    }
    if changed {
        host.refresh();
    }
    remaining
}

#[derive(Debug, Default)]
pub struct LightInspector {
    selected: Option<LightHandle>,
    name_buffer: String,
    pub show_advanced: bool,
}

impl LightInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<LightHandle> {
        self.selected
    }

    pub fn select(&mut self, light: Option<LightHandle>) {
        self.selected = light;
        self.name_buffer.clear();
    }

    pub fn draw<H: LightHost + ?Sized>(
        &mut self,
        ui: &mut egui::Ui,
        host: &mut H,
        aliases: &mut LightAliases,
        globals: &mut GlobalSettings,
    ) -> Vec<InspectorAction> {
        let mut actions = Vec::new();
        let inside_studio = host.inside_studio();

        if let Some(selected) = self.selected {
            if !host.all_lights().contains(&selected) {
                self.select(None);
            }
        }

        for light_type in LightType::GROUP_ORDER {
            let lights = host.lights(light_type);
            egui::CollapsingHeader::new(light_type.label())
                .default_open(true)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("All ON").clicked() {
                            for light in &lights {
                                host.set_enabled(*light, true);
                            }
                        }
                        if ui.button("All OFF").clicked() {
                            for light in &lights {
                                host.set_enabled(*light, false);
                            }
                        }
                        if ui.button("+").clicked() {
                            if inside_studio {
                                actions.push(InspectorAction::AddStudioLight(light_type));
                            } else if light_type == LightType::Directional {
                                actions.push(InspectorAction::AddPlaceholder(placeholder_name(&*host)));
                            }
                        }
                    });

                    for light in &lights {
                        let light = *light;
                        ui.horizontal(|ui| {
                            let name = aliases.name_for(light, host.native_name(light)).to_string();
                            if ui.selectable_label(self.selected == Some(light), name).clicked() {
                                self.selected = Some(light);
                                self.name_buffer.clear();
                            }
                            let enabled = host.is_enabled(light);
                            if ui.button(if enabled { "ON" } else { "OFF" }).clicked() {
                                host.set_enabled(light, !enabled);
                            }
                            if !inside_studio && is_placeholder(&*host, light) && ui.button("-").clicked() {
                                actions.push(InspectorAction::Destroy(light));
                            }
                        });
                    }
                });
        }

        ui.separator();
        ui.checkbox(&mut globals.lights_use_color_temperature, "Use color temperature");
        ui.checkbox(&mut self.show_advanced, "Advanced");

        if let Some(light) = self.selected {
            ui.separator();
            if inside_studio {
                self.draw_alias_editor(ui, &*host, aliases, light);
            }
            let mut state = host.light_state(light);
            if draw_light_state(ui, host.light_type(light), &mut state, globals, self.show_advanced) {
                host.set_light_state(light, &state);
            }
        }

        if !inside_studio {
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save Map Lights").clicked() {
                    actions.push(InspectorAction::SaveMapLights);
                }
                if ui.button("Load Map Lights").clicked() {
                    actions.push(InspectorAction::LoadMapLights);
                }
                if ui.button("Load Default").clicked() {
                    actions.push(InspectorAction::LoadDefaultMapLights);
                }
            });
        }

        actions
    }

    fn draw_alias_editor<H: LightHost + ?Sized>(
        &mut self,
        ui: &mut egui::Ui,
        host: &H,
        aliases: &mut LightAliases,
        light: LightHandle,
    ) {
        if self.name_buffer.is_empty() {
            self.name_buffer = aliases.name_for(light, host.native_name(light)).to_string();
        }
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut self.name_buffer);
            if ui.button("Rename").clicked() {
                let name = self.name_buffer.trim();
                if name.is_empty() || name == host.native_name(light) {
                    aliases.clear_alias(light);
                } else {
                    aliases.set_alias(light, name);
                }
            }
            if ui.button("Reset").clicked() {
                aliases.clear_alias(light);
                self.name_buffer.clear();
            }
        });
    }
}

/// Widgets for one light's state. Returns true when anything changed.
fn draw_light_state(
    ui: &mut egui::Ui,
    light_type: LightType,
    state: &mut LightState,
    globals: &GlobalSettings,
    show_advanced: bool,
) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Color");
        changed |= ui.color_edit_button_rgb(&mut state.color).changed();
    });
    if globals.lights_use_color_temperature {
        changed |= ui
            .add(egui::Slider::new(&mut state.color_temperature, 0.0..=30_000.0).text("Temperature"))
            .changed();
    }
    changed |= ui
        .add(egui::Slider::new(&mut state.intensity, 0.0..=8.0).text("Intensity"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut state.indirect_multiplier, 0.0..=8.0).text("Indirect multiplier"))
        .changed();

    egui::ComboBox::from_label("Shadows")
        .selected_text(format!("{:?}", state.shadows))
        .show_ui(ui, |ui| {
            for shadows in [ShadowType::None, ShadowType::Hard, ShadowType::Soft] {
                changed |= ui
                    .selectable_value(&mut state.shadows, shadows, format!("{:?}", shadows))
                    .changed();
            }
        });
    if state.shadows != ShadowType::None {
        changed |= ui
            .add(egui::Slider::new(&mut state.shadow_strength, 0.0..=1.0).text("Strength"))
            .changed();
        egui::ComboBox::from_label("Resolution")
            .selected_text(format!("{:?}", state.shadow_resolution))
            .show_ui(ui, |ui| {
                for resolution in [
                    ShadowResolution::FromQualitySettings,
                    ShadowResolution::Low,
                    ShadowResolution::Medium,
                    ShadowResolution::High,
                    ShadowResolution::VeryHigh,
                ] {
                    changed |= ui
                        .selectable_value(&mut state.shadow_resolution, resolution, format!("{:?}", resolution))
                        .changed();
                }
            });
        changed |= ui
            .add(egui::Slider::new(&mut state.shadow_bias, 0.0..=2.0).text("Bias"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut state.shadow_normal_bias, 0.0..=3.0).text("Normal bias"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut state.shadow_near_plane, 0.0..=10.0).text("Near plane"))
            .changed();
    }

    if light_type.uses_rotation() {
        changed |= ui
            .add(egui::Slider::new(&mut state.rotation.x, -90.0..=90.0).text("Vertical rotation"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut state.rotation.y, -180.0..=180.0).text("Horizontal rotation"))
            .changed();
    } else {
        changed |= ui
            .add(
                egui::Slider::new(&mut state.range, 0.1..=500.0)
                    .logarithmic(true)
                    .text("Range"),
            )
            .changed();
    }
    if light_type == LightType::Spot {
        changed |= ui
            .add(egui::Slider::new(&mut state.spot_angle, 1.0..=179.0).text("Spot angle"))
            .changed();
    }

    if show_advanced {
        egui::ComboBox::from_label("Render mode")
            .selected_text(format!("{:?}", state.render_mode))
            .show_ui(ui, |ui| {
                for mode in [RenderMode::Auto, RenderMode::ForcePixel, RenderMode::ForceVertex] {
                    changed |= ui
                        .selectable_value(&mut state.render_mode, mode, format!("{:?}", mode))
                        .changed();
                }
            });
        ui.horizontal(|ui| {
            ui.label("Culling mask");
            changed |= ui.add(egui::DragValue::new(&mut state.culling_mask)).changed();
        });
        changed |= ui
            .checkbox(&mut state.additional_cam_light, "Additional camera light")
            .changed();
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemoryScene;

    fn run_frame(
        inspector: &mut LightInspector,
        scene: &mut MemoryScene,
        aliases: &mut LightAliases,
        globals: &mut GlobalSettings,
    ) -> Vec<InspectorAction> {
        let ctx = egui::Context::default();
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                actions = inspector.draw(ui, scene, aliases, globals);
            });
        });
        actions
    }

    #[test]
    fn test_placeholder_names_fill_gaps() {
        let mut scene = MemoryScene::new();
        assert_eq!(placeholder_name(&scene), "(Graphics) Directional Light 1");
        scene.add_light("(Graphics) Directional Light 1", None, LightType::Directional, None);
        scene.add_light("(Graphics) Directional Light 3", None, LightType::Directional, None);
        assert_eq!(placeholder_name(&scene), "(Graphics) Directional Light 2");
    }

    #[test]
    fn test_apply_actions_spawns_and_destroys() {
        let mut scene = MemoryScene::new();
        let mut aliases = LightAliases::new();
        let map_light = scene.add_light("Sun", None, LightType::Directional, Some(1));
        aliases.set_alias(map_light, "Key");

        let name = placeholder_name(&scene);
        let remaining = apply_actions(
            &mut scene,
            &mut aliases,
            vec![InspectorAction::AddPlaceholder(name), InspectorAction::SaveMapLights],
        );
        assert_eq!(remaining, vec![InspectorAction::SaveMapLights]);
        let placeholder = scene.find_light("(Graphics) Directional Light 1").unwrap();
        assert!(is_placeholder(&scene, placeholder));
        assert!(!is_placeholder(&scene, map_light));
        assert_eq!(scene.lights(LightType::Directional).len(), 2);

        apply_actions(&mut scene, &mut aliases, vec![InspectorAction::Destroy(map_light)]);
        assert!(!aliases.is_aliased(map_light));
        assert_eq!(scene.lights(LightType::Directional), vec![placeholder]);
    }

    #[test]
    fn test_draw_without_input_is_side_effect_free() {
        let mut scene = MemoryScene::new();
        let sun = scene.add_light("Sun", None, LightType::Directional, None);
        scene.add_light("Spot", None, LightType::Spot, None);
        let before = scene.light_state(sun);
        let mut inspector = LightInspector::new();
        inspector.select(Some(sun));
        let mut aliases = LightAliases::new();
        let mut globals = GlobalSettings::default();

        let actions = run_frame(&mut inspector, &mut scene, &mut aliases, &mut globals);
        assert!(actions.is_empty());
        assert_eq!(scene.light_state(sun), before);
        assert_eq!(inspector.selected(), Some(sun));
    }

    #[test]
    fn test_selection_of_destroyed_light_is_cleared() {
        let mut scene = MemoryScene::new();
        let sun = scene.add_light("Sun", None, LightType::Directional, None);
        let mut inspector = LightInspector::new();
        inspector.select(Some(sun));
        scene.destroy_light(sun);

        run_frame(
            &mut inspector,
            &mut scene,
            &mut LightAliases::new(),
            &mut GlobalSettings::default(),
        );
        assert_eq!(inspector.selected(), None);
    }
}
