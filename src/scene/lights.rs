use super::{NodeId, SceneGraph};
use glam::Vec3;

/// Engine light kind. Discriminants follow the engine's enum so saved
/// records stay readable by other builds.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LightType {
    Spot = 0,
    Directional = 1,
    Point = 2,
}

impl LightType {
    /// Order used for building, persisting and positional matching.
    pub const GROUP_ORDER: [LightType; 3] = [LightType::Directional, LightType::Point, LightType::Spot];

    pub fn label(self) -> &'static str {
        match self {
            LightType::Directional => "Directional Lights",
            LightType::Point => "Point Lights",
            LightType::Spot => "Spot Lights",
        }
    }

    pub fn uses_rotation(self) -> bool {
        matches!(self, LightType::Directional)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShadowType {
    None,
    Hard,
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RenderMode {
    Auto,
    ForcePixel,
    ForceVertex,
}

/// Shadow map resolution presets exposed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShadowResolution {
    FromQualitySettings,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Handle to a live light component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightHandle(pub NodeId);

impl LightHandle {
    pub fn node(self) -> NodeId {
        self.0
    }
}

/// Tunable state of one live light. None of these fields take part in identity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightState {
    pub enabled: bool,
    pub color: [f32; 3],
    pub intensity: f32,
    pub indirect_multiplier: f32,
    pub shadows: ShadowType,
    pub shadow_strength: f32,
    pub shadow_resolution: ShadowResolution,
    pub shadow_custom_resolution: i32,
    pub shadow_bias: f32,
    pub shadow_normal_bias: f32,
    pub shadow_near_plane: f32,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub range: f32,
    pub spot_angle: f32,
    pub color_temperature: f32,
    pub render_mode: RenderMode,
    pub culling_mask: i32,
    pub additional_cam_light: bool,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            enabled: true,
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            indirect_multiplier: 1.0,
            shadows: ShadowType::Soft,
            shadow_strength: 1.0,
            shadow_resolution: ShadowResolution::FromQualitySettings,
            shadow_custom_resolution: 0,
            shadow_bias: 0.05,
            shadow_normal_bias: 0.4,
            shadow_near_plane: 0.2,
            rotation: Vec3::new(50.0, -30.0, 0.0),
            range: 10.0,
            spot_angle: 30.0,
            color_temperature: 6570.0,
            render_mode: RenderMode::Auto,
            culling_mask: -1,
            additional_cam_light: false,
        }
    }
}

/// Live light index plus the handful of light mutations the plugin performs.
pub trait LightHost: SceneGraph {
    /// Rediscover the lights currently present in the scene.
    fn refresh(&mut self);
    /// Lights of one type in discovery order.
    fn lights(&self, light_type: LightType) -> Vec<LightHandle>;
    fn light_type(&self, light: LightHandle) -> LightType;
    /// Stable id assigned by the host's object system, if the light is a managed object.
    fn object_key(&self, light: LightHandle) -> Option<i32>;
    fn light_state(&self, light: LightHandle) -> LightState;
    fn set_light_state(&mut self, light: LightHandle, state: &LightState);
    /// Create a new top-level directional light. The index is refreshed by the caller.
    fn spawn_directional(&mut self, name: &str) -> LightHandle;
    fn destroy_light(&mut self, light: LightHandle);
    /// True when running inside the studio editor rather than the main game.
    fn inside_studio(&self) -> bool;

    fn native_name(&self, light: LightHandle) -> &str {
        self.name(light.node())
    }

    fn all_lights(&self) -> Vec<LightHandle> {
        LightType::GROUP_ORDER
            .iter()
            .flat_map(|light_type| self.lights(*light_type))
            .collect()
    }

    fn is_enabled(&self, light: LightHandle) -> bool {
        self.light_state(light).enabled
    }

    fn set_enabled(&mut self, light: LightHandle, enabled: bool) {
        let mut state = self.light_state(light);
        if state.enabled != enabled {
            state.enabled = enabled;
            self.set_light_state(light, &state);
        }
    }
}
