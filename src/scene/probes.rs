use super::{NodeId, SceneGraph};
use crate::settings::probe::ReflectionProbeSetting;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProbeHandle(pub NodeId);

impl ProbeHandle {
    pub fn node(self) -> NodeId {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProbeMode {
    Baked,
    Realtime,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProbeRefreshMode {
    OnAwake,
    EveryFrame,
    ViaScripting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProbeTimeSlicing {
    AllFacesAtOnce,
    IndividualFaces,
    NoTimeSlicing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProbeClearFlags {
    Skybox,
    SolidColor,
}

/// Captured parameters of a live reflection probe.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbeState {
    pub mode: ProbeMode,
    pub refresh_mode: ProbeRefreshMode,
    pub time_slicing: ProbeTimeSlicing,
    pub resolution: i32,
    pub intensity: f32,
    pub importance: i32,
    pub box_projection: bool,
    pub blend_distance: f32,
    pub size: Vec3,
    pub center: Vec3,
    pub clear_flags: ProbeClearFlags,
    pub background_color: [f32; 4],
    pub near_clip_plane: f32,
    pub far_clip_plane: f32,
    pub hdr: bool,
    pub shadow_distance: f32,
    pub culling_mask: i32,
}

impl Default for ProbeState {
    fn default() -> Self {
        Self {
            mode: ProbeMode::Realtime,
            refresh_mode: ProbeRefreshMode::OnAwake,
            time_slicing: ProbeTimeSlicing::AllFacesAtOnce,
            resolution: 128,
            intensity: 1.0,
            importance: 1,
            box_projection: false,
            blend_distance: 1.0,
            size: Vec3::splat(10.0),
            center: Vec3::ZERO,
            clear_flags: ProbeClearFlags::Skybox,
            background_color: [0.19, 0.3, 0.47, 0.0],
            near_clip_plane: 0.3,
            far_clip_plane: 1000.0,
            hdr: true,
            shadow_distance: 100.0,
            culling_mask: -1,
        }
    }
}

/// Live reflection probes. The host has no stable id for probes, so identity
/// is name plus hierarchy position only.
pub trait ProbeHost: SceneGraph {
    fn probes(&self) -> Vec<ProbeHandle>;
    fn probe_state(&self, probe: ProbeHandle) -> ProbeState;
    fn set_probe_state(&mut self, probe: ProbeHandle, state: &ProbeState);
    /// State of the plugin-owned default reflection probe, if one exists.
    fn default_probe(&self) -> Option<ProbeState>;
    /// Configure the default probe from a saved record, or reset it when `enabled` is false.
    fn setup_default_probe(&mut self, setting: Option<&ReflectionProbeSetting>, enabled: bool);

    fn probe_name(&self, probe: ProbeHandle) -> &str {
        self.name(probe.node())
    }
}
