//! Host-facing view of the live scene.
//!
//! The plugin never owns engine objects. Everything it reads or writes
//! about lights, reflection probes and the transform hierarchy goes through
//! the traits in this module, which the host (or [`memory::MemoryScene`] in
//! tests and tooling) implements.

pub mod lights;
pub mod memory;
pub mod probes;

pub use lights::{LightHandle, LightHost, LightState, LightType, RenderMode, ShadowType};
pub use probes::{ProbeHandle, ProbeHost, ProbeState};

use crate::settings::global::RenderSettings;
use crate::settings::skybox::SkyboxMaterial;

/// Opaque handle to an engine object in the scene tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u64);

/// Read access to the transform hierarchy.
pub trait SceneGraph {
    /// `None` for top-level objects.
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn sibling_index(&self, node: NodeId) -> usize;
    fn name(&self, node: NodeId) -> &str;
}

/// Global render state owned by the host, captured into and restored from presets.
pub trait RenderingHost {
    fn render_settings(&self) -> &RenderSettings;
    fn render_settings_mut(&mut self) -> &mut RenderSettings;
    fn skybox_material(&self) -> Option<&dyn SkyboxMaterial>;
    fn skybox_material_mut(&mut self) -> Option<&mut dyn SkyboxMaterial>;
}

/// Everything the scene controller needs from the host in one bound.
pub trait GraphicsHost: LightHost + ProbeHost + RenderingHost {}

impl<T: LightHost + ProbeHost + RenderingHost> GraphicsHost for T {}
