//! In-process scene used by the `preset-dump` tool and by tests.
//!
//! Implements every host trait over a small node arena. Lights added with
//! [`MemoryScene::add_light`] are indexed immediately; lights created through
//! [`LightHost::spawn_directional`] only show up after [`LightHost::refresh`],
//! like engine objects that need a rediscovery pass.

use super::{
    LightHandle, LightHost, LightState, LightType, NodeId, ProbeHandle, ProbeHost, ProbeState, RenderingHost,
    SceneGraph,
};
use crate::settings::global::RenderSettings;
use crate::settings::probe::ReflectionProbeSetting;
use crate::settings::skybox::SkyboxMaterial;
use glam::Vec4;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct MemoryNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct MemoryLight {
    light_type: LightType,
    object_key: Option<i32>,
    state: LightState,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMaterial {
    shader: String,
    floats: HashMap<String, f32>,
    vectors: HashMap<String, Vec4>,
}

impl MemoryMaterial {
    pub fn new(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            floats: HashMap::new(),
            vectors: HashMap::new(),
        }
    }
}

impl SkyboxMaterial for MemoryMaterial {
    fn shader_name(&self) -> &str {
        &self.shader
    }

    fn float(&self, property: &str) -> Option<f32> {
        self.floats.get(property).copied()
    }

    fn set_float(&mut self, property: &str, value: f32) {
        self.floats.insert(property.to_string(), value);
    }

    fn vector(&self, property: &str) -> Option<Vec4> {
        self.vectors.get(property).copied()
    }

    fn set_vector(&mut self, property: &str, value: Vec4) {
        self.vectors.insert(property.to_string(), value);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<NodeId, MemoryNode>,
    roots: Vec<NodeId>,
    next_id: u64,
    lights: BTreeMap<NodeId, MemoryLight>,
    light_order: Vec<NodeId>,
    indexed_lights: Vec<NodeId>,
    probes: BTreeMap<NodeId, ProbeState>,
    probe_order: Vec<NodeId>,
    default_probe: Option<ProbeState>,
    render: RenderSettings,
    skybox: Option<MemoryMaterial>,
    inside_studio: bool,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let index = match parent {
            Some(parent) => self.nodes.get(&parent).map_or(0, |node| node.children.len()),
            None => self.roots.len(),
        };
        self.insert_node_at(name, parent, index)
    }

    pub fn insert_node_at(&mut self, name: &str, parent: Option<NodeId>, index: usize) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            MemoryNode {
                name: name.to_string(),
                parent,
                children: Vec::new(),
            },
        );
        let siblings = self.siblings_mut(parent);
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        id
    }

    pub fn rename(&mut self, node: NodeId, name: &str) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.name = name.to_string();
        }
    }

    /// Move `node` to the end of `parent`'s children.
    pub fn reparent(&mut self, node: NodeId, parent: Option<NodeId>) {
        let Some(old_parent) = self.nodes.get(&node).map(|entry| entry.parent) else {
            return;
        };
        self.siblings_mut(old_parent).retain(|id| *id != node);
        self.siblings_mut(parent).push(node);
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.parent = parent;
        }
    }

    pub fn remove_node(&mut self, node: NodeId) {
        let Some(entry) = self.nodes.remove(&node) else {
            return;
        };
        self.siblings_mut(entry.parent).retain(|id| *id != node);
        for child in entry.children {
            self.remove_node(child);
        }
        self.lights.remove(&node);
        self.light_order.retain(|id| *id != node);
        self.indexed_lights.retain(|id| *id != node);
        self.probes.remove(&node);
        self.probe_order.retain(|id| *id != node);
    }

    pub fn add_light(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        light_type: LightType,
        object_key: Option<i32>,
    ) -> LightHandle {
        let node = self.add_node(name, parent);
        self.attach_light(node, light_type, object_key);
        self.indexed_lights.push(node);
        LightHandle(node)
    }

    pub fn add_probe(&mut self, name: &str, parent: Option<NodeId>) -> ProbeHandle {
        let node = self.add_node(name, parent);
        self.probes.insert(node, ProbeState::default());
        self.probe_order.push(node);
        ProbeHandle(node)
    }

    pub fn set_object_key(&mut self, light: LightHandle, key: Option<i32>) {
        if let Some(entry) = self.lights.get_mut(&light.node()) {
            entry.object_key = key;
        }
    }

    pub fn find_light(&self, name: &str) -> Option<LightHandle> {
        self.light_order
            .iter()
            .find(|id| self.name(**id) == name)
            .map(|id| LightHandle(*id))
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_inside_studio(&mut self, inside_studio: bool) {
        self.inside_studio = inside_studio;
    }

    pub fn set_default_probe(&mut self, state: Option<ProbeState>) {
        self.default_probe = state;
    }

    pub fn set_skybox(&mut self, material: Option<MemoryMaterial>) {
        self.skybox = material;
    }

    fn attach_light(&mut self, node: NodeId, light_type: LightType, object_key: Option<i32>) {
        self.lights.insert(
            node,
            MemoryLight {
                light_type,
                object_key,
                state: LightState::default(),
            },
        );
        self.light_order.push(node);
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> &mut Vec<NodeId> {
        match parent.and_then(|id| self.nodes.get_mut(&id)) {
            Some(node) => &mut node.children,
            None => &mut self.roots,
        }
    }
}

impl SceneGraph for MemoryScene {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|entry| entry.parent)
    }

    fn sibling_index(&self, node: NodeId) -> usize {
        let siblings = match self.parent(node).and_then(|id| self.nodes.get(&id)) {
            Some(parent) => &parent.children,
            None => &self.roots,
        };
        siblings.iter().position(|id| *id == node).unwrap_or(0)
    }

    fn name(&self, node: NodeId) -> &str {
        self.nodes.get(&node).map_or("", |entry| entry.name.as_str())
    }
}

impl LightHost for MemoryScene {
    fn refresh(&mut self) {
        self.indexed_lights = self.light_order.clone();
    }

    fn lights(&self, light_type: LightType) -> Vec<LightHandle> {
        self.indexed_lights
            .iter()
            .filter(|id| self.lights.get(*id).is_some_and(|light| light.light_type == light_type))
            .map(|id| LightHandle(*id))
            .collect()
    }

    fn light_type(&self, light: LightHandle) -> LightType {
        self.lights
            .get(&light.node())
            .map_or(LightType::Point, |entry| entry.light_type)
    }

    fn object_key(&self, light: LightHandle) -> Option<i32> {
        self.lights.get(&light.node()).and_then(|entry| entry.object_key)
    }

    fn light_state(&self, light: LightHandle) -> LightState {
        self.lights
            .get(&light.node())
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    fn set_light_state(&mut self, light: LightHandle, state: &LightState) {
        if let Some(entry) = self.lights.get_mut(&light.node()) {
            entry.state = state.clone();
        }
    }

    fn spawn_directional(&mut self, name: &str) -> LightHandle {
        let node = self.add_node(name, None);
        self.attach_light(node, LightType::Directional, None);
        LightHandle(node)
    }

    fn destroy_light(&mut self, light: LightHandle) {
        self.remove_node(light.node());
    }

    fn inside_studio(&self) -> bool {
        self.inside_studio
    }
}

impl ProbeHost for MemoryScene {
    fn probes(&self) -> Vec<ProbeHandle> {
        self.probe_order.iter().map(|id| ProbeHandle(*id)).collect()
    }

    fn probe_state(&self, probe: ProbeHandle) -> ProbeState {
        self.probes.get(&probe.node()).cloned().unwrap_or_default()
    }

    fn set_probe_state(&mut self, probe: ProbeHandle, state: &ProbeState) {
        if let Some(entry) = self.probes.get_mut(&probe.node()) {
            *entry = state.clone();
        }
    }

    fn default_probe(&self) -> Option<ProbeState> {
        self.default_probe.clone()
    }

    fn setup_default_probe(&mut self, setting: Option<&ReflectionProbeSetting>, enabled: bool) {
        self.default_probe = match (enabled, setting) {
            (false, _) => None,
            (true, Some(setting)) => Some(setting.state.clone()),
            (true, None) => Some(ProbeState::default()),
        };
    }
}

impl RenderingHost for MemoryScene {
    fn render_settings(&self) -> &RenderSettings {
        &self.render
    }

    fn render_settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.render
    }

    fn skybox_material(&self) -> Option<&dyn SkyboxMaterial> {
        self.skybox.as_ref().map(|material| material as &dyn SkyboxMaterial)
    }

    fn skybox_material_mut(&mut self) -> Option<&mut dyn SkyboxMaterial> {
        self.skybox.as_mut().map(|material| material as &mut dyn SkyboxMaterial)
    }
}
