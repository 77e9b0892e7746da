use super::hierarchy::HierarchyPath;
use crate::scene::{ProbeHandle, ProbeHost, ProbeState};

/// Saved state of one reflection probe. Probes have no host id, so the
/// name and hierarchy path are the whole identity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReflectionProbeSetting {
    pub name: String,
    pub hierarchy_path: Option<HierarchyPath>,
    pub state: ProbeState,
}

impl ReflectionProbeSetting {
    pub fn fill_from<H: ProbeHost + ?Sized>(host: &H, probe: ProbeHandle) -> Self {
        Self {
            name: host.probe_name(probe).to_string(),
            hierarchy_path: Some(HierarchyPath::from_node(host, probe.node())),
            state: host.probe_state(probe),
        }
    }

    /// Record for a probe that lives outside the scene tree, such as the default probe.
    pub fn from_state(name: impl Into<String>, state: ProbeState) -> Self {
        Self {
            name: name.into(),
            hierarchy_path: None,
            state,
        }
    }

    pub fn apply_to<H: ProbeHost + ?Sized>(&self, host: &mut H, probe: ProbeHandle) {
        host.set_probe_state(probe, &self.state);
    }
}
