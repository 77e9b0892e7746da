use crate::scene::{NodeId, SceneGraph};
use std::fmt;

/// One level of a [`HierarchyPath`]: the object's position among its siblings and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PathStep {
    pub index: u32,
    pub name: String,
}

/// Structural address of an object, ordered from the top-level ancestor down to the object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HierarchyPath {
    steps: Vec<PathStep>,
}

impl HierarchyPath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn from_node<G: SceneGraph + ?Sized>(graph: &G, node: NodeId) -> Self {
        let mut steps = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            steps.push(PathStep {
                index: graph.sibling_index(id) as u32,
                name: graph.name(id).to_string(),
            });
            current = graph.parent(id);
        }
        steps.reverse();
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Exact structural equality against the node's current position. No fuzzy matching.
    pub fn matches<G: SceneGraph + ?Sized>(&self, graph: &G, node: NodeId) -> bool {
        let mut current = Some(node);
        for step in self.steps.iter().rev() {
            let Some(id) = current else {
                return false;
            };
            if graph.sibling_index(id) as u32 != step.index || graph.name(id) != step.name {
                return false;
            }
            current = graph.parent(id);
        }
        // The live object must not have ancestors beyond the stored root.
        current.is_none()
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}[{}]", step.name, step.index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemoryScene;

    #[test]
    fn test_path_from_nested_node() {
        let mut scene = MemoryScene::new();
        let _other = scene.add_node("Other", None);
        let root = scene.add_node("Map", None);
        let _sibling = scene.add_node("Props", Some(root));
        let light = scene.add_node("Sun", Some(root));

        let path = HierarchyPath::from_node(&scene, light);
        assert_eq!(path.len(), 2);
        assert_eq!(path.to_string(), "Map[1]/Sun[1]");
        assert!(path.matches(&scene, light));
    }

    #[test]
    fn test_match_fails_on_moved_node() {
        let mut scene = MemoryScene::new();
        let root = scene.add_node("Map", None);
        let light = scene.add_node("Sun", Some(root));
        let path = HierarchyPath::from_node(&scene, light);

        scene.insert_node_at("Inserted", Some(root), 0);
        assert!(!path.matches(&scene, light));
    }

    #[test]
    fn test_match_fails_on_renamed_or_reparented_node() {
        let mut scene = MemoryScene::new();
        let root = scene.add_node("Map", None);
        let light = scene.add_node("Sun", Some(root));
        let path = HierarchyPath::from_node(&scene, light);

        scene.rename(light, "Moon");
        assert!(!path.matches(&scene, light));
        scene.rename(light, "Sun");
        assert!(path.matches(&scene, light));

        let holder = scene.add_node("Holder", None);
        scene.reparent(root, Some(holder));
        assert!(!path.matches(&scene, light));
    }

    #[test]
    fn test_empty_path_never_matches() {
        let mut scene = MemoryScene::new();
        let node = scene.add_node("Sun", None);
        assert!(!HierarchyPath::default().matches(&scene, node));
    }
}
