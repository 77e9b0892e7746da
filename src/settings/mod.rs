//! Serializable settings records.

pub mod global;
pub mod hierarchy;
pub mod light;
pub mod probe;
pub mod skybox;

pub use hierarchy::{HierarchyPath, PathStep};
pub use light::{LightAliases, LightSetting};
pub use probe::ReflectionProbeSetting;
pub use skybox::{SkyboxKind, SkyboxSettings};
