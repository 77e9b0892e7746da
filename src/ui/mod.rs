pub mod light_inspector;

pub use light_inspector::{apply_actions, placeholder_name, InspectorAction, LightInspector};
