//! Graphics settings persistence for a modded game host.
//!
//! Captures per-light, per-probe and global render settings into save-file
//! payloads and preset files, and matches saved light and probe records back
//! onto the live objects of a freshly loaded scene.

pub mod config;
pub mod controller;
pub mod persist;
pub mod preset;
pub mod render;
pub mod scene;
pub mod settings;
pub mod ui;

pub use config::PluginConfig;
pub use controller::{SceneController, SceneOperation};
pub use preset::{Preset, PresetManager};
