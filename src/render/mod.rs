//! Per-frame camera-side helpers driven by the host's update loop.

pub mod camera;
pub mod focus;

pub use camera::CameraPose;
pub use focus::{FocusPuller, FocusRaycaster};
