//! Depth-of-field focus puller.
//!
//! Each frame the puller raycasts from the camera through a screen point and
//! eases the focal distance towards the hit depth with a critically damped
//! spring, so the focus never overshoots.

use super::camera::CameraPose;
use crate::config::PluginConfig;
use crate::settings::global::PostProcessingSettings;
use glam::{Vec2, Vec3};

pub const MIN_SPEED: f32 = 0.01;
pub const DEFAULT_SPEED: f32 = 6.0;
pub const MIN_FOCAL_DEPTH: f32 = 0.1;

/// Scene query used to find what is under a screen point.
pub trait FocusRaycaster {
    fn raycast(&self, camera: &CameraPose, screen_point: Vec2, max_distance: f32, mask: i32) -> Option<Vec3>;
}

impl<F> FocusRaycaster for F
where
    F: Fn(&CameraPose, Vec2, f32, i32) -> Option<Vec3>,
{
    fn raycast(&self, camera: &CameraPose, screen_point: Vec2, max_distance: f32, mask: i32) -> Option<Vec3> {
        self(camera, screen_point, max_distance, mask)
    }
}

#[derive(Debug, Clone)]
pub struct FocusPuller {
    speed: f32,
    velocity: f32,
    target: Option<Vec3>,
    last_hit: Option<Vec3>,
    initial_frame: bool,
    enabled: bool,
    pub max_distance: f32,
    pub hit_mask: i32,
}

impl Default for FocusPuller {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

impl FocusPuller {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.max(MIN_SPEED),
            velocity: 0.0,
            target: None,
            last_hit: None,
            initial_frame: true,
            enabled: false,
            max_distance: f32::INFINITY,
            hit_mask: -1,
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(config.focus_speed)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(MIN_SPEED);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start pulling focus. The first update after enabling focuses on the screen center.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.initial_frame = true;
        self.velocity = 0.0;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Focus on an explicit world point instead of a raycast hit.
    pub fn focus(&mut self, point: Vec3) {
        self.target = Some(point);
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn late_update<R: FocusRaycaster + ?Sized>(
        &mut self,
        camera: &CameraPose,
        screen_center: Vec2,
        pointer: Vec2,
        dt: f32,
        raycaster: &R,
        pp: &mut PostProcessingSettings,
    ) {
        if !self.enabled {
            return;
        }

        let screen_point = if self.initial_frame { screen_center } else { pointer };
        self.initial_frame = false;
        if let Some(hit) = raycaster.raycast(camera, screen_point, self.max_distance, self.hit_mask) {
            if self.last_hit != Some(hit) {
                self.last_hit = Some(hit);
                self.target = Some(hit);
            }
        }

        let Some(target) = self.target else {
            return;
        };
        let depth = camera.depth_of(target).max(MIN_FOCAL_DEPTH);
        let current = pp.focal_distance();
        pp.set_focal_distance(self.smooth(current, depth, dt));
    }

    fn smooth(&mut self, from: f32, to: f32, dt: f32) -> f32 {
        let n1 = self.velocity - (from - to) * self.speed * self.speed * dt;
        let n2 = 1.0 + self.speed * dt;
        self.velocity = n1 / (n2 * n2);
        from + self.velocity * dt
    }
}
