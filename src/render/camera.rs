use glam::Vec3;

/// Camera position and orientation as the host reports it each frame.
/// Angles are radians; yaw 0 looks down +X, positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self { position, yaw, pitch }
    }

    /// Pose at `position` looking towards `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let (yaw, pitch) = forward_to_yaw_pitch(target - position);
        Self::new(position, yaw, pitch)
    }

    pub fn forward(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(self.yaw.cos() * cos_pitch, self.pitch.sin(), self.yaw.sin() * cos_pitch)
    }

    /// Distance of `point` along the view axis. Negative behind the camera.
    pub fn depth_of(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.forward())
    }
}

fn forward_to_yaw_pitch(forward: Vec3) -> (f32, f32) {
    let dir = forward.normalize_or_zero();
    if dir == Vec3::ZERO {
        return (0.0, 0.0);
    }
    (dir.z.atan2(dir.x), dir.y.asin())
}
