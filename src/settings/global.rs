use super::probe::ReflectionProbeSetting;
use super::skybox::SkyboxParams;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlobalSettings {
    pub lights_use_linear_intensity: bool,
    pub lights_use_color_temperature: bool,
    pub use_pcss: bool,
    pub use_alloy_light: bool,
    pub pixel_light_count: i32,
    pub shadow_distance: f32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            lights_use_linear_intensity: false,
            lights_use_color_temperature: false,
            use_pcss: false,
            use_alloy_light: false,
            pixel_light_count: 4,
            shadow_distance: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AntiAliasing {
    None,
    Fxaa,
    Smaa,
    Taa,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraSettings {
    pub field_of_view: f32,
    pub near_clip_plane: f32,
    pub far_clip_plane: f32,
    pub hdr: bool,
    pub anti_aliasing: AntiAliasing,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            field_of_view: 23.0,
            near_clip_plane: 0.06,
            far_clip_plane: 10_000.0,
            hdr: true,
            anti_aliasing: AntiAliasing::Smaa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AmbientMode {
    Skybox,
    Trilight,
    Flat,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightingSettings {
    pub ambient_mode: AmbientMode,
    pub ambient_intensity: f32,
    pub reflection_intensity: f32,
    pub reflection_bounces: i32,
    /// Present only when the default reflection probe was active at save time.
    pub default_reflection_probe: Option<ReflectionProbeSetting>,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            ambient_mode: AmbientMode::Skybox,
            ambient_intensity: 1.0,
            reflection_intensity: 1.0,
            reflection_bounces: 1,
            default_reflection_probe: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthOfField {
    pub enabled: bool,
    pub focal_distance: f32,
    pub aperture: f32,
    pub focal_length: f32,
    /// Drive the focal distance from the focus puller every frame.
    pub auto_focus: bool,
}

impl Default for DepthOfField {
    fn default() -> Self {
        Self {
            enabled: false,
            focal_distance: 10.0,
            aperture: 5.6,
            focal_length: 50.0,
            auto_focus: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PostProcessingSettings {
    pub enabled: bool,
    pub depth_of_field: DepthOfField,
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub vignette_intensity: f32,
    pub post_exposure: f32,
    pub saturation: f32,
    pub contrast: f32,
}

impl Default for PostProcessingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            depth_of_field: DepthOfField::default(),
            bloom_intensity: 0.0,
            bloom_threshold: 1.0,
            vignette_intensity: 0.0,
            post_exposure: 0.0,
            saturation: 0.0,
            contrast: 0.0,
        }
    }
}

impl PostProcessingSettings {
    pub fn focal_distance(&self) -> f32 {
        self.depth_of_field.focal_distance
    }

    pub fn set_focal_distance(&mut self, distance: f32) {
        self.depth_of_field.focal_distance = distance;
    }
}

/// Subsurface scattering.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SssSettings {
    pub enabled: bool,
    pub scale: f32,
    pub blur_iterations: i32,
    pub downscale_factor: f32,
}

impl Default for SssSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.0,
            blur_iterations: 3,
            downscale_factor: 1.0,
        }
    }
}

/// Ground-truth ambient occlusion.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GtaoSettings {
    pub enabled: bool,
    pub intensity: f32,
    pub power: f32,
    pub radius: f32,
    pub thickness: f32,
    pub sample_steps: i32,
    pub multi_bounce: bool,
}

impl Default for GtaoSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 1.0,
            power: 2.5,
            radius: 2.5,
            thickness: 1.0,
            sample_steps: 8,
            multi_bounce: true,
        }
    }
}

/// Cinematic temporal anti-aliasing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CtaaSettings {
    pub enabled: bool,
    pub sharpness: f32,
    pub adaptive_sharpness: f32,
    pub temporal_stability: i32,
    pub anti_shimmer: bool,
}

impl Default for CtaaSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sharpness: 0.2,
            adaptive_sharpness: 0.2,
            temporal_stability: 6,
            anti_shimmer: false,
        }
    }
}

/// All global render configuration the host exposes to the plugin.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderSettings {
    pub global: GlobalSettings,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
    pub post_processing: PostProcessingSettings,
    /// `None` in games without the subsurface scattering component.
    pub sss: Option<SssSettings>,
    pub skybox: SkyboxParams,
    pub gtao: GtaoSettings,
    pub ctaa: CtaaSettings,
}
