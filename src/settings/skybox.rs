//! Skybox material settings.
//!
//! Each supported skybox shader gets its own variant of [`SkyboxSettings`],
//! selected through an explicit [`SkyboxKind`] instead of comparing shader
//! names at every call site.

use glam::Vec4;

/// Property access on the host's active skybox material.
pub trait SkyboxMaterial {
    fn shader_name(&self) -> &str;
    fn float(&self, property: &str) -> Option<f32>;
    fn set_float(&mut self, property: &str, value: f32);
    fn vector(&self, property: &str) -> Option<Vec4>;
    fn set_vector(&mut self, property: &str, value: Vec4);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SkyboxKind {
    Procedural,
    TwoPointColor,
    FourPointGradient,
    HemisphereGradient,
}

impl SkyboxKind {
    pub const ALL: [SkyboxKind; 4] = [
        SkyboxKind::Procedural,
        SkyboxKind::TwoPointColor,
        SkyboxKind::FourPointGradient,
        SkyboxKind::HemisphereGradient,
    ];

    pub fn shader_name(self) -> &'static str {
        match self {
            SkyboxKind::Procedural => "Skybox/Procedural",
            SkyboxKind::TwoPointColor => "SkyBox/Simple Two Colors",
            SkyboxKind::FourPointGradient => "SkyBox/Four Point Gradient",
            SkyboxKind::HemisphereGradient => "SkyBox/Hemisphere Gradient",
        }
    }

    pub fn from_shader_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.shader_name() == name)
    }
}

fn read_float(material: &dyn SkyboxMaterial, property: &str, default: f32) -> f32 {
    material.float(property).unwrap_or(default)
}

fn read_vector(material: &dyn SkyboxMaterial, property: &str, default: Vec4) -> Vec4 {
    material.vector(property).unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProceduralSkybox {
    pub sun_disk: i32,
    pub sun_size: f32,
    pub sun_size_convergence: f32,
    pub atmosphere_thickness: f32,
    pub sky_tint: Vec4,
    pub ground_color: Vec4,
    pub exposure: f32,
}

impl ProceduralSkybox {
    pub fn capture(material: &dyn SkyboxMaterial) -> Self {
        Self {
            sun_disk: read_float(material, "_SunDisk", 2.0) as i32,
            sun_size: read_float(material, "_SunSize", 0.04),
            sun_size_convergence: read_float(material, "_SunSizeConvergence", 5.0),
            atmosphere_thickness: read_float(material, "_AtmosphereThickness", 1.0),
            sky_tint: read_vector(material, "_SkyTint", Vec4::new(0.5, 0.5, 0.5, 1.0)),
            ground_color: read_vector(material, "_GroundColor", Vec4::new(0.369, 0.349, 0.341, 1.0)),
            exposure: read_float(material, "_Exposure", 1.3),
        }
    }

    pub fn apply(&self, material: &mut dyn SkyboxMaterial) {
        material.set_float("_SunDisk", self.sun_disk as f32);
        material.set_float("_SunSize", self.sun_size);
        material.set_float("_SunSizeConvergence", self.sun_size_convergence);
        material.set_float("_AtmosphereThickness", self.atmosphere_thickness);
        material.set_vector("_SkyTint", self.sky_tint);
        material.set_vector("_GroundColor", self.ground_color);
        material.set_float("_Exposure", self.exposure);
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TwoPointColorSkybox {
    pub color_a: Vec4,
    pub color_b: Vec4,
    pub direction_a: Vec4,
    pub direction_b: Vec4,
    pub intensity: f32,
}

impl TwoPointColorSkybox {
    pub fn capture(material: &dyn SkyboxMaterial) -> Self {
        Self {
            color_a: read_vector(material, "_ColorA", Vec4::ONE),
            color_b: read_vector(material, "_ColorB", Vec4::new(0.0, 0.0, 0.0, 1.0)),
            direction_a: read_vector(material, "_DirA", Vec4::Y),
            direction_b: read_vector(material, "_DirB", Vec4::NEG_Y),
            intensity: read_float(material, "_Intensity", 1.0),
        }
    }

    pub fn apply(&self, material: &mut dyn SkyboxMaterial) {
        material.set_vector("_ColorA", self.color_a);
        material.set_vector("_ColorB", self.color_b);
        material.set_vector("_DirA", self.direction_a);
        material.set_vector("_DirB", self.direction_b);
        material.set_float("_Intensity", self.intensity);
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FourPointGradientSkybox {
    pub colors: [Vec4; 4],
    pub directions: [Vec4; 4],
    pub exponents: [f32; 4],
}

impl FourPointGradientSkybox {
    pub fn capture(material: &dyn SkyboxMaterial) -> Self {
        Self {
            colors: std::array::from_fn(|i| read_vector(material, &format!("_Color{}", i + 1), Vec4::ONE)),
            directions: std::array::from_fn(|i| read_vector(material, &format!("_Direction{}", i + 1), Vec4::Y)),
            exponents: std::array::from_fn(|i| read_float(material, &format!("_Exponent{}", i + 1), 1.0)),
        }
    }

    pub fn apply(&self, material: &mut dyn SkyboxMaterial) {
        for i in 0..4 {
            material.set_vector(&format!("_Color{}", i + 1), self.colors[i]);
            material.set_vector(&format!("_Direction{}", i + 1), self.directions[i]);
            material.set_float(&format!("_Exponent{}", i + 1), self.exponents[i]);
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HemisphereGradientSkybox {
    pub north_color: Vec4,
    pub equator_color: Vec4,
    pub south_color: Vec4,
}

impl HemisphereGradientSkybox {
    pub fn capture(material: &dyn SkyboxMaterial) -> Self {
        Self {
            north_color: read_vector(material, "_TopColor", Vec4::new(0.5, 0.7, 1.0, 1.0)),
            equator_color: read_vector(material, "_MiddleColor", Vec4::ONE),
            south_color: read_vector(material, "_BottomColor", Vec4::new(0.3, 0.3, 0.3, 1.0)),
        }
    }

    pub fn apply(&self, material: &mut dyn SkyboxMaterial) {
        material.set_vector("_TopColor", self.north_color);
        material.set_vector("_MiddleColor", self.equator_color);
        material.set_vector("_BottomColor", self.south_color);
    }
}

/// Shader-specific skybox material values.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SkyboxSettings {
    Procedural(ProceduralSkybox),
    TwoPointColor(TwoPointColorSkybox),
    FourPointGradient(FourPointGradientSkybox),
    HemisphereGradient(HemisphereGradientSkybox),
}

impl SkyboxSettings {
    pub fn kind(&self) -> SkyboxKind {
        match self {
            SkyboxSettings::Procedural(_) => SkyboxKind::Procedural,
            SkyboxSettings::TwoPointColor(_) => SkyboxKind::TwoPointColor,
            SkyboxSettings::FourPointGradient(_) => SkyboxKind::FourPointGradient,
            SkyboxSettings::HemisphereGradient(_) => SkyboxKind::HemisphereGradient,
        }
    }

    pub fn capture(kind: SkyboxKind, material: &dyn SkyboxMaterial) -> Self {
        match kind {
            SkyboxKind::Procedural => SkyboxSettings::Procedural(ProceduralSkybox::capture(material)),
            SkyboxKind::TwoPointColor => SkyboxSettings::TwoPointColor(TwoPointColorSkybox::capture(material)),
            SkyboxKind::FourPointGradient => {
                SkyboxSettings::FourPointGradient(FourPointGradientSkybox::capture(material))
            }
            SkyboxKind::HemisphereGradient => {
                SkyboxSettings::HemisphereGradient(HemisphereGradientSkybox::capture(material))
            }
        }
    }

    /// `None` when the material's shader is not one we know how to save.
    pub fn from_material(material: &dyn SkyboxMaterial) -> Option<Self> {
        SkyboxKind::from_shader_name(material.shader_name()).map(|kind| Self::capture(kind, material))
    }

    /// Apply onto `material` if it uses the matching shader. Returns whether anything was written.
    pub fn apply(&self, material: &mut dyn SkyboxMaterial) -> bool {
        if SkyboxKind::from_shader_name(material.shader_name()) != Some(self.kind()) {
            return false;
        }
        match self {
            SkyboxSettings::Procedural(s) => s.apply(material),
            SkyboxSettings::TwoPointColor(s) => s.apply(material),
            SkyboxSettings::FourPointGradient(s) => s.apply(material),
            SkyboxSettings::HemisphereGradient(s) => s.apply(material),
        }
        true
    }
}

/// Shader-independent skybox and environment reflection parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkyboxParams {
    pub exposure: f32,
    pub rotation: f32,
    pub tint: [f32; 4],
    pub selected_map: String,
    pub reflection_resolution: i32,
    pub reflection_bounces: i32,
    pub reflection_intensity: f32,
}

impl Default for SkyboxParams {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            rotation: 0.0,
            tint: [0.5, 0.5, 0.5, 1.0],
            selected_map: String::new(),
            reflection_resolution: 128,
            reflection_bounces: 1,
            reflection_intensity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemoryMaterial;

    #[test]
    fn test_kind_from_shader_name() {
        for kind in SkyboxKind::ALL {
            assert_eq!(SkyboxKind::from_shader_name(kind.shader_name()), Some(kind));
        }
        assert_eq!(SkyboxKind::from_shader_name("Standard"), None);
    }

    #[test]
    fn test_unknown_shader_is_not_captured() {
        let material = MemoryMaterial::new("Custom/Clouds");
        assert!(SkyboxSettings::from_material(&material).is_none());
    }

    #[test]
    fn test_capture_and_apply_procedural() {
        let mut source = MemoryMaterial::new(SkyboxKind::Procedural.shader_name());
        source.set_float("_Exposure", 2.0);
        source.set_vector("_SkyTint", Vec4::new(0.1, 0.2, 0.3, 1.0));

        let settings = SkyboxSettings::from_material(&source).unwrap();
        assert_eq!(settings.kind(), SkyboxKind::Procedural);

        let mut target = MemoryMaterial::new(SkyboxKind::Procedural.shader_name());
        assert!(settings.apply(&mut target));
        assert_eq!(target.float("_Exposure"), Some(2.0));
        assert_eq!(target.vector("_SkyTint"), Some(Vec4::new(0.1, 0.2, 0.3, 1.0)));
    }

    #[test]
    fn test_apply_skips_mismatched_shader() {
        let source = MemoryMaterial::new(SkyboxKind::HemisphereGradient.shader_name());
        let settings = SkyboxSettings::from_material(&source).unwrap();

        let mut target = MemoryMaterial::new(SkyboxKind::Procedural.shader_name());
        assert!(!settings.apply(&mut target));
        assert_eq!(target.vector("_TopColor"), None);
    }

    #[test]
    fn test_four_point_gradient_indexes_properties_from_one() {
        let mut source = MemoryMaterial::new(SkyboxKind::FourPointGradient.shader_name());
        source.set_float("_Exponent4", 7.0);
        let settings = SkyboxSettings::from_material(&source).unwrap();
        match &settings {
            SkyboxSettings::FourPointGradient(gradient) => assert_eq!(gradient.exponents[3], 7.0),
            _ => panic!("Expected FourPointGradient"),
        }
    }
}
