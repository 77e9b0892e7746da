//! preset-dump: inspect graphics preset files from the command line.
//!
//! ```text
//! preset-dump <file.preset>          print the preset as JSON
//! preset-dump --demo <file.preset>   write a preset captured from a demo scene
//! ```

use graphics_settings::controller::{build_light_settings, build_reflection_probe_settings};
use graphics_settings::preset::{Preset, SaveOptions};
use graphics_settings::scene::memory::{MemoryMaterial, MemoryScene};
use graphics_settings::scene::{LightHost, LightType, RenderingHost};
use graphics_settings::settings::{LightAliases, SkyboxKind};
use std::path::Path;
use std::process::ExitCode;

fn demo_scene() -> MemoryScene {
    let mut scene = MemoryScene::new();
    let map = scene.add_node("Map", None);
    let sun = scene.add_light("Sun", Some(map), LightType::Directional, None);
    scene.add_light("Lamp", Some(map), LightType::Point, Some(1));
    scene.add_light("Stage Spot", Some(map), LightType::Spot, Some(2));
    scene.add_probe("Room Probe", Some(map));

    let mut state = scene.light_state(sun);
    state.intensity = 1.2;
    state.color = [1.0, 0.95, 0.85];
    scene.set_light_state(sun, &state);

    scene.render_settings_mut().post_processing.depth_of_field.enabled = true;
    scene.set_skybox(Some(MemoryMaterial::new(SkyboxKind::Procedural.shader_name())));
    scene
}

fn write_demo(path: &Path) -> Result<(), graphics_settings::preset::PresetError> {
    let mut scene = demo_scene();
    let aliases = LightAliases::new();
    let lights = build_light_settings(&mut scene, &aliases);
    let probes = build_reflection_probe_settings(&scene);
    let preset = Preset::capture(&scene).with_scene_records(lights, probes);
    preset.save(path, SaveOptions::default())?;
    Ok(())
}

fn dump(path: &Path) -> Result<(), graphics_settings::preset::PresetError> {
    let bytes = std::fs::read(path)?;
    let preset = Preset::from_bytes(&bytes)?;
    println!("{}", preset.to_debug_json()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [flag, path] if flag == "--demo" => write_demo(Path::new(path)),
        [path] => dump(Path::new(path)),
        _ => {
            eprintln!("usage: preset-dump [--demo] <file.preset>");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
