use anyhow::{Context, Result, bail};
use std::fs;
use tracing::info;
use vantage_camera::{BoundingSphere, CameraModel, ManipulationSettings};
use vantage_math::Vec3;
use vantage_view::{ScriptSession, parse_script};

use crate::cli::{Command, FitArgs, MatricesArgs, ReplayArgs};

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Replay(args) => replay(args),
        Command::Fit(args) => fit(args),
        Command::Matrices(args) => matrices(args),
    }
}

fn replay(args: ReplayArgs) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => ManipulationSettings::load(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?,
        None => ManipulationSettings::default(),
    };
    let text = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let commands = parse_script(&text)?;

    let mut camera = CameraModel::with_settings(settings);
    prepare_camera(&mut camera, args.bound.as_deref(), args.view.as_deref())?;

    let mut session = ScriptSession::new(camera);
    session.run(&commands)?;
    info!(path = %args.script.display(), "replayed script");
    println!("{}", session.camera().save_view());
    Ok(())
}

fn fit(args: FitArgs) -> Result<()> {
    let mut camera = CameraModel::new();
    prepare_camera(&mut camera, Some(&args.bound), args.view.as_deref())?;
    camera.fit_to_screen();
    println!("{}", camera.save_view());
    Ok(())
}

fn matrices(args: MatricesArgs) -> Result<()> {
    let mut camera = CameraModel::new();
    prepare_camera(&mut camera, args.bound.as_deref(), args.view.as_deref())?;

    let view = camera.view_matrix();
    let projection = camera.projection_matrix();
    let ypr = camera.yaw_pitch_roll();
    let az_el = camera.az_el();
    let eye = camera.eye_position();

    if args.json {
        let report = serde_json::json!({
            "view": view.to_rows_array_2d(),
            "projection": projection.to_rows_array_2d(),
            "clip_planes": camera.clip_planes(),
            "yaw_pitch_roll": [ypr.x, ypr.y, ypr.z],
            "az_el": [az_el.x, az_el.y],
            "eye": [eye.x, eye.y, eye.z],
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("view:\n{view}");
    println!("projection:\n{projection}");
    if let Some((near, far)) = camera.clip_planes() {
        println!("clip: near {near} far {far}");
    }
    println!("yaw/pitch/roll: {} {} {}", ypr.x, ypr.y, ypr.z);
    println!("az/el: {} {}", az_el.x, az_el.y);
    println!("eye: {} {} {}", eye.x, eye.y, eye.z);
    Ok(())
}

/// Loads the view when given; otherwise starts from the initial view of
/// the bound.
fn prepare_camera(camera: &mut CameraModel, bound: Option<&str>, view: Option<&str>) -> Result<()> {
    if let Some(text) = bound {
        camera.set_bounding_sphere(Some(parse_bound(text)?));
    }
    match view {
        Some(text) => camera.load_view(text).context("invalid --view")?,
        None if camera.bounding_sphere().is_some() => camera.compute_initial_view(),
        None => {}
    }
    camera.take_events();
    Ok(())
}

fn parse_bound(text: &str) -> Result<BoundingSphere> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 4 {
        bail!("--bound expects four comma-separated numbers, e.g. 0,0,0,10");
    }

    let x: f64 = parts[0].trim().parse().context("invalid center x")?;
    let y: f64 = parts[1].trim().parse().context("invalid center y")?;
    let z: f64 = parts[2].trim().parse().context("invalid center z")?;
    let radius: f64 = parts[3].trim().parse().context("invalid radius")?;
    if radius < 0.0 {
        bail!("--bound radius must be non-negative (got {radius})");
    }
    Ok(BoundingSphere::new(Vec3::new(x, y, z), radius))
}
