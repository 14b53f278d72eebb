use std::path::PathBuf;

use cyclefade::{CpuBackendOpts, StageDef};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let def: StageDef = include_str!("../tests/data/three_scenes.json").parse()?;
    let mut stage = def.build(CpuBackendOpts::default())?;

    let out_dir = PathBuf::from("target/demo_out/cycle");
    std::fs::create_dir_all(&out_dir)?;

    // Raw seconds; with time_scale 0.8 these land on phase middles and the edges between them.
    for (i, at) in [0.625, 1.25, 1.875, 2.5, 3.125].into_iter().enumerate() {
        let frame = stage.render_at(at)?;
        let path = out_dir.join(format!("cycle_{i}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.to_straight_rgba(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        println!("t={:.3} -> {}", stage.compositor.t(), path.display());
    }
    Ok(())
}
