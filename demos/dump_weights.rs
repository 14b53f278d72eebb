use cyclefade::{
    CameraId, Compositor, CompositorOpts, CompositorParams, NodeId, RecordingBackend, SceneId,
    SceneSlot, SlotId, SplitHost, TargetSize, TriangleBounce,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let params = CompositorParams {
        time_scale: 1.0,
        ..CompositorParams::default()
    };
    let slots = (0..params.slot_count)
        .map(|i| {
            SceneSlot::new(SlotId(i), SceneId(i), CameraId(0))
                .with_accent(NodeId(i), Box::new(TriangleBounce::new(params.spread)))
        })
        .collect();
    let opts = CompositorOpts::new(TargetSize::new(16, 16)?);
    let mut compositor = Compositor::new(params, slots, opts)?;

    let mut backend = RecordingBackend::new();
    let mut graph = RecordingBackend::new();
    for _ in 0..=24 {
        let cmd = compositor.tick(0.25, &mut SplitHost::new(&mut backend, &mut graph))?;
        let entries: Vec<String> = cmd
            .entries
            .iter()
            .map(|e| format!("slot {} @ {:.3}", e.slot.0, e.weight))
            .collect();
        println!("t={:5.2}  {}", cmd.t, entries.join("  |  "));
    }
    println!("{:?}", compositor.stats());
    Ok(())
}
