use super::*;

#[test]
fn uniform_layouts_match_the_programs() {
    assert_eq!(size_of::<FlameParams>(), 64);
    assert_eq!(size_of::<GpuParticle>(), 32);
    assert_eq!(size_of::<ParticleParams>(), 32 + 16 * 16);
}

#[test]
fn rows_are_padded_to_copy_alignment() {
    assert_eq!(align_to(4, 256), 256);
    assert_eq!(align_to(256, 256), 256);
    assert_eq!(align_to(1028, 256), 1280);
}

#[test]
fn flame_params_carry_sanitized_options() {
    let o = FlameOptions {
        speed: 3,
        octaves: 2,
        ..FlameOptions::default()
    }
    .sanitized();
    let p = FlameParams::new(&o, 64, 32, Phase::wrapping(0.5));
    assert_eq!(p.size, [64.0, 32.0]);
    assert_eq!(p.speed, 3.0);
    assert_eq!(p.octaves, 2);
    assert_eq!(p.area, 1);
}

fn probe() -> Option<GpuBackend> {
    match GpuBackend::probe(Arc::new(CpuBackend::default())) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            eprintln!("skipping gpu test: {e}");
            None
        }
    }
}

#[test]
fn gpu_flames_keep_dimensions_and_brighten() {
    let Some(gpu) = probe() else {
        return;
    };
    let src = FrameRGBA::solid(40, 30, [0, 0, 0, 255]);
    let out = gpu
        .render_flames(&src, &FlameOptions::default(), 1.0, Phase::wrapping(0.25))
        .unwrap();
    assert!(out.same_dimensions(&src));
    assert!(out.data.chunks_exact(4).any(|px| px[0] > 0));
}

#[test]
fn gpu_particles_are_deterministic() {
    let Some(gpu) = probe() else {
        return;
    };
    let src = FrameRGBA::solid(40, 30, [10, 10, 10, 255]);
    let opts = ParticleOptions {
        count: 200,
        size: 3.0,
        ..ParticleOptions::default()
    };
    let a = gpu.render_particles(&src, &opts, 1.0, Phase::wrapping(0.4)).unwrap();
    let b = gpu.render_particles(&src, &opts, 1.0, Phase::wrapping(0.4)).unwrap();
    assert_eq!(a, b);
    let none = ParticleOptions { count: 0, ..opts };
    assert_eq!(gpu.render_particles(&src, &none, 1.0, Phase::ZERO).unwrap(), src);
}
