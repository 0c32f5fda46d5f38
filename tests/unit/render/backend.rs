use super::*;
use crate::particles::options::ParticleOptions;

#[test]
fn cpu_serves_both_kinds() {
    let backends = Backends::cpu_only(Arc::new(CpuBackend::default()));
    assert_eq!(backends.flame_kind(), BackendKind::Cpu);
    assert_eq!(backends.particle_kind(), BackendKind::Cpu);
    assert_eq!(format!("{backends:?}"), "Backends { flames: Cpu, particles: Cpu }");
}

#[test]
fn sprites_are_only_resolved_for_custom_shapes() {
    let cpu = CpuBackend::new(4);
    let circle = ParticleOptions {
        sprite: Some("%%%".to_owned()),
        ..ParticleOptions::default()
    };
    assert!(cpu.sprite_for(&circle).is_none());
    assert_eq!(cpu.cached_sprites(), 0);

    let custom = ParticleOptions {
        shape: ParticleShape::Custom,
        ..circle
    };
    assert!(cpu.sprite_for(&custom).is_none());
    assert_eq!(cpu.cached_sprites(), 1);
}

#[test]
fn broken_sprite_still_renders_particles() {
    let cpu = CpuBackend::default();
    let src = FrameRGBA::solid(32, 32, [0, 0, 0, 255]);
    let opts = ParticleOptions {
        shape: ParticleShape::Custom,
        sprite: Some("definitely not an image".to_owned()),
        count: 80,
        size: 4.0,
        ..ParticleOptions::default()
    };
    let out = cpu.render_particles(&src, &opts, 1.0, Phase::wrapping(0.25)).unwrap();
    assert!(out.data.chunks_exact(4).any(|px| px[0] > 0));
}
