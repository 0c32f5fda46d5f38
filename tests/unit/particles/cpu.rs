use super::*;

fn base() -> FrameRGBA {
    FrameRGBA::solid(48, 32, [20, 20, 30, 255])
}

#[test]
fn zero_count_leaves_buffer_untouched() {
    let opts = ParticleOptions {
        count: 0,
        ..ParticleOptions::default()
    };
    let src = base();
    assert_eq!(apply(&src, &opts, 1.0, Phase::wrapping(0.4), None).unwrap(), src);
}

#[test]
fn particles_brighten_additively_and_deterministically() {
    let opts = ParticleOptions {
        count: 120,
        size: 4.0,
        ..ParticleOptions::default()
    };
    let src = base();
    let a = apply(&src, &opts, 1.0, Phase::wrapping(0.4), None).unwrap();
    let b = apply(&src, &opts, 1.0, Phase::wrapping(0.4), None).unwrap();
    assert_eq!(a, b);
    assert!(a.same_dimensions(&src));
    let brighter = a
        .data
        .chunks_exact(4)
        .zip(src.data.chunks_exact(4))
        .any(|(o, s)| o[0] > s[0]);
    assert!(brighter);
    for (o, s) in a.data.chunks_exact(4).zip(src.data.chunks_exact(4)) {
        assert!(o[0] >= s[0], "additive blend never darkens");
    }
}

#[test]
fn every_shape_draws_something() {
    for shape in [
        ParticleShape::Circle,
        ParticleShape::Star,
        ParticleShape::Square,
        ParticleShape::Sparkle,
        ParticleShape::Custom,
    ] {
        let opts = ParticleOptions {
            count: 80,
            size: 5.0,
            shape,
            ..ParticleOptions::default()
        };
        let overlay = render_particles(&opts, 40, 40, Phase::wrapping(0.3), None).unwrap();
        assert!(overlay.chunks_exact(4).any(|p| p[3] > 0), "{shape:?}");
    }
}

#[test]
fn tint_multiplies_color_and_keeps_alpha() {
    let out = tint_premul(&[255, 255, 255, 255, 0, 0, 0, 0], Rgb8::new(255, 0, 128));
    assert_eq!(out, vec![255, 0, 128, 255, 0, 0, 0, 0]);
}

#[test]
fn zero_intensity_is_identity() {
    let src = base();
    assert_eq!(apply(&src, &ParticleOptions::default(), 0.0, Phase::ZERO, None).unwrap(), src);
}

#[test]
fn oversized_speed_and_size_are_clamped_before_drawing() {
    use crate::particles::options::{MAX_PARTICLE_SIZE, MAX_PARTICLE_SPEED};

    let opts = ParticleOptions {
        count: 20,
        speed: u32::MAX,
        size: 1.0e30,
        ..ParticleOptions::default()
    };
    let o = opts.sanitized();
    assert_eq!(o.speed, MAX_PARTICLE_SPEED);
    assert_eq!(o.size, MAX_PARTICLE_SIZE);

    let src = base();
    let out = apply(&src, &opts, 1.0, Phase::wrapping(0.7), None).unwrap();
    assert!(out.same_dimensions(&src));
}
