use super::*;

const MODES: [EmissionMode; 10] = [
    EmissionMode::Float,
    EmissionMode::Burst,
    EmissionMode::Fountain,
    EmissionMode::Spiral,
    EmissionMode::Edge,
    EmissionMode::Rain,
    EmissionMode::Pulse,
    EmissionMode::Snow,
    EmissionMode::Embers,
    EmissionMode::Bubbles,
];

fn opts(mode: EmissionMode) -> ParticleOptions {
    ParticleOptions {
        mode,
        count: 40,
        speed: 2,
        ..ParticleOptions::default()
    }
}

#[test]
fn evaluation_is_deterministic_and_order_free() {
    for mode in MODES {
        let e = Emitter::new(&opts(mode), 120, 80);
        let p = Phase::wrapping(0.37);
        let forward: Vec<Particle> = (0..40).map(|i| e.particle(i, p)).collect();
        let backward: Vec<Particle> = (0..40).rev().map(|i| e.particle(i, p)).collect();
        let backward: Vec<Particle> = backward.into_iter().rev().collect();
        assert_eq!(forward, backward);
        assert_eq!(forward, e.particles(p, 500));
    }
}

#[test]
fn loop_closes_for_every_mode() {
    for mode in MODES {
        let e = Emitter::new(&opts(mode), 100, 100);
        for i in 0..40 {
            let a = e.position(i, Phase::ZERO);
            let b = e.position(i, Phase::wrapping(0.999_99));
            let d = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
            // Either continuous, or hidden by a rebirth with zero alpha.
            let alpha = e.particle(i, Phase::ZERO).alpha;
            assert!(d < 1.0 || alpha < 0.05, "{mode:?} particle {i} jumps {d}");
        }
    }
}

#[test]
fn fade_envelope_is_zero_at_birth() {
    let mut o = opts(EmissionMode::Pulse);
    o.speed = 1;
    let e = Emitter::new(&o, 64, 64);
    assert!(e.particle(0, Phase::ZERO).alpha.abs() < 1e-6);
    assert!((e.particle(0, Phase::wrapping(0.5)).alpha - 1.0).abs() < 1e-6);
}

#[test]
fn pulse_particles_share_one_ring() {
    let e = Emitter::new(&opts(EmissionMode::Pulse), 100, 100);
    let p = Phase::wrapping(0.2);
    let r0 = {
        let (x, y) = e.position(0, p);
        ((x - 50.0).powi(2) + (y - 50.0).powi(2)).sqrt()
    };
    for i in 1..40 {
        let (x, y) = e.position(i, p);
        let r = ((x - 50.0).powi(2) + (y - 50.0).powi(2)).sqrt();
        assert!((r - r0).abs() < 0.05 * 100.0 * 0.4 + 0.01);
    }
}

#[test]
fn rain_falls_and_float_rises() {
    let rain = Emitter::new(&opts(EmissionMode::Rain), 100, 100);
    let float = Emitter::new(&opts(EmissionMode::Float), 100, 100);
    for i in 0..40 {
        let p = Phase::wrapping(0.1);
        assert!(rain.velocity(i, p).1 > 0.0);
        assert!(float.velocity(i, p).1 < 0.0);
    }
}

#[test]
fn count_respects_limit() {
    let e = Emitter::new(&opts(EmissionMode::Snow), 10, 10);
    assert_eq!(e.count(300), 40);
    assert_eq!(e.particles(Phase::ZERO, 7).len(), 7);
    let too_many = ParticleOptions {
        count: 10_000,
        ..ParticleOptions::default()
    };
    assert_eq!(Emitter::new(&too_many, 10, 10).count(500), 60);
}

#[test]
fn rainbow_colors_rotate_with_phase() {
    let o = ParticleOptions {
        color_mode: ParticleColorMode::Rainbow,
        ..opts(EmissionMode::Float)
    };
    let e = Emitter::new(&o, 50, 50);
    assert_eq!(e.particle(3, Phase::ZERO).color, e.particle(3, Phase::wrapping(1.0)).color);
}
