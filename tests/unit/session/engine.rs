use std::collections::HashMap;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::layer::kind::EffectKind;
use crate::layer::stack::EffectStack;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn cpu_engine() -> Engine {
    Engine::new(EngineOpts {
        backend: BackendPreference::Cpu,
        ..EngineOpts::default()
    })
}

fn rate() -> FrameRate {
    FrameRate::new(10.0).unwrap()
}

#[test]
fn env_overrides_apply() {
    let opts = EngineOpts::default().overlay(env(&[
        ("RETROFX_BACKEND", " CPU "),
        ("RETROFX_THREADS", "3"),
        ("RETROFX_SPRITE_CACHE", "5"),
    ]));
    assert_eq!(opts.backend, BackendPreference::Cpu);
    assert_eq!(
        opts.threading,
        RenderThreading {
            parallel: true,
            threads: Some(3)
        }
    );
    assert_eq!(opts.sprite_cache_capacity, 5);
}

#[test]
fn invalid_env_values_are_ignored() {
    let opts = EngineOpts::default().overlay(env(&[
        ("RETROFX_BACKEND", "metal"),
        ("RETROFX_THREADS", "0"),
        ("RETROFX_SPRITE_CACHE", "lots"),
    ]));
    assert_eq!(opts, EngineOpts::default());
}

#[test]
fn backend_preference_parses() {
    assert_eq!("auto".parse::<BackendPreference>().unwrap(), BackendPreference::Auto);
    assert!(matches!(
        "gpu-only".parse::<BackendPreference>(),
        Err(RetrofxError::Validation(_))
    ));
}

#[test]
fn cpu_preference_never_touches_the_gpu() {
    let engine = cpu_engine();
    assert_eq!(engine.backend_kind(), BackendKind::Cpu);
    assert_eq!(engine.backends().particle_kind(), BackendKind::Cpu);
}

#[test]
fn force_cpu_pins_both_kinds() {
    let mut engine = Engine::default();
    engine.force_cpu();
    assert_eq!(engine.backend_kind(), BackendKind::Cpu);
    assert_eq!(engine.backends().particle_kind(), BackendKind::Cpu);
    assert_eq!(engine.opts().backend, BackendPreference::Cpu);
}

#[test]
fn all_disabled_stack_returns_copies_of_the_base() {
    let mut stack = EffectStack::new();
    for kind in EffectKind::ALL {
        let id = stack.append(kind);
        stack.set_enabled(id, false).unwrap();
    }
    let base = FrameRGBA::solid(8, 6, [12, 34, 56, 255]);
    let frames = cpu_engine()
        .render_frames(&base, stack.sorted_layers(), 4, rate())
        .unwrap();
    assert_eq!(frames.len(), 4);
    assert!(frames.iter().all(|f| f.buffer == base && f.display_duration_ms == 100));
}

#[test]
fn sink_receives_the_full_sequence_in_order() {
    let mut stack = EffectStack::new();
    stack.append(EffectKind::Scanline);
    let base = FrameRGBA::solid(6, 4, [200, 200, 200, 255]);
    let mut sink = InMemorySink::new();

    let outcome = cpu_engine()
        .render_to_sink(&base, stack.sorted_layers(), 3, rate(), &mut sink, None)
        .unwrap();

    let frames = outcome.into_frames().unwrap();
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.frame_count), (6, 4, 3));
    let pushed: Vec<u32> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(pushed, vec![0, 1, 2]);
    assert_eq!(sink.frames()[2].1, frames[2]);
}

#[test]
fn cancelled_render_never_reaches_the_sink() {
    let token = CancelToken::new();
    token.cancel();
    let base = FrameRGBA::solid(4, 4, [0, 0, 0, 255]);
    let mut sink = InMemorySink::new();

    let outcome = cpu_engine()
        .render_to_sink(&base, &[], 3, rate(), &mut sink, Some(&token))
        .unwrap();

    assert!(outcome.is_cancelled());
    assert!(sink.config().is_none());
    assert!(sink.frames().is_empty());
}

#[test]
fn progress_reaches_100_through_the_engine() {
    let base = FrameRGBA::solid(4, 4, [90, 90, 90, 255]);
    let mut last = 0.0f32;
    let mut cb = |p: f32| last = p;
    let outcome = cpu_engine()
        .render_frames_with_progress(&base, &[], 5, rate(), &mut cb, &CancelToken::new())
        .unwrap();
    assert!(!outcome.is_cancelled());
    assert_eq!(last, 100.0);
}
