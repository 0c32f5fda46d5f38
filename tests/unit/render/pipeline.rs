use super::*;
use crate::layer::kind::EffectKind;
use crate::layer::stack::LayerId;
use crate::render::backend::CpuBackend;

fn cpu() -> Backends {
    Backends::cpu_only(Arc::new(CpuBackend::default()))
}

fn base() -> FrameRGBA {
    let mut buf = FrameRGBA::solid(24, 16, [120, 140, 160, 255]);
    for x in 0..24 {
        buf.set_pixel(x, 5, [250, 30, 30, 255]);
    }
    buf
}

fn layer(id: u64, kind: EffectKind, order: u32) -> EffectLayer {
    let mut l = EffectLayer::new(LayerId(id), EffectOptions::defaults_of(kind));
    l.order = order;
    l
}

fn rate() -> FrameRate {
    FrameRate::new(20.0).unwrap()
}

#[test]
fn disabled_layer_is_a_plain_copy() {
    let src = base();
    let l = layer(1, EffectKind::Scanline, 0).with_enabled(false);
    let out = apply_layer(&src, &l, 0, Phase::ZERO, &cpu()).unwrap();
    assert_eq!(out, src);
}

#[test]
fn scanline_darkens_only_band_rows() {
    let src = base();
    let l = layer(1, EffectKind::Scanline, 0);
    let out = apply_layer(&src, &l, 0, Phase::ZERO, &cpu()).unwrap();
    assert!(out.pixel(3, 0)[0] < src.pixel(3, 0)[0]);
    assert_eq!(out.pixel(3, 1), src.pixel(3, 1));
}

#[test]
fn layers_apply_in_order_field_not_slice_position() {
    let src = base();
    let a = layer(1, EffectKind::Phosphor, 1);
    let b = layer(2, EffectKind::ChannelSplit, 0);
    let backends = cpu();

    let shuffled = render_frame(&src, &[a.clone(), b.clone()], 1, 4, &backends).unwrap();
    let sorted = render_frame(&src, &[b, a], 1, 4, &backends).unwrap();
    assert_eq!(shuffled, sorted);
}

#[test]
fn empty_stack_repeats_the_base() {
    let src = base();
    let out = render_frames(&src, &[], 3, rate(), &cpu(), &RenderThreading::default(), None, None)
        .unwrap()
        .into_frames()
        .unwrap();
    assert_eq!(out.len(), 3);
    for f in &out {
        assert_eq!(f.buffer, src);
        assert_eq!(f.display_duration_ms, 50);
    }
}

#[test]
fn zero_frames_is_rejected() {
    let err = render_frames(&base(), &[], 0, rate(), &cpu(), &RenderThreading::default(), None, None)
        .unwrap_err();
    assert!(matches!(err, RetrofxError::Validation(_)));
}

#[test]
fn truncated_buffer_is_rejected() {
    let mut src = base();
    src.data.truncate(10);
    let err = render_frames(&src, &[], 2, rate(), &cpu(), &RenderThreading::default(), None, None)
        .unwrap_err();
    assert!(matches!(err, RetrofxError::Validation(_)));
}

#[test]
fn zero_threads_is_rejected() {
    let threading = RenderThreading {
        parallel: true,
        threads: Some(0),
    };
    let err = render_frames(&base(), &[], 2, rate(), &cpu(), &threading, None, None).unwrap_err();
    assert!(matches!(err, RetrofxError::Validation(_)));
}

#[test]
fn parallel_matches_sequential() {
    let src = base();
    let layers = vec![
        layer(1, EffectKind::TapeGlitch, 0),
        layer(2, EffectKind::Noise, 1),
        layer(3, EffectKind::MotionBlur, 2),
    ];
    let backends = cpu();
    let seq = render_frames(&src, &layers, 6, rate(), &backends, &RenderThreading::default(), None, None)
        .unwrap();
    let threading = RenderThreading {
        parallel: true,
        threads: Some(3),
    };
    let par = render_frames(&src, &layers, 6, rate(), &backends, &threading, None, None).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn progress_is_monotonic_and_ends_at_100() {
    for parallel in [false, true] {
        let mut seen = Vec::new();
        let mut cb = |p: f32| seen.push(p);
        let threading = RenderThreading {
            parallel,
            threads: Some(4),
        };
        let layers = vec![layer(1, EffectKind::Noise, 0)];
        render_frames(&base(), &layers, 8, rate(), &cpu(), &threading, Some(&mut cb), None).unwrap();

        assert_eq!(seen.len(), 8);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen[..7].iter().all(|p| *p < 100.0));
        assert_eq!(seen[7], 100.0);
    }
}

#[test]
fn cancelled_before_start_renders_nothing() {
    let token = CancelToken::new();
    token.cancel();
    let mut calls = 0;
    let mut cb = |_: f32| calls += 1;
    let out = render_frames(
        &base(),
        &[layer(1, EffectKind::Noise, 0)],
        4,
        rate(),
        &cpu(),
        &RenderThreading::default(),
        Some(&mut cb),
        Some(&token),
    )
    .unwrap();
    assert!(out.is_cancelled());
    assert_eq!(calls, 0);
}

#[test]
fn cancel_between_frames_discards_partial_output() {
    let token = CancelToken::new();
    let trigger = token.clone();
    let mut calls = 0;
    let mut cb = |_: f32| {
        calls += 1;
        trigger.cancel();
    };
    let out = render_frames(
        &base(),
        &[],
        5,
        rate(),
        &cpu(),
        &RenderThreading::default(),
        Some(&mut cb),
        Some(&token),
    )
    .unwrap();
    assert_eq!(out, RenderOutcome::Cancelled);
    assert_eq!(calls, 1);
}

#[test]
fn procedural_layers_keep_dimensions() {
    let src = base();
    let layers = vec![layer(1, EffectKind::Particles, 0), layer(2, EffectKind::Flames, 1)];
    let frames = render_frames(&src, &layers, 2, rate(), &cpu(), &RenderThreading::default(), None, None)
        .unwrap()
        .into_frames()
        .unwrap();
    for f in frames {
        assert!(f.buffer.same_dimensions(&src));
    }
}
