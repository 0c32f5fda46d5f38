use super::*;

#[test]
fn kinds_parse_from_their_names() {
    for kind in EffectKind::ALL {
        assert_eq!(kind.as_str().parse::<EffectKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
    assert_eq!("Motion_Blur".parse::<EffectKind>().unwrap(), EffectKind::MotionBlur);
}

#[test]
fn unknown_kind_fails_fast() {
    let err = "hologram".parse::<EffectKind>().unwrap_err();
    assert_eq!(err.to_string(), "validation error: unknown effect kind 'hologram'");
}

#[test]
fn only_particles_and_flames_are_procedural() {
    let procedural: Vec<EffectKind> = EffectKind::ALL.into_iter().filter(|k| k.is_procedural()).collect();
    assert_eq!(procedural, vec![EffectKind::Particles, EffectKind::Flames]);
}

#[test]
fn option_values_coerce_leniently() {
    assert_eq!(OptionValue::Int(-5).as_u32("k").unwrap(), 0);
    assert_eq!(OptionValue::Float(2.6).as_u32("k").unwrap(), 3);
    assert_eq!(OptionValue::from("1.5").as_f32("k").unwrap(), 1.5);
    assert!(OptionValue::from("on").as_bool("k").unwrap());
    assert!(OptionValue::Bool(true).as_f32("k").is_err());
    assert!(OptionValue::Int(1).as_text("k").is_err());
}

#[test]
fn option_values_deserialize_untagged() {
    let v: Vec<OptionValue> = serde_json::from_str(r#"[true, 3, 0.5, "x"]"#).unwrap();
    assert_eq!(
        v,
        vec![
            OptionValue::Bool(true),
            OptionValue::Int(3),
            OptionValue::Float(0.5),
            OptionValue::Text("x".into())
        ]
    );
}
