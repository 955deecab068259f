//! Easing names as they appear in configuration files

use cadence_core::{CadenceError, Easing};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TweenSection {
    #[serde(default)]
    easing: Easing,
    duration_ms: f64,
}

#[test]
fn easing_deserializes_from_toml_names() {
    let section: TweenSection = toml::from_str(
        r#"
        easing = "ease-out-quart"
        duration_ms = 250.0
        "#,
    )
    .unwrap();

    assert!(matches!(section.easing, Easing::EaseOutQuart));
    assert_eq!(section.duration_ms, 250.0);
}

#[test]
fn easing_defaults_to_linear_when_missing() {
    let section: TweenSection = toml::from_str("duration_ms = 10.0").unwrap();
    assert!(matches!(section.easing, Easing::Linear));
}

#[test]
fn unknown_easing_is_a_parse_error() {
    let err = toml::from_str::<TweenSection>(
        r#"
        easing = "wobble"
        duration_ms = 1.0
        "#,
    )
    .unwrap_err();

    assert!(err.to_string().contains("Unknown easing: wobble"));
}

#[test]
fn easing_serializes_to_its_name() {
    let json = serde_json::to_string(&Easing::EaseInOutSine).unwrap();
    assert_eq!(json, "\"easeInOutSine\"");

    let bezier = serde_json::to_string(&Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)).unwrap();
    assert_eq!(bezier, "\"cubic-bezier(0.25, 0.1, 0.25, 1)\"");

    let back: Easing = serde_json::from_str(&bezier).unwrap();
    assert!(matches!(back, Easing::CubicBezier(x1, _, _, y2) if x1 == 0.25 && y2 == 1.0));
}

#[test]
fn custom_easing_refuses_to_serialize() {
    fn hold(_: f32) -> f32 {
        0.0
    }
    let err = serde_json::to_string(&Easing::Custom(hold)).unwrap_err();
    assert!(err.to_string().contains("custom easing"));
}

#[test]
fn config_errors_convert_into_cadence_error() {
    let toml_err = toml::from_str::<TweenSection>("duration_ms = \"slow\"").unwrap_err();
    let err: CadenceError = toml_err.into();
    assert!(matches!(err, CadenceError::Config(_)));
    assert!(err.to_string().starts_with("Failed to parse configuration"));
}
