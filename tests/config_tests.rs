use dartforge::config::EngineConfig;
use dartforge::error::DartsError;
use dartforge::rules::options::{parse_pairs, OptionValue};
use dartforge::rules::VariantRegistry;
use rstest::rstest;
use std::fs;

#[test]
fn partial_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(
        &path,
        r#"{ "feedback": { "blocking": false }, "simulation": { "seed": 7 } }"#,
    )
    .unwrap();

    let config = EngineConfig::load_from_file(&path).unwrap();
    assert!(!config.feedback.blocking);
    assert_eq!(config.feedback.announce_delay_ms, 0);
    assert_eq!(config.simulation.seed, Some(7));
    assert_eq!(config.simulation.default_h_dev, 35.0);
    assert_eq!(config.match_params.legs_to_set, 3);
}

#[rstest]
#[case::too_many_legs(r#"{ "match_params": { "legs_to_set": 12 } }"#)]
#[case::no_sets(r#"{ "match_params": { "sets_to_match": 0 } }"#)]
#[case::negative_spread(r#"{ "simulation": { "default_v_dev": -1.0 } }"#)]
fn out_of_range_values_are_rejected(#[case] content: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, content).unwrap();
    assert!(matches!(
        EngineConfig::load_from_file(&path),
        Err(DartsError::Config(_))
    ));
}

#[test]
fn broken_json_and_missing_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        EngineConfig::load_from_file(&path),
        Err(DartsError::Json(_))
    ));
    assert!(matches!(
        EngineConfig::load_from_file(dir.path().join("missing.json")),
        Err(DartsError::Io(_))
    ));
}

#[rstest]
#[case::x01("x01", 5)]
#[case::cricket("cricket", 3)]
#[case::clock("around_the_clock", 2)]
fn every_variant_has_a_schema(#[case] variant: &str, #[case] expected: usize) {
    let registry = VariantRegistry::standard();
    assert_eq!(registry.schema(variant).unwrap().len(), expected);
}

#[test]
fn variant_options_are_checked() {
    let registry = VariantRegistry::standard();
    let options = parse_pairs(["x=5", "double_out=true"]).unwrap();
    let resolved = registry.resolve_options("x01", &options).unwrap();
    assert_eq!(resolved["x"], OptionValue::Int(5));
    assert_eq!(resolved["double_in"], OptionValue::Bool(false));
    assert_eq!(resolved["legs_to_set"], OptionValue::Int(3));

    let bad = parse_pairs(["x=10"]).unwrap();
    assert!(registry.resolve_options("x01", &bad).is_err());
    let foreign = parse_pairs(["cut_throat=true"]).unwrap();
    assert!(registry.resolve_options("x01", &foreign).is_err());
    assert!(matches!(
        registry.build("killer", &options),
        Err(DartsError::UnknownVariant(_))
    ));
}
