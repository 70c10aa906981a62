//! Config Validation Tests
//!
//! Typo detection and physical range checks for `well_test.toml`, exercised
//! through the public config API.

use welltest::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use welltest::config::{ConfigError, WellTestConfig};

const VALID: &str = r#"
[well]
name = "BU-7"
field = "Test Field"

[flow_period]
producing_time_hours = 100.0

[fluid]
flow_rate_bbl_day = 542.0
formation_volume_factor = 2.5052
viscosity_cp = 0.108
total_compressibility_per_psi = 3.91e-5

[reservoir]
porosity = 0.031
wellbore_radius_ft = 0.245
thickness_ft = 787.0
"#;

// ============================================================================
// Typo Detection Tests
// ============================================================================

#[test]
fn typo_in_fluid_section_warns_with_suggestion() {
    let toml_str = r#"
[fluid]
viscosty_cp = 0.108
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("viscosty_cp"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("fluid.viscosity_cp"));
}

#[test]
fn typo_in_well_section_warns() {
    let toml_str = r#"
[well]
naem = "BU-7"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    // "naem" is distance 2 from "name"
    assert_eq!(warnings[0].suggestion.as_deref(), Some("well.name"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let warnings = validate_unknown_keys(VALID);
    assert!(warnings.is_empty(), "Unexpected warnings: {warnings:?}");
}

#[test]
fn unknown_section_has_no_suggestion() {
    let toml_str = r#"
[drilling_parameters]
rop = 50.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.suggestion.is_none()));
}

#[test]
fn every_config_field_is_a_known_key() {
    let known = known_config_keys();
    let config = WellTestConfig::from_toml_str(VALID).unwrap();
    let value: toml::Value = config.to_toml().unwrap().parse().unwrap();
    for key in welltest::config::validation::walk_toml_keys(&value, "") {
        assert!(known.contains(key.as_str()), "{key} missing from known keys");
    }
}

#[test]
fn suggestion_prefers_closest_key() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("reservoir.porosty", &known).as_deref(),
        Some("reservoir.porosity")
    );
}

// ============================================================================
// Range Validation Tests
// ============================================================================

#[test]
fn typical_values_produce_no_range_warnings() {
    let mut config = WellTestConfig::from_toml_str(VALID).unwrap();
    config.reservoir.porosity = 0.2;
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.is_empty(), "Unexpected warnings: {warnings:?}");
}

#[test]
fn porosity_above_one_is_an_error() {
    let toml_str = VALID.replace("porosity = 0.031", "porosity = 3.1");
    let err = WellTestConfig::from_toml_str(&toml_str).unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.contains("reservoir.porosity")));
        }
        other => panic!("expected Validation error, got {other}"),
    }
}

#[test]
fn non_positive_values_are_all_reported() {
    let toml_str = VALID
        .replace("thickness_ft = 787.0", "thickness_ft = 0.0")
        .replace("viscosity_cp = 0.108", "viscosity_cp = -1.0");
    let err = WellTestConfig::from_toml_str(&toml_str).unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.contains("thickness_ft")), "{errors:?}");
            assert!(errors.iter().any(|e| e.contains("viscosity_cp")), "{errors:?}");
        }
        other => panic!("expected Validation error, got {other}"),
    }
}

#[test]
fn unusual_thickness_warns_but_loads() {
    let toml_str = VALID.replace("thickness_ft = 787.0", "thickness_ft = 5000.0");
    let config = WellTestConfig::from_toml_str(&toml_str).unwrap();
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "reservoir.thickness_ft");
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn explicit_path_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("well_test.toml");

    let config = WellTestConfig::from_toml_str(VALID).unwrap();
    config.save_to_file(&path).unwrap();

    let loaded = WellTestConfig::load(Some(&path)).unwrap();
    assert_eq!(loaded.well.name, "BU-7");
    assert_eq!(loaded.properties(), config.properties());
}

#[test]
fn missing_explicit_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WellTestConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}
