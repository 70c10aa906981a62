//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse: the raw TOML is first walked as a `toml::Value` tree and
//! every dotted key is compared against the known field names, producing
//! "did you mean?" warnings. Normal serde deserialization follows. Warnings
//! never fail a load.

use std::collections::HashSet;

use super::WellTestConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `WellTestConfig`.
///
/// Kept in step with the structs in `well_config.rs` by hand.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [well]
        "well",
        "well.name",
        "well.field",
        // [flow_period]
        "flow_period",
        "flow_period.producing_time_hours",
        // [fluid]
        "fluid",
        "fluid.flow_rate_bbl_day",
        "fluid.formation_volume_factor",
        "fluid.viscosity_cp",
        "fluid.total_compressibility_per_psi",
        // [reservoir]
        "reservoir",
        "reservoir.porosity",
        "reservoir.wellbore_radius_ft",
        "reservoir.thickness_ft",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively collect all dotted key paths of a `toml::Value` tree.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Closest known key within edit distance 3, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every key in `raw_toml` that the config does not define.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        // Syntax errors are reported by the serde pass
        return Vec::new();
    };

    let known = known_config_keys();
    let mut found = walk_toml_keys(&value, "");
    found.sort();

    found
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

fn range_warning(field: &str, value: f64, low: f64, high: f64, unit: &str) -> Option<ValidationWarning> {
    (value < low || value > high).then(|| ValidationWarning {
        field: field.to_string(),
        message: format!("{field} = {value} is outside typical range ({low}-{high} {unit})"),
        suggestion: None,
    })
}

/// Physical plausibility of a parsed config.
///
/// Returns `(errors, warnings)`: errors are impossible values, warnings are
/// unusual but possible for some reservoirs.
pub fn validate_physical_ranges(config: &WellTestConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();

    if config.reservoir.porosity > 1.0 {
        errors.push(format!(
            "reservoir.porosity = {} is a fraction and cannot exceed 1.0",
            config.reservoir.porosity
        ));
    }

    let checks = [
        range_warning("reservoir.porosity", config.reservoir.porosity, 0.01, 0.45, "fraction"),
        range_warning("reservoir.wellbore_radius_ft", config.reservoir.wellbore_radius_ft, 0.1, 1.5, "ft"),
        range_warning("reservoir.thickness_ft", config.reservoir.thickness_ft, 1.0, 2000.0, "ft"),
        range_warning("fluid.viscosity_cp", config.fluid.viscosity_cp, 0.05, 10_000.0, "cp"),
        range_warning(
            "fluid.formation_volume_factor",
            config.fluid.formation_volume_factor,
            1.0,
            5.0,
            "rb/STB",
        ),
        range_warning(
            "fluid.total_compressibility_per_psi",
            config.fluid.total_compressibility_per_psi,
            1e-7,
            1e-3,
            "1/psi",
        ),
        range_warning(
            "flow_period.producing_time_hours",
            config.flow_period.producing_time_hours,
            0.1,
            1e6,
            "hours",
        ),
    ];
    let warnings = checks.into_iter().flatten().collect();

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("porosity", "porosity"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("porosty", "porosity"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_levenshtein_multibyte() {
        assert_eq!(levenshtein("Ø", "O"), 1);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r"
            [fluid]
            viscosity_cp = 0.108
        "
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"fluid".to_string()));
        assert!(keys.contains(&"fluid.viscosity_cp".to_string()));
    }

    #[test]
    fn test_suggest_correction() {
        let known = known_config_keys();
        assert_eq!(
            suggest_correction("reservoir.thicknes_ft", &known).as_deref(),
            Some("reservoir.thickness_ft")
        );
        assert_eq!(suggest_correction("completely.unrelated.key", &known), None);
    }
}
