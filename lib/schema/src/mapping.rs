//! Closed lookup tables for categorical attributes
//!
//! Each table maps the known spellings to a number and sends everything
//! else (including a missing value) to `0.0`. These values define the
//! metric space, so they must stay exactly as listed.

/// Voltage class in volts; dual-voltage classes take the midpoint
pub fn voltage_value(value: Option<&str>) -> f64 {
    match value {
        Some("110V") => 110.0,
        Some("220V") => 220.0,
        Some("110V/220V") => 165.0,
        Some("127V") => 127.0,
        Some("127V/220V") => 173.5,
        _ => 0.0,
    }
}

/// Y/N/- flag. Numeric spellings keep their value.
pub fn flag_value(value: Option<&str>) -> f64 {
    match value {
        Some("Y") => 1.0,
        Some("N") | Some("-") => 0.0,
        Some(other) => other
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        None => 0.0,
    }
}

/// Ordinal energy grade, `A` at zero
pub fn energy_grade_value(value: Option<&str>) -> f64 {
    match value {
        Some("A+++") => 3.0,
        Some("A++") => 2.0,
        Some("A+") => 1.0,
        Some("A") => 0.0,
        Some("B") => -1.0,
        Some("C") => -2.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_table() {
        let inputs = ["110V", "220V", "110V/220V", "127V", "127V/220V", "OTHER"];
        let values: Vec<f64> = inputs.iter().map(|v| voltage_value(Some(v))).collect();
        assert_eq!(values, vec![110.0, 220.0, 165.0, 127.0, 173.5, 0.0]);
        assert_eq!(voltage_value(None), 0.0);
    }

    #[test]
    fn test_voltage_numeric_spelling_is_unknown() {
        assert_eq!(voltage_value(Some("240")), 0.0);
    }

    #[test]
    fn test_energy_grade_table() {
        assert_eq!(energy_grade_value(Some("A+++")), 3.0);
        assert_eq!(energy_grade_value(Some("A++")), 2.0);
        assert_eq!(energy_grade_value(Some("A+")), 1.0);
        assert_eq!(energy_grade_value(Some("A")), 0.0);
        assert_eq!(energy_grade_value(Some("B")), -1.0);
        assert_eq!(energy_grade_value(Some("C")), -2.0);
        assert_eq!(energy_grade_value(Some("D")), 0.0);
        assert_eq!(energy_grade_value(None), 0.0);
    }

    #[test]
    fn test_flag_table() {
        assert_eq!(flag_value(Some("Y")), 1.0);
        assert_eq!(flag_value(Some("N")), 0.0);
        assert_eq!(flag_value(Some("-")), 0.0);
        assert_eq!(flag_value(None), 0.0);
        assert_eq!(flag_value(Some("Cube")), 0.0);
        assert_eq!(flag_value(Some("2")), 2.0);
        assert_eq!(flag_value(Some("y")), 0.0);
    }
}
