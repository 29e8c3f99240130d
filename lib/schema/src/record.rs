//! Raw observations and the representative profile built from them.
//!
//! Field aliases accept the column headers of the sales export the records
//! usually come from, so a converted spreadsheet deserializes as-is.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One observation of a catalog item (typically one monthly sale row)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(alias = "ORIG_MODEL", deserialize_with = "cell::identifier")]
    pub model_id: String,

    #[serde(default, alias = "BRAND_AD_HOC", deserialize_with = "cell::text")]
    pub brand: Option<String>,

    #[serde(default, alias = "Model", deserialize_with = "cell::text")]
    pub model_name: Option<String>,

    #[serde(default, alias = "44_Capacity", deserialize_with = "cell::number")]
    pub capacity: Option<f64>,

    #[serde(default, alias = "UNIT_PRICE", deserialize_with = "cell::number")]
    pub unit_price: Option<f64>,

    #[serde(default, alias = "PERIOD", deserialize_with = "cell::text")]
    pub period: Option<String>,

    #[serde(default, alias = "54_전압_V", deserialize_with = "cell::text")]
    pub voltage: Option<String>,

    #[serde(default, alias = "38_Energy", deserialize_with = "cell::text")]
    pub energy_grade: Option<String>,

    #[serde(default, alias = "48_Dispenser", deserialize_with = "cell::text")]
    pub dispenser: Option<String>,

    #[serde(
        default,
        alias = "50_ICE_Manual/Dispenser/Automatic",
        deserialize_with = "cell::text"
    )]
    pub ice_mode: Option<String>,

    #[serde(
        default,
        alias = "51_ICE_Type(Cube/Crushed/Cabinet)",
        deserialize_with = "cell::text"
    )]
    pub ice_type: Option<String>,

    #[serde(default, alias = "52_wifi", deserialize_with = "cell::text")]
    pub wifi: Option<String>,

    #[serde(default, alias = "53_smart", deserialize_with = "cell::text")]
    pub smart: Option<String>,

    #[serde(default, alias = "MAIN_TYPE", deserialize_with = "cell::text")]
    pub product_type: Option<String>,

    #[serde(default, alias = "35_Color", deserialize_with = "cell::text")]
    pub color: Option<String>,

    #[serde(
        default,
        alias = "55_Standard/Countertop(D)",
        deserialize_with = "cell::text"
    )]
    pub form_factor: Option<String>,
}

impl RawRecord {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Value of a categorical attribute on this row
    pub fn categorical(&self, attribute: Categorical) -> Option<&str> {
        let slot = match attribute {
            Categorical::Voltage => &self.voltage,
            Categorical::EnergyGrade => &self.energy_grade,
            Categorical::Dispenser => &self.dispenser,
            Categorical::IceMode => &self.ice_mode,
            Categorical::IceType => &self.ice_type,
            Categorical::Wifi => &self.wifi,
            Categorical::Smart => &self.smart,
            Categorical::ProductType => &self.product_type,
            Categorical::Color => &self.color,
            Categorical::FormFactor => &self.form_factor,
        };
        slot.as_deref()
    }
}

/// The single canonical record summarizing every observation of one item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepresentativeProfile {
    pub model_id: String,
    pub brand: Option<String>,
    pub model_name: Option<String>,
    /// Mean capacity over observations that carried one
    pub capacity: Option<f64>,
    /// Mean unit price; metadata only, never encoded
    pub unit_price: Option<f64>,
    pub voltage: Option<String>,
    pub energy_grade: Option<String>,
    pub dispenser: Option<String>,
    pub ice_mode: Option<String>,
    pub ice_type: Option<String>,
    pub wifi: Option<String>,
    pub smart: Option<String>,
    pub product_type: Option<String>,
    pub color: Option<String>,
    pub form_factor: Option<String>,
    /// Number of raw rows folded into this profile
    pub observations: usize,
    pub first_period: Option<String>,
    pub last_period: Option<String>,
}

impl RepresentativeProfile {
    pub fn categorical(&self, attribute: Categorical) -> Option<&str> {
        let slot = match attribute {
            Categorical::Voltage => &self.voltage,
            Categorical::EnergyGrade => &self.energy_grade,
            Categorical::Dispenser => &self.dispenser,
            Categorical::IceMode => &self.ice_mode,
            Categorical::IceType => &self.ice_type,
            Categorical::Wifi => &self.wifi,
            Categorical::Smart => &self.smart,
            Categorical::ProductType => &self.product_type,
            Categorical::Color => &self.color,
            Categorical::FormFactor => &self.form_factor,
        };
        slot.as_deref()
    }

    pub(crate) fn categorical_mut(&mut self, attribute: Categorical) -> &mut Option<String> {
        match attribute {
            Categorical::Voltage => &mut self.voltage,
            Categorical::EnergyGrade => &mut self.energy_grade,
            Categorical::Dispenser => &mut self.dispenser,
            Categorical::IceMode => &mut self.ice_mode,
            Categorical::IceType => &mut self.ice_type,
            Categorical::Wifi => &mut self.wifi,
            Categorical::Smart => &mut self.smart,
            Categorical::ProductType => &mut self.product_type,
            Categorical::Color => &mut self.color,
            Categorical::FormFactor => &mut self.form_factor,
        }
    }

    /// Whether two profiles are sold under the same brand.
    ///
    /// An absent brand never matches, not even another absent brand.
    pub fn same_brand(&self, other: &RepresentativeProfile) -> bool {
        matches!((&self.brand, &other.brand), (Some(a), Some(b)) if a == b)
    }
}

/// Categorical specification attributes, in feature column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Categorical {
    Voltage,
    EnergyGrade,
    Dispenser,
    IceMode,
    IceType,
    Wifi,
    Smart,
    ProductType,
    Color,
    FormFactor,
}

impl Categorical {
    pub const ALL: [Categorical; 10] = [
        Categorical::Voltage,
        Categorical::EnergyGrade,
        Categorical::Dispenser,
        Categorical::IceMode,
        Categorical::IceType,
        Categorical::Wifi,
        Categorical::Smart,
        Categorical::ProductType,
        Categorical::Color,
        Categorical::FormFactor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Categorical::Voltage => "voltage",
            Categorical::EnergyGrade => "energy_grade",
            Categorical::Dispenser => "dispenser",
            Categorical::IceMode => "ice_mode",
            Categorical::IceType => "ice_type",
            Categorical::Wifi => "wifi",
            Categorical::Smart => "smart",
            Categorical::ProductType => "product_type",
            Categorical::Color => "color",
            Categorical::FormFactor => "form_factor",
        }
    }

    /// How the attribute turns into feature columns
    pub fn encoding(&self) -> AttributeEncoding {
        match self {
            Categorical::Voltage => AttributeEncoding::Voltage,
            Categorical::EnergyGrade => AttributeEncoding::EnergyGrade,
            Categorical::Dispenser
            | Categorical::IceMode
            | Categorical::IceType
            | Categorical::Wifi
            | Categorical::Smart => AttributeEncoding::Flag,
            Categorical::ProductType | Categorical::Color | Categorical::FormFactor => {
                AttributeEncoding::OneHot
            }
        }
    }
}

impl fmt::Display for Categorical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoding strategy for a categorical attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeEncoding {
    /// Closed voltage-class table, one column
    Voltage,
    /// Ordinal energy grade table, one column
    EnergyGrade,
    /// Y/N/- flag, one column
    Flag,
    /// One column per distinct value observed in the corpus
    OneHot,
}

/// Lenient cell parsing for loosely typed tabular input
mod cell {
    use super::*;
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Number(f64),
        Flag(bool),
    }

    pub(super) fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Cell>::deserialize(de)? {
            Some(Cell::Text(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(Cell::Number(n)) if n.is_finite() => Some(n.to_string()),
            Some(Cell::Flag(b)) => Some(if b { "Y" } else { "N" }.to_string()),
            _ => None,
        })
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        let value = match Option::<Cell>::deserialize(de)? {
            Some(Cell::Number(n)) => Some(n),
            Some(Cell::Text(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(value.filter(|n| n.is_finite()))
    }

    pub(super) fn identifier<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        text(de)?.ok_or_else(|| D::Error::custom("model identifier must not be empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_cells() {
        let record: RawRecord = serde_json::from_value(json!({
            "model_id": "  RF-100 ",
            "brand": "Acme",
            "capacity": "512.5",
            "unit_price": 1299,
            "voltage": "",
            "wifi": true,
            "smart": 1,
            "color": null
        }))
        .unwrap();

        assert_eq!(record.model_id, "RF-100");
        assert_eq!(record.capacity, Some(512.5));
        assert_eq!(record.unit_price, Some(1299.0));
        assert_eq!(record.voltage, None);
        assert_eq!(record.wifi.as_deref(), Some("Y"));
        assert_eq!(record.smart.as_deref(), Some("1"));
        assert_eq!(record.color, None);
        assert_eq!(record.product_type, None);
    }

    #[test]
    fn test_unparsable_capacity_is_absent() {
        let record: RawRecord =
            serde_json::from_value(json!({"model_id": "X", "capacity": "n/a"})).unwrap();
        assert_eq!(record.capacity, None);
    }

    #[test]
    fn test_export_headers_are_accepted() {
        let record: RawRecord = serde_json::from_value(json!({
            "ORIG_MODEL": "RS-22",
            "BRAND_AD_HOC": "Borealis",
            "Model": "Borealis Side 22",
            "44_Capacity": 610,
            "54_전압_V": "220V",
            "38_Energy": "A+",
            "MAIN_TYPE": "SBS",
            "55_Standard/Countertop(D)": "Standard"
        }))
        .unwrap();

        assert_eq!(record.model_id, "RS-22");
        assert_eq!(record.categorical(Categorical::Voltage), Some("220V"));
        assert_eq!(record.categorical(Categorical::FormFactor), Some("Standard"));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let result: Result<RawRecord, _> = serde_json::from_value(json!({"model_id": "  "}));
        assert!(result.is_err());
    }

    #[test]
    fn test_same_brand_treats_absent_as_distinct() {
        let mut a = RepresentativeProfile::default();
        let mut b = RepresentativeProfile::default();
        assert!(!a.same_brand(&b));

        a.brand = Some("Acme".into());
        b.brand = Some("Acme".into());
        assert!(a.same_brand(&b));
    }
}
