//! Encoding schema definitions
//!
//! An [`EncodingSchema`] is fitted once per dataset load. It fixes the
//! feature column layout (including the one-hot vocabularies) and the
//! per-column standardization statistics. Every vector of a load must be
//! produced by the same schema.

use crate::mapping::{energy_grade_value, flag_value, voltage_value};
use crate::record::{AttributeEncoding, Categorical, RepresentativeProfile};
use serde::{Deserialize, Serialize};

/// Fitted encoding parameters for one dataset load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodingSchema {
    pub(crate) columns: Vec<Column>,

    pub(crate) vocabularies: Vec<Vocabulary>,
}

impl EncodingSchema {
    /// Number of feature dimensions
    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in vector order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Sorted values promoted to one-hot columns for `attribute`
    pub fn vocabulary(&self, attribute: Categorical) -> Option<&[String]> {
        self.vocabularies
            .iter()
            .find(|v| v.attribute == attribute)
            .map(|v| v.values.as_slice())
    }

    /// Unscaled feature values of a profile, in column order.
    ///
    /// Fails when a nominal value was not seen when the schema was fit.
    pub fn raw_values(&self, profile: &RepresentativeProfile) -> Result<Vec<f64>, SchemaError> {
        let mut values = vec![0.0; self.columns.len()];

        for (slot, column) in values.iter_mut().zip(&self.columns) {
            *slot = match &column.kind {
                ColumnKind::Capacity => profile.capacity.unwrap_or(0.0),
                ColumnKind::Mapped { attribute } => {
                    let value = profile.categorical(*attribute);
                    match attribute.encoding() {
                        AttributeEncoding::Voltage => voltage_value(value),
                        AttributeEncoding::EnergyGrade => energy_grade_value(value),
                        AttributeEncoding::Flag => flag_value(value),
                        AttributeEncoding::OneHot => {
                            return Err(SchemaError::MisplacedAttribute(*attribute))
                        }
                    }
                }
                // filled below from the vocabulary lookup
                ColumnKind::OneHot { .. } => 0.0,
            };
        }

        for vocabulary in &self.vocabularies {
            let Some(value) = profile.categorical(vocabulary.attribute) else {
                continue;
            };
            let slot = vocabulary
                .values
                .binary_search_by(|probe| probe.as_str().cmp(value))
                .map_err(|_| SchemaError::UnknownCategory {
                    attribute: vocabulary.attribute,
                    value: value.to_string(),
                })?;
            values[vocabulary.offset + slot] = 1.0;
        }

        Ok(values)
    }
}

/// One feature dimension with its standardization statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub mean: f64,
    /// Population standard deviation; zero for a constant column
    pub std_dev: f64,
}

impl Column {
    pub(crate) fn new(kind: ColumnKind) -> Self {
        let name = match &kind {
            ColumnKind::Capacity => "capacity".to_string(),
            ColumnKind::Mapped { attribute } => attribute.name().to_string(),
            ColumnKind::OneHot { attribute, value } => format!("{}={}", attribute, value),
        };
        Self {
            name,
            kind,
            mean: 0.0,
            std_dev: 0.0,
        }
    }

    /// Constant over the fitted corpus; scales to zero
    pub fn is_degenerate(&self) -> bool {
        self.std_dev == 0.0
    }

    /// Z-score of `value`
    pub fn standardize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// What a feature column encodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    Capacity,
    Mapped { attribute: Categorical },
    OneHot { attribute: Categorical, value: String },
}

/// Sorted one-hot vocabulary and where its block starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct Vocabulary {
    pub attribute: Categorical,
    pub values: Vec<String>,
    pub offset: usize,
}

/// Errors raised while fitting or applying an encoding schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Cannot fit an encoding schema on an empty corpus")]
    EmptyCorpus,

    #[error("Schema inconsistency: {attribute} value '{value}' was not seen when the schema was fit")]
    UnknownCategory {
        attribute: Categorical,
        value: String,
    },

    #[error("Schema inconsistency: attribute {0} is not encoded as a single column")]
    MisplacedAttribute(Categorical),
}
