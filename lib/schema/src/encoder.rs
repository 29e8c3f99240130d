//! Feature Encoder
//!
//! Fits an [`EncodingSchema`] over all representative profiles of a load and
//! converts each profile into a standardized feature vector.

use crate::record::{AttributeEncoding, Categorical, RepresentativeProfile};
use crate::schema::{Column, ColumnKind, EncodingSchema, SchemaError, Vocabulary};
use modelmatch_core::Vector;
use std::collections::BTreeSet;

/// Encoder bound to the schema it was fit with
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: EncodingSchema,
}

impl FeatureEncoder {
    /// Fit a schema over the full corpus.
    ///
    /// 1. Collect the sorted distinct values of every one-hot attribute
    /// 2. Lay out columns: capacity, mapped attributes, one-hot blocks
    /// 3. Compute each column's mean and population standard deviation
    pub fn fit(profiles: &[RepresentativeProfile]) -> Result<Self, SchemaError> {
        if profiles.is_empty() {
            return Err(SchemaError::EmptyCorpus);
        }

        let mut columns = vec![Column::new(ColumnKind::Capacity)];
        let mut vocabularies = Vec::new();

        for attribute in Categorical::ALL {
            if attribute.encoding() != AttributeEncoding::OneHot {
                columns.push(Column::new(ColumnKind::Mapped { attribute }));
            }
        }

        for attribute in Categorical::ALL {
            if attribute.encoding() != AttributeEncoding::OneHot {
                continue;
            }
            let values: Vec<String> = profiles
                .iter()
                .filter_map(|p| p.categorical(attribute))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect();

            let offset = columns.len();
            columns.extend(values.iter().map(|value| {
                Column::new(ColumnKind::OneHot {
                    attribute,
                    value: value.clone(),
                })
            }));
            vocabularies.push(Vocabulary {
                attribute,
                values,
                offset,
            });
        }

        let mut schema = EncodingSchema {
            columns,
            vocabularies,
        };

        let rows = profiles
            .iter()
            .map(|p| schema.raw_values(p))
            .collect::<Result<Vec<_>, _>>()?;
        fit_statistics(&mut schema.columns, &rows);

        tracing::debug!(
            profiles = profiles.len(),
            dim = schema.dim(),
            degenerate = schema.columns.iter().filter(|c| c.is_degenerate()).count(),
            "encoding schema fitted"
        );

        Ok(Self { schema })
    }

    pub fn schema(&self) -> &EncodingSchema {
        &self.schema
    }

    pub fn into_schema(self) -> EncodingSchema {
        self.schema
    }

    /// Dimension of every vector this encoder produces
    pub fn vector_dim(&self) -> usize {
        self.schema.dim()
    }

    /// Encode one profile as a standardized vector
    pub fn transform(&self, profile: &RepresentativeProfile) -> Result<Vector, SchemaError> {
        let raw = self.schema.raw_values(profile)?;
        let data = raw
            .iter()
            .zip(self.schema.columns())
            .map(|(value, column)| column.standardize(*value) as f32)
            .collect();
        Ok(Vector::new(data))
    }

    /// Encode every profile, preserving order
    pub fn transform_all(&self, profiles: &[RepresentativeProfile]) -> Result<Vec<Vector>, SchemaError> {
        profiles.iter().map(|p| self.transform(p)).collect()
    }
}

/// Column means and population standard deviations.
///
/// A column whose values are all identical gets a zero deviation, which
/// [`Column::standardize`] maps to zero instead of dividing.
fn fit_statistics(columns: &mut [Column], rows: &[Vec<f64>]) {
    let n = rows.len() as f64;

    for (j, column) in columns.iter_mut().enumerate() {
        let first = rows[0][j];
        let constant = rows.iter().all(|row| row[j] == first);

        let mean = rows.iter().map(|row| row[j]).sum::<f64>() / n;
        column.mean = mean;
        column.std_dev = if constant {
            0.0
        } else {
            let variance = rows.iter().map(|row| (row[j] - mean).powi(2)).sum::<f64>() / n;
            variance.sqrt()
        };
    }
}
