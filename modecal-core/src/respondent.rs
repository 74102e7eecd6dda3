//! survey respondents (simulated persons) and the filter that scopes them to
//! the calibration-relevant population.
use crate::util::fs;
use crate::ModecalError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

pub const PERSON_COLUMN: &str = "person";
pub const SUBPOPULATION_COLUMN: &str = "subpopulation";
pub const CURRENT_EDU_COLUMN: &str = "current_edu";
pub const CAR_AVAILABLE_COLUMN: &str = "car_available";
pub const RESIDENCE_COLUMN: &str = "residence_msr_id";

/// the only subpopulation that takes part in calibration
pub const REGULAR_SUBPOPULATION: &str = "regular";
/// sentinel written into missing education values
pub const NULL_EDUCATION: &str = "null";

/// one surveyed person. attribute values that were empty or `na` in the
/// source file are absent from `attributes`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Respondent {
    pub person: String,
    pub subpopulation: String,
    pub attributes: BTreeMap<String, String>,
}

/// how respondents are prepared before trips are joined onto them
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersonFilterPolicy {
    /// keep regular respondents, no other change
    #[default]
    RegularOnly,
    /// keep regular respondents, fill missing education and canonicalize the
    /// car availability and residence columns so they join as exact strings
    RegularWithGroupKeys,
}

impl Respondent {
    pub fn new(person: &str, subpopulation: &str, attributes: &[(&str, &str)]) -> Respondent {
        Respondent {
            person: person.to_string(),
            subpopulation: subpopulation.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes.get(column).map(String::as_str)
    }

    /// reads respondents from a (possibly gzipped) delimited persons file
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
    ) -> Result<Vec<Respondent>, ModecalError> {
        let filepath = path.as_ref().to_string_lossy().to_string();
        let mut reader = fs::open_csv(path.as_ref(), delimiter)?;
        let lookup = fs::header_lookup(&mut reader, &filepath)?;
        let person_idx = fs::require_column(&lookup, PERSON_COLUMN, &filepath)?;
        let subpop_idx = fs::require_column(&lookup, SUBPOPULATION_COLUMN, &filepath)?;
        let attribute_columns: Vec<(&String, usize)> = lookup
            .iter()
            .filter(|(_, idx)| **idx != person_idx && **idx != subpop_idx)
            .map(|(name, idx)| (name, *idx))
            .collect();

        let mut respondents = vec![];
        for (row_idx, row) in reader.records().enumerate() {
            let record = row.map_err(|e| ModecalError::ReadError {
                filepath: filepath.clone(),
                error: format!("row {row_idx}: {e}"),
            })?;
            let person = record.get(person_idx).unwrap_or_default().to_string();
            let subpopulation = fs::get_optional(&record, subpop_idx)
                .unwrap_or_default()
                .to_string();
            let attributes = attribute_columns
                .iter()
                .filter_map(|(name, idx)| {
                    fs::get_optional(&record, *idx).map(|v| (name.to_string(), v.to_string()))
                })
                .collect();
            respondents.push(Respondent {
                person,
                subpopulation,
                attributes,
            });
        }
        Ok(respondents)
    }
}

/// keeps only regular respondents and applies the policy's column coercions.
/// returns new records; the input slice is left untouched.
pub fn filter_persons(
    respondents: &[Respondent],
    policy: PersonFilterPolicy,
) -> Result<Vec<Respondent>, ModecalError> {
    respondents
        .iter()
        .filter(|r| r.subpopulation == REGULAR_SUBPOPULATION)
        .map(|r| match policy {
            PersonFilterPolicy::RegularOnly => Ok(r.clone()),
            PersonFilterPolicy::RegularWithGroupKeys => with_group_keys(r),
        })
        .collect()
}

fn with_group_keys(respondent: &Respondent) -> Result<Respondent, ModecalError> {
    let mut out = respondent.clone();
    out.attributes
        .entry(CURRENT_EDU_COLUMN.to_string())
        .or_insert_with(|| NULL_EDUCATION.to_string());
    for column in [CAR_AVAILABLE_COLUMN, RESIDENCE_COLUMN] {
        let raw = respondent.attribute(column).unwrap_or_default();
        let canonical = canonical_integer(column, raw)?;
        out.attributes.insert(column.to_string(), canonical);
    }
    Ok(out)
}

/// renders a numeric identifier as an integer string, e.g. "1.0" -> "1".
/// fractional values are truncated toward zero.
pub fn canonical_integer(column: &str, value: &str) -> Result<String, ModecalError> {
    let trimmed = value.trim();
    let err = || ModecalError::IntegerCoercionError {
        column: column.to_string(),
        value: value.to_string(),
    };
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(i.to_string());
    }
    let f = trimmed.parse::<f64>().map_err(|_| err())?;
    if !f.is_finite() {
        return Err(err());
    }
    Ok((f.trunc() as i64).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Respondent> {
        vec![
            Respondent::new(
                "1",
                "regular",
                &[("car_available", "1.0"), ("residence_msr_id", "12")],
            ),
            Respondent::new(
                "2",
                "freight",
                &[("car_available", "0"), ("residence_msr_id", "3")],
            ),
            Respondent::new(
                "3",
                "regular",
                &[
                    ("car_available", "0"),
                    ("residence_msr_id", "7.0"),
                    ("current_edu", "student"),
                ],
            ),
        ]
    }

    #[test]
    fn test_regular_only_keeps_values() {
        let input = sample();
        let result = filter_persons(&input, PersonFilterPolicy::RegularOnly).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.subpopulation == "regular"));
        assert_eq!(result[0], input[0]);
        assert_eq!(result[0].attribute("car_available"), Some("1.0"));
    }

    #[test]
    fn test_group_keys_coerces_and_fills() {
        let input = sample();
        let result = filter_persons(&input, PersonFilterPolicy::RegularWithGroupKeys).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].attribute("car_available"), Some("1"));
        assert_eq!(result[0].attribute("residence_msr_id"), Some("12"));
        assert_eq!(result[0].attribute("current_edu"), Some("null"));
        assert_eq!(result[1].attribute("residence_msr_id"), Some("7"));
        assert_eq!(result[1].attribute("current_edu"), Some("student"));
        // caller's table is not modified
        assert_eq!(input[0].attribute("car_available"), Some("1.0"));
        assert_eq!(input[0].attribute("current_edu"), None);
    }

    #[test]
    fn test_missing_group_key_fails() {
        let input = vec![Respondent::new("1", "regular", &[("car_available", "1")])];
        let result = filter_persons(&input, PersonFilterPolicy::RegularWithGroupKeys);
        assert!(matches!(
            result,
            Err(ModecalError::IntegerCoercionError { .. })
        ));
    }

    #[test]
    fn test_canonical_integer() {
        assert_eq!(canonical_integer("c", "3").unwrap(), "3");
        assert_eq!(canonical_integer("c", " 4.0 ").unwrap(), "4");
        assert_eq!(canonical_integer("c", "-2.7").unwrap(), "-2");
        assert!(canonical_integer("c", "abc").is_err());
        assert!(canonical_integer("c", "NaN").is_err());
    }
}
