use crate::domain::radar::Nation;
use crate::time::month::Month;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("month pattern is a valid regex"));

/// Raw `month` / `nation` query parameters as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarQuery {
    pub month: Option<String>,
    pub nation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub month: Month,
    pub nation: Nation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every field that failed validation, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid parameters")?;
        for (i, d) in self.details.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{} ({})", d.field, d.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl RadarQuery {
    pub fn new(month: impl Into<String>, nation: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            nation: Some(nation.into()),
        }
    }

    pub fn validate(&self) -> Result<ValidatedQuery, ValidationError> {
        let mut details = Vec::new();

        let month = match self.month.as_deref() {
            None => {
                details.push(FieldError::new("month", "Required"));
                None
            }
            Some(s) if !MONTH_PATTERN.is_match(s) => {
                details.push(FieldError::new("month", "Month must be in YYYY-MM format"));
                None
            }
            Some(s) => match s.parse::<Month>() {
                Ok(m) => Some(m),
                Err(_) => {
                    details.push(FieldError::new("month", "Month must be between 01 and 12"));
                    None
                }
            },
        };

        let nation = match self.nation.as_deref() {
            None => {
                details.push(FieldError::new("nation", "Required"));
                None
            }
            Some(s) => match s.parse::<Nation>() {
                Ok(n) => Some(n),
                Err(_) => {
                    details.push(FieldError::new(
                        "nation",
                        format!("Invalid enum value. Expected 'domestic' | 'export', received '{s}'"),
                    ));
                    None
                }
            },
        };

        match (month, nation) {
            (Some(month), Some(nation)) => Ok(ValidatedQuery { month, nation }),
            _ => Err(ValidationError { details }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_query() {
        let q = RadarQuery::new("2024-05", "export").validate().unwrap();
        assert_eq!(q.month.to_string(), "2024-05");
        assert_eq!(q.nation, Nation::Export);
    }

    #[test]
    fn reports_every_failing_field() {
        let err = RadarQuery::new("2024-5", "overseas").validate().unwrap_err();
        let fields: Vec<_> = err.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["month", "nation"]);
        assert_eq!(err.details[0].message, "Month must be in YYYY-MM format");
    }

    #[test]
    fn missing_fields_are_required() {
        let err = RadarQuery::default().validate().unwrap_err();
        assert_eq!(err.details.len(), 2);
        assert!(err.details.iter().all(|d| d.message == "Required"));
    }

    #[test]
    fn out_of_range_month_is_rejected_not_coerced() {
        let err = RadarQuery::new("2024-13", "domestic").validate().unwrap_err();
        assert_eq!(err.details.len(), 1);
        assert_eq!(err.details[0].field, "month");
        assert!(err.to_string().starts_with("invalid parameters: month"));
    }
}
