//! Raw urlencoded fields, for forms with repeated keys
//!
//! `serde_urlencoded` cannot collect `accessory_ids=1&accessory_ids=2`
//! into a `Vec`, so multi-select forms are read as ordered pairs.

use std::str::FromStr;

use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Request};
use axum::Form;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Default)]
pub struct FormFields(pub Vec<(String, String)>);

impl FormFields {
    /// First non-empty value for `key`, trimmed
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Parse a required field.
    pub fn required<T: FromStr>(&self, key: &str) -> DomainResult<T> {
        let raw = self
            .get(key)
            .ok_or_else(|| DomainError::Validation(format!("{}: is required", key)))?;
        raw.parse()
            .map_err(|_| DomainError::Validation(format!("{}: invalid value \"{}\"", key, raw)))
    }

    /// Parse an optional field; empty means absent.
    pub fn optional<T: FromStr>(&self, key: &str) -> DomainResult<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                DomainError::Validation(format!("{}: invalid value \"{}\"", key, raw))
            }),
        }
    }

    /// Every integer value for `key` (or `key[]`), in submission order.
    /// Values that are not integers are skipped.
    pub fn ids(&self, key: &str) -> Vec<i32> {
        let bracketed = format!("{}[]", key);
        self.0
            .iter()
            .filter(|(k, _)| k == key || *k == bracketed)
            .filter_map(|(_, v)| v.trim().parse().ok())
            .collect()
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
        Ok(FormFields(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn repeated_ids_keep_order_and_skip_garbage() {
        let f = fields(&[
            ("accessory_ids", "3"),
            ("other", "9"),
            ("accessory_ids", "abc"),
            ("accessory_ids[]", " 1 "),
        ]);
        assert_eq!(f.ids("accessory_ids"), vec![3, 1]);
        assert!(f.ids("missing").is_empty());
    }

    #[test]
    fn empty_optional_is_none() {
        let f = fields(&[("insurance_id", "")]);
        assert_eq!(f.optional::<i32>("insurance_id").unwrap(), None);

        let f = fields(&[("insurance_id", "4")]);
        assert_eq!(f.optional::<i32>("insurance_id").unwrap(), Some(4));

        let f = fields(&[("insurance_id", "x")]);
        assert!(f.optional::<i32>("insurance_id").is_err());
    }

    #[test]
    fn required_dates() {
        let f = fields(&[("start_date", "2024-01-01")]);
        assert_eq!(
            f.required::<NaiveDate>("start_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(matches!(
            f.required::<NaiveDate>("end_date"),
            Err(DomainError::Validation(_))
        ));
    }
}
