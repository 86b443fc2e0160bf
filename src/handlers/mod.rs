pub mod cart;
pub mod customers;
pub mod job_cards;
pub mod parts;
pub mod products;
pub mod purchases;
pub mod rentals;
pub mod reports;
pub mod scooters;
pub mod staff;
pub mod stores;
pub mod suppliers;
pub mod transfers;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ServiceError;

/// Parses an optional `?status=` query value into a status enum, using the
/// same snake_case names the API serializes.
pub(crate) fn parse_status<T: DeserializeOwned>(
    status: &Option<String>,
) -> Result<Option<T>, ServiceError> {
    match status {
        None => Ok(None),
        Some(raw) => serde_json::from_value(Value::String(raw.clone()))
            .map(Some)
            .map_err(|_| ServiceError::ValidationError(format!("Unknown status '{}'", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::stock_transfer::TransferStatus;

    #[test]
    fn parse_status_accepts_snake_case_names() {
        let parsed: Option<TransferStatus> =
            parse_status(&Some("pending".to_string())).unwrap();
        assert_eq!(parsed, Some(TransferStatus::Pending));
        let none: Option<TransferStatus> = parse_status(&None).unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn parse_status_rejects_unknown_names() {
        let err = parse_status::<TransferStatus>(&Some("bogus".to_string()));
        assert!(err.is_err());
    }
}
