//! Normalisation of operator input before it reaches storage.

use crate::{ParkingError, ParkingResult};

pub fn vehicle_number(raw: &str) -> ParkingResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParkingError::ValidationError(
            "Please enter a vehicle number".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Blank owner names are stored as absent.
pub fn owner_name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn slot_total(total: i64) -> ParkingResult<i64> {
    if total <= 0 {
        return Err(ParkingError::ValidationError(format!(
            "slot total must be a positive number, got {}",
            total
        )));
    }
    Ok(total)
}

/// Parses a slot total typed by an operator.
pub fn parse_slot_total(raw: &str) -> ParkingResult<i64> {
    let total = raw.trim().parse::<i64>().map_err(|_| {
        ParkingError::ValidationError(format!("Enter a valid positive number, got {:?}", raw))
    })?;
    slot_total(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_number_is_trimmed() {
        assert_eq!(vehicle_number("  KA01AB1234 ").unwrap(), "KA01AB1234");
        assert!(matches!(
            vehicle_number("   "),
            Err(ParkingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_blank_owner_becomes_none() {
        assert_eq!(owner_name(Some("  ")), None);
        assert_eq!(owner_name(None), None);
        assert_eq!(owner_name(Some(" Asha ")), Some("Asha".to_string()));
    }

    #[test]
    fn test_parse_slot_total() {
        assert_eq!(parse_slot_total(" 12 ").unwrap(), 12);
        assert!(parse_slot_total("0").is_err());
        assert!(parse_slot_total("-3").is_err());
        assert!(parse_slot_total("twelve").is_err());
        assert!(parse_slot_total("").is_err());
        assert_eq!(parse_slot_total("20000").unwrap(), 20_000);
    }
}
