use crate::domain::model::ApplicantPayload;
use crate::utils::error::{IntakeError, Result};

pub const MAX_PET_AGE_YEARS: u32 = 40;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> IntakeError {
    IntakeError::InvalidFieldError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: i64, min_value: i64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            format!("{} is required", field_name),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("{} must be between {} and {}", field_name, min, max),
        ));
    }
    Ok(())
}

// Booking form rules. The identity number itself is checked by
// `core::identity`, this only requires it to be present.
impl Validate for ApplicantPayload {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pet_name", &self.pet_name)?;
        validate_non_empty_string("owner_first_name", &self.owner_first_name)?;
        validate_non_empty_string("owner_last_name", &self.owner_last_name)?;
        validate_non_empty_string("owner_identity_number", &self.owner_identity_number)?;
        validate_range("owner_age", self.owner_age, 1, 120)?;

        if let Some(weight) = self.pet_weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid("pet_weight", weight, "pet_weight cannot be negative"));
            }
        }

        if let Some(years) = self.pet_age_years {
            validate_range("pet_age_years", years, 0, MAX_PET_AGE_YEARS)?;
        }

        if let Some(months) = self.pet_age_months {
            validate_range("pet_age_months", months, 0, 11)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PetSize;

    fn applicant() -> ApplicantPayload {
        ApplicantPayload {
            pet_name: "Firulais".to_string(),
            pet_size: PetSize::Small,
            pet_weight: Some(12.5),
            pet_breed: Some("Mestizo".to_string()),
            pet_age_years: Some(3),
            pet_age_months: Some(2),
            pet_allergies: None,
            medical_complications: None,
            vaccinations: Some("Rabia".to_string()),
            owner_first_name: "María".to_string(),
            owner_last_name: "López".to_string(),
            owner_age: 29,
            owner_identity_number: "1234567890101".to_string(),
        }
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.database_path", "./intake.db").is_ok());
        assert!(validate_path("storage.database_path", "").is_err());
        assert!(validate_path("storage.database_path", "a\0b").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("booking.slot_interval_minutes", 30, 1).is_ok());
        assert!(validate_positive_number("booking.slot_interval_minutes", 0, 1).is_err());
    }

    #[test]
    fn test_valid_applicant() {
        assert!(applicant().validate().is_ok());
    }

    #[test]
    fn test_required_fields() {
        let mut payload = applicant();
        payload.owner_last_name = "   ".to_string();
        let err = payload.validate().unwrap_err();
        assert_eq!(err.user_friendly_message(), "owner_last_name is required");
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let mut payload = applicant();
        payload.pet_weight = Some(-1.0);
        assert!(payload.validate().is_err());

        payload.pet_weight = Some(0.0);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_owner_age_and_pet_months_ranges() {
        let mut payload = applicant();
        payload.owner_age = 0;
        assert!(payload.validate().is_err());

        let mut payload = applicant();
        payload.pet_age_months = Some(12);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_pet_age_years_is_bounded() {
        let mut payload = applicant();
        payload.pet_age_years = Some(MAX_PET_AGE_YEARS);
        assert!(payload.validate().is_ok());

        payload.pet_age_years = Some(u32::MAX / 2);
        let err = payload.validate().unwrap_err();
        assert_eq!(
            err.user_friendly_message(),
            "pet_age_years must be between 0 and 40"
        );
    }
}
