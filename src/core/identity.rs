use serde::{Deserialize, Serialize};
use std::fmt;

const LENGTH: usize = 13;
const CHECKSUM_WEIGHTS: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

/// Municipality count per department, indexed by department code - 1.
const MUNICIPALITIES_PER_DEPARTMENT: [u8; 22] = [
    17, // 01 Guatemala
    8,  // 02 El Progreso
    16, // 03 Sacatepéquez
    16, // 04 Chimaltenango
    13, // 05 Escuintla
    14, // 06 Santa Rosa
    19, // 07 Sololá
    8,  // 08 Totonicapán
    24, // 09 Quetzaltenango
    21, // 10 Suchitepéquez
    9,  // 11 Retalhuleu
    30, // 12 San Marcos
    32, // 13 Huehuetenango
    21, // 14 Quiché
    8,  // 15 Baja Verapaz
    17, // 16 Alta Verapaz
    14, // 17 Petén
    5,  // 18 Izabal
    11, // 19 Zacapa
    11, // 20 Chiquimula
    7,  // 21 Jalapa
    17, // 22 Jutiapa
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRejection {
    WrongLength { digits: usize },
    DepartmentOutOfRange { department: u8 },
    MunicipalityOutOfRange { department: u8, municipality: u8, max: u8 },
    ChecksumMismatch,
}

impl fmt::Display for IdentityRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityRejection::WrongLength { .. } => write!(f, "must have exactly 13 digits"),
            IdentityRejection::DepartmentOutOfRange { .. } => {
                write!(f, "invalid department (outside 01-22)")
            }
            IdentityRejection::MunicipalityOutOfRange {
                department, max, ..
            } => write!(
                f,
                "invalid municipality for department {:02} (1-{})",
                department, max
            ),
            IdentityRejection::ChecksumMismatch => write!(f, "invalid check digit (modulo 11)"),
        }
    }
}

impl std::error::Error for IdentityRejection {}

/// A structurally and arithmetically valid 13-digit identity number
/// (`CCCCCCCC V DD MM`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityNumber {
    digits: String,
}

impl IdentityNumber {
    /// Strips formatting (spaces, dashes, anything non-digit) and checks
    /// length, department, municipality and check digit, in that order.
    pub fn parse(input: &str) -> Result<Self, IdentityRejection> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != LENGTH {
            return Err(IdentityRejection::WrongLength {
                digits: digits.len(),
            });
        }

        let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
        let department = values[9] * 10 + values[10];
        let municipality = values[11] * 10 + values[12];

        let max = max_municipality(department)
            .ok_or(IdentityRejection::DepartmentOutOfRange { department })?;
        if municipality < 1 || municipality > max {
            return Err(IdentityRejection::MunicipalityOutOfRange {
                department,
                municipality,
                max,
            });
        }

        let mut core = [0u8; 8];
        core.copy_from_slice(&values[..8]);
        match Self::expected_check_digit(&core) {
            Some(expected) if expected == values[8] => Ok(Self { digits }),
            _ => Err(IdentityRejection::ChecksumMismatch),
        }
    }

    /// Weighted mod-11 over the 8 core digits. `None` when the remainder is
    /// 10: no single digit can represent it, so that core never validates.
    pub fn expected_check_digit(core: &[u8; 8]) -> Option<u8> {
        let sum: u32 = core
            .iter()
            .zip(CHECKSUM_WEIGHTS)
            .map(|(digit, weight)| u32::from(*digit) * weight)
            .sum();
        match sum % 11 {
            10 => None,
            remainder => Some(remainder as u8),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn core(&self) -> &str {
        &self.digits[..8]
    }

    pub fn check_digit(&self) -> u8 {
        self.digits.as_bytes()[8] - b'0'
    }

    pub fn department_code(&self) -> u8 {
        two_digits(&self.digits[9..11])
    }

    pub fn municipality_code(&self) -> u8 {
        two_digits(&self.digits[11..13])
    }
}

impl fmt::Display for IdentityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

fn max_municipality(department: u8) -> Option<u8> {
    if department == 0 {
        return None;
    }
    MUNICIPALITIES_PER_DEPARTMENT
        .get(usize::from(department) - 1)
        .copied()
}

fn two_digits(s: &str) -> u8 {
    s.bytes().fold(0, |acc, b| acc * 10 + (b - b'0'))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Validity flag plus a human-readable reason. Never panics, whatever the input.
pub fn validate_identity_number(input: &str) -> IdentityValidation {
    match IdentityNumber::parse(input) {
        Ok(_) => IdentityValidation {
            valid: true,
            reason: None,
        },
        Err(rejection) => IdentityValidation {
            valid: false,
            reason: Some(rejection.to_string()),
        },
    }
}
