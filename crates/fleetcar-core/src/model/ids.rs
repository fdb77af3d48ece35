use crate::error::{FleetError, Result};
use crate::validation::{is_fleet_id_valid, is_vin_valid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle identification number.
///
/// `From<&str>` / `From<String>` は検証しない (コア層は検証済みの値を信頼する)。
/// 外部入力には [`Vin::parse`] を使う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    pub fn parse(value: &str) -> Result<Self> {
        if is_vin_valid(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(FleetError::InvalidVin(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// フリート識別子 (英数字 8 文字)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FleetId(String);

impl FleetId {
    pub fn parse(value: &str) -> Result<Self> {
        if is_fleet_id_valid(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(FleetError::InvalidFleetId(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_id {
    ($ty:ident) => {
        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(Vin);
string_id!(FleetId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_valid_values() {
        let vin = Vin::parse("WVWAA71K08W201030").unwrap();
        assert_eq!(vin.as_str(), "WVWAA71K08W201030");

        let fleet = FleetId::parse("xk48jpgz").unwrap();
        assert_eq!(fleet.to_string(), "xk48jpgz");
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        assert!(matches!(
            Vin::parse("WVWAA71K08W20103"),
            Err(FleetError::InvalidVin(v)) if v == "WVWAA71K08W20103"
        ));
        assert!(matches!(
            FleetId::parse("xk48-pgz"),
            Err(FleetError::InvalidFleetId(_))
        ));
    }

    #[test]
    fn test_serde_is_transparent() {
        let vin = Vin::from("3B7HF13Y81G193584");
        assert_eq!(
            serde_json::to_string(&vin).unwrap(),
            "\"3B7HF13Y81G193584\""
        );
        let back: Vin = serde_json::from_str("\"3B7HF13Y81G193584\"").unwrap();
        assert_eq!(back, vin);
    }
}
