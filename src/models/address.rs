use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const ADDRESS_HEX_LEN: usize = 40;

/// Account address as handed over by the wallet layer: `0x` followed by
/// 40 hex digits. Stored lowercase so comparisons ignore checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| AppError::BadRequest(format!("address {raw:?} must start with 0x")))?;

        if hex.len() != ADDRESS_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::BadRequest(format!(
                "address {raw:?} must be 0x followed by {ADDRESS_HEX_LEN} hex digits"
            )));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for Address {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Address;

    #[test]
    fn checksum_casing_is_normalized() {
        let mixed: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
        let lower: Address = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap();

        assert_eq!(mixed, lower);
        assert_eq!(mixed.to_string(), "0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!("70997970c51812dc3a010c7d01b50e0d17dc79c8".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz997970c51812dc3a010c7d01b50e0d17dc79c8".parse::<Address>().is_err());
    }

    #[test]
    fn deserializes_from_json_string() {
        let address: Address =
            serde_json::from_str("\"0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC\"").unwrap();
        assert_eq!(address.as_str(), "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc");

        assert!(serde_json::from_str::<Address>("\"nope\"").is_err());
    }
}
