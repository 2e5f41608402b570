use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The channel a sale came in through.
///
/// The fixed variants mirror the options offered when recording a sale. Any other
/// non-empty tag is kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SaleSource {
    AbacatePay,
    Pix,
    Whatsapp,
    Instagram,
    Referral,
    Other,
    Custom(String),
}

impl SaleSource {
    /// All predefined channels, in the order they are offered to the user.
    pub fn known() -> [SaleSource; 6] {
        [
            SaleSource::AbacatePay,
            SaleSource::Pix,
            SaleSource::Whatsapp,
            SaleSource::Instagram,
            SaleSource::Referral,
            SaleSource::Other,
        ]
    }

    /// The stable machine tag stored alongside the sale.
    pub fn tag(&self) -> &str {
        match self {
            SaleSource::AbacatePay => "abacate_pay",
            SaleSource::Pix => "pix",
            SaleSource::Whatsapp => "whatsapp",
            SaleSource::Instagram => "instagram",
            SaleSource::Referral => "indicacao",
            SaleSource::Other => "outros",
            SaleSource::Custom(tag) => tag,
        }
    }

    /// The human-readable label.
    pub fn label(&self) -> &str {
        match self {
            SaleSource::AbacatePay => "Abacate Pay",
            SaleSource::Pix => "PIX Direto",
            SaleSource::Whatsapp => "WhatsApp",
            SaleSource::Instagram => "Instagram",
            SaleSource::Referral => "Indicação",
            SaleSource::Other => "Outros",
            SaleSource::Custom(tag) => tag,
        }
    }
}

impl FromStr for SaleSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput(
                "source".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let source = match trimmed.to_lowercase().as_str() {
            "abacate_pay" => SaleSource::AbacatePay,
            "pix" => SaleSource::Pix,
            "whatsapp" => SaleSource::Whatsapp,
            "instagram" => SaleSource::Instagram,
            "indicacao" => SaleSource::Referral,
            "outros" => SaleSource::Other,
            _ => SaleSource::Custom(trimmed.to_string()),
        };
        Ok(source)
    }
}

impl fmt::Display for SaleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Serialized as the bare tag so stored records stay readable.
impl Serialize for SaleSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for SaleSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
