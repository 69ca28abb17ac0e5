// ==========================================
// Windpark Settlement - Domain Types
// ==========================================
// Plot area use categories (WEA / Pool / Other)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// Area category (Flächenkategorie)
// ==========================================
// Serialized as SCREAMING_SNAKE_CASE, same as the database column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AreaCategory {
    Wea,   // turbine foundation
    Pool,  // pooled infrastructure (roads, cable corridors)
    Other, // any other leased parcel
}

impl AreaCategory {
    /// All categories in allocation order.
    pub const ALL: [AreaCategory; 3] = [AreaCategory::Wea, AreaCategory::Pool, AreaCategory::Other];

    /// Stable position inside [`AreaCategory::ALL`].
    pub const fn index(self) -> usize {
        match self {
            AreaCategory::Wea => 0,
            AreaCategory::Pool => 1,
            AreaCategory::Other => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AreaCategory::Wea => "WEA",
            AreaCategory::Pool => "POOL",
            AreaCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for AreaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored or imported category code is not one of WEA/POOL/OTHER.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown plot area category: '{0}'")]
pub struct UnknownAreaCategory(pub String);

impl FromStr for AreaCategory {
    type Err = UnknownAreaCategory;

    /// Case-insensitive; accepts the German "SONSTIGE" as an alias for Other.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WEA" => Ok(AreaCategory::Wea),
            "POOL" => Ok(AreaCategory::Pool),
            "OTHER" | "SONSTIGE" => Ok(AreaCategory::Other),
            _ => Err(UnknownAreaCategory(s.to_string())),
        }
    }
}

impl TryFrom<String> for AreaCategory {
    type Error = UnknownAreaCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AreaCategory> for String {
    fn from(value: AreaCategory) -> Self {
        value.as_str().to_string()
    }
}
