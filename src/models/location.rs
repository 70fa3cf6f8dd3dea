use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a booking was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Office,
    Home,
    BusinessTrip,
    ClientSite,
}

impl LocationType {
    pub const ALL: [LocationType; 4] = [
        LocationType::Office,
        LocationType::Home,
        LocationType::BusinessTrip,
        LocationType::ClientSite,
    ];

    /// Wire name used by the time-tracking API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            LocationType::Office => "OFFICE",
            LocationType::Home => "HOME",
            LocationType::BusinessTrip => "BUSINESS_TRIP",
            LocationType::ClientSite => "CLIENT_SITE",
        }
    }

    /// Convert API string → enum
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "OFFICE" => Some(LocationType::Office),
            "HOME" => Some(LocationType::Home),
            "BUSINESS_TRIP" => Some(LocationType::BusinessTrip),
            "CLIENT_SITE" => Some(LocationType::ClientSite),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (short alias or wire name, any case)
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.trim().to_uppercase().replace('-', "_");
        match upper.as_str() {
            "O" | "OFFICE" => Some(LocationType::Office),
            "H" | "HOME" | "REMOTE" => Some(LocationType::Home),
            "T" | "TRIP" | "BUSINESS_TRIP" => Some(LocationType::BusinessTrip),
            "C" | "CLIENT" | "CLIENT_SITE" => Some(LocationType::ClientSite),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationType::Office => "Office",
            LocationType::Home => "Home office",
            LocationType::BusinessTrip => "Business trip",
            LocationType::ClientSite => "Client site",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}
