//! Buyer scope whitelist and candidate list

pub use super::contract::{BUYER_ID, BUYER_NAME};

/// Inclusion flag of the curated buyer-scope table ("OK" / "KO")
pub const SCOPE_FLAG: &str = "OKKO";
/// Number of register rows for a buyer in the candidate list
pub const CONTRACT_COUNT: &str = "nombreMarches";

/// Columns read from the curated buyer-scope table
pub const SCOPE_COLUMNS: [&str; 3] = [BUYER_ID, BUYER_NAME, SCOPE_FLAG];

/// Buyer location attributes carried into the candidate list
pub const LOCATION_COLUMNS: [&str; 4] = [
    "libelleRegionAcheteur",
    "libelleDepartementAcheteur",
    "codePostalAcheteur",
    "libelleCommuneAcheteur",
];
