//! Region resolution: free-text address → CWA county forecast dataset.

use crate::error::FetchError;

/// County/city name → CWA 3-hour township forecast dataset id.
///
/// Order matters: the first name contained in the address wins.
pub const REGIONS: [(&str, &str); 22] = [
    ("宜蘭縣", "F-D0047-001"),
    ("桃園市", "F-D0047-005"),
    ("新竹縣", "F-D0047-009"),
    ("苗栗縣", "F-D0047-013"),
    ("彰化縣", "F-D0047-017"),
    ("南投縣", "F-D0047-021"),
    ("雲林縣", "F-D0047-025"),
    ("嘉義縣", "F-D0047-029"),
    ("屏東縣", "F-D0047-033"),
    ("臺東縣", "F-D0047-037"),
    ("花蓮縣", "F-D0047-041"),
    ("澎湖縣", "F-D0047-045"),
    ("基隆市", "F-D0047-049"),
    ("新竹市", "F-D0047-053"),
    ("嘉義市", "F-D0047-057"),
    ("臺北市", "F-D0047-061"),
    ("高雄市", "F-D0047-065"),
    ("新北市", "F-D0047-069"),
    ("臺中市", "F-D0047-073"),
    ("臺南市", "F-D0047-077"),
    ("連江縣", "F-D0047-081"),
    ("金門縣", "F-D0047-085"),
];

/// A county matched from an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub code: &'static str,
}

/// Find the first county in [`REGIONS`] whose name appears in `address`.
pub fn resolve_region(address: &str) -> Result<Region, FetchError> {
    REGIONS
        .iter()
        .find(|(name, _)| address.contains(name))
        .map(|&(name, code)| Region { name, code })
        .ok_or_else(|| FetchError::NoMatch {
            what: "region",
            input: address.to_string(),
        })
}

/// Canonicalize an address before matching: the CWA and MOENV feeds spell
/// Taiwan place names with 臺, while map pins commonly use 台.
pub fn normalize_address(address: &str) -> String {
    address.replace('台', "臺")
}
