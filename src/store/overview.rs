use crate::store::storage::StorageError;

/// Which part of the network overview to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverviewFilter {
    /// Networks whose name contains the text.
    Ssid(String),
    /// Bssids containing the text.
    Bssid(String),
    All,
}

impl OverviewFilter {
    /// Numeric filter types used by the API: 0 = ssid, 1 = bssid, 2 = none.
    pub fn from_parts(filter_type: u8, text: &str) -> Result<Self, StorageError> {
        match filter_type {
            0 => Ok(OverviewFilter::Ssid(text.to_string())),
            1 => Ok(OverviewFilter::Bssid(text.to_string())),
            2 => Ok(OverviewFilter::All),
            other => Err(StorageError::InvalidFilter(other)),
        }
    }

    pub fn matches(&self, ssid: &str, bssid: &str) -> bool {
        match self {
            OverviewFilter::Ssid(text) => ssid.contains(text.as_str()),
            OverviewFilter::Bssid(text) => bssid.contains(text.as_str()),
            OverviewFilter::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_filter_types() {
        assert_eq!(
            OverviewFilter::from_parts(0, "edu").unwrap(),
            OverviewFilter::Ssid("edu".into())
        );
        assert_eq!(
            OverviewFilter::from_parts(1, "3c51").unwrap(),
            OverviewFilter::Bssid("3c51".into())
        );
        assert_eq!(OverviewFilter::from_parts(2, "ignored").unwrap(), OverviewFilter::All);
        assert!(matches!(
            OverviewFilter::from_parts(3, ""),
            Err(StorageError::InvalidFilter(3))
        ));
    }

    #[test]
    fn matches_on_substrings() {
        let f = OverviewFilter::Ssid("edu".into());
        assert!(f.matches("eduroam", "x"));
        assert!(!f.matches("guest", "edu"));

        let f = OverviewFilter::Bssid("fd84".into());
        assert!(f.matches("any", "3c510e13fd84"));
        assert!(!f.matches("fd84", "3c510e13aaaa"));
    }
}
