//! The seven upstream endpoints polled each cycle

use std::fmt;
use std::str::FromStr;

use super::WarStatusError;

/// One upstream GET endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    War,
    Assignments,
    Planets,
    Campaigns,
    Dispatches,
    SteamNews,
    SpaceStations,
}

impl Endpoint {
    /// Number of endpoints in one polling cycle
    pub const COUNT: usize = 7;

    /// Every endpoint, in slot order
    pub const ALL: [Endpoint; Self::COUNT] = [
        Endpoint::War,
        Endpoint::Assignments,
        Endpoint::Planets,
        Endpoint::Campaigns,
        Endpoint::Dispatches,
        Endpoint::SteamNews,
        Endpoint::SpaceStations,
    ];

    /// Path relative to the configured base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::War => "/v1/war",
            Endpoint::Assignments => "/v1/assignments",
            Endpoint::Planets => "/v1/planets",
            Endpoint::Campaigns => "/v1/campaigns",
            Endpoint::Dispatches => "/v1/dispatches",
            Endpoint::SteamNews => "/v1/steam",
            Endpoint::SpaceStations => "/v1/space-stations",
        }
    }

    /// Stable slot index used by fixed-size outcome tables
    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Endpoint {
    type Err = WarStatusError;

    /// Accepts the last path segment (`war`, `steam`, `space-stations`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('/').trim_start_matches("v1/");
        Endpoint::ALL
            .iter()
            .copied()
            .find(|e| e.path().trim_start_matches("/v1/") == name)
            .ok_or_else(|| WarStatusError::Config(format!("Unknown endpoint '{}'", s)))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_matches_slot_order() {
        for (i, endpoint) in Endpoint::ALL.iter().enumerate() {
            assert_eq!(endpoint.index(), i);
        }
    }

    #[test]
    fn test_paths_are_distinct() {
        let paths: HashSet<&str> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths.len(), Endpoint::COUNT);
    }

    #[test]
    fn test_from_str_accepts_segment_and_path() {
        assert_eq!("war".parse::<Endpoint>().unwrap(), Endpoint::War);
        assert_eq!(
            "space-stations".parse::<Endpoint>().unwrap(),
            Endpoint::SpaceStations
        );
        assert_eq!("/v1/steam".parse::<Endpoint>().unwrap(), Endpoint::SteamNews);
        assert!("galaxy".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_display_is_path() {
        assert_eq!(Endpoint::SteamNews.to_string(), "/v1/steam");
    }
}
