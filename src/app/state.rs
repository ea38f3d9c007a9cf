//! Application state shared across tasks

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::game::MatchRegistry;
use crate::store::{ProfileClient, ProfileError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub match_registry: Arc<MatchRegistry>,
    /// Absent when no profile service is configured
    pub profiles: Option<ProfileClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ProfileError> {
        let config = Arc::new(config);

        let profiles = match &config.profile_service_url {
            Some(url) => {
                info!(%url, "Profile service configured");
                Some(ProfileClient::new(url.clone())?)
            }
            None => None,
        };

        Ok(Self {
            config,
            match_registry: Arc::new(MatchRegistry::new()),
            profiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_follow_config() {
        let config = Config::from_lookup(|_| None).unwrap();
        let state = AppState::new(config).unwrap();
        assert!(state.profiles.is_none());
        assert_eq!(state.match_registry.active_matches(), 0);

        let config = Config::from_lookup(|key| {
            (key == "PROFILE_SERVICE_URL").then(|| "http://profiles.local".to_string())
        })
        .unwrap();
        assert!(AppState::new(config).unwrap().profiles.is_some());
    }
}
