use serde::{Deserialize, Serialize};

const BASE_URL_ENV: &str = "FOCUSTRACK_API_BASE";
const USER_ID_ENV: &str = "FOCUSTRACK_USER_ID";

const DEFAULT_BASE_URL: &str = "http://localhost:5173";
const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub user_id: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_id: DEFAULT_USER_ID,
        }
    }
}

impl Settings {
    /// Environment overrides take precedence over the defaults. A user id
    /// that fails to parse falls back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var(BASE_URL_ENV).unwrap_or(defaults.base_url);
        let user_id = std::env::var(USER_ID_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.user_id);

        Self { base_url, user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_service() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://localhost:5173");
        assert_eq!(settings.user_id, 1);
    }
}
