use serde::{Deserialize, Serialize};

pub(crate) const APP_NAME: &str = "flatnotes";
pub(crate) const MARKDOWN_EXT: &str = "md";

/// Storage key for the bearer token (same key in both storage tiers).
pub(crate) const TOKEN_KEY: &str = "token";

pub(crate) const SEARCH_SEGMENT: &str = "search";
pub(crate) const NOTE_SEGMENT: &str = "note";
pub(crate) const LOGIN_SEGMENT: &str = "login";

pub(crate) const SEARCH_TERM_PARAM: &str = "term";
pub(crate) const REDIRECT_PARAM: &str = "redirect";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // `window.ENV.API_URL` wins, `window.ENV.api_url` is accepted too.
        // Without either, the API lives on the page's own origin.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self::with_api_url(url_str);
                            }
                        }
                    }
                }
            }

            if let Ok(origin) = window.location().origin() {
                return Self::with_api_url(origin);
            }
        }

        Self::with_api_url(String::new())
    }

    pub fn with_api_url(api_url: String) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional keyboard shortcuts.
///
/// `Ctrl+S` to save exists but stays off until its behavior is settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ShortcutConfig {
    pub save_with_ctrl_s: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_strips_trailing_slash() {
        let c = EnvConfig::with_api_url("http://localhost:8080/".to_string());
        assert_eq!(c.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_shortcut_config_save_disabled_by_default() {
        assert!(!ShortcutConfig::default().save_with_ctrl_s);
    }
}
