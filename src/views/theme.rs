//! Light/dark theme state
//!
//! The theme is carried as an explicit value from the request to the
//! templates. A request without a `theme` cookie is `Unresolved`: the page
//! renders in the configured default and shows a neutral toggle until the
//! visitor picks a theme.

use serde::{Deserialize, Serialize};

/// Cookie holding the visitor's choice
pub const THEME_COOKIE: &str = "theme";

/// One year, in seconds
const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// `Set-Cookie` value persisting this theme
    pub fn cookie(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            THEME_COOKIE,
            self.as_str(),
            COOKIE_MAX_AGE
        )
    }
}

/// Theme as known for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeState {
    /// No choice recorded yet; render the site default
    #[default]
    Unresolved,
    Resolved(Theme),
}

impl ThemeState {
    /// Read the state from a raw `Cookie` header
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        header
            .into_iter()
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == THEME_COOKIE)
            .and_then(|(_, value)| Theme::parse(value))
            .map_or(ThemeState::Unresolved, ThemeState::Resolved)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ThemeState::Resolved(_))
    }

    /// Theme the page is rendered in
    pub fn effective(&self, default: Theme) -> Theme {
        match self {
            ThemeState::Resolved(theme) => *theme,
            ThemeState::Unresolved => default,
        }
    }
}

/// Template view of the theme state
#[derive(Debug, Clone, Serialize)]
pub struct ThemeData {
    pub resolved: bool,
    pub current: &'static str,
    pub next: &'static str,
}

impl ThemeData {
    pub fn new(state: ThemeState, default: Theme) -> Self {
        let current = state.effective(default);
        Self {
            resolved: state.is_resolved(),
            current: current.as_str(),
            next: current.toggled().as_str(),
        }
    }
}
