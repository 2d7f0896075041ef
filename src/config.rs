//! Configuration Module
//!
//! Handles loading resolver and server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default location of view templates, relative to the resource root.
pub const DEFAULT_VIEW_PREFIX: &str = "/WEB-INF/grails-app/views";

/// Default suffix for views served by the generic forwarding view.
pub const DEFAULT_FORWARD_SUFFIX: &str = ".jsp";

/// Server and resolver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Whether the application runs in development mode
    pub development: bool,
    /// Filesystem root of the default resource loader
    pub views_root: PathBuf,
    /// Filesystem root of the live template source loader, if any
    pub template_source_root: Option<PathBuf>,
    /// Prefix prepended to every view name
    pub view_prefix: String,
    /// Suffix of views that fall back to the forwarding view
    pub forward_suffix: String,
    /// Whether the application is packaged for deployment
    pub packaged: bool,
    /// Whether the template engine reloads templates on the fly
    pub reload_enabled: bool,
    /// Locale used when the request does not carry one
    pub default_locale: String,
    /// Path of a JSON plugin manifest
    pub plugin_manifest: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `APP_ENV` - `development` disables view caching (default: production)
    /// - `VIEWS_ROOT` - Resource root directory (default: ./web-app)
    /// - `TEMPLATE_SOURCE_ROOT` - Live template source directory (default: unset)
    /// - `VIEW_PREFIX` - View path prefix (default: /WEB-INF/grails-app/views)
    /// - `FORWARD_SUFFIX` - Suffix of forwarded views (default: .jsp)
    /// - `APP_PACKAGED` - Packaged for deployment (default: false)
    /// - `RELOAD_ENABLED` - Template reload (default: true in development)
    /// - `DEFAULT_LOCALE` - Fallback locale (default: en)
    /// - `PLUGIN_MANIFEST` - Plugin manifest path (default: unset)
    pub fn from_env() -> Self {
        let development = env::var("APP_ENV")
            .map(|v| is_development(&v))
            .unwrap_or(false);

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            development,
            views_root: env::var("VIEWS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./web-app")),
            template_source_root: env::var("TEMPLATE_SOURCE_ROOT").ok().map(PathBuf::from),
            view_prefix: env::var("VIEW_PREFIX").unwrap_or_else(|_| DEFAULT_VIEW_PREFIX.to_string()),
            forward_suffix: env::var("FORWARD_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_FORWARD_SUFFIX.to_string()),
            packaged: env::var("APP_PACKAGED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            reload_enabled: env::var("RELOAD_ENABLED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(development),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            plugin_manifest: env::var("PLUGIN_MANIFEST").ok().map(PathBuf::from),
        }
    }

    /// Resolved views are cached everywhere except development.
    pub fn cache_views(&self) -> bool {
        !self.development
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            development: false,
            views_root: PathBuf::from("./web-app"),
            template_source_root: None,
            view_prefix: DEFAULT_VIEW_PREFIX.to_string(),
            forward_suffix: DEFAULT_FORWARD_SUFFIX.to_string(),
            packaged: false,
            reload_enabled: false,
            default_locale: "en".to_string(),
            plugin_manifest: None,
        }
    }
}

fn is_development(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "development" | "dev")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.view_prefix, "/WEB-INF/grails-app/views");
        assert_eq!(config.forward_suffix, ".jsp");
        assert!(!config.development);
        assert!(config.cache_views());
        assert!(!config.reload_enabled);
    }

    #[test]
    fn test_development_disables_cache() {
        let config = Config {
            development: true,
            ..Config::default()
        };
        assert!(!config.cache_views());
    }

    #[test]
    fn test_env_value_parsing() {
        assert!(is_development("development"));
        assert!(is_development(" DEV "));
        assert!(!is_development("production"));

        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
