/// Built-in defaults for the notifier configuration
use std::sync::OnceLock;

use regex::Regex;

use crate::filters::{BacktraceFilter, Rule};

pub const DEFAULT_HOST: &str = "api.honeybadger.io";

pub const NOTIFIER_NAME: &str = "Honeybadger Notifier";
pub const NOTIFIER_URL: &str = "https://github.com/honeybadger-io/honeybadger-rust";
pub const NOTIFIER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_FRAMEWORK: &str = "Standalone";

pub const DEFAULT_HTTP_OPEN_TIMEOUT: u64 = 2;
pub const DEFAULT_HTTP_READ_TIMEOUT: u64 = 5;
pub const DEFAULT_SOURCE_EXTRACT_RADIUS: usize = 2;

pub const DEFAULT_PARAMS_FILTERS: &[&str] = &["password", "password_confirmation"];

pub const DEFAULT_DEVELOPMENT_ENVIRONMENTS: &[&str] = &["development", "test", "cucumber"];

/// Error classes that are routinely noise (missing records, bad routes)
pub const IGNORE_DEFAULT: &[&str] = &[
    "ActiveRecord::RecordNotFound",
    "ActionController::RoutingError",
    "ActionController::InvalidAuthenticityToken",
    "CGI::Session::CookieStore::TamperedWithCookie",
    "ActionController::UnknownAction",
    "AbstractController::ActionNotFound",
    "Mongoid::Errors::DocumentNotFound",
];

pub const PROJECT_ROOT_TOKEN: &str = "[PROJECT_ROOT]";
pub const CRATE_ROOT_TOKEN: &str = "[CRATE_ROOT]";

// Frames from the notifier itself are noise in every report
const NOTIFIER_FRAME_MARKERS: &[&str] = &["hb_notifier::", "/hb-notifier/src/"];

fn registry_path() -> &'static Regex {
    static REGISTRY_PATH: OnceLock<Regex> = OnceLock::new();
    REGISTRY_PATH.get_or_init(|| {
        Regex::new(r"[^\s]*/registry/src/[^/\s]+/").expect("registry path regex is valid")
    })
}

pub fn default_params_filters() -> Vec<Rule> {
    DEFAULT_PARAMS_FILTERS.iter().copied().map(Rule::from).collect()
}

pub fn default_ignore() -> Vec<String> {
    IGNORE_DEFAULT.iter().map(|s| s.to_string()).collect()
}

pub fn default_development_environments() -> Vec<String> {
    DEFAULT_DEVELOPMENT_ENVIRONMENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_hostname() -> Option<String> {
    hostname::get().ok().and_then(|h| h.into_string().ok())
}

/// The built-in backtrace filters, in the order they run.
///
/// The instances are created once per process, so every fresh configuration
/// holds the same handles.
pub fn default_backtrace_filters() -> Vec<BacktraceFilter> {
    static FILTERS: OnceLock<Vec<BacktraceFilter>> = OnceLock::new();
    FILTERS
        .get_or_init(|| {
            vec![
                BacktraceFilter::new(|line, config| {
                    match config.project_root.as_deref() {
                        Some(root) if !root.is_empty() => {
                            Some(line.replace(root, PROJECT_ROOT_TOKEN))
                        }
                        _ => Some(line.to_string()),
                    }
                }),
                BacktraceFilter::new(|line, _| {
                    Some(line.strip_prefix("./").unwrap_or(line).to_string())
                }),
                BacktraceFilter::new(|line, _| {
                    let replacement = format!("{}/", CRATE_ROOT_TOKEN);
                    Some(
                        registry_path()
                            .replace_all(line, replacement.as_str())
                            .into_owned(),
                    )
                }),
                BacktraceFilter::new(|line, _| {
                    if NOTIFIER_FRAME_MARKERS.iter().any(|m| line.contains(m)) {
                        None
                    } else {
                        Some(line.to_string())
                    }
                }),
            ]
        })
        .clone()
}
