/// Configuration schema for the notifier
///
/// `Configuration` is a plain value: it has no internal locking, and mutation
/// goes through `&mut`. Sharing one instance between threads (for example
/// two workers appending to the same filter list) needs an external lock
/// owned by the caller; nothing here is atomic across calls.
use tracing::Level;

use super::defaults::{self, DEFAULT_FRAMEWORK, DEFAULT_HOST};
use crate::filters::{AsyncHandler, BacktraceFilter, IgnoreFilter, Notice, OneOrMany, Rule};
use crate::logger::Logger;

pub const SECURE_PORT: u16 = 443;
pub const INSECURE_PORT: u16 = 80;

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Configuration {
    /// API key for the collector project
    pub api_key: Option<String>,

    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_user: Option<String>,
    pub proxy_pass: Option<String>,

    /// Root of the application, replaced with `[PROJECT_ROOT]` in backtraces
    pub project_root: Option<String>,

    /// Name of the running environment, e.g. "production"
    pub environment_name: Option<String>,

    /// Logger used instead of the global `tracing` subscriber
    pub logger: Option<Logger>,

    pub notifier_version: String,
    pub notifier_name: String,
    pub notifier_url: String,

    /// Use TLS when talking to the collector
    pub secure: bool,

    /// Collector host
    pub host: String,

    /// Seconds to wait for the connection to open
    pub http_open_timeout: u64,

    /// Seconds to wait for the response
    pub http_read_timeout: u64,

    /// Callables deciding whether a notice is dropped
    pub ignore_by_filters: Vec<IgnoreFilter>,

    /// User agents whose requests are never reported
    pub ignore_user_agent: Vec<Rule>,

    /// Parameter names redacted from reports
    pub params_filters: Vec<Rule>,

    /// Rewrites applied to every backtrace line, in order
    pub backtrace_filters: Vec<BacktraceFilter>,

    /// Error class names that are never reported
    pub ignore: Vec<String>,

    pub framework: String,

    /// Lines of source included around each backtrace frame
    pub source_extract_radius: usize,

    pub send_request_session: bool,

    pub debug: bool,

    /// Environments in which the notifier is not public
    pub development_environments: Vec<String>,

    /// Name of the reporting machine
    pub hostname: Option<String>,

    port: Option<u16>,

    async_handler: Option<AsyncHandler>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            api_key: None,
            proxy_host: None,
            proxy_port: None,
            proxy_user: None,
            proxy_pass: None,
            project_root: None,
            environment_name: None,
            logger: None,
            notifier_version: defaults::NOTIFIER_VERSION.to_string(),
            notifier_name: defaults::NOTIFIER_NAME.to_string(),
            notifier_url: defaults::NOTIFIER_URL.to_string(),
            secure: true,
            host: DEFAULT_HOST.to_string(),
            http_open_timeout: defaults::DEFAULT_HTTP_OPEN_TIMEOUT,
            http_read_timeout: defaults::DEFAULT_HTTP_READ_TIMEOUT,
            ignore_by_filters: Vec::new(),
            ignore_user_agent: Vec::new(),
            params_filters: defaults::default_params_filters(),
            backtrace_filters: defaults::default_backtrace_filters(),
            ignore: defaults::default_ignore(),
            framework: DEFAULT_FRAMEWORK.to_string(),
            source_extract_radius: defaults::DEFAULT_SOURCE_EXTRACT_RADIUS,
            send_request_session: true,
            debug: false,
            development_environments: defaults::default_development_environments(),
            hostname: defaults::default_hostname(),
            port: None,
            async_handler: None,
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Port to connect to.
    ///
    /// An explicit `set_port` wins; otherwise this follows `secure` on every
    /// call, so toggling `secure` later is always reflected.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(if self.secure {
            SECURE_PORT
        } else {
            INSECURE_PORT
        })
    }

    /// Override the port, or pass `None` to go back to the derived value
    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub fn protocol(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    pub fn async_handler(&self) -> Option<&AsyncHandler> {
        self.async_handler.as_ref()
    }

    pub fn set_async_handler(&mut self, handler: impl Into<Option<AsyncHandler>>) {
        self.async_handler = handler.into();
    }

    /// Block form of `set_async_handler`; a later call of either form replaces
    /// the handler.
    pub fn async_with<F>(&mut self, handler: F)
    where
        F: Fn(Notice) -> Notice + Send + Sync + 'static,
    {
        self.set_async_handler(AsyncHandler::new(handler));
    }

    /// Whether an async handler is installed
    pub fn is_async(&self) -> bool {
        self.async_handler.is_some()
    }

    pub fn filter_backtrace<F>(&mut self, filter: F)
    where
        F: Fn(&str, &Configuration) -> Option<String> + Send + Sync + 'static,
    {
        self.backtrace_filters.push(BacktraceFilter::new(filter));
    }

    pub fn ignore_by_filter<F>(&mut self, filter: F)
    where
        F: Fn(&Notice) -> bool + Send + Sync + 'static,
    {
        self.ignore_by_filters.push(IgnoreFilter::new(filter));
    }

    /// Replace the ignored error classes
    pub fn ignore_only(&mut self, names: impl Into<OneOrMany<String>>) {
        self.ignore = names.into().into_vec();
    }

    /// Replace the ignored user agents
    pub fn ignore_user_agent_only(&mut self, rules: impl Into<OneOrMany<Rule>>) {
        self.ignore_user_agent = rules.into().into_vec();
    }

    /// Not supported; accepted and discarded
    pub fn set_current_user_method<T>(&mut self, _method: T) {
        tracing::debug!("current_user_method is not supported and has no effect");
    }

    /// True unless the current environment is a development environment
    pub fn is_public(&self) -> bool {
        match self.environment_name.as_deref() {
            None => true,
            Some(env) => !self.development_environments.iter().any(|d| d == env),
        }
    }

    /// Run a backtrace line through every filter, stopping when one drops it
    pub fn filter_backtrace_line(&self, line: &str) -> Option<String> {
        self.backtrace_filters
            .iter()
            .try_fold(line.to_string(), |line, filter| filter.apply(&line, self))
    }

    pub fn is_ignored_by_filters(&self, notice: &Notice) -> bool {
        self.ignore_by_filters.iter().any(|f| f.matches(notice))
    }

    pub fn is_ignored_user_agent(&self, user_agent: &str) -> bool {
        self.ignore_user_agent.iter().any(|r| r.matches(user_agent))
    }

    pub fn is_filtered_param(&self, key: &str) -> bool {
        self.params_filters.iter().any(|r| r.matches(key))
    }

    pub fn is_ignored_error(&self, error_class: &str) -> bool {
        self.ignore.iter().any(|name| name == error_class)
    }

    /// Emit a log line through the configured logger, or the global
    /// subscriber when none is set. Debug lines need `debug = true`.
    pub fn log(&self, level: Level, message: &str) {
        if level == Level::DEBUG && !self.debug {
            return;
        }

        let emit = || match level {
            Level::ERROR => tracing::error!(target: "hb_notifier", "{}", message),
            Level::WARN => tracing::warn!(target: "hb_notifier", "{}", message),
            Level::INFO => tracing::info!(target: "hb_notifier", "{}", message),
            Level::DEBUG => tracing::debug!(target: "hb_notifier", "{}", message),
            _ => tracing::trace!(target: "hb_notifier", "{}", message),
        };

        match &self.logger {
            Some(logger) => logger.in_scope(emit),
            None => emit(),
        }
    }
}
