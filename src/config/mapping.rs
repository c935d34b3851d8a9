/// Mapping view of the configuration: option names, values, `to_hash`
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::schema::Configuration;
use crate::error::ConfigError;
use crate::filters::{AsyncHandler, BacktraceFilter, Callable, IgnoreFilter, Rule};
use crate::logger::Logger;

/// Every key exposed by `Configuration::to_hash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionName {
    ApiKey,
    Async,
    BacktraceFilters,
    Debug,
    DevelopmentEnvironments,
    EnvironmentName,
    Framework,
    Host,
    Hostname,
    HttpOpenTimeout,
    HttpReadTimeout,
    Ignore,
    IgnoreByFilters,
    IgnoreUserAgent,
    Logger,
    NotifierName,
    NotifierUrl,
    NotifierVersion,
    ParamsFilters,
    Port,
    ProjectRoot,
    Protocol,
    ProxyHost,
    ProxyPass,
    ProxyPort,
    ProxyUser,
    Secure,
    SendRequestSession,
    SourceExtractRadius,
}

impl OptionName {
    pub const ALL: [OptionName; 29] = [
        OptionName::ApiKey,
        OptionName::Async,
        OptionName::BacktraceFilters,
        OptionName::Debug,
        OptionName::DevelopmentEnvironments,
        OptionName::EnvironmentName,
        OptionName::Framework,
        OptionName::Host,
        OptionName::Hostname,
        OptionName::HttpOpenTimeout,
        OptionName::HttpReadTimeout,
        OptionName::Ignore,
        OptionName::IgnoreByFilters,
        OptionName::IgnoreUserAgent,
        OptionName::Logger,
        OptionName::NotifierName,
        OptionName::NotifierUrl,
        OptionName::NotifierVersion,
        OptionName::ParamsFilters,
        OptionName::Port,
        OptionName::ProjectRoot,
        OptionName::Protocol,
        OptionName::ProxyHost,
        OptionName::ProxyPass,
        OptionName::ProxyPort,
        OptionName::ProxyUser,
        OptionName::Secure,
        OptionName::SendRequestSession,
        OptionName::SourceExtractRadius,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::ApiKey => "api_key",
            OptionName::Async => "async",
            OptionName::BacktraceFilters => "backtrace_filters",
            OptionName::Debug => "debug",
            OptionName::DevelopmentEnvironments => "development_environments",
            OptionName::EnvironmentName => "environment_name",
            OptionName::Framework => "framework",
            OptionName::Host => "host",
            OptionName::Hostname => "hostname",
            OptionName::HttpOpenTimeout => "http_open_timeout",
            OptionName::HttpReadTimeout => "http_read_timeout",
            OptionName::Ignore => "ignore",
            OptionName::IgnoreByFilters => "ignore_by_filters",
            OptionName::IgnoreUserAgent => "ignore_user_agent",
            OptionName::Logger => "logger",
            OptionName::NotifierName => "notifier_name",
            OptionName::NotifierUrl => "notifier_url",
            OptionName::NotifierVersion => "notifier_version",
            OptionName::ParamsFilters => "params_filters",
            OptionName::Port => "port",
            OptionName::ProjectRoot => "project_root",
            OptionName::Protocol => "protocol",
            OptionName::ProxyHost => "proxy_host",
            OptionName::ProxyPass => "proxy_pass",
            OptionName::ProxyPort => "proxy_port",
            OptionName::ProxyUser => "proxy_user",
            OptionName::Secure => "secure",
            OptionName::SendRequestSession => "send_request_session",
            OptionName::SourceExtractRadius => "source_extract_radius",
        }
    }
}

impl FromStr for OptionName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownOption(s.to_string()))
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a single option value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    /// Regex source of a `Rule::Pattern`
    Pattern(String),
    List(Vec<Value>),
    Callable(Callable),
    Logger(Logger),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Rule> for Value {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Literal(literal) => Value::String(literal),
            Rule::Pattern(regex) => Value::Pattern(regex.as_str().to_string()),
            Rule::Predicate(predicate) => Value::Callable(Callable::Predicate(predicate)),
        }
    }
}

impl From<AsyncHandler> for Value {
    fn from(handler: AsyncHandler) -> Self {
        Value::Callable(Callable::Async(handler))
    }
}

impl From<BacktraceFilter> for Value {
    fn from(filter: BacktraceFilter) -> Self {
        Value::Callable(Callable::Backtrace(filter))
    }
}

impl From<IgnoreFilter> for Value {
    fn from(filter: IgnoreFilter) -> Self {
        Value::Callable(Callable::Ignore(filter))
    }
}

impl From<Logger> for Value {
    fn from(logger: Logger) -> Self {
        Value::Logger(logger)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::String(s) => serializer.serialize_str(s),
            Value::Pattern(p) => serializer.serialize_str(&format!("/{}/", p)),
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Callable(callable) => {
                serializer.serialize_str(&format!("<callable:{}>", callable.kind()))
            }
            Value::Logger(_) => serializer.serialize_str("<logger>"),
        }
    }
}

/// Key/value snapshot produced by `to_hash` and `merge`
pub type OptionMap = BTreeMap<String, Value>;

impl Configuration {
    /// Current value of a single option, as its getter would return it
    pub fn get(&self, name: OptionName) -> Value {
        match name {
            OptionName::ApiKey => self.api_key.clone().into(),
            OptionName::Async => self.async_handler().cloned().into(),
            OptionName::BacktraceFilters => self.backtrace_filters.clone().into(),
            OptionName::Debug => self.debug.into(),
            OptionName::DevelopmentEnvironments => self.development_environments.clone().into(),
            OptionName::EnvironmentName => self.environment_name.clone().into(),
            OptionName::Framework => self.framework.clone().into(),
            OptionName::Host => self.host.clone().into(),
            OptionName::Hostname => self.hostname.clone().into(),
            OptionName::HttpOpenTimeout => self.http_open_timeout.into(),
            OptionName::HttpReadTimeout => self.http_read_timeout.into(),
            OptionName::Ignore => self.ignore.clone().into(),
            OptionName::IgnoreByFilters => self.ignore_by_filters.clone().into(),
            OptionName::IgnoreUserAgent => self.ignore_user_agent.clone().into(),
            OptionName::Logger => self.logger.clone().into(),
            OptionName::NotifierName => self.notifier_name.clone().into(),
            OptionName::NotifierUrl => self.notifier_url.clone().into(),
            OptionName::NotifierVersion => self.notifier_version.clone().into(),
            OptionName::ParamsFilters => self.params_filters.clone().into(),
            OptionName::Port => self.port().into(),
            OptionName::ProjectRoot => self.project_root.clone().into(),
            OptionName::Protocol => self.protocol().into(),
            OptionName::ProxyHost => self.proxy_host.clone().into(),
            OptionName::ProxyPass => self.proxy_pass.clone().into(),
            OptionName::ProxyPort => self.proxy_port.into(),
            OptionName::ProxyUser => self.proxy_user.clone().into(),
            OptionName::Secure => self.secure.into(),
            OptionName::SendRequestSession => self.send_request_session.into(),
            OptionName::SourceExtractRadius => self.source_extract_radius.into(),
        }
    }

    /// Index access by name; `None` for names that are not options
    pub fn fetch(&self, name: &str) -> Option<Value> {
        name.parse::<OptionName>().ok().map(|name| self.get(name))
    }

    pub fn to_hash(&self) -> OptionMap {
        OptionName::ALL
            .iter()
            .map(|name| (name.as_str().to_string(), self.get(*name)))
            .collect()
    }

    /// `to_hash` with `other` laid on top; keys from `other` win
    pub fn merge<I, K, V>(&self, other: I) -> OptionMap
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut map = self.to_hash();
        map.extend(other.into_iter().map(|(k, v)| (k.into(), v.into())));
        map
    }

    /// JSON rendering of `to_hash`, for diagnostics
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.to_hash()).unwrap_or(serde_json::Value::Null)
    }
}
