// SPDX-FileCopyrightText: © 2025 kmesh authors
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 kmesh authors
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


use std::sync::LazyLock;

use compact_str::{format_compact, CompactString, ToCompactString};
use http::Uri;
use regex::Regex;
use tracing::debug;
use webclient_configuration::{ObservationConfig, DEFAULT_OBSERVATION_NAME};

use crate::{
    context::ClientRequestObservationContext,
    error::{Error, Result},
    key_value::{KeyValue, KeyValues, NONE_VALUE},
    keys::{key_name_for, ClientKeyName, HighCardinalityKeyName, KeyName, LowCardinalityKeyName},
    outcome::Outcome,
};

pub const STATUS_IO_ERROR: &str = "IO_ERROR";
pub const STATUS_CLIENT_ERROR: &str = "CLIENT_ERROR";

#[allow(clippy::expect_used)]
static PATTERN_BEFORE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^https?://[^/]+/").expect("scheme and authority pattern is valid"));

/// Computes the name and key values of an HTTP client observation.
pub trait ClientObservationConvention: Send + Sync {
    fn name(&self) -> &str;

    fn contextual_name(&self, context: &ClientRequestObservationContext) -> Option<CompactString>;

    fn low_cardinality_key_values(&self, context: &ClientRequestObservationContext) -> KeyValues;

    fn high_cardinality_key_values(&self, context: &ClientRequestObservationContext) -> KeyValues;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultClientObservationConvention {
    name: CompactString,
    high_cardinality: bool,
    ignored_keys: Vec<ClientKeyName>,
}

impl Default for DefaultClientObservationConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultClientObservationConvention {
    pub fn new() -> Self {
        Self::with_name(DEFAULT_OBSERVATION_NAME)
    }

    pub fn with_name(name: impl Into<CompactString>) -> Self {
        Self { name: name.into(), high_cardinality: true, ignored_keys: Vec::new() }
    }

    pub fn ignored_keys(&self) -> &[ClientKeyName] {
        &self.ignored_keys
    }

    pub fn method(&self, context: &ClientRequestObservationContext) -> KeyValue {
        LowCardinalityKeyName::Method.with_value(context.method().map_or(NONE_VALUE, http::Method::as_str))
    }

    pub fn uri(&self, context: &ClientRequestObservationContext) -> KeyValue {
        LowCardinalityKeyName::Uri
            .with_value(context.uri_template().map_or_else(|| CompactString::const_new(NONE_VALUE), extract_path))
    }

    pub fn status(&self, context: &ClientRequestObservationContext) -> KeyValue {
        let value = match (context.status(), context.error()) {
            (Some(status), _) => status.as_u16().to_compact_string(),
            (None, Some(error)) if error.is_io() => CompactString::const_new(STATUS_IO_ERROR),
            (None, _) => CompactString::const_new(STATUS_CLIENT_ERROR),
        };
        LowCardinalityKeyName::Status.with_value(value)
    }

    pub fn exception(&self, context: &ClientRequestObservationContext) -> KeyValue {
        LowCardinalityKeyName::Exception.with_value(context.error().map_or(NONE_VALUE, |e| e.name()))
    }

    pub fn outcome(&self, context: &ClientRequestObservationContext) -> KeyValue {
        let Some(status) = context.status() else {
            return Outcome::Unknown.as_key_value();
        };

        let outcome = Outcome::from(status);
        if outcome == Outcome::Unknown {
            debug!("response status {} does not belong to a known status class", status.as_u16());
        }
        outcome.as_key_value()
    }

    pub fn uri_expanded(&self, context: &ClientRequestObservationContext) -> KeyValue {
        HighCardinalityKeyName::UriExpanded
            .with_value(context.uri().map_or_else(|| CompactString::const_new(NONE_VALUE), Uri::to_compact_string))
    }

    pub fn client_name(&self, context: &ClientRequestObservationContext) -> KeyValue {
        HighCardinalityKeyName::ClientName.with_value(context.uri().and_then(Uri::host).unwrap_or(NONE_VALUE))
    }

    fn without_ignored(&self, mut key_values: KeyValues) -> KeyValues {
        if !self.ignored_keys.is_empty() {
            key_values.retain_keys(|key| !self.ignored_keys.iter().any(|ignored| ignored.as_str() == key));
        }
        key_values
    }
}

/// Strips the scheme and authority from a URI template, keeping a leading `/`.
fn extract_path(template: &str) -> CompactString {
    let path = PATTERN_BEFORE_PATH.replace(template, "");
    if path.starts_with('/') {
        CompactString::from(path)
    } else {
        format_compact!("/{path}")
    }
}

impl ClientObservationConvention for DefaultClientObservationConvention {
    fn name(&self) -> &str {
        &self.name
    }

    fn contextual_name(&self, context: &ClientRequestObservationContext) -> Option<CompactString> {
        context.method().map(|method| format_compact!("http {}", method.as_str().to_ascii_lowercase()))
    }

    fn low_cardinality_key_values(&self, context: &ClientRequestObservationContext) -> KeyValues {
        self.without_ignored(
            KeyValues::new()
                .and(self.method(context))
                .and(self.uri(context))
                .and(self.status(context))
                .and(self.exception(context))
                .and(self.outcome(context)),
        )
    }

    fn high_cardinality_key_values(&self, context: &ClientRequestObservationContext) -> KeyValues {
        if !self.high_cardinality {
            return KeyValues::new();
        }
        self.without_ignored(KeyValues::new().and(self.uri_expanded(context)).and(self.client_name(context)))
    }
}

impl TryFrom<&ObservationConfig> for DefaultClientObservationConvention {
    type Error = Error;

    fn try_from(config: &ObservationConfig) -> Result<Self> {
        let config = config.clone().validate()?;
        let ignored_keys = config.ignored_keys.iter().map(|key| key_name_for(key)).collect::<Result<Vec<_>>>()?;

        if !ignored_keys.is_empty() {
            debug!("observation `{}` ignores keys {ignored_keys:?}", config.name);
        }

        Ok(Self { name: config.name, high_cardinality: config.high_cardinality, ignored_keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExchangeError;
    use http::{Method, StatusCode};
    use std::io;
    use tracing_test::traced_test;
    use webclient_configuration::ConfigError;

    fn get_users() -> ClientRequestObservationContext {
        ClientRequestObservationContext::new()
            .with_method(Method::GET)
            .with_uri_template("https://api.example.com/users/{id}")
            .with_uri(Uri::from_static("https://api.example.com/users/42?verbose=true"))
    }

    #[test]
    fn default_name() {
        assert_eq!(DefaultClientObservationConvention::new().name(), "http.client.requests");
        assert_eq!(DefaultClientObservationConvention::with_name("outbound").name(), "outbound");
    }

    #[test]
    fn successful_exchange() {
        let convention = DefaultClientObservationConvention::new();
        let context = get_users().with_status(StatusCode::OK);

        let low = convention.low_cardinality_key_values(&context);
        assert_eq!(low.keys().collect::<Vec<_>>(), vec!["method", "uri", "status", "exception", "outcome"]);
        assert_eq!(low.get("method"), Some("GET"));
        assert_eq!(low.get("uri"), Some("/users/{id}"));
        assert_eq!(low.get("status"), Some("200"));
        assert_eq!(low.get("exception"), Some("none"));
        assert_eq!(low.get("outcome"), Some("SUCCESS"));

        let high = convention.high_cardinality_key_values(&context);
        assert_eq!(high.get("uri.expanded"), Some("https://api.example.com/users/42?verbose=true"));
        assert_eq!(high.get("client.name"), Some("api.example.com"));
    }

    #[test]
    fn contextual_name_uses_method() {
        let convention = DefaultClientObservationConvention::new();
        assert_eq!(convention.contextual_name(&get_users()).as_deref(), Some("http get"));
        assert_eq!(convention.contextual_name(&ClientRequestObservationContext::new()), None);
    }

    #[test]
    fn empty_context_uses_none_values() {
        let convention = DefaultClientObservationConvention::new();
        let context = ClientRequestObservationContext::new();

        let low = convention.low_cardinality_key_values(&context);
        assert_eq!(low.get("method"), Some("none"));
        assert_eq!(low.get("uri"), Some("none"));
        assert_eq!(low.get("status"), Some("CLIENT_ERROR"));
        assert_eq!(low.get("exception"), Some("none"));
        assert_eq!(low.get("outcome"), Some("UNKNOWN"));

        let high = convention.high_cardinality_key_values(&context);
        assert_eq!(high.get("uri.expanded"), Some("none"));
        assert_eq!(high.get("client.name"), Some("none"));
    }

    #[test]
    fn io_error_without_response() {
        let convention = DefaultClientObservationConvention::new();
        let context = get_users().with_error(ExchangeError::from(io::Error::from(io::ErrorKind::ConnectionRefused)));

        let low = convention.low_cardinality_key_values(&context);
        assert_eq!(low.get("status"), Some("IO_ERROR"));
        assert_eq!(low.get("exception"), Some("IoError"));
        assert_eq!(low.get("outcome"), Some("UNKNOWN"));
    }

    #[test]
    fn other_error_without_response() {
        let convention = DefaultClientObservationConvention::new();
        let context = get_users().with_error(ExchangeError::Timeout);

        let low = convention.low_cardinality_key_values(&context);
        assert_eq!(low.get("status"), Some("CLIENT_ERROR"));
        assert_eq!(low.get("exception"), Some("Timeout"));
    }

    #[test]
    fn error_after_response_keeps_status() {
        let convention = DefaultClientObservationConvention::new();
        let context = get_users()
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
            .with_error(ExchangeError::other("DecodeError", "unexpected end of body"));

        let low = convention.low_cardinality_key_values(&context);
        assert_eq!(low.get("status"), Some("503"));
        assert_eq!(low.get("exception"), Some("DecodeError"));
        assert_eq!(low.get("outcome"), Some("SERVER_ERROR"));
    }

    #[traced_test]
    #[test]
    fn unknown_status_class() {
        let convention = DefaultClientObservationConvention::new();
        let context = get_users().with_status(StatusCode::from_u16(799).unwrap());

        assert_eq!(convention.outcome(&context).value(), "UNKNOWN");
        assert_eq!(convention.status(&context).value(), "799");
        assert!(logs_contain("response status 799 does not belong to a known status class"));
    }

    #[test]
    fn uri_template_path_extraction() {
        assert_eq!(extract_path("https://example.com/a/{b}"), "/a/{b}");
        assert_eq!(extract_path("http://example.com:8080/"), "/");
        assert_eq!(extract_path("/already/a/path"), "/already/a/path");
        assert_eq!(extract_path("relative/{id}"), "/relative/{id}");
    }

    #[test]
    fn uri_template_without_path_is_kept_whole() {
        assert_eq!(extract_path("https://example.com"), "/https://example.com");
        let context = ClientRequestObservationContext::new().with_uri_template("https://example.com");
        assert_eq!(DefaultClientObservationConvention::new().uri(&context).value(), "/https://example.com");
    }

    #[test]
    fn from_config() {
        let config = ObservationConfig {
            name: "http.client.outbound".into(),
            high_cardinality: true,
            ignored_keys: vec!["exception".into(), "client.name".into()],
        };
        let convention = DefaultClientObservationConvention::try_from(&config).unwrap();
        let context = get_users().with_status(StatusCode::NOT_FOUND);

        assert_eq!(convention.name(), "http.client.outbound");
        let low = convention.low_cardinality_key_values(&context);
        assert_eq!(low.keys().collect::<Vec<_>>(), vec!["method", "uri", "status", "outcome"]);
        assert_eq!(low.get("outcome"), Some("CLIENT_ERROR"));

        let high = convention.high_cardinality_key_values(&context);
        assert_eq!(high.keys().collect::<Vec<_>>(), vec!["uri.expanded"]);
    }

    #[test]
    fn high_cardinality_disabled() {
        let config = ObservationConfig { high_cardinality: false, ..ObservationConfig::default() };
        let convention = DefaultClientObservationConvention::try_from(&config).unwrap();
        assert!(convention.high_cardinality_key_values(&get_users()).is_empty());
        assert_eq!(convention.low_cardinality_key_values(&get_users()).len(), 5);
    }

    #[test]
    fn unknown_ignored_key_is_rejected() {
        let config = ObservationConfig { ignored_keys: vec!["uri.template".into()], ..ObservationConfig::default() };
        let err = DefaultClientObservationConvention::try_from(&config).unwrap_err();
        assert!(matches!(err, Error::UnknownKeyName(key) if key == "uri.template"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let config = ObservationConfig { name: "".into(), ..ObservationConfig::default() };
        assert!(matches!(
            DefaultClientObservationConvention::try_from(&config),
            Err(Error::Config(ConfigError::InvalidName(_)))
        ));
    }

    #[test]
    fn convention_is_object_safe() {
        let convention: Box<dyn ClientObservationConvention> = Box::new(DefaultClientObservationConvention::new());
        assert_eq!(convention.low_cardinality_key_values(&get_users()).get("method"), Some("GET"));
    }
}
