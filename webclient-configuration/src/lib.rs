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


use compact_str::CompactString;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    env::var,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

/// Name under which HTTP client exchanges are observed unless configured otherwise.
pub const DEFAULT_OBSERVATION_NAME: &str = "http.client.requests";

pub const ENV_OBSERVATION_NAME: &str = "WEBCLIENT_OBSERVATION_NAME";
pub const ENV_HIGH_CARDINALITY: &str = "WEBCLIENT_OBSERVATION_HIGH_CARDINALITY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration at `{path}`: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid observation name `{0}`")]
    InvalidName(CompactString),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Deserializes a YAML document, reporting the path of the offending field on failure.
pub fn deserialize_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let deserializer = serde_yaml::Deserializer::from_reader(BufReader::new(file));
    serde_path_to_error::deserialize(deserializer).map_err(into_config_error)
}

pub fn deserialize_yaml_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    let deserializer = serde_yaml::Deserializer::from_str(input);
    serde_path_to_error::deserialize(deserializer).map_err(into_config_error)
}

fn into_config_error(err: serde_path_to_error::Error<serde_yaml::Error>) -> ConfigError {
    let path = err.path().to_string();
    ConfigError::Yaml { path, source: err.into_inner() }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ObservationConfig {
    #[serde(default = "default_name")]
    pub name: CompactString,
    /// Whether unbounded values such as the expanded URI are attached at all.
    #[serde(default = "enabled")]
    pub high_cardinality: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ignored_keys: Vec<CompactString>,
}

fn default_name() -> CompactString {
    CompactString::const_new(DEFAULT_OBSERVATION_NAME)
}

fn enabled() -> bool {
    true
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self { name: default_name(), high_cardinality: true, ignored_keys: Vec::new() }
    }
}

impl ObservationConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = deserialize_yaml(path)?;
        debug!("loaded observation configuration from {}", path.display());
        config.validate()
    }

    pub fn from_yaml(input: &str) -> Result<Self> {
        deserialize_yaml_str::<Self>(input)?.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidName(self.name));
        }
        Ok(self)
    }

    #[must_use]
    pub fn update_from_env(self) -> Self {
        self.with_overrides(var(ENV_OBSERVATION_NAME).ok(), var(ENV_HIGH_CARDINALITY).ok())
    }

    #[must_use]
    pub fn with_overrides(self, name: Option<String>, high_cardinality: Option<String>) -> Self {
        let name = match name {
            Some(name) if !name.trim().is_empty() => {
                debug!("observation name overridden to `{name}`");
                CompactString::from(name)
            },
            Some(_) => {
                warn!("ignoring empty observation name override");
                self.name
            },
            None => self.name,
        };

        let high_cardinality = high_cardinality
            .and_then(|v| {
                v.trim()
                    .parse::<bool>()
                    .inspect_err(|_| warn!("ignoring invalid high cardinality override `{v}`"))
                    .ok()
            })
            .unwrap_or(self.high_cardinality);

        ObservationConfig { name, high_cardinality, ignored_keys: self.ignored_keys }
    }
}
