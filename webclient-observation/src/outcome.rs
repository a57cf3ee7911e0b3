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


use std::{fmt, str::FromStr};

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    key_value::KeyValue,
    keys::{KeyName, LowCardinalityKeyName},
};

/// Outcome of an HTTP client exchange, derived from the class of the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    Unknown,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid outcome `{0}`")]
pub struct ParseOutcomeError(String);

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Outcome::Informational,
        Outcome::Success,
        Outcome::Redirection,
        Outcome::ClientError,
        Outcome::ServerError,
        Outcome::Unknown,
    ];

    /// Classifies a raw status code. Anything outside `100..=599` is `Unknown`.
    pub const fn for_status(status: i32) -> Outcome {
        match status {
            100..=199 => Outcome::Informational,
            200..=299 => Outcome::Success,
            300..=399 => Outcome::Redirection,
            400..=499 => Outcome::ClientError,
            500..=599 => Outcome::ServerError,
            _ => Outcome::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Informational => "INFORMATIONAL",
            Outcome::Success => "SUCCESS",
            Outcome::Redirection => "REDIRECTION",
            Outcome::ClientError => "CLIENT_ERROR",
            Outcome::ServerError => "SERVER_ERROR",
            Outcome::Unknown => "UNKNOWN",
        }
    }

    pub fn as_key_value(self) -> KeyValue {
        LowCardinalityKeyName::Outcome.with_value(self.as_str())
    }
}

/// Shorthand for [`Outcome::for_status`].
pub const fn classify(status: i32) -> Outcome {
    Outcome::for_status(status)
}

impl From<StatusCode> for Outcome {
    fn from(status: StatusCode) -> Self {
        Outcome::for_status(i32::from(status.as_u16()))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Outcome::ALL
            .into_iter()
            .find(|outcome| s.eq_ignore_ascii_case(outcome.as_str()))
            .ok_or_else(|| ParseOutcomeError(s.to_owned()))
    }
}
