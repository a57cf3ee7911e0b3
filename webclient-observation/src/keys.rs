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


//! Key names attached to HTTP client observations.
//!
//! Low cardinality keys have a small, bounded value set and are safe to use as metric
//! dimensions. High cardinality keys carry effectively unbounded values and belong in
//! traces or logs only.

use std::{fmt, str::FromStr};

use compact_str::CompactString;
use serde::{Serialize, Serializer};

use crate::{
    error::{Error, Result},
    key_value::KeyValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Low,
    High,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Low => f.write_str("low"),
            Cardinality::High => f.write_str("high"),
        }
    }
}

pub trait KeyName {
    fn as_str(&self) -> &'static str;

    fn cardinality(&self) -> Cardinality;

    fn description(&self) -> &'static str;

    fn with_value(&self, value: impl Into<CompactString>) -> KeyValue
    where
        Self: Sized,
    {
        KeyValue::new(self.as_str(), value)
    }
}

macro_rules! key_names {
    ($(#[$attr:meta])* $name:ident, $cardinality:expr, { $($variant:ident => $key:literal, $description:literal;)+ }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = $description]
                $variant,
            )+
        }

        impl $name {
            /// Every key, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl KeyName for $name {
            fn as_str(&self) -> &'static str {
                $name::as_str(*self)
            }

            fn cardinality(&self) -> Cardinality {
                $cardinality
            }

            fn description(&self) -> &'static str {
                match self {
                    $($name::$variant => $description,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str($name::as_str(*self))
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($key => Ok($name::$variant),)+
                    _ => Err(Error::UnknownKeyName(s.into())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($name::as_str(*self))
            }
        }
    };
}

key_names!(
    /// Keys whose values are bounded and safe for dimensional metrics.
    LowCardinalityKeyName, Cardinality::Low, {
        Method => "method", "Name of the HTTP request method, or `none` if the request could not be created.";
        Uri => "uri", "URI template used for the HTTP request, or `none` if none was provided.";
        Status => "status", "HTTP response raw status code, `IO_ERROR` on I/O failures, or `CLIENT_ERROR` if no response was received.";
        Exception => "exception", "Name of the error raised during the exchange, or `none` if the exchange completed.";
        Outcome => "outcome", "Outcome of the HTTP client exchange.";
    }
);

key_names!(
    /// Keys whose values are unbounded and only suitable for traces.
    HighCardinalityKeyName, Cardinality::High, {
        UriExpanded => "uri.expanded", "HTTP request URI.";
        ClientName => "client.name", "Client name derived from the request URI host.";
    }
);

pub fn low_cardinality_key_names() -> &'static [LowCardinalityKeyName] {
    LowCardinalityKeyName::ALL
}

pub fn high_cardinality_key_names() -> &'static [HighCardinalityKeyName] {
    HighCardinalityKeyName::ALL
}

/// Resolves a key string against both registries.
pub fn key_name_for(key: &str) -> Result<ClientKeyName> {
    key.parse()
}

/// A key from either registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ClientKeyName {
    Low(LowCardinalityKeyName),
    High(HighCardinalityKeyName),
}

impl ClientKeyName {
    pub fn all() -> impl Iterator<Item = ClientKeyName> {
        low_cardinality_key_names()
            .iter()
            .copied()
            .map(ClientKeyName::Low)
            .chain(high_cardinality_key_names().iter().copied().map(ClientKeyName::High))
    }
}

impl KeyName for ClientKeyName {
    fn as_str(&self) -> &'static str {
        match self {
            ClientKeyName::Low(key) => key.as_str(),
            ClientKeyName::High(key) => key.as_str(),
        }
    }

    fn cardinality(&self) -> Cardinality {
        match self {
            ClientKeyName::Low(key) => KeyName::cardinality(key),
            ClientKeyName::High(key) => KeyName::cardinality(key),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ClientKeyName::Low(key) => KeyName::description(key),
            ClientKeyName::High(key) => KeyName::description(key),
        }
    }
}

impl FromStr for ClientKeyName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<LowCardinalityKeyName>()
            .map(ClientKeyName::Low)
            .or_else(|_| s.parse::<HighCardinalityKeyName>().map(ClientKeyName::High))
    }
}

impl From<LowCardinalityKeyName> for ClientKeyName {
    fn from(key: LowCardinalityKeyName) -> Self {
        ClientKeyName::Low(key)
    }
}

impl From<HighCardinalityKeyName> for ClientKeyName {
    fn from(key: HighCardinalityKeyName) -> Self {
        ClientKeyName::High(key)
    }
}
