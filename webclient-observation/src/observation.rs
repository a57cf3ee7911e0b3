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


use std::fmt::{self, Write};

use compact_str::CompactString;
use serde::Serialize;

use crate::{
    convention::{ClientObservationConvention, DefaultClientObservationConvention},
    keys::{
        high_cardinality_key_names, low_cardinality_key_names, Cardinality, HighCardinalityKeyName, KeyName,
        LowCardinalityKeyName,
    },
    outcome::Outcome,
};

/// Observations documented for the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientObservation {
    /// Observation created for an HTTP client exchange.
    HttpRequest,
}

impl ClientObservation {
    pub fn default_convention(self) -> DefaultClientObservationConvention {
        match self {
            ClientObservation::HttpRequest => DefaultClientObservationConvention::new(),
        }
    }

    pub fn low_cardinality_key_names(self) -> &'static [LowCardinalityKeyName] {
        match self {
            ClientObservation::HttpRequest => low_cardinality_key_names(),
        }
    }

    pub fn high_cardinality_key_names(self) -> &'static [HighCardinalityKeyName] {
        match self {
            ClientObservation::HttpRequest => high_cardinality_key_names(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ClientObservation::HttpRequest => "Observation created for an HTTP client exchange.",
        }
    }

    pub fn documentation<C>(self, convention: &C) -> ObservationDocumentation
    where
        C: ClientObservationConvention + ?Sized,
    {
        ObservationDocumentation {
            name: convention.name().into(),
            description: self.description(),
            low_cardinality_keys: self.low_cardinality_key_names().iter().map(KeyDocumentation::new).collect(),
            high_cardinality_keys: self.high_cardinality_key_names().iter().map(KeyDocumentation::new).collect(),
            outcomes: Outcome::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDocumentation {
    pub key: &'static str,
    pub cardinality: Cardinality,
    pub description: &'static str,
}

impl KeyDocumentation {
    fn new<K: KeyName>(key: &K) -> Self {
        Self { key: key.as_str(), cardinality: key.cardinality(), description: key.description() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationDocumentation {
    pub name: CompactString,
    pub description: &'static str,
    pub low_cardinality_keys: Vec<KeyDocumentation>,
    pub high_cardinality_keys: Vec<KeyDocumentation>,
    pub outcomes: Vec<Outcome>,
}

impl ObservationDocumentation {
    pub fn write_markdown<W: Write>(&self, w: &mut W) -> fmt::Result {
        writeln!(w, "## `{}`", self.name)?;
        writeln!(w)?;
        writeln!(w, "{}", self.description)?;

        for (title, keys) in [
            ("Low cardinality keys", &self.low_cardinality_keys),
            ("High cardinality keys", &self.high_cardinality_keys),
        ] {
            writeln!(w)?;
            writeln!(w, "### {title}")?;
            writeln!(w)?;
            writeln!(w, "| Name | Description |")?;
            writeln!(w, "|---|---|")?;
            for key in keys {
                writeln!(w, "| `{}` | {} |", key.key, key.description)?;
            }
        }

        writeln!(w)?;
        writeln!(w, "### Outcomes")?;
        writeln!(w)?;
        for outcome in &self.outcomes {
            writeln!(w, "- `{outcome}`")?;
        }
        Ok(())
    }
}

/// Renders the documentation as markdown.
impl fmt::Display for ObservationDocumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_markdown(f)
    }
}
