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


//! Key names, outcome classification and conventions used to annotate HTTP client
//! exchanges with observation key values.

pub mod context;
pub mod convention;
mod error;
pub mod key_value;
pub mod keys;
pub mod observation;
pub mod outcome;

pub use context::{ClientRequestObservationContext, ExchangeError};
pub use convention::{ClientObservationConvention, DefaultClientObservationConvention};
pub use error::{Error, Result};
pub use key_value::{KeyValue, KeyValues, NONE_VALUE};
pub use keys::{
    high_cardinality_key_names, key_name_for, low_cardinality_key_names, Cardinality, ClientKeyName, HighCardinalityKeyName,
    KeyName, LowCardinalityKeyName,
};
pub use observation::{ClientObservation, ObservationDocumentation};
pub use outcome::{classify, Outcome, ParseOutcomeError};
pub use webclient_configuration::ObservationConfig;
