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


use std::io;

use compact_str::CompactString;
use http::{Method, StatusCode, Uri};
use thiserror::Error;

/// Failure of an HTTP client exchange as seen by the observation.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("I/O Error: {0}")]
    Io(#[from] io::Error),
    #[error("Timeout")]
    Timeout,
    #[error("Cancelled")]
    Cancelled,
    #[error("{name}: {message}")]
    Other { name: CompactString, message: CompactString },
}

impl ExchangeError {
    pub fn other(name: impl Into<CompactString>, message: impl Into<CompactString>) -> Self {
        ExchangeError::Other { name: name.into(), message: message.into() }
    }

    /// Stable name reported under the `exception` key.
    pub fn name(&self) -> &str {
        match self {
            ExchangeError::Io(_) => "IoError",
            ExchangeError::Timeout => "Timeout",
            ExchangeError::Cancelled => "Cancelled",
            ExchangeError::Other { name, .. } => name.as_str(),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, ExchangeError::Io(_))
    }
}

/// Everything recorded about a single client exchange.
#[derive(Debug, Default)]
pub struct ClientRequestObservationContext {
    method: Option<Method>,
    uri_template: Option<CompactString>,
    uri: Option<Uri>,
    status: Option<StatusCode>,
    error: Option<ExchangeError>,
}

impl ClientRequestObservationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        Self::new().with_method(request.method().clone()).with_uri(request.uri().clone())
    }

    #[must_use]
    pub fn with_method(self, method: Method) -> Self {
        Self { method: Some(method), ..self }
    }

    #[must_use]
    pub fn with_uri_template(self, template: impl Into<CompactString>) -> Self {
        Self { uri_template: Some(template.into()), ..self }
    }

    #[must_use]
    pub fn with_uri(self, uri: Uri) -> Self {
        Self { uri: Some(uri), ..self }
    }

    #[must_use]
    pub fn with_status(self, status: StatusCode) -> Self {
        Self { status: Some(status), ..self }
    }

    #[must_use]
    pub fn with_error(self, error: ExchangeError) -> Self {
        Self { error: Some(error), ..self }
    }

    pub fn set_response<B>(&mut self, response: &http::Response<B>) {
        self.status = Some(response.status());
    }

    pub fn set_error(&mut self, error: ExchangeError) {
        self.error = Some(error);
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn uri_template(&self) -> Option<&str> {
        self.uri_template.as_deref()
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.uri.as_ref()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn error(&self) -> Option<&ExchangeError> {
        self.error.as_ref()
    }
}
