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


use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use webclient_configuration::ObservationConfig;
use webclient_observation::{ClientObservation, DefaultClientObservationConvention};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Markdown,
}

/// Prints the documented key values of the HTTP client observation.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Options {
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Observation configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn render(options: &Options) -> Result<String, BoxError> {
    let config = match options.config {
        Some(ref path) => {
            info!("loading observation configuration from {}", path.display());
            ObservationConfig::load(path)?
        },
        None => ObservationConfig::default(),
    }
    .update_from_env();

    let convention = DefaultClientObservationConvention::try_from(&config)?;
    let documentation = ClientObservation::HttpRequest.documentation(&convention);

    Ok(match options.format {
        Format::Yaml => serde_yaml::to_string(&documentation)?,
        Format::Markdown => documentation.to_string(),
    })
}

#[allow(clippy::print_stdout)]
fn main() -> Result<(), BoxError> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let options = Options::parse();
    print!("{}", render(&options)?);
    Ok(())
}
