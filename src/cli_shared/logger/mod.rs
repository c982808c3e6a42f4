// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use tracing_subscriber::{EnvFilter, Registry, prelude::*};

/// Console logging options of a process embedding the connector.
#[derive(Clone, Debug, Default)]
pub struct LoggerOpts {
    /// Emit ANSI colors.
    pub color: bool,
    /// Emit one JSON object per event instead of human readable lines.
    pub json: bool,
}

pub fn setup_logger(opts: &LoggerOpts) -> anyhow::Result<()> {
    let layer: Box<dyn tracing_subscriber::layer::Layer<Registry> + Send + Sync> = if opts.json {
        Box::new(
            tracing_subscriber::fmt::Layer::new()
                .json()
                .with_filter(get_env_filter(default_env_filter())),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::Layer::new()
                .with_ansi(opts.color)
                .with_filter(get_env_filter(default_env_filter())),
        )
    };
    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}

/// Returns an [`EnvFilter`] according to the `RUST_LOG` environment variable, or a default
/// - see [`default_env_filter`]
fn get_env_filter(def: EnvFilter) -> EnvFilter {
    use std::env::{
        self,
        VarError::{NotPresent, NotUnicode},
    };
    match env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV) {
        Ok(s) => EnvFilter::new(s),
        Err(NotPresent) => def,
        Err(NotUnicode(_)) => EnvFilter::default(),
    }
}

fn default_env_filter() -> EnvFilter {
    let default_directives = [
        "info",
        "forest_deal_connector::state_manager=info",
        "forest_deal_connector::message_pool=info",
        "bls_signatures=warn",
    ];
    EnvFilter::try_new(default_directives.join(","))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[test]
fn test_default_env_filter() {
    let filter = default_env_filter();
    assert_eq!(
        filter.max_level_hint(),
        Some(tracing_subscriber::filter::LevelFilter::INFO)
    );
}
