// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Configures log levels, formatters, and noise filters for the tracing subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Production-ready logging configuration with structured output

use crate::config::Environment;
use crate::constants::{env_vars, service_names};
use anyhow::{Context, Result};
use serde_json::json;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    /// Parse `LOG_FORMAT`, defaulting to pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::OMTEAM_AI_SERVER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = env::var("LOG_FORMAT")
            .map(|value| LogFormat::from_str_or_default(&value))
            .unwrap_or(LogFormat::Pretty);

        let environment = env::var(env_vars::APP_ENV)
            .or_else(|_| env::var(env_vars::ENVIRONMENT))
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        // In production, use more detailed logging
        let is_production = environment.is_production();

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::OMTEAM_AI_SERVER.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: environment.to_string(),
        }
    }

    /// Build the filter: the configured level plus fixed noise reduction
    fn env_filter(&self) -> EnvFilter {
        [
            "hyper=warn",
            "hyper::proto=warn",
            "reqwest=warn",
            "h2=warn",
            "tower_http=info",
        ]
        .iter()
        .fold(EnvFilter::new(&self.level), |filter, directive| {
            filter.add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
        })
        // Keep our application logs at desired level
        .add_directive(
            format!("omteam_ai_server={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();

                registry
                    .with(json_layer)
                    .try_init()
                    .context("Failed to initialize JSON logging")?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);

                registry
                    .with(pretty_layer)
                    .try_init()
                    .context("Failed to initialize pretty logging")?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_target(false)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::NONE);

                registry
                    .with(compact_layer)
                    .try_init()
                    .context("Failed to initialize compact logging")?;
            }
        }

        self.log_startup_info();

        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Omteam AI server starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });

        info!("Logging configured: {}", config_summary);
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_default_service_name() {
        let config = LoggingConfig::default();
        assert_eq!(config.service_name, service_names::OMTEAM_AI_SERVER);
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
