// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ea send` / `ea post` - Publish an event to the configured subscribers

use crate::config::CliConfig;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Args;
use ea_core::{
    Event, EventBus, HandlerError, PolicyOracle, Principal, Properties, TracedOracle,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type CliBus = EventBus<TracedOracle<PolicyOracle>>;

#[derive(Args)]
pub struct PublishArgs {
    /// Event topic, e.g. org/example/widget/CREATED
    pub topic: String,

    /// Event property as key=value; values are parsed as JSON, else kept as text
    #[arg(short = 'p', long = "property", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,

    /// Identity used for the publish permission check
    #[arg(long, default_value = "anonymous")]
    pub principal: String,
}

#[derive(Args)]
pub struct PostArgs {
    #[command(flatten)]
    pub publish: PublishArgs,

    /// How long to wait for asynchronous delivery before exiting
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub wait: Duration,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn to_properties(pairs: &[(String, String)]) -> Properties {
    pairs
        .iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(raw)
                .unwrap_or_else(|_| serde_json::Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect()
}

/// What a configured subscriber prints for each event
#[derive(Serialize)]
struct Received<'a> {
    subscriber: &'a str,
    topic: &'a str,
    properties: &'a Properties,
}

impl fmt::Display for Received<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = serde_json::to_string(self.properties).unwrap_or_default();
        write!(f, "{} {} {}", self.subscriber, self.topic, props)
    }
}

#[derive(Serialize)]
struct SendSummary {
    topic: String,
    delivered: usize,
    failed: usize,
}

impl fmt::Display for SendSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sent {}: delivered={} failed={}",
            self.topic, self.delivered, self.failed
        )
    }
}

#[derive(Serialize)]
struct PostSummary {
    topic: String,
}

impl fmt::Display for PostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Posted {}", self.topic)
    }
}

/// Build the bus and register every configured subscriber
fn build_bus(config: &CliConfig, format: OutputFormat) -> CliBus {
    let bus = config.bus_config().build_bus();

    for sub in &config.subscribers {
        let name = sub.name.clone();
        let handler = Arc::new(move |event: &Event| -> Result<(), HandlerError> {
            output::print(
                &Received {
                    subscriber: &name,
                    topic: event.topic().as_str(),
                    properties: event.properties(),
                },
                format,
            );
            Ok(())
        });
        let id = bus.register_handler(sub.topics.clone(), Principal::new(sub.principal()), handler);
        tracing::debug!(subscriber = %sub.name, handler = %id, "subscriber registered");
    }

    bus
}

pub fn send(args: PublishArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let bus = build_bus(config, format);
    let report = bus.send(
        &args.topic,
        to_properties(&args.properties),
        &Principal::new(args.principal),
    )?;

    output::print(
        &SendSummary {
            topic: args.topic,
            delivered: report.delivered,
            failed: report.failures.len(),
        },
        format,
    );
    Ok(())
}

pub fn post(args: PostArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let bus = build_bus(config, format);
    let publish = args.publish;
    bus.post(
        &publish.topic,
        to_properties(&publish.properties),
        &Principal::new(publish.principal),
    )?;

    if !bus.wait_idle(args.wait) {
        bail!(
            "timed out after {} waiting for delivery",
            humantime::format_duration(args.wait)
        );
    }

    output::print(
        &PostSummary {
            topic: publish.topic,
        },
        format,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("expr=a=b"),
            Ok(("expr".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn property_values_parse_as_json_or_text() {
        let props = to_properties(&[
            ("n".to_string(), "42".to_string()),
            ("flag".to_string(), "true".to_string()),
            ("name".to_string(), "gear".to_string()),
            ("list".to_string(), "[1,2]".to_string()),
        ]);
        assert_eq!(props["n"], json!(42));
        assert_eq!(props["flag"], json!(true));
        assert_eq!(props["name"], json!("gear"));
        assert_eq!(props["list"], json!([1, 2]));
    }

    #[test]
    fn received_line_format() {
        let props = to_properties(&[("id".to_string(), "7".to_string())]);
        let line = Received {
            subscriber: "audit",
            topic: "a/b",
            properties: &props,
        }
        .to_string();
        assert_eq!(line, r#"audit a/b {"id":7}"#);
    }
}
