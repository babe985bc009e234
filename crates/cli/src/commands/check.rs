// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ea check <principal> <topic> <action>` - Evaluate the access policy

use crate::config::CliConfig;
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use clap::Args;
use ea_core::{Decision, PermissionOracle, Principal, Topic, TopicAction};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct CheckArgs {
    /// Principal to check
    pub principal: String,
    /// Concrete topic
    pub topic: String,
    /// publish or subscribe
    pub action: String,
}

#[derive(Serialize)]
struct CheckResult {
    principal: String,
    topic: String,
    action: TopicAction,
    decision: Decision,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decision = match self.decision {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        };
        f.write_str(decision)
    }
}

pub fn check(args: CheckArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let topic = Topic::new(&args.topic)?;
    let action: TopicAction = args.action.parse().map_err(|e: String| anyhow!(e))?;
    let principal = Principal::new(args.principal);

    let decision = config
        .bus_config()
        .oracle()
        .authorize(&principal, &topic, action);

    output::print(
        &CheckResult {
            principal: principal.0,
            topic: args.topic,
            action,
            decision,
        },
        format,
    );
    Ok(())
}
