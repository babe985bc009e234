// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ea match <pattern> <topic>` - Test a subscription pattern

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct MatchArgs {
    /// Pattern, e.g. org/example/*
    pub pattern: String,
    /// Concrete topic
    pub topic: String,
}

#[derive(Serialize)]
struct MatchResult {
    pattern: String,
    topic: String,
    matches: bool,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matches)
    }
}

pub fn matches(args: MatchArgs, format: OutputFormat) -> Result<()> {
    let matches = ea_core::topic::matches(&args.pattern, &args.topic)?;
    output::print(
        &MatchResult {
            pattern: args.pattern,
            topic: args.topic,
            matches,
        },
        format,
    );
    Ok(())
}
