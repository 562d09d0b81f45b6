//! Command handlers. Each command group is a module with a `run` entry point.

pub mod fetch;
pub mod info;
pub mod poll;
pub mod setup;
pub mod ui;

use crate::core::error::ExchangeError;
use crate::core::measurement::PriceMeasurement;
use anyhow::Result;
use std::io::Write;

/// What a `poll` or `fetch` command reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Item(i64),
    Category(i64),
    All,
}

/// Turns not-found conditions into the messages shown to users.
pub(crate) fn user_error(err: ExchangeError) -> anyhow::Error {
    match err {
        ExchangeError::NoSuchItem(id) => anyhow::anyhow!("Invalid item: {id}"),
        ExchangeError::NoSuchCategory(id) => anyhow::anyhow!("Invalid category: {id}"),
        other => other.into(),
    }
}

pub(crate) fn write_measurement(out: &mut dyn Write, measurement: &PriceMeasurement) -> Result<()> {
    writeln!(out, "{}", measurement.to_json()?)?;
    Ok(())
}
