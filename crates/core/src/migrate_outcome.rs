use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// What the engine reports back after a run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MigrateOutcome {
    pub migrations_executed: u32,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Display for MigrateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} migrations executed",
            self.migrations_executed.to_string().bright_green().bold()
        )?;
        if !self.warnings.is_empty() {
            write!(
                f,
                " ({})",
                format!("{} warnings", self.warnings.len()).yellow()
            )?;
        }
        Ok(())
    }
}
