use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format of reporting commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum FormatOptions {
    /// Machine-readable JSON, for build scripts consuming the result
    #[value(name = "json")]
    Json,
    /// Human-readable colored terminal output
    #[default]
    #[value(name = "stdout")]
    Stdout,
}

impl FormatOptions {
    /// Print `stdout_msg` or the JSON form of `value`
    ///
    /// # Errors
    /// Returns error if `value` cannot be serialized.
    pub fn print<T: Serialize + ?Sized>(&self, stdout_msg: &str, value: &T) -> Result<()> {
        match self {
            Self::Stdout => println!("{stdout_msg}"),
            Self::Json => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }
}
