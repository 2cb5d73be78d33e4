//! `logdiff sample pre|post`: print a bundled sample log.

use anyhow::Result;
use clap::{Args, ValueEnum};

pub const SAMPLE_PRE_NAME: &str = "sample_preCheck.log";
pub const SAMPLE_POST_NAME: &str = "sample_postCheck.log";
pub const SAMPLE_PRE: &str = include_str!("../samples/sample_preCheck.log");
pub const SAMPLE_POST: &str = include_str!("../samples/sample_postCheck.log");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleSide {
    Pre,
    Post,
}

impl SampleSide {
    pub fn text(self) -> &'static str {
        match self {
            SampleSide::Pre => SAMPLE_PRE,
            SampleSide::Post => SAMPLE_POST,
        }
    }
}

/// Arguments for `logdiff sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Which side to print.
    #[arg(value_enum)]
    pub side: SampleSide,
}

impl SampleArgs {
    pub fn run(self) -> Result<()> {
        print!("{}", self.side.text());
        Ok(())
    }
}
