//! Command-line options for the viewer.

use clap::{Parser, ValueEnum};
use sphere_tree::{ConfigError, ExhaustionPolicy, GeneratorConfig};
use tracing::level_filters::LevelFilter;

/// How to handle a node whose children cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnExhaustion {
    /// Stop generating and show what was built so far
    Abort,
    /// Leave the node without children
    Skip,
    /// Keep the children that were placed before giving up
    Truncate,
}

impl From<OnExhaustion> for ExhaustionPolicy {
    fn from(value: OnExhaustion) -> Self {
        match value {
            OnExhaustion::Abort => ExhaustionPolicy::Abort,
            OnExhaustion::Skip => ExhaustionPolicy::SkipNode,
            OnExhaustion::Truncate => ExhaustionPolicy::Truncate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sphere-viz", about = "Generate and view a tree of non-overlapping spheres")]
pub struct Cli {
    /// Seed for the random generator; Space regenerates with the next seed
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Layer at which growth stops (the root is layer 0)
    #[arg(long, default_value_t = 5)]
    pub depth: usize,

    /// Maximum children per node
    #[arg(long, default_value_t = 5)]
    pub max_children: usize,

    /// Child counts above this are laid out on a plane
    #[arg(long, default_value_t = 3)]
    pub plane_size: usize,

    /// Rejected candidates tolerated per placed sphere (0 retries forever)
    #[arg(long, default_value_t = 10_000)]
    pub max_attempts: u32,

    #[arg(long, value_enum, default_value_t = OnExhaustion::Abort)]
    pub on_exhaustion: OnExhaustion,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds and validates the generator configuration.
    pub fn config(&self) -> Result<GeneratorConfig, ConfigError> {
        let max_attempts = (self.max_attempts > 0).then_some(self.max_attempts);
        let config = GeneratorConfig::default()
            .with_max_depth(self.depth)
            .with_branching(self.max_children, self.plane_size)
            .with_max_attempts(max_attempts)
            .with_exhaustion_policy(self.on_exhaustion.into());
        config.validate()?;
        Ok(config)
    }

    /// Default log level when `RUST_LOG` is unset.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_generator_defaults() {
        let cli = Cli::parse_from(["sphere-viz"]);
        assert_eq!(cli.config().unwrap(), GeneratorConfig::default());
        assert_eq!(cli.log_level(), LevelFilter::INFO);
    }

    #[test]
    fn zero_attempts_means_unbounded() {
        let cli = Cli::parse_from(["sphere-viz", "--max-attempts", "0", "--on-exhaustion", "skip"]);
        let config = cli.config().unwrap();
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.on_exhaustion, ExhaustionPolicy::SkipNode);
    }

    #[test]
    fn invalid_branching_is_rejected() {
        let cli = Cli::parse_from(["sphere-viz", "--plane-size", "1"]);
        assert_eq!(cli.config(), Err(ConfigError::PlaneSizeTooSmall(1)));
    }

    #[test]
    fn verbosity_flags_raise_level() {
        assert_eq!(Cli::parse_from(["sphere-viz", "-v"]).log_level(), LevelFilter::DEBUG);
        assert_eq!(Cli::parse_from(["sphere-viz", "-vv"]).log_level(), LevelFilter::TRACE);
    }
}
