//! Command handlers
//!
//! One module per subcommand. Every handler receives a `CommandContext`
//! carrying the resolved configuration and output settings.

pub mod export;
pub mod reconstruct;
pub mod run;
pub mod sample;
pub mod view;

use anyhow::Result;

use walkmesh::config::{Config, Verbosity};
use walkmesh::domain::ports::PipelineEventSink;
use walkmesh::presentation::factory;
use walkmesh::presentation::output::{print_warnings, use_color};
use walkmesh::presentation::Cli;

/// Resolved settings shared by all commands
pub struct CommandContext {
    pub config: Config,
    pub json: bool,
    pub color: bool,
    pub verbosity: Verbosity,
}

impl CommandContext {
    /// Resolve configuration for `cli` and report ignored keys
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config, warnings) = Config::resolve(cli.config.as_deref())?;
        let color = use_color(cli.color, config.output.color);
        let verbosity = factory::effective_verbosity(&config, cli.verbose);

        print_warnings(&warnings, cli.json, color);

        Ok(Self {
            config,
            json: cli.json,
            color,
            verbosity,
        })
    }

    pub fn event_sink(&self) -> Box<dyn PipelineEventSink> {
        factory::create_event_sink(self.json, self.verbosity)
    }
}
