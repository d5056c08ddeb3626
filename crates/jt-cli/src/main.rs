mod commands;
mod context;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

/// jtopic — job lifecycle topic resolver
#[derive(Debug, Parser)]
#[command(name = "jtopic", version, about, long_about = "\
jtopic — job lifecycle topic resolver

Quick reference:
  jtopic check                         Validate the topic directives
  jtopic patterns                      Show the topic pattern per job category
  jtopic resolve <ID>... -e <FILE>     Resolve job/action ids to topics

Directive grammar:
  workflow=<v>, coordinator=<v>, bundle=<v>, default=<jobid|user>
  where <v> is jobid, user, or a fixed topic name

Environment variables:
  JOBTOPIC_TOPIC_NAME  Directive string (overridden by --topics)
  RUST_LOG             Log filter (default: info)
")]
struct Cli {
    #[command(flatten)]
    source: context::TopicSource,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve job or action ids to topic names
    Resolve(commands::resolve::ResolveCommand),

    /// Validate the directive string and print the parsed table
    Check,

    /// Show subscriber topic patterns per job category
    Patterns(commands::patterns::PatternsCommand),

    /// Show version and build info
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Resolve(cmd) => commands::resolve::run(cmd, &cli.source),
        Command::Check => commands::check::run(&cli.source),
        Command::Patterns(cmd) => commands::patterns::run(cmd, &cli.source),
        Command::Version => {
            println!(
                "jtopic {} ({})",
                env!("CARGO_PKG_VERSION"),
                env!("GIT_VERSION")
            );
            println!("Core:  jt-core {}", jt_core::version());
            println!("Built: {}", env!("BUILD_DATE"));
            Ok(())
        }
        Command::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "jtopic",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_resolve_with_global_topics() {
        let cli = Cli::try_parse_from([
            "jtopic",
            "resolve",
            "0000001-x-W",
            "0000001-x-W@1",
            "-e",
            "entities.toml",
            "--topics",
            "default=jobid",
        ])
        .unwrap();
        assert_eq!(cli.source.topics.as_deref(), Some("default=jobid"));
        match cli.command {
            Command::Resolve(cmd) => {
                assert_eq!(cmd.ids.len(), 2);
                assert_eq!(cmd.entities.to_str(), Some("entities.toml"));
                assert!(!cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn resolve_requires_ids() {
        assert!(Cli::try_parse_from(["jtopic", "resolve", "-e", "entities.toml"]).is_err());
    }
}
