use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "calltrace",
    about = "Tools for recorded API call traces",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new trace by merging multiple traces
    Merge(MergeArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Output trace file [default: output-merge.trace]
    #[arg(short, long, value_name = "TRACE_FILE")]
    pub output: Option<PathBuf>,

    /// Remove the output instead of leaving a partial trace when a merge fails
    #[arg(long)]
    pub discard_partial: bool,

    /// Traces to merge, in order
    #[arg(value_name = "TRACE_FILE", required = true, num_args = 2..)]
    pub traces: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parse_merge() {
        let cli = Cli::try_parse_from(["calltrace", "merge", "a.trace", "b.trace"]).unwrap();
        let Command::Merge(args) = cli.command;
        assert_eq!(args.traces, vec![PathBuf::from("a.trace"), PathBuf::from("b.trace")]);
        assert!(args.output.is_none());
        assert!(!args.discard_partial);
    }

    #[test]
    fn parse_merge_output_short() {
        let cli = Cli::try_parse_from(["calltrace", "merge", "-o", "out.trace", "a", "b", "c"]).unwrap();
        let Command::Merge(args) = cli.command;
        assert_eq!(args.output, Some(PathBuf::from("out.trace")));
        assert_eq!(args.traces.len(), 3);
    }

    #[test]
    fn parse_merge_output_long_equals() {
        let cli = Cli::try_parse_from(["calltrace", "merge", "--output=out.trace", "a", "b"]).unwrap();
        let Command::Merge(args) = cli.command;
        assert_eq!(args.output, Some(PathBuf::from("out.trace")));
    }

    #[test]
    fn parse_discard_partial() {
        let cli = Cli::try_parse_from(["calltrace", "merge", "--discard-partial", "a", "b"]).unwrap();
        let Command::Merge(args) = cli.command;
        assert!(args.discard_partial);
    }

    #[test]
    fn merge_requires_two_traces() {
        let err = Cli::try_parse_from(["calltrace", "merge", "a.trace"]).err().unwrap();
        assert!(matches!(
            err.kind(),
            ErrorKind::TooFewValues | ErrorKind::WrongNumberOfValues
        ));

        let err = Cli::try_parse_from(["calltrace", "merge"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_option_rejected() {
        let err = Cli::try_parse_from(["calltrace", "merge", "--bogus", "a", "b"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn help_is_not_a_usage_error() {
        let err = Cli::try_parse_from(["calltrace", "merge", "-h"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn parse_verbose_and_json() {
        let cli = Cli::try_parse_from(["calltrace", "merge", "-v", "--format", "json", "a", "b"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
