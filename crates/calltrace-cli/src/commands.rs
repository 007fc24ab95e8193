use anyhow::anyhow;
use calltrace_codec::FileBackend;
use calltrace_merge::{MergeConfig, MergeDriver, MergeReport, PartialOutput};
use colored::Colorize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &cli.format),
    }
}

fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = MergeConfig {
        output: args.output,
        partial_output: if args.discard_partial {
            PartialOutput::Discard
        } else {
            PartialOutput::Keep
        },
    };
    let driver = MergeDriver::new(FileBackend::default(), config);

    let report = driver.run(&args.traces).map_err(|err| match err.partial_output() {
        Some(partial) => anyhow!("{err} (partial output left in {})", partial.display()),
        None => anyhow!(err),
    })?;

    eprintln!("merge trace is available as {}", report.output.display());
    print_report(&report, format)
}

fn print_report(report: &MergeReport, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            for input in &report.inputs {
                println!(
                    "  {} {} calls, {} frames",
                    input.path.display().to_string().bold(),
                    input.calls,
                    input.frames
                );
            }
            println!(
                "{} {} calls, {} frames -> {}",
                "✓".green().bold(),
                report.calls,
                report.frames,
                report.output.display().to_string().yellow()
            );
        }
    }
    Ok(())
}
