use atty::Stream;
use bdr_core::{CommandContext, CommandGroup, CommandStatus, ExecutionOutcome};
use clap::Parser;
use color_eyre::Result;
use serde_json::Value;

mod cli;
mod dispatch;
mod style;

use cli::BdrCli;
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = BdrCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let ctx = CommandContext::new();
    let (group, outcome) = dispatch::dispatch_command(&ctx, &cli.command)?;
    let code = emit_output(&cli, group, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("bdr_cli={level},bdr_core={level},bdr_domain={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn emit_output(cli: &BdrCli, group: CommandGroup, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.exit_code();
    let style = Style::new(cli.no_color, atty::is(Stream::Stdout));

    if cli.json {
        let payload = bdr_core::to_json_response(group, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if outcome.status != CommandStatus::Ok {
        let message = bdr_core::format_status_message(group, &outcome.message);
        eprintln!("{}", style.status(&outcome.status, &message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            eprintln!("{}", style.hint(hint));
        }
    } else if !cli.quiet {
        if is_passthrough(&outcome.details) {
            println!("{}", outcome.message);
        } else {
            let message = bdr_core::format_status_message(group, &outcome.message);
            println!("{}", style.status(&outcome.status, &message));
            if let Some(descriptor) = outcome.details.get("descriptor") {
                println!("{}", serde_json::to_string_pretty(descriptor)?);
            }
        }
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

fn is_passthrough(details: &Value) -> bool {
    details
        .as_object()
        .and_then(|map| map.get("passthrough"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
