use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

pub const BDR_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nGlobal options:\n{options}\n";

pub const BDR_BEFORE_HELP: &str = concat!(
    "bdr ",
    env!("CARGO_PKG_VERSION"),
    " – Build descriptor resolver\n\n",
    "\x1b[1;36mCommands\x1b[0m\n",
    "  resolve          Assemble the full build descriptor for a source tree.\n",
    "  version          Print the version declared in sanic/__version__.py.\n",
    "  requires-dist    List Requires-Dist lines for the resolved manifests.\n",
    "  extras NAME      List the requirements of one extra.\n\n",
    "\x1b[1;36mEnvironment\x1b[0m\n",
    "  SANIC_NO_UJSON   Truth value; drops ujson and its type stubs.\n",
    "  SANIC_NO_UVLOOP  Truth value; drops uvloop.\n",
);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = BDR_BEFORE_HELP,
    help_template = BDR_HELP_TEMPLATE
)]
pub struct BdrCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(
        about = "Resolve version, manifests, and packages into one build descriptor.",
        override_usage = "bdr resolve [--root DIR] [--no-ujson] [--no-uvloop] [--pytest-args ARGS]"
    )]
    Resolve(ResolveArgs),
    #[command(
        about = "Print the version declared by the package's version module.",
        override_usage = "bdr version [--root DIR]"
    )]
    Version(RootArgs),
    #[command(
        about = "List Requires-Dist metadata lines, with extras markers.",
        override_usage = "bdr requires-dist [--root DIR] [--no-ujson] [--no-uvloop]"
    )]
    RequiresDist(RequiresDistArgs),
    #[command(
        about = "List the requirements of one extra after feature switches apply.",
        override_usage = "bdr extras <NAME> [--root DIR] [--no-ujson] [--no-uvloop]"
    )]
    Extras(ExtrasArgs),
}

#[derive(Args, Debug)]
pub struct RootArgs {
    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Source tree holding README.rst and the sanic package"
    )]
    pub root: PathBuf,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct FeatureArgs {
    #[arg(long, help = "Drop the ujson codec (same as SANIC_NO_UJSON=yes)")]
    pub no_ujson: bool,
    #[arg(long, help = "Drop the uvloop event loop (same as SANIC_NO_UVLOOP=yes)")]
    pub no_uvloop: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub root: RootArgs,
    #[command(flatten)]
    pub features: FeatureArgs,
    #[arg(
        long,
        value_name = "ARGS",
        default_value = "",
        allow_hyphen_values = true,
        help = "Arguments recorded for the pytest test command"
    )]
    pub pytest_args: String,
}

#[derive(Args, Debug)]
pub struct RequiresDistArgs {
    #[command(flatten)]
    pub root: RootArgs,
    #[command(flatten)]
    pub features: FeatureArgs,
}

#[derive(Args, Debug)]
pub struct ExtrasArgs {
    #[arg(value_name = "NAME", help = "Extra name: test, dev, docs, all, ext, or http3")]
    pub name: String,
    #[command(flatten)]
    pub root: RootArgs,
    #[command(flatten)]
    pub features: FeatureArgs,
}
