#![deny(clippy::all, warnings)]

mod assemble;
mod commands;
mod config;
mod context;
mod discovery;
mod outcome;

pub use crate::assemble::{source_path, DescriptorAssembler, README_FILE, VERSION_FILE};
pub use crate::commands::{
    list_extra, requires_dist, resolve_descriptor, show_version, ExtrasRequest,
    RequiresDistRequest, ResolveRequest, VersionRequest,
};
pub use crate::config::{
    BuildConfig, EnvSnapshot, FlagDefaults, FlagOverrides, NO_UJSON_ENV, NO_UVLOOP_ENV,
};
pub use crate::context::CommandContext;
pub use crate::discovery::{FixedPackages, PackageDiscovery, SourceTreeDiscovery};
pub use crate::outcome::{
    format_status_message, to_json_response, CommandGroup, CommandStatus, ExecutionOutcome,
};
