//! Command handlers: each returns an [`ExecutionOutcome`], turning build
//! configuration failures into user errors.

use std::path::{Path, PathBuf};

use anyhow::Result;
use bdr_domain::{BuildDescriptor, BuildError, TestCommand};
use serde_json::json;

use crate::assemble::DescriptorAssembler;
use crate::config::FlagOverrides;
use crate::context::CommandContext;
use crate::discovery::SourceTreeDiscovery;
use crate::outcome::ExecutionOutcome;

#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub root: PathBuf,
    pub pytest_args: String,
    pub overrides: FlagOverrides,
}

#[derive(Debug, Clone)]
pub struct VersionRequest {
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RequiresDistRequest {
    pub root: PathBuf,
    pub overrides: FlagOverrides,
}

#[derive(Debug, Clone)]
pub struct ExtrasRequest {
    pub root: PathBuf,
    pub name: String,
    pub overrides: FlagOverrides,
}

fn assemble(
    ctx: &CommandContext,
    root: &Path,
    overrides: FlagOverrides,
    test_command: TestCommand,
) -> Result<BuildDescriptor, BuildError> {
    let config = ctx.build_config(overrides)?;
    let discovery = SourceTreeDiscovery::default();
    DescriptorAssembler::new(root, &discovery)?.assemble(config.flags(), test_command)
}

/// Resolve the full build descriptor.
///
/// # Errors
///
/// Returns an error only if the descriptor cannot be serialized.
pub fn resolve_descriptor(ctx: &CommandContext, request: &ResolveRequest) -> Result<ExecutionOutcome> {
    let test_command = TestCommand::pytest(request.pytest_args.clone());
    let descriptor = match assemble(ctx, &request.root, request.overrides, test_command) {
        Ok(descriptor) => descriptor,
        Err(err) => return Ok(ExecutionOutcome::from_build_error(&err)),
    };
    let message = format!("resolved {} {}", descriptor.name(), descriptor.version());
    Ok(ExecutionOutcome::success(
        message,
        json!({ "descriptor": serde_json::to_value(&descriptor)? }),
    ))
}

/// Report the version declared in the source tree.
///
/// # Errors
///
/// Never fails outside of build errors, which become user errors.
pub fn show_version(_ctx: &CommandContext, request: &VersionRequest) -> Result<ExecutionOutcome> {
    let discovery = SourceTreeDiscovery::default();
    let version = DescriptorAssembler::new(&request.root, &discovery).and_then(|a| a.version());
    Ok(match version {
        Ok(version) => ExecutionOutcome::success(
            version.clone(),
            json!({ "version": version, "passthrough": true }),
        ),
        Err(err) => ExecutionOutcome::from_build_error(&err),
    })
}

/// List `Requires-Dist` values for the core metadata file.
///
/// # Errors
///
/// Never fails outside of build errors, which become user errors.
pub fn requires_dist(
    ctx: &CommandContext,
    request: &RequiresDistRequest,
) -> Result<ExecutionOutcome> {
    let assembled = assemble(ctx, &request.root, request.overrides, TestCommand::default());
    Ok(match assembled {
        Ok(descriptor) => {
            let lines = descriptor.requires_dist();
            let rendered = lines
                .iter()
                .map(|line| format!("Requires-Dist: {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            ExecutionOutcome::success(
                rendered,
                json!({ "requires_dist": lines, "passthrough": true }),
            )
        }
        Err(err) => ExecutionOutcome::from_build_error(&err),
    })
}

/// List the requirements of one extra, after feature switches apply.
///
/// # Errors
///
/// Never fails outside of build errors, which become user errors.
pub fn list_extra(ctx: &CommandContext, request: &ExtrasRequest) -> Result<ExecutionOutcome> {
    let listed = assemble(ctx, &request.root, request.overrides, TestCommand::default())
        .and_then(|descriptor| {
            let specs: Vec<String> = descriptor
                .extras_require()
                .by_name(&request.name)?
                .iter()
                .map(ToString::to_string)
                .collect();
            Ok(specs)
        });
    Ok(match listed {
        Ok(specs) => ExecutionOutcome::success(
            specs.join("\n"),
            json!({ "extra": request.name, "requirements": specs, "passthrough": true }),
        ),
        Err(err) => ExecutionOutcome::from_build_error(&err),
    })
}
