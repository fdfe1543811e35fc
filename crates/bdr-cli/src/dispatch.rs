use bdr_core::{
    CommandContext, CommandGroup, ExecutionOutcome, ExtrasRequest, FlagOverrides,
    RequiresDistRequest, ResolveRequest, VersionRequest,
};
use color_eyre::Result;

use crate::cli::{CommandGroupCli, FeatureArgs};

pub fn dispatch_command(
    ctx: &CommandContext,
    group: &CommandGroupCli,
) -> Result<(CommandGroup, ExecutionOutcome)> {
    match group {
        CommandGroupCli::Resolve(args) => {
            let request = ResolveRequest {
                root: args.root.root.clone(),
                pytest_args: args.pytest_args.clone(),
                overrides: overrides_from_args(args.features),
            };
            core_call(CommandGroup::Resolve, || {
                bdr_core::resolve_descriptor(ctx, &request)
            })
        }
        CommandGroupCli::Version(args) => {
            let request = VersionRequest {
                root: args.root.clone(),
            };
            core_call(CommandGroup::Version, || bdr_core::show_version(ctx, &request))
        }
        CommandGroupCli::RequiresDist(args) => {
            let request = RequiresDistRequest {
                root: args.root.root.clone(),
                overrides: overrides_from_args(args.features),
            };
            core_call(CommandGroup::RequiresDist, || {
                bdr_core::requires_dist(ctx, &request)
            })
        }
        CommandGroupCli::Extras(args) => {
            let request = ExtrasRequest {
                root: args.root.root.clone(),
                name: args.name.clone(),
                overrides: overrides_from_args(args.features),
            };
            core_call(CommandGroup::Extras, || bdr_core::list_extra(ctx, &request))
        }
    }
}

fn overrides_from_args(args: FeatureArgs) -> FlagOverrides {
    FlagOverrides {
        no_ujson: args.no_ujson,
        no_uvloop: args.no_uvloop,
    }
}

fn core_call<F>(group: CommandGroup, action: F) -> Result<(CommandGroup, ExecutionOutcome)>
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => Ok((group, outcome)),
        Err(err) => {
            let issues: Vec<String> = err.chain().map(std::string::ToString::to_string).collect();
            Ok((
                group,
                ExecutionOutcome::failure(
                    err.to_string(),
                    serde_json::json!({
                        "reason": "internal_error",
                        "error": err.to_string(),
                        "issues": issues,
                    }),
                ),
            ))
        }
    }
}
