use std::fmt;

use bdr_domain::BuildError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    /// A build-configuration failure, with the precondition that failed.
    #[must_use]
    pub fn from_build_error(err: &BuildError) -> Self {
        let mut details = json!({ "reason": err.reason() });
        if let BuildError::Resource(resource) = err {
            details["path"] = json!(resource.path.display().to_string());
            details["error"] = json!(resource.source.to_string());
        }
        if let Some(hint) = hint_for(err.reason()) {
            details["hint"] = json!(hint);
        }
        Self::user_error(err.to_string(), details)
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

fn hint_for(reason: &str) -> Option<&'static str> {
    match reason {
        "invalid_flag" => Some("use one of yes/no, true/false, on/off, 1/0"),
        "version_not_found" => {
            Some("declare the version as `__version__ = \"X.Y.Z\"` on its own line")
        }
        "missing_resource" => Some("run from the source root or pass --root"),
        "unknown_extra" => Some("extras are test, dev, docs, all, ext, and http3"),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandGroup {
    Resolve,
    Version,
    RequiresDist,
    Extras,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::Resolve => "resolve",
            CommandGroup::Version => "version",
            CommandGroup::RequiresDist => "requires-dist",
            CommandGroup::Extras => "extras",
        };
        f.write_str(name)
    }
}

#[must_use]
pub fn to_json_response(group: CommandGroup, outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(group, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(group: CommandGroup, message: &str) -> String {
    let prefix = format!("bdr {group}");
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
