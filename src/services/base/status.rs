pub mod object_details;


use crate::services::base::status::object_details::ObjectDetails;
use kube::api::GroupVersionKind;
use kube::core::ErrorResponse;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Remote operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Get,
    List,
    Watch,
    Discovery,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Watch => "watch",
            Operation::Discovery => "discovery",
        };
        write!(f, "{}", name)
    }
}

/// The error type shared by every object operation.
/// `AlreadyExists` is the only variant the apply path recovers from.
#[derive(Debug)]
pub enum Status {
    AlreadyExists {
        operation: Operation,
        object: ObjectDetails,
    },
    Conflict {
        operation: Operation,
        object: ObjectDetails,
    },
    NotFound {
        operation: Operation,
        object: ObjectDetails,
    },
    UnknownType(GroupVersionKind),
    Decode(anyhow::Error),
    /// The manifest or object file could not be read
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidObject(String),
    Rejected {
        operation: Operation,
        object: ObjectDetails,
        source: kube::Error,
    },
    Connection {
        operation: Operation,
        source: kube::Error,
    },
}

impl Status {
    /// Classifies a client error returned while running `operation` against `object`.
    pub fn from_kube(operation: Operation, object: ObjectDetails, error: kube::Error) -> Self {
        match &error {
            kube::Error::Api(ErrorResponse { code: 409, reason, .. }) if reason == "AlreadyExists" => {
                Status::AlreadyExists { operation, object }
            }
            kube::Error::Api(ErrorResponse { code: 409, .. }) => Status::Conflict { operation, object },
            kube::Error::Api(ErrorResponse { code: 404, .. }) => Status::NotFound { operation, object },
            kube::Error::Api(_) => Status::Rejected {
                operation,
                object,
                source: error,
            },
            _ => Status::Connection {
                operation,
                source: error,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Status::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Status::AlreadyExists { .. })
    }

    /// The remote operation that failed, when there was one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Status::AlreadyExists { operation, .. }
            | Status::Conflict { operation, .. }
            | Status::NotFound { operation, .. }
            | Status::Rejected { operation, .. }
            | Status::Connection { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    pub fn object(&self) -> Option<&ObjectDetails> {
        match self {
            Status::AlreadyExists { object, .. }
            | Status::Conflict { object, .. }
            | Status::NotFound { object, .. }
            | Status::Rejected { object, .. } => Some(object),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Status {
    fn from(error: serde_json::Error) -> Self {
        Status::Decode(error.into())
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::AlreadyExists { operation, object } => {
                write!(f, "Object already exists during {}: {}", operation, object)
            }
            Status::Conflict { operation, object } => {
                write!(f, "Conflict error occurred during {}: {}", operation, object)
            }
            Status::NotFound { operation, object } => write!(f, "Object not found during {}: {}", operation, object),
            Status::UnknownType(gvk) => write!(
                f,
                "Type not found in discovery catalog: group '{}', version '{}', kind '{}'",
                gvk.group, gvk.version, gvk.kind
            ),
            Status::Decode(cause) => write!(f, "Manifest decoding failed: {}", cause),
            Status::Read { path, source } => write!(f, "Failed to read {}: {}", path.display(), source),
            Status::InvalidObject(message) => write!(f, "Invalid object: {}", message),
            Status::Rejected {
                operation,
                object,
                source,
            } => write!(f, "Failed to {} {}: {}", operation, object, source),
            Status::Connection { operation, source } => {
                write!(f, "Connection error during {}: {}", operation, source)
            }
        }
    }
}

impl Error for Status {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Status::Rejected { source, .. } | Status::Connection { source, .. } => Some(source),
            Status::Read { source, .. } => Some(source),
            Status::Decode(cause) => Some(&**cause),
            _ => None,
        }
    }
}
