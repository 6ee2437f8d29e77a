use crate::services::base::status::Status;
use crate::services::manifest::raw_object::RawObject;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Created,
    Updated,
    Deleted,
}

/// Identity of a manifest document as declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    pub document: usize,
    pub kind: String,
    pub name: Option<String>,
    pub namespace: Option<String>,
}

impl DocumentTarget {
    pub fn of(raw: &RawObject, document: usize) -> Self {
        DocumentTarget {
            document,
            kind: raw.gvk().kind.clone(),
            name: raw.name().map(str::to_string),
            namespace: raw.namespace().map(str::to_string),
        }
    }
}

impl Display for DocumentTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        match &self.namespace {
            Some(namespace) => write!(f, "#{} {} {}/{}", self.document, self.kind, namespace, name),
            None => write!(f, "#{} {} {}", self.document, self.kind, name),
        }
    }
}

#[derive(Debug)]
pub struct ApplyOutcome {
    pub target: DocumentTarget,
    pub result: Result<ApplyAction, Status>,
}

/// Per-document results of one manifest run.
/// Documents processed before a failure stay applied.
#[derive(Debug, Default)]
pub struct ApplyReport {
    outcomes: Vec<ApplyOutcome>,
}

impl ApplyReport {
    pub(crate) fn record(&mut self, target: DocumentTarget, result: Result<ApplyAction, Status>) {
        self.outcomes.push(ApplyOutcome { target, result });
    }

    /// Number of documents that were committed
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.result.is_ok()).count()
    }

    pub fn first_error(&self) -> Option<&Status> {
        self.outcomes.iter().find_map(|outcome| outcome.result.as_ref().err())
    }

    pub fn outcomes(&self) -> &[ApplyOutcome] {
        &self.outcomes
    }

    /// Collapses the report into the applied count or the first failure.
    pub fn into_result(self) -> Result<usize, Status> {
        let applied = self.applied();
        match self.outcomes.into_iter().find_map(|outcome| outcome.result.err()) {
            Some(status) => Err(status),
            None => Ok(applied),
        }
    }
}
