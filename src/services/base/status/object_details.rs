use crate::services::base::types::ObjectHandle;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDetails {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl ObjectDetails {
    pub fn new(kind: &str, name: &str, namespace: Option<&str>) -> Self {
        ObjectDetails {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        }
    }

    pub fn from_handle(kind: &str, handle: &ObjectHandle) -> Self {
        ObjectDetails::new(kind, &handle.name, handle.namespace.as_deref())
    }
}

impl Display for ObjectDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{} '{}' in namespace '{}'", self.kind, self.name, namespace),
            None => write!(f, "{} '{}'", self.kind, self.name),
        }
    }
}
