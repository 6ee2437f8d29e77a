use std::fmt::{Display, Formatter};

/// Whether objects of a type live inside a namespace or at cluster level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceScope {
    Namespaced,
    Cluster,
}

impl From<&kube::discovery::Scope> for ResourceScope {
    fn from(scope: &kube::discovery::Scope) -> Self {
        match scope {
            kube::discovery::Scope::Namespaced => ResourceScope::Namespaced,
            kube::discovery::Scope::Cluster => ResourceScope::Cluster,
        }
    }
}

/// Identity of one live object at the server.
/// Only meaningful together with the type the object belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle {
    pub scope: ResourceScope,
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectHandle {
    /// Builds a handle, dropping the namespace for cluster-scoped types and
    /// falling back to `default_namespace` for namespaced ones.
    pub fn new(scope: ResourceScope, namespace: Option<&str>, name: &str, default_namespace: &str) -> Self {
        let namespace = match scope {
            ResourceScope::Cluster => None,
            ResourceScope::Namespaced => Some(namespace.unwrap_or(default_namespace).to_string()),
        };
        ObjectHandle {
            scope,
            namespace,
            name: name.to_string(),
        }
    }
}

impl Display for ObjectHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}/{}", namespace, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
