use crate::services::discovery::type_descriptor::{GroupKind, TypeDescriptor};
use std::collections::HashMap;

/// Snapshot of every type the server reported, indexed by (group, kind).
#[derive(Debug, Clone, Default)]
pub struct DiscoveryCatalog {
    index: HashMap<GroupKind, Vec<TypeDescriptor>>,
}

impl DiscoveryCatalog {
    pub fn new(entries: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut index: HashMap<GroupKind, Vec<TypeDescriptor>> = HashMap::new();
        for entry in entries {
            let versions = index.entry(entry.group_kind()).or_default();
            // first registration of a version wins
            if !versions.iter().any(|known| known.version == entry.version) {
                versions.push(entry);
            }
        }
        DiscoveryCatalog { index }
    }

    pub fn resolve(&self, group_kind: &GroupKind, version: &str) -> Option<&TypeDescriptor> {
        self.index
            .get(group_kind)?
            .iter()
            .find(|descriptor| descriptor.version == version)
    }

    /// Reverse lookup by plural resource name
    pub fn lookup_resource(&self, group: &str, plural: &str) -> Option<&TypeDescriptor> {
        self.descriptors()
            .find(|descriptor| descriptor.group == group && descriptor.plural == plural)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.index.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
