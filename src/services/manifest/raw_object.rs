use crate::services::base::status::Status;
use crate::services::discovery::type_descriptor::GroupKind;
use anyhow::{anyhow, bail};
use kube::api::GroupVersionKind;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One decoded manifest document together with the type it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    gvk: GroupVersionKind,
    body: Value,
}

impl RawObject {
    pub fn from_value(body: Value) -> anyhow::Result<Self> {
        if !body.is_object() {
            bail!("document is not a mapping");
        }
        let api_version = body
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("document has no apiVersion"))?;
        let kind = body
            .get("kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .ok_or_else(|| anyhow!("document has no kind"))?;

        match body.get("metadata") {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(_) => bail!("metadata of {} is not a mapping", kind),
        }

        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        if version.is_empty() {
            bail!("apiVersion '{}' has no version", api_version);
        }

        Ok(RawObject {
            gvk: GroupVersionKind::gvk(group, version, kind),
            body,
        })
    }

    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    pub fn group_kind(&self) -> GroupKind {
        GroupKind::new(&self.gvk.group, &self.gvk.kind)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_field("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_field("namespace")
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Converts the document into a concrete object representation.
    pub fn into_object<K>(self) -> Result<K, Status>
    where
        K: DeserializeOwned,
    {
        Ok(serde_json::from_value(self.body)?)
    }

    fn metadata_field(&self, field: &str) -> Option<&str> {
        self.body.get("metadata")?.get(field)?.as_str()
    }
}
