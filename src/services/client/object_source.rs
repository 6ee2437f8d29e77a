use crate::services::base::status::Status;
use crate::services::manifest::manifest_decoder::ManifestDecoder;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Where an object handed to a client comes from.
/// Text and file sources must hold exactly one document.
#[derive(Debug, Clone)]
pub enum ObjectSource<K> {
    Object(K),
    Yaml(String),
    File(PathBuf),
}

impl<K> ObjectSource<K>
where
    K: DeserializeOwned,
{
    pub async fn load(self) -> Result<K, Status> {
        match self {
            ObjectSource::Object(object) => Ok(object),
            ObjectSource::Yaml(text) => decode_single(&text),
            ObjectSource::File(path) => {
                let text = match tokio::fs::read_to_string(&path).await {
                    Ok(text) => text,
                    Err(source) => return Err(Status::Read { path, source }),
                };
                decode_single(&text)
            }
        }
    }
}

fn decode_single<K>(text: &str) -> Result<K, Status>
where
    K: DeserializeOwned,
{
    let mut objects = ManifestDecoder::new(text).decode_all()?;
    if objects.len() != 1 {
        return Err(Status::InvalidObject(format!(
            "expected exactly one document, found {}",
            objects.len()
        )));
    }
    objects.remove(0).into_object()
}

impl<K> From<PathBuf> for ObjectSource<K> {
    fn from(path: PathBuf) -> Self {
        ObjectSource::File(path)
    }
}

impl<K> From<&Path> for ObjectSource<K> {
    fn from(path: &Path) -> Self {
        ObjectSource::File(path.to_path_buf())
    }
}
