
use crate::services::base::status::Status;
use crate::services::manifest::raw_object::RawObject;
use anyhow::anyhow;
use serde::Deserialize;
use serde_json::Value;

/// Splits a multi-document YAML manifest into raw objects.
pub struct ManifestDecoder<'a> {
    source: &'a str,
}

impl<'a> ManifestDecoder<'a> {
    pub fn new(source: &'a str) -> Self {
        ManifestDecoder { source }
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, Status> {
        let source = std::str::from_utf8(bytes).map_err(|e| Status::Decode(anyhow!("manifest is not UTF-8: {}", e)))?;
        Ok(ManifestDecoder::new(source))
    }

    /// Starts a fresh pass over the manifest.
    pub fn documents(&self) -> Documents<'a> {
        Documents {
            inner: serde_yml::Deserializer::from_str(self.source),
            index: 0,
            finished: false,
        }
    }

    /// Decodes every document, failing the whole manifest on the first bad one.
    pub fn decode_all(&self) -> Result<Vec<RawObject>, Status> {
        self.documents().collect()
    }
}

/// Lazy document iterator. Empty documents are skipped,
/// and nothing is yielded after the first error.
pub struct Documents<'a> {
    inner: serde_yml::Deserializer<'a>,
    index: usize,
    finished: bool,
}

impl Iterator for Documents<'_> {
    type Item = Result<RawObject, Status>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let Some(document) = self.inner.next() else {
                self.finished = true;
                break;
            };
            self.index += 1;

            let value = match Value::deserialize(document) {
                Ok(value) => value,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(Status::Decode(anyhow!("document {}: {}", self.index, e))));
                }
            };
            if value.is_null() {
                continue;
            }

            let index = self.index;
            let result =
                RawObject::from_value(value).map_err(|e| Status::Decode(anyhow!("document {}: {}", index, e)));
            self.finished = result.is_err();
            return Some(result);
        }
        None
    }
}
