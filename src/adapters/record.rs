use crate::{Entity, error::Error, query::IndexMeta};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub kind: String,
    pub id: Uuid,
}

impl Key {
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// Raw entity row as the store holds it: the serialized entity plus the
/// backend-native values queries filter and sort on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: Uuid,
    pub kind: String,
    pub data: serde_json::Value,
    pub index_meta: IndexMeta,
}

impl EntityRecord {
    pub fn key(&self) -> Key {
        Key::new(self.kind.clone(), self.id)
    }

    /// Deserializes the row into any shape whose fields are a subset of the
    /// stored entity's.
    pub fn project<R: DeserializeOwned>(&self) -> Result<R, Error> {
        R::deserialize(&self.data).map_err(|e| Error::Deserialize(e.to_string()))
    }

    pub fn from_object<T: Entity>(obj: &T) -> Result<Self, Error> {
        Ok(Self {
            id: obj.meta().id,
            kind: T::KIND.to_string(),
            data: serde_json::to_value(obj).map_err(|e| Error::Serialize(e.to_string()))?,
            index_meta: obj.index_meta(),
        })
    }
}
