use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DocId;
use crate::store::Document;

/// A class owned by exactly one teacher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: DocId,
    pub name: String,
    pub school_id: String,
    /// Store id of the owning teacher
    pub teacher: DocId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn new(name: String, school_id: &str, teacher: DocId) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            name,
            school_id: school_id.to_string(),
            teacher,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Class {
    const COLLECTION: &'static str = "classes";

    fn id(&self) -> &DocId {
        &self.id
    }
}
