use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Credential, IdentityRecord};
use crate::ids::{generate_code, CodeKind, DocId};
use crate::store::Document;
use crate::validation::CreateTeacherRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: DocId,
    pub full_name: String,
    /// `TCH-XXXXXXXX`, unique across every school
    pub teacher_id: String,
    pub school_id: String,
    pub email: String,
    pub password: Credential,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    pub fn new(request: CreateTeacherRequest, school_id: &str, password: Credential) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            full_name: request.full_name,
            teacher_id: generate_code(CodeKind::Teacher),
            school_id: school_id.to_string(),
            email: request.email,
            password,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Teacher {
    const COLLECTION: &'static str = "teachers";
    const UNIQUE_FIELDS: &'static [&'static str] = &["teacherId", "email"];

    fn id(&self) -> &DocId {
        &self.id
    }
}

impl IdentityRecord for Teacher {
    fn credential(&self) -> &Credential {
        &self.password
    }

    fn set_credential(&mut self, credential: Credential) {
        self.password = credential;
    }
}
