use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Credential, IdentityRecord};
use crate::ids::{generate_code, CodeKind, DocId};
use crate::store::Document;
use crate::validation::CreateStudentRequest;

/// Student record. Belongs to exactly one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: DocId,
    pub full_name: String,
    /// `STU-XXXXXXXX`
    pub student_id: String,
    pub school_id: String,
    /// Optional; unique only among students that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: Credential,
    pub class_id: DocId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(request: CreateStudentRequest, school_id: &str, password: Credential) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            full_name: request.full_name,
            student_id: generate_code(CodeKind::Student),
            school_id: school_id.to_string(),
            email: request.email,
            password,
            class_id: request.class_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Student {
    const COLLECTION: &'static str = "students";
    const UNIQUE_FIELDS: &'static [&'static str] = &["studentId", "email"];

    fn id(&self) -> &DocId {
        &self.id
    }
}

impl IdentityRecord for Student {
    fn credential(&self) -> &Credential {
        &self.password
    }

    fn set_credential(&mut self, credential: Credential) {
        self.password = credential;
    }
}
