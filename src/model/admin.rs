//! # School Administrators
//!
//! One admin per school. Registering an admin is what creates the school:
//! the generated `schoolId` scopes every teacher, student and class.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Credential, IdentityRecord};
use crate::ids::{generate_code, CodeKind, DocId};
use crate::store::Document;
use crate::validation::RegisterAdminRequest;

/// Admin record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Store identifier
    pub id: DocId,

    pub full_name: String,

    pub school_name: String,

    /// Login email (unique)
    pub admin_email: String,

    /// School contact email (unique)
    pub school_email: String,

    pub school_address: String,

    /// Argon2id hash (never plaintext)
    pub password: Credential,

    /// Generated school code, `SCH-XXXXXXXX` (unique)
    pub school_id: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Build a new admin from a validated registration and an
    /// already-hashed credential.
    pub fn new(request: RegisterAdminRequest, password: Credential) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            full_name: request.full_name,
            school_name: request.school_name,
            admin_email: request.admin_email,
            school_email: request.school_email,
            school_address: request.school_address,
            password,
            school_id: generate_code(CodeKind::School),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Admin {
    const COLLECTION: &'static str = "admins";
    const UNIQUE_FIELDS: &'static [&'static str] = &["adminEmail", "schoolEmail", "schoolId"];

    fn id(&self) -> &DocId {
        &self.id
    }
}

impl IdentityRecord for Admin {
    fn credential(&self) -> &Credential {
        &self.password
    }

    fn set_credential(&mut self, credential: Credential) {
        self.password = credential;
    }
}
