//! Admin, teacher and student validators
//!
//! Plaintext passwords only live inside these request structs until the
//! identity write step hashes them.

use serde_json::Value;

use crate::auth::PasswordPolicy;
use crate::ids::DocId;

use super::errors::ValidationResult;
use super::rules::{FieldReader, Length};

const FULL_NAME: Length = Length { min: 3, max: 100 };
const SCHOOL_NAME: Length = Length { min: 3, max: 100 };
const ADDRESS: Length = Length { min: 3, max: 200 };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAdminRequest {
    pub full_name: String,
    pub school_name: String,
    pub admin_email: String,
    pub school_email: String,
    pub school_address: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeacherRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStudentRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub password: String,
    pub class_id: DocId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAdminRequest {
    pub full_name: Option<String>,
    pub school_name: Option<String>,
    pub admin_email: Option<String>,
    pub school_email: Option<String>,
    pub school_address: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTeacherRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStudentRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub class_id: Option<DocId>,
}

const ADMIN_FIELDS: &[&str] = &[
    "fullName",
    "schoolName",
    "adminEmail",
    "schoolEmail",
    "schoolAddress",
    "password",
];

pub fn validate_register_admin(
    payload: &Value,
    policy: &PasswordPolicy,
) -> ValidationResult<RegisterAdminRequest> {
    let mut fields = FieldReader::new(payload, ADMIN_FIELDS);
    let full_name = fields.required_bounded("fullName", FULL_NAME);
    let school_name = fields.required_bounded("schoolName", SCHOOL_NAME);
    let admin_email = fields.required_email("adminEmail");
    let school_email = fields.required_email("schoolEmail");
    let school_address = fields.required_bounded("schoolAddress", ADDRESS);
    let password = fields.required_password("password", policy);

    match (full_name, school_name, admin_email, school_email, school_address, password) {
        (
            Some(full_name),
            Some(school_name),
            Some(admin_email),
            Some(school_email),
            Some(school_address),
            Some(password),
        ) if fields.is_clean() => Ok(RegisterAdminRequest {
            full_name,
            school_name,
            admin_email,
            school_email,
            school_address,
            password,
        }),
        _ => Err(fields.into_error()),
    }
}

pub fn validate_update_admin(
    payload: &Value,
    policy: &PasswordPolicy,
) -> ValidationResult<UpdateAdminRequest> {
    let mut fields = FieldReader::new(payload, ADMIN_FIELDS);
    fields.require_any(ADMIN_FIELDS);
    let request = UpdateAdminRequest {
        full_name: fields.optional_bounded("fullName", FULL_NAME),
        school_name: fields.optional_bounded("schoolName", SCHOOL_NAME),
        admin_email: fields.optional_email("adminEmail"),
        school_email: fields.optional_email("schoolEmail"),
        school_address: fields.optional_bounded("schoolAddress", ADDRESS),
        password: fields.optional_password("password", policy),
    };

    if fields.is_clean() {
        Ok(request)
    } else {
        Err(fields.into_error())
    }
}

pub fn validate_create_teacher(
    payload: &Value,
    policy: &PasswordPolicy,
) -> ValidationResult<CreateTeacherRequest> {
    let mut fields = FieldReader::new(payload, &["fullName", "email", "password"]);
    let full_name = fields.required_bounded("fullName", FULL_NAME);
    let email = fields.required_email("email");
    let password = fields.required_password("password", policy);

    match (full_name, email, password) {
        (Some(full_name), Some(email), Some(password)) if fields.is_clean() => {
            Ok(CreateTeacherRequest {
                full_name,
                email,
                password,
            })
        }
        _ => Err(fields.into_error()),
    }
}

pub fn validate_update_teacher(
    payload: &Value,
    policy: &PasswordPolicy,
) -> ValidationResult<UpdateTeacherRequest> {
    let allowed = ["fullName", "email", "password"];
    let mut fields = FieldReader::new(payload, &allowed);
    fields.require_any(&allowed);
    let request = UpdateTeacherRequest {
        full_name: fields.optional_bounded("fullName", FULL_NAME),
        email: fields.optional_email("email"),
        password: fields.optional_password("password", policy),
    };

    if fields.is_clean() {
        Ok(request)
    } else {
        Err(fields.into_error())
    }
}

/// `{ fullName, email?, password, classId }`
pub fn validate_create_student(
    payload: &Value,
    policy: &PasswordPolicy,
) -> ValidationResult<CreateStudentRequest> {
    let mut fields = FieldReader::new(payload, &["fullName", "email", "password", "classId"]);
    let full_name = fields.required_bounded("fullName", FULL_NAME);
    let email = fields.optional_email("email");
    let password = fields.required_password("password", policy);
    let class_id = fields.required_string("classId");

    match (full_name, password, class_id) {
        (Some(full_name), Some(password), Some(class_id)) if fields.is_clean() => {
            Ok(CreateStudentRequest {
                full_name,
                email,
                password,
                class_id: class_id.into(),
            })
        }
        _ => Err(fields.into_error()),
    }
}

pub fn validate_update_student(
    payload: &Value,
    policy: &PasswordPolicy,
) -> ValidationResult<UpdateStudentRequest> {
    let allowed = ["fullName", "email", "password", "classId"];
    let mut fields = FieldReader::new(payload, &allowed);
    fields.require_any(&allowed);
    let request = UpdateStudentRequest {
        full_name: fields.optional_bounded("fullName", FULL_NAME),
        email: fields.optional_email("email"),
        password: fields.optional_password("password", policy),
        class_id: fields.optional_string("classId").map(DocId::from),
    };

    if fields.is_clean() {
        Ok(request)
    } else {
        Err(fields.into_error())
    }
}
