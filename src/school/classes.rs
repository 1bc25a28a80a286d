//! Class operations

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::auth::CredentialHasher;
use crate::model::{Class, Student, Teacher};
use crate::observability::{Event, Logger};
use crate::store::{DocumentStore, Query};
use crate::validation::{
    validate_assign_teacher, validate_create_class, validate_list_students,
    validate_list_teacher_classes,
};

use super::errors::SchoolResult;
use super::{audited, SchoolService};

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: u64,
    pub limit: u64,
    /// Matching records across all pages
    pub total: usize,
}

impl<S: DocumentStore, H: CredentialHasher> SchoolService<S, H> {
    /// Create a class owned by a teacher of the same school.
    pub fn create_class(&self, school_id: &str, payload: &Value) -> SchoolResult<Class> {
        audited(Event::ClassCreated, self.run_create_class(school_id, payload))
    }

    fn run_create_class(&self, school_id: &str, payload: &Value) -> SchoolResult<Class> {
        let request = validate_create_class(payload)?;
        self.require_in_school::<Teacher>(&request.teacher_id, school_id)?;
        let class = Class::new(request.name, school_id, request.teacher_id);

        self.store.insert(&class)?;

        Logger::info(
            Event::ClassCreated.as_str(),
            &[
                ("class_id", class.id.as_str()),
                ("school_id", school_id),
                ("teacher", class.teacher.as_str()),
            ],
        );
        Ok(class)
    }

    /// Hand a class over to another teacher.
    pub fn assign_teacher(&self, school_id: &str, payload: &Value) -> SchoolResult<Class> {
        audited(Event::ClassTeacherAssigned, self.run_assign_teacher(school_id, payload))
    }

    fn run_assign_teacher(&self, school_id: &str, payload: &Value) -> SchoolResult<Class> {
        let request = validate_assign_teacher(payload)?;
        let mut class: Class = self.require_in_school(&request.class_id, school_id)?;
        self.require_in_school::<Teacher>(&request.teacher_id, school_id)?;

        class.teacher = request.teacher_id;
        class.updated_at = Utc::now();
        self.store.update(&class)?;

        Logger::info(
            Event::ClassTeacherAssigned.as_str(),
            &[("class_id", class.id.as_str()), ("teacher", class.teacher.as_str())],
        );
        Ok(class)
    }

    /// Students enrolled in a class, paged in enrollment order.
    pub fn list_students(&self, school_id: &str, payload: &Value) -> SchoolResult<Page<Student>> {
        let request = validate_list_students(payload)?;
        self.require_in_school::<Class>(&request.class_id, school_id)?;

        let page = request.page.unwrap_or(1);
        let limit = self.pagination.resolve(request.limit);
        let offset = (page - 1).saturating_mul(limit);

        let query = Query::new()
            .eq("classId", request.class_id.as_str())
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .limit(usize::try_from(limit).unwrap_or(usize::MAX));

        let items = self.store.find_many::<Student>(&query)?;
        let total = self.store.count::<Student>(&query.unpaged())?;

        Ok(Page {
            items,
            page,
            limit,
            total,
        })
    }

    /// Classes owned by a teacher.
    pub fn list_classes_for_teacher(
        &self,
        school_id: &str,
        payload: &Value,
    ) -> SchoolResult<Vec<Class>> {
        let request = validate_list_teacher_classes(payload)?;
        self.require_in_school::<Teacher>(&request.teacher_id, school_id)?;

        let query = Query::new()
            .eq("teacher", request.teacher_id.as_str())
            .eq("schoolId", school_id);
        Ok(self.store.find_many(&query)?)
    }
}
