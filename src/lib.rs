//! schooldesk - school administration records with validated writes
//!
//! Admins, teachers, students, classes, subjects, sessions, terms and
//! scores, stored as documents. Every write runs through
//! `validate → check references / policy → transform identity fields → persist`.

pub mod auth;
pub mod cli;
pub mod config;
pub mod ids;
pub mod model;
pub mod observability;
pub mod school;
pub mod store;
pub mod validation;
