//! Sessions, terms and the scoring switch

use chrono::Utc;
use serde_json::Value;

use crate::auth::CredentialHasher;
use crate::model::{Session, Term};
use crate::observability::{Event, Logger};
use crate::store::{DocumentStore, WriteBatch};
use crate::validation::{validate_create_session, validate_create_term, validate_toggle_scoring};

use super::errors::SchoolResult;
use super::{audited, SchoolService};

impl<S: DocumentStore, H: CredentialHasher> SchoolService<S, H> {
    pub fn create_session(&self, payload: &Value) -> SchoolResult<Session> {
        audited(Event::SessionCreated, self.run_create_session(payload))
    }

    fn run_create_session(&self, payload: &Value) -> SchoolResult<Session> {
        let request = validate_create_session(payload)?;
        let session = Session::new(request.year);
        self.store.insert(&session)?;

        Logger::info(
            Event::SessionCreated.as_str(),
            &[("session_id", session.id.as_str()), ("year", session.year.as_str())],
        );
        Ok(session)
    }

    /// Create a term with scoring disabled and append it to its session.
    ///
    /// The term and the session's updated term list are written together.
    pub fn create_term(&self, payload: &Value) -> SchoolResult<Term> {
        audited(Event::TermCreated, self.run_create_term(payload))
    }

    fn run_create_term(&self, payload: &Value) -> SchoolResult<Term> {
        let request = validate_create_term(payload)?;
        let mut session: Session = self.require(&request.session_id)?;

        let term = Term::new(request.name, request.session_id);
        session.push_term(term.id.clone());

        let mut batch = WriteBatch::new();
        batch.insert(&term)?;
        batch.update(&session)?;
        self.store.write_batch(&batch)?;

        Logger::info(
            Event::TermCreated.as_str(),
            &[("term_id", term.id.as_str()), ("session_id", session.id.as_str())],
        );
        Ok(term)
    }

    /// Switch score entry on or off for a term.
    pub fn toggle_scoring(&self, payload: &Value) -> SchoolResult<Term> {
        audited(Event::TermScoringToggled, self.run_toggle_scoring(payload))
    }

    fn run_toggle_scoring(&self, payload: &Value) -> SchoolResult<Term> {
        let request = validate_toggle_scoring(payload)?;
        let mut term: Term = self.require(&request.term_id)?;

        term.is_scoring_enabled = request.is_scoring_enabled;
        term.updated_at = Utc::now();
        self.store.update(&term)?;

        Logger::info(
            Event::TermScoringToggled.as_str(),
            &[
                ("term_id", term.id.as_str()),
                (
                    "is_scoring_enabled",
                    if term.is_scoring_enabled { "true" } else { "false" },
                ),
            ],
        );
        Ok(term)
    }
}
