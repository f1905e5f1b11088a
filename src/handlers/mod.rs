//! HTTP handlers. Thin: deserialize, check the actor's role, delegate to a
//! workflow, wrap in the response envelope.

pub mod admin;
pub mod assessments;
pub mod attendance;
pub mod auth;
pub mod coordinator;
pub mod documents;
pub mod lesson_plans;
pub mod notifications;
pub mod student;
pub mod teacher;

use std::sync::Arc;

use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}
