//! Persistence layer: per-entity repository traits over a document store.
//!
//! Workflows receive these as injected interfaces (one `Arc<dyn Store>`
//! built at process start) and never reach for a global connection. Two
//! implementations exist: a Postgres JSONB store for deployment and an
//! in-memory store for tests and local development.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Account, AdminProfile, AssessmentRow, AttendanceRecord, Campus, Coordinator, Course, Document,
    LessonPlan, Notification, Student, Teacher,
};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// One import bringing every repository trait into scope; `dyn Store`
/// callers need the supertraits visible for method resolution.
pub mod prelude {
    pub use super::{
        AccountRepo, AdminRepo, AssessmentRepo, AttendanceRepo, CampusRepo, CoordinatorRepo,
        CourseRepo, DocumentRepo, LessonPlanRepo, NotificationRepo, Store, StudentRepo,
        TeacherRepo,
    };
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>>;
    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn insert_account(&self, account: &Account) -> StoreResult<()>;
    async fn update_account(&self, account: &Account) -> StoreResult<()>;
    async fn delete_account(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait AdminRepo: Send + Sync {
    async fn admin_by_account(&self, account: Uuid) -> StoreResult<Option<AdminProfile>>;
    async fn insert_admin(&self, admin: &AdminProfile) -> StoreResult<()>;
}

#[async_trait]
pub trait CoordinatorRepo: Send + Sync {
    async fn coordinator(&self, id: Uuid) -> StoreResult<Option<Coordinator>>;
    async fn coordinator_by_account(&self, account: Uuid) -> StoreResult<Option<Coordinator>>;
    async fn insert_coordinator(&self, coordinator: &Coordinator) -> StoreResult<()>;
    async fn update_coordinator(&self, coordinator: &Coordinator) -> StoreResult<()>;
    async fn delete_coordinator(&self, id: Uuid) -> StoreResult<()>;
    async fn list_coordinators(&self) -> StoreResult<Vec<Coordinator>>;
}

#[async_trait]
pub trait TeacherRepo: Send + Sync {
    async fn teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>>;
    async fn teacher_by_account(&self, account: Uuid) -> StoreResult<Option<Teacher>>;
    async fn insert_teacher(&self, teacher: &Teacher) -> StoreResult<()>;
    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()>;
    async fn delete_teacher(&self, id: Uuid) -> StoreResult<()>;
    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>>;
    async fn teachers_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Teacher>>;
}

#[async_trait]
pub trait StudentRepo: Send + Sync {
    async fn student(&self, id: Uuid) -> StoreResult<Option<Student>>;
    async fn student_by_account(&self, account: Uuid) -> StoreResult<Option<Student>>;
    async fn student_by_cnic(&self, cnic: &str) -> StoreResult<Option<Student>>;
    /// Fetch the subset of `ids` that exist. Callers diff against the request
    /// to report missing ids.
    async fn students(&self, ids: &[Uuid]) -> StoreResult<Vec<Student>>;
    async fn insert_student(&self, student: &Student) -> StoreResult<()>;
    async fn update_student(&self, student: &Student) -> StoreResult<()>;
    async fn delete_student(&self, id: Uuid) -> StoreResult<()>;
    async fn list_students(&self) -> StoreResult<Vec<Student>>;
    async fn students_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Student>>;
}

#[async_trait]
pub trait CampusRepo: Send + Sync {
    async fn campus(&self, id: Uuid) -> StoreResult<Option<Campus>>;
    async fn campus_by_name(&self, name: &str) -> StoreResult<Option<Campus>>;
    async fn insert_campus(&self, campus: &Campus) -> StoreResult<()>;
    async fn update_campus(&self, campus: &Campus) -> StoreResult<()>;
    async fn delete_campus(&self, id: Uuid) -> StoreResult<()>;
    async fn list_campuses(&self) -> StoreResult<Vec<Campus>>;
}

#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn course(&self, id: Uuid) -> StoreResult<Option<Course>>;
    async fn course_by_code(&self, code: &str) -> StoreResult<Option<Course>>;
    async fn courses(&self, ids: &[Uuid]) -> StoreResult<Vec<Course>>;
    async fn insert_course(&self, course: &Course) -> StoreResult<()>;
    async fn update_course(&self, course: &Course) -> StoreResult<()>;
    async fn delete_course(&self, id: Uuid) -> StoreResult<()>;
    async fn list_courses(&self) -> StoreResult<Vec<Course>>;
    async fn courses_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Course>>;
    async fn courses_by_teacher(&self, teacher: Uuid) -> StoreResult<Vec<Course>>;
}

#[async_trait]
pub trait AttendanceRepo: Send + Sync {
    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()>;
    async fn insert_attendance_many(&self, records: &[AttendanceRecord]) -> StoreResult<()>;
    /// Records for one course, newest date first.
    async fn attendance_by_course(&self, course: Uuid) -> StoreResult<Vec<AttendanceRecord>>;
    async fn attendance_by_student(&self, student: Uuid) -> StoreResult<Vec<AttendanceRecord>>;
    async fn count_attendance_by_courses(&self, courses: &[Uuid]) -> StoreResult<u64>;
}

#[async_trait]
pub trait AssessmentRepo: Send + Sync {
    /// Bulk idempotent upsert keyed by (batch_id, course, student).
    async fn upsert_assessment_rows(&self, rows: &[AssessmentRow]) -> StoreResult<()>;
    async fn assessment_batch(&self, batch_id: Uuid) -> StoreResult<Vec<AssessmentRow>>;
    /// Any one row of the batch; carries the batch's shared meta.
    async fn assessment_batch_sample(&self, batch_id: Uuid) -> StoreResult<Option<AssessmentRow>>;
    async fn assessments_by_course(&self, course: Uuid) -> StoreResult<Vec<AssessmentRow>>;
    async fn assessments_by_student(&self, student: Uuid) -> StoreResult<Vec<AssessmentRow>>;
    async fn delete_assessment_batch(&self, batch_id: Uuid) -> StoreResult<u64>;
    async fn delete_assessment_row(&self, batch_id: Uuid, student: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait DocumentRepo: Send + Sync {
    async fn document(&self, id: Uuid) -> StoreResult<Option<Document>>;
    async fn insert_document(&self, document: &Document) -> StoreResult<()>;
    async fn update_document(&self, document: &Document) -> StoreResult<()>;
    async fn documents_by_student(&self, student: Uuid) -> StoreResult<Vec<Document>>;
}

#[async_trait]
pub trait LessonPlanRepo: Send + Sync {
    async fn lesson_plan(&self, id: Uuid) -> StoreResult<Option<LessonPlan>>;
    async fn insert_lesson_plan(&self, plan: &LessonPlan) -> StoreResult<()>;
    async fn update_lesson_plan(&self, plan: &LessonPlan) -> StoreResult<()>;
    /// Active plans, most recently saved first.
    async fn list_active_lesson_plans(&self) -> StoreResult<Vec<LessonPlan>>;
}

#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn notification(&self, id: Uuid) -> StoreResult<Option<Notification>>;
    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()>;
    /// All notifications, newest first. Visibility filtering happens in the
    /// authorization matrix, not here.
    async fn list_notifications(&self) -> StoreResult<Vec<Notification>>;
}

/// Aggregate store handed to workflows as one injected dependency.
pub trait Store:
    AccountRepo
    + AdminRepo
    + CoordinatorRepo
    + TeacherRepo
    + StudentRepo
    + CampusRepo
    + CourseRepo
    + AttendanceRepo
    + AssessmentRepo
    + DocumentRepo
    + LessonPlanRepo
    + NotificationRepo
{
}

impl<T> Store for T where
    T: AccountRepo
        + AdminRepo
        + CoordinatorRepo
        + TeacherRepo
        + StudentRepo
        + CampusRepo
        + CourseRepo
        + AttendanceRepo
        + AssessmentRepo
        + DocumentRepo
        + LessonPlanRepo
        + NotificationRepo
{
}
