//! Postgres-backed document store.
//!
//! Each collection is one table of `(id uuid primary key, doc jsonb)`;
//! assessment rows key on their composite (batch, course, student) identity
//! so the bulk upsert is idempotent at the storage level. All queries are
//! runtime-bound; field lookups go through jsonb operators on the camelCase
//! document keys.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    Account, AdminProfile, AssessmentRow, AttendanceRecord, Campus, Coordinator, Course, Document,
    LessonPlan, Notification, Student, Teacher,
};

use super::{
    AccountRepo, AdminRepo, AssessmentRepo, AttendanceRepo, CampusRepo, CoordinatorRepo,
    CourseRepo, DocumentRepo, LessonPlanRepo, NotificationRepo, StoreError, StoreResult,
    StudentRepo, TeacherRepo,
};

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS accounts (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS admin_profiles (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS coordinators (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS teachers (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS students (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS campuses (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS courses (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS attendance (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS assessment_rows (
        batch_id uuid NOT NULL,
        course uuid NOT NULL,
        student uuid NOT NULL,
        doc jsonb NOT NULL,
        PRIMARY KEY (batch_id, course, student)
    )",
    "CREATE TABLE IF NOT EXISTS documents (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS lesson_plans (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS notifications (id uuid PRIMARY KEY, doc jsonb NOT NULL)",
    "CREATE UNIQUE INDEX IF NOT EXISTS accounts_email ON accounts ((doc->>'email'))",
    "CREATE UNIQUE INDEX IF NOT EXISTS campuses_name ON campuses ((doc->>'name'))",
    "CREATE UNIQUE INDEX IF NOT EXISTS courses_code ON courses ((doc->>'code'))",
    "CREATE UNIQUE INDEX IF NOT EXISTS students_cnic ON students ((doc->>'cnic'))",
];

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = &crate::config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(db.connection_timeout_secs))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create collections and unique indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for ddl in MIGRATIONS {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::info!("store migrations applied");
        Ok(())
    }

    async fn fetch_one_doc<T: DeserializeOwned>(
        &self,
        sql: &str,
        bind: impl for<'q> FnOnce(PgQuery<'q>) -> PgQuery<'q> + Send,
    ) -> StoreResult<Option<T>> {
        let row = bind(sqlx::query(sql)).fetch_optional(&self.pool).await?;
        row.map(|r| from_doc(&r)).transpose()
    }

    async fn fetch_docs<T: DeserializeOwned>(
        &self,
        sql: &str,
        bind: impl for<'q> FnOnce(PgQuery<'q>) -> PgQuery<'q> + Send,
    ) -> StoreResult<Vec<T>> {
        let rows = bind(sqlx::query(sql)).fetch_all(&self.pool).await?;
        rows.iter().map(from_doc).collect()
    }

    async fn put_doc(&self, sql: &str, id: Uuid, doc: &impl Serialize) -> StoreResult<()> {
        sqlx::query(sql)
            .bind(id)
            .bind(serde_json::to_value(doc)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_id(&self, sql: &str, id: Uuid) -> StoreResult<()> {
        sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

fn from_doc<T: DeserializeOwned>(row: &PgRow) -> StoreResult<T> {
    let doc: serde_json::Value = row.try_get("doc").map_err(StoreError::Sqlx)?;
    Ok(serde_json::from_value(doc)?)
}

fn uuid_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

#[async_trait]
impl AccountRepo for PostgresStore {
    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        self.fetch_one_doc("SELECT doc FROM accounts WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let email = email.trim().to_lowercase();
        self.fetch_one_doc("SELECT doc FROM accounts WHERE doc->>'email' = $1", |q| {
            q.bind(email)
        })
        .await
    }

    async fn insert_account(&self, account: &Account) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO accounts (id, doc) VALUES ($1, $2)",
            account.id,
            account,
        )
        .await
    }

    async fn update_account(&self, account: &Account) -> StoreResult<()> {
        self.put_doc(
            "UPDATE accounts SET doc = $2 WHERE id = $1",
            account.id,
            account,
        )
        .await
    }

    async fn delete_account(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("DELETE FROM accounts WHERE id = $1", id).await
    }
}

#[async_trait]
impl AdminRepo for PostgresStore {
    async fn admin_by_account(&self, account: Uuid) -> StoreResult<Option<AdminProfile>> {
        self.fetch_one_doc(
            "SELECT doc FROM admin_profiles WHERE doc->>'account' = $1",
            |q| q.bind(account.to_string()),
        )
        .await
    }

    async fn insert_admin(&self, admin: &AdminProfile) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO admin_profiles (id, doc) VALUES ($1, $2)",
            admin.id,
            admin,
        )
        .await
    }
}

#[async_trait]
impl CoordinatorRepo for PostgresStore {
    async fn coordinator(&self, id: Uuid) -> StoreResult<Option<Coordinator>> {
        self.fetch_one_doc("SELECT doc FROM coordinators WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn coordinator_by_account(&self, account: Uuid) -> StoreResult<Option<Coordinator>> {
        self.fetch_one_doc(
            "SELECT doc FROM coordinators WHERE doc->>'account' = $1",
            |q| q.bind(account.to_string()),
        )
        .await
    }

    async fn insert_coordinator(&self, coordinator: &Coordinator) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO coordinators (id, doc) VALUES ($1, $2)",
            coordinator.id,
            coordinator,
        )
        .await
    }

    async fn update_coordinator(&self, coordinator: &Coordinator) -> StoreResult<()> {
        self.put_doc(
            "UPDATE coordinators SET doc = $2 WHERE id = $1",
            coordinator.id,
            coordinator,
        )
        .await
    }

    async fn delete_coordinator(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("DELETE FROM coordinators WHERE id = $1", id).await
    }

    async fn list_coordinators(&self) -> StoreResult<Vec<Coordinator>> {
        self.fetch_docs("SELECT doc FROM coordinators ORDER BY doc->>'createdAt' DESC", |q| q)
            .await
    }
}

#[async_trait]
impl TeacherRepo for PostgresStore {
    async fn teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>> {
        self.fetch_one_doc("SELECT doc FROM teachers WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn teacher_by_account(&self, account: Uuid) -> StoreResult<Option<Teacher>> {
        self.fetch_one_doc("SELECT doc FROM teachers WHERE doc->>'account' = $1", |q| {
            q.bind(account.to_string())
        })
        .await
    }

    async fn insert_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO teachers (id, doc) VALUES ($1, $2)",
            teacher.id,
            teacher,
        )
        .await
    }

    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        self.put_doc(
            "UPDATE teachers SET doc = $2 WHERE id = $1",
            teacher.id,
            teacher,
        )
        .await
    }

    async fn delete_teacher(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("DELETE FROM teachers WHERE id = $1", id).await
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        self.fetch_docs("SELECT doc FROM teachers ORDER BY doc->>'createdAt' DESC", |q| q)
            .await
    }

    async fn teachers_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Teacher>> {
        self.fetch_docs(
            "SELECT doc FROM teachers WHERE doc->'campuses' @> to_jsonb($1::text)",
            |q| q.bind(campus.to_string()),
        )
        .await
    }
}

#[async_trait]
impl StudentRepo for PostgresStore {
    async fn student(&self, id: Uuid) -> StoreResult<Option<Student>> {
        self.fetch_one_doc("SELECT doc FROM students WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn student_by_account(&self, account: Uuid) -> StoreResult<Option<Student>> {
        self.fetch_one_doc("SELECT doc FROM students WHERE doc->>'account' = $1", |q| {
            q.bind(account.to_string())
        })
        .await
    }

    async fn student_by_cnic(&self, cnic: &str) -> StoreResult<Option<Student>> {
        self.fetch_one_doc("SELECT doc FROM students WHERE doc->>'cnic' = $1", |q| {
            q.bind(cnic.to_string())
        })
        .await
    }

    async fn students(&self, ids: &[Uuid]) -> StoreResult<Vec<Student>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.fetch_docs("SELECT doc FROM students WHERE id = ANY($1)", |q| {
            q.bind(ids.to_vec())
        })
        .await
    }

    async fn insert_student(&self, student: &Student) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO students (id, doc) VALUES ($1, $2)",
            student.id,
            student,
        )
        .await
    }

    async fn update_student(&self, student: &Student) -> StoreResult<()> {
        self.put_doc(
            "UPDATE students SET doc = $2 WHERE id = $1",
            student.id,
            student,
        )
        .await
    }

    async fn delete_student(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("DELETE FROM students WHERE id = $1", id).await
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        self.fetch_docs("SELECT doc FROM students ORDER BY doc->>'createdAt' DESC", |q| q)
            .await
    }

    async fn students_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Student>> {
        self.fetch_docs("SELECT doc FROM students WHERE doc->>'campus' = $1", |q| {
            q.bind(campus.to_string())
        })
        .await
    }
}

#[async_trait]
impl CampusRepo for PostgresStore {
    async fn campus(&self, id: Uuid) -> StoreResult<Option<Campus>> {
        self.fetch_one_doc("SELECT doc FROM campuses WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn campus_by_name(&self, name: &str) -> StoreResult<Option<Campus>> {
        self.fetch_one_doc("SELECT doc FROM campuses WHERE doc->>'name' = $1", |q| {
            q.bind(name.to_string())
        })
        .await
    }

    async fn insert_campus(&self, campus: &Campus) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO campuses (id, doc) VALUES ($1, $2)",
            campus.id,
            campus,
        )
        .await
    }

    async fn update_campus(&self, campus: &Campus) -> StoreResult<()> {
        self.put_doc(
            "UPDATE campuses SET doc = $2 WHERE id = $1",
            campus.id,
            campus,
        )
        .await
    }

    async fn delete_campus(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("DELETE FROM campuses WHERE id = $1", id).await
    }

    async fn list_campuses(&self) -> StoreResult<Vec<Campus>> {
        self.fetch_docs("SELECT doc FROM campuses ORDER BY doc->>'createdAt' DESC", |q| q)
            .await
    }
}

#[async_trait]
impl CourseRepo for PostgresStore {
    async fn course(&self, id: Uuid) -> StoreResult<Option<Course>> {
        self.fetch_one_doc("SELECT doc FROM courses WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn course_by_code(&self, code: &str) -> StoreResult<Option<Course>> {
        self.fetch_one_doc("SELECT doc FROM courses WHERE doc->>'code' = $1", |q| {
            q.bind(code.to_string())
        })
        .await
    }

    async fn courses(&self, ids: &[Uuid]) -> StoreResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.fetch_docs("SELECT doc FROM courses WHERE id = ANY($1)", |q| {
            q.bind(ids.to_vec())
        })
        .await
    }

    async fn insert_course(&self, course: &Course) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO courses (id, doc) VALUES ($1, $2)",
            course.id,
            course,
        )
        .await
    }

    async fn update_course(&self, course: &Course) -> StoreResult<()> {
        self.put_doc(
            "UPDATE courses SET doc = $2 WHERE id = $1",
            course.id,
            course,
        )
        .await
    }

    async fn delete_course(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("DELETE FROM courses WHERE id = $1", id).await
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        self.fetch_docs("SELECT doc FROM courses ORDER BY doc->>'createdAt' DESC", |q| q)
            .await
    }

    async fn courses_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Course>> {
        self.fetch_docs("SELECT doc FROM courses WHERE doc->>'campus' = $1", |q| {
            q.bind(campus.to_string())
        })
        .await
    }

    async fn courses_by_teacher(&self, teacher: Uuid) -> StoreResult<Vec<Course>> {
        self.fetch_docs(
            "SELECT doc FROM courses WHERE doc->'teachers' @> to_jsonb($1::text)",
            |q| q.bind(teacher.to_string()),
        )
        .await
    }
}

#[async_trait]
impl AttendanceRepo for PostgresStore {
    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO attendance (id, doc) VALUES ($1, $2)",
            record.id,
            record,
        )
        .await
    }

    async fn insert_attendance_many(&self, records: &[AttendanceRecord]) -> StoreResult<()> {
        for record in records {
            self.insert_attendance(record).await?;
        }
        Ok(())
    }

    async fn attendance_by_course(&self, course: Uuid) -> StoreResult<Vec<AttendanceRecord>> {
        self.fetch_docs(
            "SELECT doc FROM attendance WHERE doc->>'course' = $1 ORDER BY doc->>'date' DESC",
            |q| q.bind(course.to_string()),
        )
        .await
    }

    async fn attendance_by_student(&self, student: Uuid) -> StoreResult<Vec<AttendanceRecord>> {
        self.fetch_docs(
            "SELECT doc FROM attendance WHERE doc->>'student' = $1 ORDER BY doc->>'date' DESC",
            |q| q.bind(student.to_string()),
        )
        .await
    }

    async fn count_attendance_by_courses(&self, courses: &[Uuid]) -> StoreResult<u64> {
        if courses.is_empty() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT COUNT(*) AS n FROM attendance WHERE doc->>'course' = ANY($1)")
            .bind(uuid_strings(courses))
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get("n").map_err(StoreError::Sqlx)?;
        Ok(n as u64)
    }
}

#[async_trait]
impl AssessmentRepo for PostgresStore {
    async fn upsert_assessment_rows(&self, rows: &[AssessmentRow]) -> StoreResult<()> {
        for row in rows {
            sqlx::query(
                "INSERT INTO assessment_rows (batch_id, course, student, doc)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (batch_id, course, student) DO UPDATE SET doc = EXCLUDED.doc",
            )
            .bind(row.batch_id)
            .bind(row.course)
            .bind(row.student)
            .bind(serde_json::to_value(row)?)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn assessment_batch(&self, batch_id: Uuid) -> StoreResult<Vec<AssessmentRow>> {
        self.fetch_docs("SELECT doc FROM assessment_rows WHERE batch_id = $1", |q| {
            q.bind(batch_id)
        })
        .await
    }

    async fn assessment_batch_sample(&self, batch_id: Uuid) -> StoreResult<Option<AssessmentRow>> {
        self.fetch_one_doc(
            "SELECT doc FROM assessment_rows WHERE batch_id = $1 LIMIT 1",
            |q| q.bind(batch_id),
        )
        .await
    }

    async fn assessments_by_course(&self, course: Uuid) -> StoreResult<Vec<AssessmentRow>> {
        self.fetch_docs(
            "SELECT doc FROM assessment_rows WHERE course = $1 ORDER BY doc->>'date' DESC",
            |q| q.bind(course),
        )
        .await
    }

    async fn assessments_by_student(&self, student: Uuid) -> StoreResult<Vec<AssessmentRow>> {
        self.fetch_docs(
            "SELECT doc FROM assessment_rows WHERE student = $1 ORDER BY doc->>'date' DESC",
            |q| q.bind(student),
        )
        .await
    }

    async fn delete_assessment_batch(&self, batch_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM assessment_rows WHERE batch_id = $1")
            .bind(batch_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_assessment_row(&self, batch_id: Uuid, student: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM assessment_rows WHERE batch_id = $1 AND student = $2")
            .bind(batch_id)
            .bind(student)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DocumentRepo for PostgresStore {
    async fn document(&self, id: Uuid) -> StoreResult<Option<Document>> {
        self.fetch_one_doc("SELECT doc FROM documents WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn insert_document(&self, document: &Document) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO documents (id, doc) VALUES ($1, $2)",
            document.id,
            document,
        )
        .await
    }

    async fn update_document(&self, document: &Document) -> StoreResult<()> {
        self.put_doc(
            "UPDATE documents SET doc = $2 WHERE id = $1",
            document.id,
            document,
        )
        .await
    }

    async fn documents_by_student(&self, student: Uuid) -> StoreResult<Vec<Document>> {
        self.fetch_docs("SELECT doc FROM documents WHERE doc->>'student' = $1", |q| {
            q.bind(student.to_string())
        })
        .await
    }
}

#[async_trait]
impl LessonPlanRepo for PostgresStore {
    async fn lesson_plan(&self, id: Uuid) -> StoreResult<Option<LessonPlan>> {
        self.fetch_one_doc("SELECT doc FROM lesson_plans WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn insert_lesson_plan(&self, plan: &LessonPlan) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO lesson_plans (id, doc) VALUES ($1, $2)",
            plan.id,
            plan,
        )
        .await
    }

    async fn update_lesson_plan(&self, plan: &LessonPlan) -> StoreResult<()> {
        self.put_doc(
            "UPDATE lesson_plans SET doc = $2 WHERE id = $1",
            plan.id,
            plan,
        )
        .await
    }

    async fn list_active_lesson_plans(&self) -> StoreResult<Vec<LessonPlan>> {
        self.fetch_docs(
            "SELECT doc FROM lesson_plans WHERE (doc->>'isActive')::boolean
             ORDER BY doc->>'savedAt' DESC",
            |q| q,
        )
        .await
    }
}

#[async_trait]
impl NotificationRepo for PostgresStore {
    async fn notification(&self, id: Uuid) -> StoreResult<Option<Notification>> {
        self.fetch_one_doc("SELECT doc FROM notifications WHERE id = $1", |q| q.bind(id))
            .await
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.put_doc(
            "INSERT INTO notifications (id, doc) VALUES ($1, $2)",
            notification.id,
            notification,
        )
        .await
    }

    async fn list_notifications(&self) -> StoreResult<Vec<Notification>> {
        self.fetch_docs(
            "SELECT doc FROM notifications ORDER BY doc->>'createdAt' DESC",
            |q| q,
        )
        .await
    }
}
