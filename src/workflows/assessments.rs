//! Assessment batches.
//!
//! A batch is a set of per-student rows sharing a `batch_id`; there is no
//! separate batch document, so deleting the last row deletes the batch.
//! Writes are idempotent upserts on the (batch, course, student) composite
//! key; the creator stamp on an existing row is never overwritten.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::authz::{require_campus_scope, require_course_teacher};
use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::{AssessmentRow, Course, Student};
use crate::store::prelude::*;
use crate::types::{AssessmentType, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    pub student_id: Uuid,
    pub marks: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBatchInput {
    pub batch_id: Option<Uuid>,
    pub course_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub title: String,
    pub description: Option<String>,
    pub total_marks: f64,
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entries: Vec<EntryInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetaInput {
    #[serde(rename = "type")]
    pub kind: Option<AssessmentType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub total_marks: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMarksInput {
    pub entries: Vec<EntryInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub student_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub marks: f64,
    pub remarks: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetail {
    pub batch_id: Uuid,
    pub course_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub total_marks: f64,
    pub created_by_role: Role,
    pub created_count: usize,
    pub entries: Vec<BatchEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub title: String,
    pub description: Option<String>,
    pub total_marks: f64,
    pub date: DateTime<Utc>,
    pub created_by_role: Role,
    pub count: usize,
}

#[derive(Debug)]
pub struct UpsertOutcome {
    pub detail: BatchDetail,
    /// True when the batch id was generated here (201), false on update (200).
    pub created: bool,
}

/// Resolve write access to a course's assessments; for teacher actors this
/// also yields the teacher profile id used as the grader stamp.
async fn authorize_course_writer(
    store: &dyn Store,
    actor: &Actor,
    course: &Course,
) -> Result<Option<Uuid>, ApiError> {
    match actor.role {
        Role::Admin => Ok(None),
        Role::Coordinator => {
            require_campus_scope(actor.role, actor.campus, course.campus)?;
            Ok(None)
        }
        Role::Teacher => {
            let teacher = store
                .teacher_by_account(actor.account)
                .await?
                .ok_or_else(|| ApiError::internal("teacher profile missing"))?;
            require_course_teacher(course, teacher.id)?;
            Ok(Some(teacher.id))
        }
        Role::Student => Err(ApiError::forbidden("students cannot manage assessments")),
    }
}

fn validate_meta(title: &str, total_marks: f64) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    if !total_marks.is_finite() || total_marks < 1.0 {
        return Err(ApiError::validation("totalMarks must be a number of at least 1"));
    }
    Ok(())
}

fn clamp_marks(marks: f64, total: f64) -> f64 {
    if !marks.is_finite() {
        return 0.0;
    }
    marks.clamp(0.0, total)
}

/// Load every student in `ids`, failing with the full missing list before
/// anything is written.
async fn require_students(store: &dyn Store, ids: &[Uuid]) -> Result<Vec<Student>, ApiError> {
    let found = store.students(ids).await?;
    let missing: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|s| s.id == *id))
        .collect();
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(ApiError::not_found_with(
            "some students do not exist",
            json!({ "missingStudentIds": missing }),
        ))
    }
}

/// Create or update an assessment batch in one call.
pub async fn upsert_batch(
    store: &dyn Store,
    actor: &Actor,
    input: UpsertBatchInput,
) -> Result<UpsertOutcome, ApiError> {
    let course = store
        .course(input.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    let grader = authorize_course_writer(store, actor, &course).await?;

    validate_meta(&input.title, input.total_marks)?;

    // Explicit entries win; otherwise fall back to the course roster.
    let mut entries: Vec<EntryInput> = input.entries;
    if entries.is_empty() {
        if course.students.is_empty() {
            return Err(ApiError::validation(
                "no students provided and course roster is empty",
            ));
        }
        entries = course
            .students
            .iter()
            .map(|id| EntryInput {
                student_id: *id,
                marks: Some(0.0),
                remarks: Some(String::new()),
            })
            .collect();
    }

    // A student appears at most once per batch; first entry wins.
    let mut seen: Vec<Uuid> = Vec::new();
    entries.retain(|e| {
        if seen.contains(&e.student_id) {
            false
        } else {
            seen.push(e.student_id);
            true
        }
    });
    require_students(store, &seen).await?;

    let created = input.batch_id.is_none();
    let batch_id = input.batch_id.unwrap_or_else(Uuid::new_v4);
    let date = input.date.unwrap_or_else(Utc::now);

    let existing: HashMap<Uuid, AssessmentRow> = store
        .assessment_batch(batch_id)
        .await?
        .into_iter()
        .map(|r| (r.student, r))
        .collect();

    let rows: Vec<AssessmentRow> = entries
        .iter()
        .map(|entry| {
            let prior = existing.get(&entry.student_id);
            AssessmentRow {
                batch_id,
                course: course.id,
                student: entry.student_id,
                kind: input.kind,
                title: input.title.trim().to_string(),
                description: input.description.clone(),
                total_marks: input.total_marks,
                date,
                marks: clamp_marks(entry.marks.unwrap_or(0.0), input.total_marks),
                remarks: entry.remarks.clone().unwrap_or_default(),
                graded_by: grader.or_else(|| prior.and_then(|p| p.graded_by)),
                created_by: prior.map(|p| p.created_by).unwrap_or(actor.account),
                created_by_role: prior.map(|p| p.created_by_role).unwrap_or(actor.role),
            }
        })
        .collect();

    store.upsert_assessment_rows(&rows).await?;

    let detail = read_back_detail(store, batch_id, rows.len()).await?;
    Ok(UpsertOutcome { detail, created })
}

/// Patch the batch meta on every row.
pub async fn update_batch_meta(
    store: &dyn Store,
    actor: &Actor,
    batch_id: Uuid,
    input: UpdateMetaInput,
) -> Result<BatchDetail, ApiError> {
    let sample = store
        .assessment_batch_sample(batch_id)
        .await?
        .ok_or_else(|| ApiError::not_found("assessment batch not found"))?;
    let course = store
        .course(sample.course)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    authorize_course_writer(store, actor, &course).await?;

    let kind = input.kind.unwrap_or(sample.kind);
    let title = input.title.unwrap_or_else(|| sample.title.clone());
    let total_marks = input.total_marks.unwrap_or(sample.total_marks);
    validate_meta(&title, total_marks)?;

    let mut rows = store.assessment_batch(batch_id).await?;
    for row in &mut rows {
        row.kind = kind;
        row.title = title.trim().to_string();
        if let Some(description) = &input.description {
            row.description = Some(description.clone());
        }
        row.total_marks = total_marks;
        if let Some(date) = input.date {
            row.date = date;
        }
        row.marks = clamp_marks(row.marks, total_marks);
    }
    let count = rows.len();
    store.upsert_assessment_rows(&rows).await?;

    read_back_detail(store, batch_id, count).await
}

/// Bulk marks update. Students new to the batch inherit the meta of the
/// sampled row and are stamped with the invoking actor as creator.
pub async fn update_batch_marks(
    store: &dyn Store,
    actor: &Actor,
    batch_id: Uuid,
    input: UpdateMarksInput,
) -> Result<BatchDetail, ApiError> {
    let sample = store
        .assessment_batch_sample(batch_id)
        .await?
        .ok_or_else(|| ApiError::not_found("assessment batch not found"))?;
    let course = store
        .course(sample.course)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    let grader = authorize_course_writer(store, actor, &course).await?;

    if input.entries.is_empty() {
        return Err(ApiError::validation("entries must not be empty"));
    }
    let ids: Vec<Uuid> = input.entries.iter().map(|e| e.student_id).collect();
    require_students(store, &ids).await?;

    let existing: HashMap<Uuid, AssessmentRow> = store
        .assessment_batch(batch_id)
        .await?
        .into_iter()
        .map(|r| (r.student, r))
        .collect();

    let rows: Vec<AssessmentRow> = input
        .entries
        .iter()
        .map(|entry| match existing.get(&entry.student_id) {
            Some(prior) => {
                let mut row = prior.clone();
                if let Some(marks) = entry.marks {
                    row.marks = clamp_marks(marks, row.total_marks);
                }
                if let Some(remarks) = &entry.remarks {
                    row.remarks = remarks.clone();
                }
                row.graded_by = grader.or(row.graded_by);
                row
            }
            None => AssessmentRow {
                batch_id,
                course: sample.course,
                student: entry.student_id,
                kind: sample.kind,
                title: sample.title.clone(),
                description: sample.description.clone(),
                total_marks: sample.total_marks,
                date: sample.date,
                marks: clamp_marks(entry.marks.unwrap_or(0.0), sample.total_marks),
                remarks: entry.remarks.clone().unwrap_or_default(),
                graded_by: grader,
                created_by: actor.account,
                created_by_role: actor.role,
            },
        })
        .collect();

    let count = rows.len();
    store.upsert_assessment_rows(&rows).await?;

    read_back_detail(store, batch_id, count).await
}

/// Grouped batch summaries for one course, newest first.
pub async fn list_batches_by_course(
    store: &dyn Store,
    actor: &Actor,
    course_id: Uuid,
) -> Result<Vec<BatchSummary>, ApiError> {
    let course = store
        .course(course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    authorize_course_writer(store, actor, &course).await?;

    let rows = store.assessments_by_course(course_id).await?;
    let mut summaries: Vec<BatchSummary> = Vec::new();
    for row in rows {
        match summaries.iter_mut().find(|s| s.batch_id == row.batch_id) {
            Some(summary) => summary.count += 1,
            None => summaries.push(BatchSummary {
                batch_id: row.batch_id,
                kind: row.kind,
                title: row.title,
                description: row.description,
                total_marks: row.total_marks,
                date: row.date,
                created_by_role: row.created_by_role,
                count: 1,
            }),
        }
    }
    Ok(summaries)
}

pub async fn get_batch(
    store: &dyn Store,
    actor: &Actor,
    batch_id: Uuid,
) -> Result<BatchDetail, ApiError> {
    let sample = store
        .assessment_batch_sample(batch_id)
        .await?
        .ok_or_else(|| ApiError::not_found("assessment batch not found"))?;
    let course = store
        .course(sample.course)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    authorize_course_writer(store, actor, &course).await?;

    let rows = store.assessment_batch(batch_id).await?;
    let count = rows.len();
    build_detail(store, rows, count).await
}

pub async fn delete_batch(store: &dyn Store, actor: &Actor, batch_id: Uuid) -> Result<u64, ApiError> {
    let sample = store
        .assessment_batch_sample(batch_id)
        .await?
        .ok_or_else(|| ApiError::not_found("assessment batch not found"))?;
    let course = store
        .course(sample.course)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    authorize_course_writer(store, actor, &course).await?;

    Ok(store.delete_assessment_batch(batch_id).await?)
}

/// Remove one student's row. The batch is its rows, so removing the last row
/// removes the batch itself.
pub async fn delete_row(
    store: &dyn Store,
    actor: &Actor,
    batch_id: Uuid,
    student_id: Uuid,
) -> Result<usize, ApiError> {
    let sample = store
        .assessment_batch_sample(batch_id)
        .await?
        .ok_or_else(|| ApiError::not_found("assessment batch not found"))?;
    let course = store
        .course(sample.course)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    authorize_course_writer(store, actor, &course).await?;

    if !store.delete_assessment_row(batch_id, student_id).await? {
        return Err(ApiError::not_found("assessment row not found"));
    }
    let remaining = store.assessment_batch(batch_id).await?.len();
    Ok(remaining)
}

/// Per-student assessment history, used by the coordinator surface.
pub async fn list_by_student(
    store: &dyn Store,
    student_id: Uuid,
) -> Result<Vec<AssessmentRow>, ApiError> {
    Ok(store.assessments_by_student(student_id).await?)
}

async fn read_back_detail(
    store: &dyn Store,
    batch_id: Uuid,
    created_count: usize,
) -> Result<BatchDetail, ApiError> {
    let rows = store.assessment_batch(batch_id).await?;
    if rows.is_empty() {
        tracing::error!(batch = %batch_id, "batch read-back returned no rows after write");
        return Err(ApiError::internal("assessment batch write could not be read back"));
    }
    build_detail(store, rows, created_count).await
}

async fn build_detail(
    store: &dyn Store,
    rows: Vec<AssessmentRow>,
    created_count: usize,
) -> Result<BatchDetail, ApiError> {
    let head = match rows.first() {
        Some(row) => row.clone(),
        None => return Err(ApiError::not_found("assessment batch not found")),
    };

    let ids: Vec<Uuid> = rows.iter().map(|r| r.student).collect();
    let students = store.students(&ids).await?;

    let mut entries: Vec<BatchEntry> = Vec::with_capacity(rows.len());
    for row in &rows {
        let student = students.iter().find(|s| s.id == row.student);
        let email = match student {
            Some(s) => store.account(s.account).await?.map(|a| a.email),
            None => None,
        };
        entries.push(BatchEntry {
            student_id: row.student,
            name: student.map(|s| s.name.clone()).unwrap_or_default(),
            email,
            phone: student.map(|s| s.phone.clone()).unwrap_or_default(),
            marks: row.marks,
            remarks: row.remarks.clone(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(BatchDetail {
        batch_id: head.batch_id,
        course_id: head.course,
        kind: head.kind,
        title: head.title,
        description: head.description,
        date: head.date,
        total_marks: head.total_marks,
        created_by_role: head.created_by_role,
        created_count,
        entries,
    })
}
