mod common;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use uuid::Uuid;

use campus_api::store::prelude::*;
use campus_api::types::{AttendanceStatus, SessionSlot};
use campus_api::workflows::attendance::{
    self, BulkEntryInput, BulkMarkInput, MarkAttendanceInput,
};

#[tokio::test]
async fn only_the_assigned_teacher_can_mark() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let course = common::seed_course(store.as_ref(), &admin, "ENG-1", Some(campus.id)).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Hira", Some(campus.id)).await?;
    let (_, outsider) = common::seed_teacher(store.as_ref(), &admin, vec![campus.id]).await?;

    let err = attendance::mark(
        store.as_ref(),
        &outsider,
        MarkAttendanceInput {
            student_id: student.id,
            course_id: course.id,
            date: None,
            status: AttendanceStatus::Present,
            session: None,
        },
    )
    .await
    .expect_err("not on the course");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn mark_stamps_the_teacher_profile_id() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let course = common::seed_course(store.as_ref(), &admin, "ENG-2", Some(campus.id)).await?;
    let (teacher, actor) = common::seed_teacher(store.as_ref(), &admin, vec![campus.id]).await?;
    common::enroll_teacher(store.as_ref(), &course, &teacher).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Asad", Some(campus.id)).await?;

    let record = attendance::mark(
        store.as_ref(),
        &actor,
        MarkAttendanceInput {
            student_id: student.id,
            course_id: course.id,
            date: None,
            status: AttendanceStatus::HalfDay,
            session: Some(SessionSlot::Morning),
        },
    )
    .await
    .expect("mark");

    assert_eq!(record.marked_by, teacher.id);
    assert_eq!(record.status, AttendanceStatus::HalfDay);
    assert_eq!(record.session, Some(SessionSlot::Morning));
    Ok(())
}

#[tokio::test]
async fn bulk_mark_verifies_every_student_before_writing() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let course = common::seed_course(store.as_ref(), &admin, "SCI-1", Some(campus.id)).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Zara", Some(campus.id)).await?;
    let (_, marker) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let ghost_a = Uuid::new_v4();
    let ghost_b = Uuid::new_v4();

    let err = attendance::mark_bulk(
        store.as_ref(),
        &marker,
        BulkMarkInput {
            course_id: course.id,
            date: None,
            entries: vec![
                entry(student.id, AttendanceStatus::Present),
                entry(ghost_a, AttendanceStatus::Absent),
                entry(ghost_b, AttendanceStatus::Leave),
            ],
        },
    )
    .await
    .expect_err("ghosts present");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    let missing = err.to_json()["details"]["missingStudentIds"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(missing.len(), 2);

    // Nothing was written for the valid entry either.
    assert!(store.attendance_by_course(course.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn coordinators_mark_with_their_own_profile_id() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let course = common::seed_course(store.as_ref(), &admin, "SCI-2", Some(campus.id)).await?;
    let (coordinator, actor) =
        common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Bilal", Some(campus.id)).await?;

    let records = attendance::mark_bulk(
        store.as_ref(),
        &actor,
        BulkMarkInput {
            course_id: course.id,
            date: None,
            entries: vec![entry(student.id, AttendanceStatus::Absent)],
        },
    )
    .await
    .expect("bulk");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].marked_by, coordinator.id);
    Ok(())
}

#[tokio::test]
async fn course_log_is_newest_first() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let course = common::seed_course(store.as_ref(), &admin, "HIS-1", Some(campus.id)).await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Mina", Some(campus.id)).await?;

    let yesterday = Utc::now() - Duration::days(1);
    for date in [Some(yesterday), None] {
        attendance::mark(
            store.as_ref(),
            &actor,
            MarkAttendanceInput {
                student_id: student.id,
                course_id: course.id,
                date,
                status: AttendanceStatus::Present,
                session: None,
            },
        )
        .await
        .expect("mark");
    }

    let log = attendance::list_by_course(store.as_ref(), &actor, course.id)
        .await
        .expect("list");
    assert_eq!(log.len(), 2);
    assert!(log[0].date > log[1].date);
    Ok(())
}

#[tokio::test]
async fn students_cannot_read_the_course_log() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let course = common::seed_course(store.as_ref(), &admin, "HIS-2", Some(campus.id)).await?;
    let (_, actor) = common::seed_student(store.as_ref(), &admin, "Omar", Some(campus.id)).await?;

    let err = attendance::list_by_course(store.as_ref(), &actor, course.id)
        .await
        .expect_err("students barred");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

fn entry(student_id: Uuid, status: AttendanceStatus) -> BulkEntryInput {
    BulkEntryInput {
        student_id,
        status,
        session: None,
    }
}
