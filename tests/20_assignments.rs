mod common;

use anyhow::Result;
use axum::http::StatusCode;
use uuid::Uuid;

use campus_api::store::prelude::*;
use campus_api::workflows::assignments::{
    self, AssignCoordinatorInput, AssignCoursesInput, AssignStudentsInput, AssignTeacherInput,
};

#[tokio::test]
async fn course_assignment_is_idempotent() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "North").await?;
    let course = common::seed_course(store.as_ref(), &admin, "PHY-201", None).await?;

    let input = || AssignCoursesInput {
        campus_id: campus.id,
        course_ids: vec![course.id],
    };
    let first = assignments::assign_courses(store.as_ref(), input()).await.expect("first");
    assert_eq!(first.assigned_count, 1);

    let second = assignments::assign_courses(store.as_ref(), input()).await.expect("second");
    assert_eq!(second.assigned_count, 0);

    let campus = store.campus(campus.id).await?.expect("campus");
    assert_eq!(campus.courses.iter().filter(|c| **c == course.id).count(), 1);
    let course = store.course(course.id).await?.expect("course");
    assert_eq!(course.campus, Some(campus.id));
    Ok(())
}

#[tokio::test]
async fn student_assignment_fails_fast_with_missing_ids() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "West").await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Omar", None).await?;
    let ghost = Uuid::new_v4();

    let err = assignments::assign_students(
        store.as_ref(),
        AssignStudentsInput {
            campus_id: campus.id,
            student_ids: vec![student.id, ghost],
            course_ids: vec![],
        },
    )
    .await
    .expect_err("missing student");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    let details = &err.to_json()["details"];
    assert_eq!(details["missingStudentIds"], serde_json::json!([ghost]));

    // Nothing was written for the valid student either.
    let campus = store.campus(campus.id).await?.expect("campus");
    assert!(campus.students.is_empty());
    let student = store.student(student.id).await?.expect("student");
    assert_eq!(student.campus, None);
    Ok(())
}

#[tokio::test]
async fn teacher_assignment_derives_campus_links_from_courses() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus_a = common::seed_campus(store.as_ref(), &admin, "Alpha").await?;
    let campus_b = common::seed_campus(store.as_ref(), &admin, "Beta").await?;
    let course_a = common::seed_course(store.as_ref(), &admin, "CHEM-1", Some(campus_a.id)).await?;
    let course_b = common::seed_course(store.as_ref(), &admin, "CHEM-2", Some(campus_b.id)).await?;
    let (teacher, _) = common::seed_teacher(store.as_ref(), &admin, vec![]).await?;

    let out = assignments::assign_teacher(
        store.as_ref(),
        AssignTeacherInput {
            teacher_id: teacher.id,
            course_ids: vec![course_a.id, course_b.id],
        },
    )
    .await
    .expect("assignment");
    assert_eq!(out.assigned_count, 2);

    let teacher = store.teacher(teacher.id).await?.expect("teacher");
    assert!(teacher.campuses.contains(&campus_a.id));
    assert!(teacher.campuses.contains(&campus_b.id));
    for campus_id in [campus_a.id, campus_b.id] {
        let campus = store.campus(campus_id).await?.expect("campus");
        assert!(campus.teachers.contains(&teacher.id));
    }
    Ok(())
}

#[tokio::test]
async fn coordinator_assignment_moves_between_campuses() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus_a = common::seed_campus(store.as_ref(), &admin, "Old").await?;
    let campus_b = common::seed_campus(store.as_ref(), &admin, "New").await?;
    let (coordinator, _) = common::seed_coordinator(store.as_ref(), &admin, None).await?;

    assignments::assign_coordinator(
        store.as_ref(),
        AssignCoordinatorInput {
            coordinator_id: coordinator.id,
            campus_id: campus_a.id,
        },
    )
    .await
    .expect("first assignment");
    assignments::assign_coordinator(
        store.as_ref(),
        AssignCoordinatorInput {
            coordinator_id: coordinator.id,
            campus_id: campus_b.id,
        },
    )
    .await
    .expect("move");

    let old = store.campus(campus_a.id).await?.expect("old campus");
    assert!(!old.coordinators.contains(&coordinator.id));
    let new = store.campus(campus_b.id).await?.expect("new campus");
    assert!(new.coordinators.contains(&coordinator.id));
    let account = store.account(coordinator.account).await?.expect("account");
    assert_eq!(account.campus, Some(campus_b.id));
    Ok(())
}

#[tokio::test]
async fn unassigning_a_coordinator_clears_both_sides() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Sole").await?;
    let (coordinator, _) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;

    let out = assignments::unassign_coordinator(store.as_ref(), coordinator.id)
        .await
        .expect("unassign");
    assert_eq!(out.campus, None);

    let campus = store.campus(campus.id).await?.expect("campus");
    assert!(!campus.coordinators.contains(&coordinator.id));
    let account = store.account(coordinator.account).await?.expect("account");
    assert_eq!(account.campus, None);
    Ok(())
}

#[tokio::test]
async fn student_assignment_enrolls_into_verified_courses() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Central").await?;
    let course = common::seed_course(store.as_ref(), &admin, "ENG-101", Some(campus.id)).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Zara", None).await?;
    let ghost_course = Uuid::new_v4();

    let err = assignments::assign_students(
        store.as_ref(),
        AssignStudentsInput {
            campus_id: campus.id,
            student_ids: vec![student.id],
            course_ids: vec![course.id, ghost_course],
        },
    )
    .await
    .expect_err("missing course");
    assert_eq!(
        err.to_json()["details"]["missingCourseIds"],
        serde_json::json!([ghost_course])
    );

    assignments::assign_students(
        store.as_ref(),
        AssignStudentsInput {
            campus_id: campus.id,
            student_ids: vec![student.id],
            course_ids: vec![course.id],
        },
    )
    .await
    .expect("valid assignment");

    let student = store.student(student.id).await?.expect("student");
    assert_eq!(student.campus, Some(campus.id));
    assert!(student.courses.contains(&course.id));
    let course = store.course(course.id).await?.expect("course");
    assert!(course.students.contains(&student.id));
    Ok(())
}
