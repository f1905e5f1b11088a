mod common;

use anyhow::Result;
use axum::http::StatusCode;

use campus_api::store::prelude::*;
use campus_api::workflows::admin::CreateTeacherInput;
use campus_api::workflows::coordinator;

#[tokio::test]
async fn coordinator_without_campus_has_no_scope() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, None).await?;

    let err = coordinator::dashboard(store.as_ref(), &actor)
        .await
        .expect_err("no campus");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn assigning_a_foreign_teacher_is_forbidden() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Mine").await?;
    let other = common::seed_campus(store.as_ref(), &admin, "Theirs").await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let course = common::seed_course(store.as_ref(), &admin, "BIO-1", Some(campus.id)).await?;
    let (teacher, _) = common::seed_teacher(store.as_ref(), &admin, vec![other.id]).await?;

    let err = coordinator::assign_teacher(store.as_ref(), &actor, course.id, teacher.id)
        .await
        .expect_err("foreign teacher");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn reassigning_a_teacher_to_the_same_course_is_rejected() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Main").await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let course = common::seed_course(store.as_ref(), &admin, "CS-1", Some(campus.id)).await?;
    let (teacher, _) = common::seed_teacher(store.as_ref(), &admin, vec![campus.id]).await?;

    coordinator::assign_teacher(store.as_ref(), &actor, course.id, teacher.id)
        .await
        .expect("first assignment");
    let err = coordinator::assign_teacher(store.as_ref(), &actor, course.id, teacher.id)
        .await
        .expect_err("no-op");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn unassigning_last_campus_course_drops_the_campus_link() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Hill").await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let course = common::seed_course(store.as_ref(), &admin, "URDU-1", Some(campus.id)).await?;
    let (teacher, _) = common::seed_teacher(store.as_ref(), &admin, vec![campus.id]).await?;

    coordinator::assign_teacher(store.as_ref(), &actor, course.id, teacher.id)
        .await
        .expect("assign");
    coordinator::unassign_teacher(store.as_ref(), &actor, course.id, teacher.id)
        .await
        .expect("unassign");

    let course = store.course(course.id).await?.expect("course");
    assert!(!course.taught_by(teacher.id));
    let campus = store.campus(campus.id).await?.expect("campus");
    assert!(!campus.teachers.contains(&teacher.id));
    let teacher = store.teacher(teacher.id).await?.expect("teacher");
    assert!(!teacher.campuses.contains(&campus.id));
    Ok(())
}

#[tokio::test]
async fn registered_teachers_are_bound_to_the_campus() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Lake").await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;

    let teacher = coordinator::register_teacher(
        store.as_ref(),
        &actor,
        CreateTeacherInput {
            name: "New Teacher".into(),
            email: "newteacher@example.test".into(),
            password: "pw123456".into(),
            contact_number: "0300-3333333".into(),
            subject_specialization: "Physics".into(),
            qualifications: "BSc".into(),
        },
    )
    .await
    .expect("register");

    assert_eq!(teacher.campuses, vec![campus.id]);
    let campus = store.campus(campus.id).await?.expect("campus");
    assert!(campus.teachers.contains(&teacher.id));
    let account = store.account(teacher.account).await?.expect("account");
    assert_eq!(account.campus, Some(campus.id));
    Ok(())
}

#[tokio::test]
async fn student_reads_are_campus_scoped() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Near").await?;
    let far = common::seed_campus(store.as_ref(), &admin, "Far").await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let (outsider, _) = common::seed_student(store.as_ref(), &admin, "Faiz", Some(far.id)).await?;

    let err = coordinator::get_student(store.as_ref(), &actor, outsider.id)
        .await
        .expect_err("out of scope");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn dashboard_counts_campus_records() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Metro").await?;
    let (_, actor) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    common::seed_course(store.as_ref(), &admin, "MATH-9", Some(campus.id)).await?;
    common::seed_student(store.as_ref(), &admin, "Noor", Some(campus.id)).await?;
    common::seed_student(store.as_ref(), &admin, "Sami", Some(campus.id)).await?;

    let dashboard = coordinator::dashboard(store.as_ref(), &actor)
        .await
        .expect("dashboard");
    assert_eq!(dashboard.student_count, 2);
    assert_eq!(dashboard.course_count, 1);
    assert_eq!(dashboard.coordinators.len(), 1);
    Ok(())
}
