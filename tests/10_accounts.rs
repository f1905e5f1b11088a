mod common;

use anyhow::Result;
use axum::http::StatusCode;

use campus_api::store::prelude::*;
use campus_api::workflows::{accounts, admin, assignments};

#[tokio::test]
async fn register_admin_issues_token_and_rejects_duplicates() -> Result<()> {
    let store = common::store();

    let first = accounts::register_admin(
        store.as_ref(),
        accounts::RegisterAdminInput {
            name: "Head Office".into(),
            email: "HQ@Example.Test".into(),
            password: "secret123".into(),
            contact_number: "0300-0000000".into(),
        },
    )
    .await
    .expect("first registration");
    assert!(!first.token.is_empty());
    // Emails are stored lowercased.
    assert_eq!(first.account.email, "hq@example.test");

    let err = accounts::register_admin(
        store.as_ref(),
        accounts::RegisterAdminInput {
            name: "Second".into(),
            email: "hq@example.test".into(),
            password: "other".into(),
            contact_number: "0300-1111111".into(),
        },
    )
    .await
    .expect_err("duplicate email");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_disabled_accounts() -> Result<()> {
    let store = common::store();
    accounts::register_admin(
        store.as_ref(),
        accounts::RegisterAdminInput {
            name: "Admin".into(),
            email: "admin@example.test".into(),
            password: "secret123".into(),
            contact_number: "0300-0000000".into(),
        },
    )
    .await
    .expect("registration");

    let err = accounts::login(
        store.as_ref(),
        accounts::LoginInput {
            email: "admin@example.test".into(),
            password: "wrong".into(),
        },
    )
    .await
    .expect_err("bad password");
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

    let mut account = store
        .account_by_email("admin@example.test")
        .await?
        .expect("account");
    account.is_active = false;
    store.update_account(&account).await?;

    let err = accounts::login(
        store.as_ref(),
        accounts::LoginInput {
            email: "admin@example.test".into(),
            password: "secret123".into(),
        },
    )
    .await
    .expect_err("disabled account");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn login_returns_role_matching_profile() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "North").await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Amir", Some(campus.id)).await?;

    let account = store.account(student.account).await?.expect("account");
    let out = accounts::login(
        store.as_ref(),
        accounts::LoginInput {
            email: account.email.clone(),
            password: "student-pass".into(),
        },
    )
    .await
    .expect("login");
    assert_eq!(out.profile["id"], serde_json::json!(student.id));
    assert_eq!(out.profile["name"], serde_json::json!("Amir"));
    Ok(())
}

#[tokio::test]
async fn duplicate_cnic_is_rejected() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;

    let input = |email: &str| admin::CreateStudentInput {
        name: "Sara".into(),
        email: email.into(),
        password: "pw123456".into(),
        cnic: "35202-1234567-1".into(),
        phone: "0300-2222222".into(),
        city: None,
        pnc_no: None,
        passport: None,
        qualifications: None,
    };
    admin::create_student(store.as_ref(), &admin, input("sara1@example.test"))
        .await
        .expect("first student");
    let err = admin::create_student(store.as_ref(), &admin, input("sara2@example.test"))
        .await
        .expect_err("duplicate cnic");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn deleting_a_student_detaches_campus_courses_and_account() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "South").await?;
    let course = common::seed_course(store.as_ref(), &admin, "MATH-101", Some(campus.id)).await?;
    let (student, _) = common::seed_student(store.as_ref(), &admin, "Bilal", None).await?;

    assignments::assign_students(
        store.as_ref(),
        assignments::AssignStudentsInput {
            campus_id: campus.id,
            student_ids: vec![student.id],
            course_ids: vec![course.id],
        },
    )
    .await
    .expect("assignment");

    admin::delete_student(store.as_ref(), &admin, student.id)
        .await
        .expect("delete");

    let campus = store.campus(campus.id).await?.expect("campus");
    assert!(!campus.students.contains(&student.id));
    let course = store.course(course.id).await?.expect("course");
    assert!(!course.students.contains(&student.id));
    assert!(store.student(student.id).await?.is_none());
    assert!(store.account(student.account).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn deleting_a_campus_detaches_members_without_deleting_them() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "East").await?;
    let (coordinator, _) =
        common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let (student, _) =
        common::seed_student(store.as_ref(), &admin, "Hina", Some(campus.id)).await?;
    let mut campus = store.campus(campus.id).await?.expect("campus");
    campus.students.push(student.id);
    store.update_campus(&campus).await?;

    admin::delete_campus(store.as_ref(), campus.id)
        .await
        .expect("delete campus");

    assert!(store.campus(campus.id).await?.is_none());
    let coordinator = store.coordinator(coordinator.id).await?.expect("survives");
    assert_eq!(coordinator.campus, None);
    let student = store.student(student.id).await?.expect("survives");
    assert_eq!(student.campus, None);
    Ok(())
}
