mod common;

use anyhow::Result;
use axum::http::StatusCode;

use campus_api::types::RecipientType;
use campus_api::workflows::notifications::{self, CreateNotificationInput};

fn broadcast(recipient_type: RecipientType, subject: &str) -> CreateNotificationInput {
    CreateNotificationInput {
        recipient_type,
        subject: subject.into(),
        message: "Please take note.".into(),
        schedule: None,
    }
}

#[tokio::test]
async fn students_may_not_send_notifications() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, student) = common::seed_student(store.as_ref(), &admin, "Adeel", None).await?;

    for audience in [
        RecipientType::Admin,
        RecipientType::Principals,
        RecipientType::Teachers,
        RecipientType::Both,
        RecipientType::All,
    ] {
        let err = notifications::create(store.as_ref(), &student, broadcast(audience, "hi"))
            .await
            .expect_err("students barred");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
    Ok(())
}

#[tokio::test]
async fn teachers_cannot_broadcast_to_everyone() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, teacher) = common::seed_teacher(store.as_ref(), &admin, vec![]).await?;

    let err = notifications::create(store.as_ref(), &teacher, broadcast(RecipientType::All, "hi"))
        .await
        .expect_err("too wide");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

    let sent = notifications::create(
        store.as_ref(),
        &teacher,
        broadcast(RecipientType::Admin, "Leave request"),
    )
    .await
    .expect("narrow audience is fine");
    assert_eq!(sent.created_by, teacher.account);
    Ok(())
}

#[tokio::test]
async fn blank_subject_or_message_is_rejected() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;

    let err = notifications::create(store.as_ref(), &admin, broadcast(RecipientType::All, "   "))
        .await
        .expect_err("blank subject");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn teachers_see_their_own_but_not_peer_broadcasts() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, author) = common::seed_teacher(store.as_ref(), &admin, vec![]).await?;
    let (_, peer) = common::seed_teacher(store.as_ref(), &admin, vec![]).await?;

    let own = notifications::create(
        store.as_ref(),
        &author,
        broadcast(RecipientType::Principals, "From a teacher"),
    )
    .await
    .expect("create");
    notifications::create(
        store.as_ref(),
        &admin,
        broadcast(RecipientType::Teachers, "Staff meeting"),
    )
    .await
    .expect("create");

    // The author sees both: their own plus the admin's teacher broadcast.
    let seen = notifications::list(store.as_ref(), &author)
        .await
        .expect("author list");
    assert_eq!(seen.len(), 2);

    // The peer only sees the admin's broadcast, not the author's.
    let seen = notifications::list(store.as_ref(), &peer)
        .await
        .expect("peer list");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].subject, "Staff meeting");

    let err = notifications::get(store.as_ref(), &peer, own.id)
        .await
        .expect_err("not addressed to the peer");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn students_only_see_all_audience_broadcasts() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, student) = common::seed_student(store.as_ref(), &admin, "Reader", None).await?;

    notifications::create(store.as_ref(), &admin, broadcast(RecipientType::Teachers, "Staff"))
        .await
        .expect("create");
    notifications::create(store.as_ref(), &admin, broadcast(RecipientType::All, "Holiday"))
        .await
        .expect("create");

    let seen = notifications::list(store.as_ref(), &student)
        .await
        .expect("student list");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].subject, "Holiday");
    Ok(())
}

#[tokio::test]
async fn admins_see_everything() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, teacher) = common::seed_teacher(store.as_ref(), &admin, vec![]).await?;

    notifications::create(
        store.as_ref(),
        &teacher,
        broadcast(RecipientType::Principals, "Request"),
    )
    .await
    .expect("create");
    notifications::create(store.as_ref(), &admin, broadcast(RecipientType::All, "Notice"))
        .await
        .expect("create");

    let seen = notifications::list(store.as_ref(), &admin).await.expect("list");
    assert_eq!(seen.len(), 2);
    Ok(())
}
