mod common;

use anyhow::Result;
use axum::http::StatusCode;

use campus_api::store::prelude::*;
use campus_api::types::{DocumentStatus, DocumentType, DocumentVerification};
use campus_api::workflows::documents::{self, UploadDescriptor, UploadInput, VerifyInput};

fn pdf_upload(size: u64) -> UploadInput {
    UploadInput {
        document_type: DocumentType::Cnic,
        file: UploadDescriptor {
            mimetype: "application/pdf".into(),
            size,
            original_name: "cnic-scan.pdf".into(),
        },
    }
}

#[tokio::test]
async fn disallowed_file_types_are_rejected_without_persisting() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (student, actor) = common::seed_student(store.as_ref(), &admin, "Sara", None).await?;

    let err = documents::upload(
        store.as_ref(),
        &actor,
        UploadInput {
            document_type: DocumentType::Other,
            file: UploadDescriptor {
                mimetype: "application/zip".into(),
                size: 100,
                original_name: "archive.zip".into(),
            },
        },
    )
    .await
    .expect_err("zip not allowed");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(store.documents_by_student(student.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn oversized_uploads_are_rejected() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (_, actor) = common::seed_student(store.as_ref(), &admin, "Adil", None).await?;

    let err = documents::upload(store.as_ref(), &actor, pdf_upload(6 * 1024 * 1024))
        .await
        .expect_err("over 5MB");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn uploads_start_pending_with_a_derived_path() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (student, actor) = common::seed_student(store.as_ref(), &admin, "Laiba", None).await?;

    let document = documents::upload(store.as_ref(), &actor, pdf_upload(1024))
        .await
        .expect("upload");
    assert_eq!(document.student, student.id);
    assert_eq!(document.status, DocumentStatus::Pending);
    assert!(document.file_path.starts_with("doc_"));
    assert!(document.file_path.ends_with(".pdf"));
    Ok(())
}

#[tokio::test]
async fn only_students_upload() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;

    let err = documents::upload(store.as_ref(), &admin, pdf_upload(1024))
        .await
        .expect_err("admins do not upload");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn verification_is_decided_exactly_once() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (student, actor) = common::seed_student(store.as_ref(), &admin, "Areeba", None).await?;
    let document = documents::upload(store.as_ref(), &actor, pdf_upload(1024))
        .await
        .expect("upload");

    // Pending is not a decision.
    let err = documents::verify(
        store.as_ref(),
        &admin,
        document.id,
        VerifyInput {
            status: DocumentStatus::Pending,
            remarks: None,
        },
    )
    .await
    .expect_err("pending rejected");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let decided = documents::verify(
        store.as_ref(),
        &admin,
        document.id,
        VerifyInput {
            status: DocumentStatus::Verified,
            remarks: Some("all good".into()),
        },
    )
    .await
    .expect("verify");
    assert_eq!(decided.status, DocumentStatus::Verified);
    assert_eq!(decided.verified_by, Some(admin.account));
    assert!(decided.verified_at.is_some());

    // The student's aggregate flag follows the verification.
    let student = store.student(student.id).await?.expect("student");
    assert_eq!(student.document_status, DocumentVerification::Verified);

    let err = documents::verify(
        store.as_ref(),
        &admin,
        document.id,
        VerifyInput {
            status: DocumentStatus::Rejected,
            remarks: None,
        },
    )
    .await
    .expect_err("already decided");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn students_only_see_their_own_documents() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let (owner, owner_actor) = common::seed_student(store.as_ref(), &admin, "Owner", None).await?;
    let (_, peer_actor) = common::seed_student(store.as_ref(), &admin, "Peer", None).await?;
    documents::upload(store.as_ref(), &owner_actor, pdf_upload(1024))
        .await
        .expect("upload");

    let own = documents::list_for_student(store.as_ref(), &owner_actor, owner.id)
        .await
        .expect("own list");
    assert_eq!(own.len(), 1);

    let err = documents::list_for_student(store.as_ref(), &peer_actor, owner.id)
        .await
        .expect_err("not yours");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn coordinators_are_campus_scoped_for_documents() -> Result<()> {
    let store = common::store();
    let admin = common::seed_admin(store.as_ref()).await?;
    let campus = common::seed_campus(store.as_ref(), &admin, "Here").await?;
    let elsewhere = common::seed_campus(store.as_ref(), &admin, "Elsewhere").await?;
    let (_, coordinator) = common::seed_coordinator(store.as_ref(), &admin, Some(&campus)).await?;
    let (outsider, _) =
        common::seed_student(store.as_ref(), &admin, "Far", Some(elsewhere.id)).await?;

    let err = documents::list_for_student(store.as_ref(), &coordinator, outsider.id)
        .await
        .expect_err("other campus");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    Ok(())
}
