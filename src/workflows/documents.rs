//! Student document uploads and verification.
//!
//! The upload carries a file descriptor, not bytes; the storage path is
//! derived here and handed to whatever serves the files. Policy failures
//! reject the request before anything is persisted.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::authz::require_campus_scope;
use crate::config::config;
use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::Document;
use crate::store::prelude::*;
use crate::types::{DocumentStatus, DocumentType, DocumentVerification, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDescriptor {
    pub mimetype: String,
    pub size: u64,
    pub original_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInput {
    pub document_type: DocumentType,
    pub file: UploadDescriptor,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyInput {
    pub status: DocumentStatus,
    pub remarks: Option<String>,
}

fn check_upload_policy(descriptor: &UploadDescriptor) -> Result<(), ApiError> {
    let uploads = &config().uploads;
    if !uploads
        .allowed_mimetypes
        .iter()
        .any(|m| m == &descriptor.mimetype)
    {
        return Err(ApiError::validation(format!(
            "file type {} is not allowed",
            descriptor.mimetype
        )));
    }
    if descriptor.size > uploads.max_file_bytes {
        return Err(ApiError::validation("file exceeds the maximum allowed size"));
    }
    Ok(())
}

/// Storage path derived from the owning account and upload time; the original
/// name only contributes its extension.
fn derive_path(account: Uuid, original_name: &str) -> String {
    let ext = original_name
        .rfind('.')
        .map(|i| &original_name[i..])
        .unwrap_or("");
    format!("doc_{}_{}{}", account.simple(), Utc::now().timestamp_millis(), ext)
}

pub async fn upload(
    store: &dyn Store,
    actor: &Actor,
    input: UploadInput,
) -> Result<Document, ApiError> {
    if actor.role != Role::Student {
        return Err(ApiError::forbidden("only students upload documents"));
    }
    let student = store
        .student_by_account(actor.account)
        .await?
        .ok_or_else(|| ApiError::internal("student profile missing"))?;

    check_upload_policy(&input.file)?;

    let document = Document {
        id: Uuid::new_v4(),
        student: student.id,
        document_type: input.document_type,
        file_path: derive_path(actor.account, &input.file.original_name),
        status: DocumentStatus::Pending,
        remarks: None,
        verified_by: None,
        verified_at: None,
        created_at: Utc::now(),
    };
    store.insert_document(&document).await?;
    Ok(document)
}

/// Decide a pending document exactly once.
pub async fn verify(
    store: &dyn Store,
    actor: &Actor,
    document_id: Uuid,
    input: VerifyInput,
) -> Result<Document, ApiError> {
    if input.status == DocumentStatus::Pending {
        return Err(ApiError::validation("status must be verified or rejected"));
    }
    let mut document = store
        .document(document_id)
        .await?
        .ok_or_else(|| ApiError::not_found("document not found"))?;
    if document.is_decided() {
        return Err(ApiError::conflict("document has already been processed"));
    }

    document.status = input.status;
    document.remarks = input.remarks;
    document.verified_by = Some(actor.account);
    document.verified_at = Some(Utc::now());
    store.update_document(&document).await?;

    if document.status == DocumentStatus::Verified {
        if let Some(mut student) = store.student(document.student).await? {
            student.document_status = DocumentVerification::Verified;
            store.update_student(&student).await?;
        }
    }
    Ok(document)
}

/// Documents of one student. Students only see their own; coordinators are
/// campus-scoped; admins see everything.
pub async fn list_for_student(
    store: &dyn Store,
    actor: &Actor,
    student_id: Uuid,
) -> Result<Vec<Document>, ApiError> {
    let student = store
        .student(student_id)
        .await?
        .ok_or_else(|| ApiError::not_found("student not found"))?;
    match actor.role {
        Role::Admin => {}
        Role::Coordinator => require_campus_scope(actor.role, actor.campus, student.campus)?,
        Role::Student => {
            if student.account != actor.account {
                return Err(ApiError::forbidden("you may only view your own documents"));
            }
        }
        Role::Teacher => return Err(ApiError::forbidden("teachers cannot view student documents")),
    }
    Ok(store.documents_by_student(student_id).await?)
}
