//! Admin-side entity lifecycle: paired account+profile creates, partial
//! updates, and deletes with explicit symmetric detach from the membership
//! sets. No lifecycle hooks; every side effect is written out here.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::{Campus, Coordinator, Course, Student, Teacher};
use crate::store::prelude::*;
use crate::types::{DocumentVerification, Role};

use super::accounts::create_account_checked;
use super::remove_member;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampusInput {
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampusInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoordinatorInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoordinatorInput {
    pub name: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub subject_specialization: String,
    pub qualifications: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherInput {
    pub name: Option<String>,
    pub contact_number: Option<String>,
    pub subject_specialization: Option<String>,
    pub qualifications: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub cnic: String,
    pub phone: String,
    pub city: Option<String>,
    pub pnc_no: Option<String>,
    pub passport: Option<String>,
    pub qualifications: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub pnc_no: Option<String>,
    pub passport: Option<String>,
    pub qualifications: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub credit_hours: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub credit_hours: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn create_campus(
    store: &dyn Store,
    actor: &Actor,
    input: CreateCampusInput,
) -> Result<Campus, ApiError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("campus name is required"));
    }
    if store.campus_by_name(&name).await?.is_some() {
        return Err(ApiError::conflict("a campus with this name already exists"));
    }
    let campus = Campus::new(
        name,
        input.location,
        input.address,
        input.contact_number,
        actor.account,
    );
    store.insert_campus(&campus).await?;
    Ok(campus)
}

pub async fn update_campus(
    store: &dyn Store,
    id: Uuid,
    input: UpdateCampusInput,
) -> Result<Campus, ApiError> {
    let mut campus = store
        .campus(id)
        .await?
        .ok_or_else(|| ApiError::not_found("campus not found"))?;

    if let Some(name) = input.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::validation("campus name cannot be empty"));
        }
        if name != campus.name && store.campus_by_name(&name).await?.is_some() {
            return Err(ApiError::conflict("a campus with this name already exists"));
        }
        campus.name = name;
    }
    if let Some(location) = input.location {
        campus.location = Some(location);
    }
    if let Some(address) = input.address {
        campus.address = Some(address);
    }
    if let Some(contact) = input.contact_number {
        campus.contact_number = Some(contact);
    }
    store.update_campus(&campus).await?;
    Ok(campus)
}

/// Deleting a campus detaches every member but never deletes them.
pub async fn delete_campus(store: &dyn Store, id: Uuid) -> Result<(), ApiError> {
    let campus = store
        .campus(id)
        .await?
        .ok_or_else(|| ApiError::not_found("campus not found"))?;

    for coordinator_id in &campus.coordinators {
        if let Some(mut coordinator) = store.coordinator(*coordinator_id).await? {
            coordinator.campus = None;
            store.update_coordinator(&coordinator).await?;
            detach_account_campus(store, coordinator.account).await?;
        }
    }
    for teacher_id in &campus.teachers {
        if let Some(mut teacher) = store.teacher(*teacher_id).await? {
            remove_member(&mut teacher.campuses, campus.id);
            store.update_teacher(&teacher).await?;
        }
    }
    for student_id in &campus.students {
        if let Some(mut student) = store.student(*student_id).await? {
            student.campus = None;
            store.update_student(&student).await?;
            detach_account_campus(store, student.account).await?;
        }
    }
    for course_id in &campus.courses {
        if let Some(mut course) = store.course(*course_id).await? {
            course.campus = None;
            store.update_course(&course).await?;
        }
    }

    store.delete_campus(campus.id).await?;
    tracing::info!(campus = %campus.id, "campus deleted, members detached");
    Ok(())
}

async fn detach_account_campus(store: &dyn Store, account_id: Uuid) -> Result<(), ApiError> {
    if let Some(mut account) = store.account(account_id).await? {
        account.campus = None;
        store.update_account(&account).await?;
    }
    Ok(())
}

pub async fn create_coordinator(
    store: &dyn Store,
    actor: &Actor,
    input: CreateCoordinatorInput,
) -> Result<Coordinator, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    let account =
        create_account_checked(store, &input.email, &input.password, Role::Coordinator, None)
            .await?;
    let coordinator = Coordinator {
        id: Uuid::new_v4(),
        account: account.id,
        name: input.name.trim().to_string(),
        contact_number: input.contact_number,
        campus: None,
        created_by: actor.account,
        created_at: Utc::now(),
    };
    if let Err(e) = store.insert_coordinator(&coordinator).await {
        store.delete_account(account.id).await?;
        return Err(e.into());
    }
    Ok(coordinator)
}

pub async fn update_coordinator(
    store: &dyn Store,
    id: Uuid,
    input: UpdateCoordinatorInput,
) -> Result<Coordinator, ApiError> {
    let mut coordinator = store
        .coordinator(id)
        .await?
        .ok_or_else(|| ApiError::not_found("coordinator not found"))?;
    if let Some(name) = input.name {
        coordinator.name = name;
    }
    if let Some(contact) = input.contact_number {
        coordinator.contact_number = Some(contact);
    }
    store.update_coordinator(&coordinator).await?;
    Ok(coordinator)
}

pub async fn delete_coordinator(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<(), ApiError> {
    let coordinator = store
        .coordinator(id)
        .await?
        .ok_or_else(|| ApiError::not_found("coordinator not found"))?;
    forbid_self_delete(actor, coordinator.account)?;

    if let Some(campus_id) = coordinator.campus {
        if let Some(mut campus) = store.campus(campus_id).await? {
            remove_member(&mut campus.coordinators, coordinator.id);
            store.update_campus(&campus).await?;
        }
    }
    store.delete_coordinator(coordinator.id).await?;
    store.delete_account(coordinator.account).await?;
    Ok(())
}

/// Shared by the admin route and the coordinator's campus-scoped register.
pub(crate) async fn create_teacher_record(
    store: &dyn Store,
    created_by: Uuid,
    input: CreateTeacherInput,
    campus: Option<Uuid>,
) -> Result<Teacher, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    let account =
        create_account_checked(store, &input.email, &input.password, Role::Teacher, campus)
            .await?;
    let teacher = Teacher {
        id: Uuid::new_v4(),
        account: account.id,
        name: input.name.trim().to_string(),
        contact_number: input.contact_number,
        subject_specialization: input.subject_specialization,
        qualifications: input.qualifications,
        campuses: campus.into_iter().collect(),
        created_by,
        created_at: Utc::now(),
    };
    if let Err(e) = store.insert_teacher(&teacher).await {
        store.delete_account(account.id).await?;
        return Err(e.into());
    }
    Ok(teacher)
}

pub async fn create_teacher(
    store: &dyn Store,
    actor: &Actor,
    input: CreateTeacherInput,
) -> Result<Teacher, ApiError> {
    create_teacher_record(store, actor.account, input, None).await
}

pub async fn update_teacher(
    store: &dyn Store,
    id: Uuid,
    input: UpdateTeacherInput,
) -> Result<Teacher, ApiError> {
    let mut teacher = store
        .teacher(id)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;
    if let Some(name) = input.name {
        teacher.name = name;
    }
    if let Some(contact) = input.contact_number {
        teacher.contact_number = contact;
    }
    if let Some(subject) = input.subject_specialization {
        teacher.subject_specialization = subject;
    }
    if let Some(qualifications) = input.qualifications {
        teacher.qualifications = qualifications;
    }
    store.update_teacher(&teacher).await?;
    Ok(teacher)
}

pub async fn delete_teacher(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<(), ApiError> {
    let teacher = store
        .teacher(id)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;
    forbid_self_delete(actor, teacher.account)?;

    for campus_id in &teacher.campuses {
        if let Some(mut campus) = store.campus(*campus_id).await? {
            remove_member(&mut campus.teachers, teacher.id);
            store.update_campus(&campus).await?;
        }
    }
    for mut course in store.courses_by_teacher(teacher.id).await? {
        remove_member(&mut course.teachers, teacher.id);
        store.update_course(&course).await?;
    }
    store.delete_teacher(teacher.id).await?;
    store.delete_account(teacher.account).await?;
    Ok(())
}

pub async fn create_student(
    store: &dyn Store,
    actor: &Actor,
    input: CreateStudentInput,
) -> Result<Student, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    if input.cnic.trim().is_empty() {
        return Err(ApiError::validation("cnic is required"));
    }
    if store.student_by_cnic(input.cnic.trim()).await?.is_some() {
        return Err(ApiError::conflict("a student with this cnic already exists"));
    }
    let account =
        create_account_checked(store, &input.email, &input.password, Role::Student, None).await?;
    let student = Student {
        id: Uuid::new_v4(),
        account: account.id,
        name: input.name.trim().to_string(),
        cnic: input.cnic.trim().to_string(),
        phone: input.phone,
        city: input.city,
        pnc_no: input.pnc_no,
        passport: input.passport,
        qualifications: input.qualifications,
        campus: None,
        courses: Vec::new(),
        document_status: DocumentVerification::NotVerified,
        created_by: actor.account,
        created_at: Utc::now(),
    };
    if let Err(e) = store.insert_student(&student).await {
        store.delete_account(account.id).await?;
        return Err(e.into());
    }
    Ok(student)
}

pub async fn update_student(
    store: &dyn Store,
    id: Uuid,
    input: UpdateStudentInput,
) -> Result<Student, ApiError> {
    let mut student = store
        .student(id)
        .await?
        .ok_or_else(|| ApiError::not_found("student not found"))?;
    apply_student_update(&mut student, input);
    store.update_student(&student).await?;
    Ok(student)
}

/// `document_status` is not part of the update surface; it only moves through
/// the document verification workflow.
pub(crate) fn apply_student_update(student: &mut Student, input: UpdateStudentInput) {
    if let Some(name) = input.name {
        student.name = name;
    }
    if let Some(phone) = input.phone {
        student.phone = phone;
    }
    if let Some(city) = input.city {
        student.city = Some(city);
    }
    if let Some(pnc_no) = input.pnc_no {
        student.pnc_no = Some(pnc_no);
    }
    if let Some(passport) = input.passport {
        student.passport = Some(passport);
    }
    if let Some(qualifications) = input.qualifications {
        student.qualifications = Some(qualifications);
    }
}

pub async fn delete_student(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<(), ApiError> {
    let student = store
        .student(id)
        .await?
        .ok_or_else(|| ApiError::not_found("student not found"))?;
    forbid_self_delete(actor, student.account)?;

    if let Some(campus_id) = student.campus {
        if let Some(mut campus) = store.campus(campus_id).await? {
            remove_member(&mut campus.students, student.id);
            store.update_campus(&campus).await?;
        }
    }
    for course_id in &student.courses {
        if let Some(mut course) = store.course(*course_id).await? {
            remove_member(&mut course.students, student.id);
            store.update_course(&course).await?;
        }
    }
    store.delete_student(student.id).await?;
    store.delete_account(student.account).await?;
    Ok(())
}

pub async fn create_course(
    store: &dyn Store,
    actor: &Actor,
    input: CreateCourseInput,
) -> Result<Course, ApiError> {
    let code = input.code.trim().to_string();
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("course name is required"));
    }
    if code.is_empty() {
        return Err(ApiError::validation("course code is required"));
    }
    if store.course_by_code(&code).await?.is_some() {
        return Err(ApiError::conflict("a course with this code already exists"));
    }
    let course = Course {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        code,
        description: input.description,
        credit_hours: input.credit_hours,
        teachers: Vec::new(),
        students: Vec::new(),
        campus: None,
        start_date: input.start_date,
        end_date: input.end_date,
        created_by: actor.account,
        created_at: Utc::now(),
    };
    store.insert_course(&course).await?;
    Ok(course)
}

pub async fn update_course(
    store: &dyn Store,
    id: Uuid,
    input: UpdateCourseInput,
) -> Result<Course, ApiError> {
    let mut course = store
        .course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    if let Some(name) = input.name {
        course.name = name;
    }
    if let Some(description) = input.description {
        course.description = Some(description);
    }
    if let Some(credit_hours) = input.credit_hours {
        course.credit_hours = Some(credit_hours);
    }
    if let Some(start_date) = input.start_date {
        course.start_date = Some(start_date);
    }
    if let Some(end_date) = input.end_date {
        course.end_date = Some(end_date);
    }
    store.update_course(&course).await?;
    Ok(course)
}

pub async fn delete_course(store: &dyn Store, id: Uuid) -> Result<(), ApiError> {
    let course = store
        .course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;

    if let Some(campus_id) = course.campus {
        if let Some(mut campus) = store.campus(campus_id).await? {
            remove_member(&mut campus.courses, course.id);
            store.update_campus(&campus).await?;
        }
    }
    for student_id in &course.students {
        if let Some(mut student) = store.student(*student_id).await? {
            remove_member(&mut student.courses, course.id);
            store.update_student(&student).await?;
        }
    }
    store.delete_course(course.id).await?;
    Ok(())
}

fn forbid_self_delete(actor: &Actor, target_account: Uuid) -> Result<(), ApiError> {
    if actor.account == target_account {
        Err(ApiError::forbidden("cannot delete your own account"))
    } else {
        Ok(())
    }
}
