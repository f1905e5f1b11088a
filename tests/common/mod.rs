//! Shared fixtures: an in-memory store seeded with accounts and profiles for
//! each role, plus the matching request actors.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use campus_api::auth::hash_password;
use campus_api::middleware::Actor;
use campus_api::models::{Account, AdminProfile, Campus, Coordinator, Course, Student, Teacher};
use campus_api::store::prelude::*;
use campus_api::store::MemoryStore;
use campus_api::types::{DocumentVerification, Role};

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn actor(account: Uuid, role: Role, campus: Option<Uuid>) -> Actor {
    Actor {
        account,
        role,
        campus,
    }
}

pub async fn seed_admin(store: &dyn Store) -> anyhow::Result<Actor> {
    let account = Account::new(
        format!("admin-{}@example.test", Uuid::new_v4().simple()),
        hash_password("admin-pass"),
        Role::Admin,
        None,
    );
    store.insert_account(&account).await?;
    let profile = AdminProfile {
        id: Uuid::new_v4(),
        account: account.id,
        name: "Admin".into(),
        contact_number: "0300-0000000".into(),
        created_at: Utc::now(),
    };
    store.insert_admin(&profile).await?;
    Ok(actor(account.id, Role::Admin, None))
}

pub async fn seed_campus(store: &dyn Store, admin: &Actor, name: &str) -> anyhow::Result<Campus> {
    let campus = Campus::new(name.to_string(), None, None, None, admin.account);
    store.insert_campus(&campus).await?;
    Ok(campus)
}

pub async fn seed_coordinator(
    store: &dyn Store,
    admin: &Actor,
    campus: Option<&Campus>,
) -> anyhow::Result<(Coordinator, Actor)> {
    let account = Account::new(
        format!("coord-{}@example.test", Uuid::new_v4().simple()),
        hash_password("coord-pass"),
        Role::Coordinator,
        campus.map(|c| c.id),
    );
    store.insert_account(&account).await?;
    let coordinator = Coordinator {
        id: Uuid::new_v4(),
        account: account.id,
        name: "Coordinator".into(),
        contact_number: None,
        campus: campus.map(|c| c.id),
        created_by: admin.account,
        created_at: Utc::now(),
    };
    store.insert_coordinator(&coordinator).await?;
    if let Some(campus) = campus {
        let mut campus = campus.clone();
        campus.coordinators.push(coordinator.id);
        store.update_campus(&campus).await?;
    }
    let actor = actor(account.id, Role::Coordinator, coordinator.campus);
    Ok((coordinator, actor))
}

pub async fn seed_teacher(
    store: &dyn Store,
    admin: &Actor,
    campuses: Vec<Uuid>,
) -> anyhow::Result<(Teacher, Actor)> {
    let account = Account::new(
        format!("teacher-{}@example.test", Uuid::new_v4().simple()),
        hash_password("teacher-pass"),
        Role::Teacher,
        campuses.first().copied(),
    );
    store.insert_account(&account).await?;
    let teacher = Teacher {
        id: Uuid::new_v4(),
        account: account.id,
        name: "Teacher".into(),
        contact_number: "0300-1111111".into(),
        subject_specialization: "Mathematics".into(),
        qualifications: "MSc".into(),
        campuses,
        created_by: admin.account,
        created_at: Utc::now(),
    };
    store.insert_teacher(&teacher).await?;
    let actor = actor(account.id, Role::Teacher, teacher.campuses.first().copied());
    Ok((teacher, actor))
}

pub async fn seed_student(
    store: &dyn Store,
    admin: &Actor,
    name: &str,
    campus: Option<Uuid>,
) -> anyhow::Result<(Student, Actor)> {
    let account = Account::new(
        format!("student-{}@example.test", Uuid::new_v4().simple()),
        hash_password("student-pass"),
        Role::Student,
        campus,
    );
    store.insert_account(&account).await?;
    let student = Student {
        id: Uuid::new_v4(),
        account: account.id,
        name: name.to_string(),
        cnic: format!("35202-{}", Uuid::new_v4().simple()),
        phone: "0300-2222222".into(),
        city: None,
        pnc_no: None,
        passport: None,
        qualifications: None,
        campus,
        courses: Vec::new(),
        document_status: DocumentVerification::NotVerified,
        created_by: admin.account,
        created_at: Utc::now(),
    };
    store.insert_student(&student).await?;
    let actor = actor(account.id, Role::Student, campus);
    Ok((student, actor))
}

pub async fn seed_course(
    store: &dyn Store,
    admin: &Actor,
    code: &str,
    campus: Option<Uuid>,
) -> anyhow::Result<Course> {
    let course = Course {
        id: Uuid::new_v4(),
        name: format!("Course {}", code),
        code: code.to_string(),
        description: None,
        credit_hours: Some(3),
        teachers: Vec::new(),
        students: Vec::new(),
        campus,
        start_date: None,
        end_date: None,
        created_by: admin.account,
        created_at: Utc::now(),
    };
    store.insert_course(&course).await?;
    if let Some(campus_id) = campus {
        if let Some(mut campus) = store.campus(campus_id).await? {
            campus.courses.push(course.id);
            store.update_campus(&campus).await?;
        }
    }
    Ok(course)
}

/// Put a teacher on a course (and keep the campus links coherent) without
/// going through the assignment workflow under test.
pub async fn enroll_teacher(
    store: &dyn Store,
    course: &Course,
    teacher: &Teacher,
) -> anyhow::Result<()> {
    let mut course = course.clone();
    course.teachers.push(teacher.id);
    store.update_course(&course).await?;
    Ok(())
}

pub async fn enroll_student(
    store: &dyn Store,
    course: &Course,
    student: &Student,
) -> anyhow::Result<()> {
    let mut course = store
        .course(course.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("course missing"))?;
    course.students.push(student.id);
    store.update_course(&course).await?;
    let mut student = student.clone();
    student.courses.push(course.id);
    store.update_student(&student).await?;
    Ok(())
}
