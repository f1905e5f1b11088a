//! In-memory document store used by the test suite and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Account, AdminProfile, AssessmentRow, AttendanceRecord, Campus, Coordinator, Course, Document,
    LessonPlan, Notification, Student, Teacher,
};

use super::{
    AccountRepo, AdminRepo, AssessmentRepo, AttendanceRepo, CampusRepo, CoordinatorRepo,
    CourseRepo, DocumentRepo, LessonPlanRepo, NotificationRepo, StoreResult, StudentRepo,
    TeacherRepo,
};

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    admins: HashMap<Uuid, AdminProfile>,
    coordinators: HashMap<Uuid, Coordinator>,
    teachers: HashMap<Uuid, Teacher>,
    students: HashMap<Uuid, Student>,
    campuses: HashMap<Uuid, Campus>,
    courses: HashMap<Uuid, Course>,
    attendance: Vec<AttendanceRecord>,
    assessment_rows: HashMap<(Uuid, Uuid, Uuid), AssessmentRow>,
    documents: HashMap<Uuid, Document>,
    lesson_plans: HashMap<Uuid, LessonPlan>,
    notifications: Vec<Notification>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepo for MemoryStore {
    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .state
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn insert_account(&self, account: &Account) -> StoreResult<()> {
        self.state.write().await.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> StoreResult<()> {
        self.state.write().await.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> StoreResult<()> {
        self.state.write().await.accounts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AdminRepo for MemoryStore {
    async fn admin_by_account(&self, account: Uuid) -> StoreResult<Option<AdminProfile>> {
        Ok(self
            .state
            .read()
            .await
            .admins
            .values()
            .find(|a| a.account == account)
            .cloned())
    }

    async fn insert_admin(&self, admin: &AdminProfile) -> StoreResult<()> {
        self.state.write().await.admins.insert(admin.id, admin.clone());
        Ok(())
    }
}

#[async_trait]
impl CoordinatorRepo for MemoryStore {
    async fn coordinator(&self, id: Uuid) -> StoreResult<Option<Coordinator>> {
        Ok(self.state.read().await.coordinators.get(&id).cloned())
    }

    async fn coordinator_by_account(&self, account: Uuid) -> StoreResult<Option<Coordinator>> {
        Ok(self
            .state
            .read()
            .await
            .coordinators
            .values()
            .find(|c| c.account == account)
            .cloned())
    }

    async fn insert_coordinator(&self, coordinator: &Coordinator) -> StoreResult<()> {
        self.state
            .write()
            .await
            .coordinators
            .insert(coordinator.id, coordinator.clone());
        Ok(())
    }

    async fn update_coordinator(&self, coordinator: &Coordinator) -> StoreResult<()> {
        self.insert_coordinator(coordinator).await
    }

    async fn delete_coordinator(&self, id: Uuid) -> StoreResult<()> {
        self.state.write().await.coordinators.remove(&id);
        Ok(())
    }

    async fn list_coordinators(&self) -> StoreResult<Vec<Coordinator>> {
        Ok(self.state.read().await.coordinators.values().cloned().collect())
    }
}

#[async_trait]
impl TeacherRepo for MemoryStore {
    async fn teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>> {
        Ok(self.state.read().await.teachers.get(&id).cloned())
    }

    async fn teacher_by_account(&self, account: Uuid) -> StoreResult<Option<Teacher>> {
        Ok(self
            .state
            .read()
            .await
            .teachers
            .values()
            .find(|t| t.account == account)
            .cloned())
    }

    async fn insert_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        self.state.write().await.teachers.insert(teacher.id, teacher.clone());
        Ok(())
    }

    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        self.insert_teacher(teacher).await
    }

    async fn delete_teacher(&self, id: Uuid) -> StoreResult<()> {
        self.state.write().await.teachers.remove(&id);
        Ok(())
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        Ok(self.state.read().await.teachers.values().cloned().collect())
    }

    async fn teachers_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Teacher>> {
        Ok(self
            .state
            .read()
            .await
            .teachers
            .values()
            .filter(|t| t.campuses.contains(&campus))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StudentRepo for MemoryStore {
    async fn student(&self, id: Uuid) -> StoreResult<Option<Student>> {
        Ok(self.state.read().await.students.get(&id).cloned())
    }

    async fn student_by_account(&self, account: Uuid) -> StoreResult<Option<Student>> {
        Ok(self
            .state
            .read()
            .await
            .students
            .values()
            .find(|s| s.account == account)
            .cloned())
    }

    async fn student_by_cnic(&self, cnic: &str) -> StoreResult<Option<Student>> {
        Ok(self
            .state
            .read()
            .await
            .students
            .values()
            .find(|s| s.cnic == cnic)
            .cloned())
    }

    async fn students(&self, ids: &[Uuid]) -> StoreResult<Vec<Student>> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.students.get(id).cloned()).collect())
    }

    async fn insert_student(&self, student: &Student) -> StoreResult<()> {
        self.state.write().await.students.insert(student.id, student.clone());
        Ok(())
    }

    async fn update_student(&self, student: &Student) -> StoreResult<()> {
        self.insert_student(student).await
    }

    async fn delete_student(&self, id: Uuid) -> StoreResult<()> {
        self.state.write().await.students.remove(&id);
        Ok(())
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.state.read().await.students.values().cloned().collect())
    }

    async fn students_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Student>> {
        Ok(self
            .state
            .read()
            .await
            .students
            .values()
            .filter(|s| s.campus == Some(campus))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CampusRepo for MemoryStore {
    async fn campus(&self, id: Uuid) -> StoreResult<Option<Campus>> {
        Ok(self.state.read().await.campuses.get(&id).cloned())
    }

    async fn campus_by_name(&self, name: &str) -> StoreResult<Option<Campus>> {
        Ok(self
            .state
            .read()
            .await
            .campuses
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn insert_campus(&self, campus: &Campus) -> StoreResult<()> {
        self.state.write().await.campuses.insert(campus.id, campus.clone());
        Ok(())
    }

    async fn update_campus(&self, campus: &Campus) -> StoreResult<()> {
        self.insert_campus(campus).await
    }

    async fn delete_campus(&self, id: Uuid) -> StoreResult<()> {
        self.state.write().await.campuses.remove(&id);
        Ok(())
    }

    async fn list_campuses(&self) -> StoreResult<Vec<Campus>> {
        Ok(self.state.read().await.campuses.values().cloned().collect())
    }
}

#[async_trait]
impl CourseRepo for MemoryStore {
    async fn course(&self, id: Uuid) -> StoreResult<Option<Course>> {
        Ok(self.state.read().await.courses.get(&id).cloned())
    }

    async fn course_by_code(&self, code: &str) -> StoreResult<Option<Course>> {
        Ok(self
            .state
            .read()
            .await
            .courses
            .values()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn courses(&self, ids: &[Uuid]) -> StoreResult<Vec<Course>> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.courses.get(id).cloned()).collect())
    }

    async fn insert_course(&self, course: &Course) -> StoreResult<()> {
        self.state.write().await.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update_course(&self, course: &Course) -> StoreResult<()> {
        self.insert_course(course).await
    }

    async fn delete_course(&self, id: Uuid) -> StoreResult<()> {
        self.state.write().await.courses.remove(&id);
        Ok(())
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        Ok(self.state.read().await.courses.values().cloned().collect())
    }

    async fn courses_by_campus(&self, campus: Uuid) -> StoreResult<Vec<Course>> {
        Ok(self
            .state
            .read()
            .await
            .courses
            .values()
            .filter(|c| c.campus == Some(campus))
            .cloned()
            .collect())
    }

    async fn courses_by_teacher(&self, teacher: Uuid) -> StoreResult<Vec<Course>> {
        Ok(self
            .state
            .read()
            .await
            .courses
            .values()
            .filter(|c| c.teachers.contains(&teacher))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttendanceRepo for MemoryStore {
    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
        self.state.write().await.attendance.push(record.clone());
        Ok(())
    }

    async fn insert_attendance_many(&self, records: &[AttendanceRecord]) -> StoreResult<()> {
        self.state.write().await.attendance.extend_from_slice(records);
        Ok(())
    }

    async fn attendance_by_course(&self, course: Uuid) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .state
            .read()
            .await
            .attendance
            .iter()
            .filter(|r| r.course == course)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn attendance_by_student(&self, student: Uuid) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .state
            .read()
            .await
            .attendance
            .iter()
            .filter(|r| r.student == student)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn count_attendance_by_courses(&self, courses: &[Uuid]) -> StoreResult<u64> {
        Ok(self
            .state
            .read()
            .await
            .attendance
            .iter()
            .filter(|r| courses.contains(&r.course))
            .count() as u64)
    }
}

#[async_trait]
impl AssessmentRepo for MemoryStore {
    async fn upsert_assessment_rows(&self, rows: &[AssessmentRow]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for row in rows {
            state.assessment_rows.insert(row.key(), row.clone());
        }
        Ok(())
    }

    async fn assessment_batch(&self, batch_id: Uuid) -> StoreResult<Vec<AssessmentRow>> {
        Ok(self
            .state
            .read()
            .await
            .assessment_rows
            .values()
            .filter(|r| r.batch_id == batch_id)
            .cloned()
            .collect())
    }

    async fn assessment_batch_sample(&self, batch_id: Uuid) -> StoreResult<Option<AssessmentRow>> {
        Ok(self
            .state
            .read()
            .await
            .assessment_rows
            .values()
            .find(|r| r.batch_id == batch_id)
            .cloned())
    }

    async fn assessments_by_course(&self, course: Uuid) -> StoreResult<Vec<AssessmentRow>> {
        let mut rows: Vec<_> = self
            .state
            .read()
            .await
            .assessment_rows
            .values()
            .filter(|r| r.course == course)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn assessments_by_student(&self, student: Uuid) -> StoreResult<Vec<AssessmentRow>> {
        let mut rows: Vec<_> = self
            .state
            .read()
            .await
            .assessment_rows
            .values()
            .filter(|r| r.student == student)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn delete_assessment_batch(&self, batch_id: Uuid) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.assessment_rows.len();
        state.assessment_rows.retain(|_, r| r.batch_id != batch_id);
        Ok((before - state.assessment_rows.len()) as u64)
    }

    async fn delete_assessment_row(&self, batch_id: Uuid, student: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.assessment_rows.len();
        state
            .assessment_rows
            .retain(|_, r| !(r.batch_id == batch_id && r.student == student));
        Ok(state.assessment_rows.len() < before)
    }
}

#[async_trait]
impl DocumentRepo for MemoryStore {
    async fn document(&self, id: Uuid) -> StoreResult<Option<Document>> {
        Ok(self.state.read().await.documents.get(&id).cloned())
    }

    async fn insert_document(&self, document: &Document) -> StoreResult<()> {
        self.state.write().await.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn update_document(&self, document: &Document) -> StoreResult<()> {
        self.insert_document(document).await
    }

    async fn documents_by_student(&self, student: Uuid) -> StoreResult<Vec<Document>> {
        Ok(self
            .state
            .read()
            .await
            .documents
            .values()
            .filter(|d| d.student == student)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LessonPlanRepo for MemoryStore {
    async fn lesson_plan(&self, id: Uuid) -> StoreResult<Option<LessonPlan>> {
        Ok(self.state.read().await.lesson_plans.get(&id).cloned())
    }

    async fn insert_lesson_plan(&self, plan: &LessonPlan) -> StoreResult<()> {
        self.state.write().await.lesson_plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn update_lesson_plan(&self, plan: &LessonPlan) -> StoreResult<()> {
        self.insert_lesson_plan(plan).await
    }

    async fn list_active_lesson_plans(&self) -> StoreResult<Vec<LessonPlan>> {
        let mut plans: Vec<_> = self
            .state
            .read()
            .await
            .lesson_plans
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(plans)
    }
}

#[async_trait]
impl NotificationRepo for MemoryStore {
    async fn notification(&self, id: Uuid) -> StoreResult<Option<Notification>> {
        Ok(self
            .state
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.state.write().await.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_notifications(&self) -> StoreResult<Vec<Notification>> {
        let mut notifications = self.state.read().await.notifications.clone();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}
