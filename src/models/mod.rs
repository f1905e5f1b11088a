pub mod account;
pub mod assessment;
pub mod attendance;
pub mod campus;
pub mod course;
pub mod document;
pub mod lesson_plan;
pub mod notification;
pub mod profiles;

pub use account::{Account, AccountView};
pub use assessment::AssessmentRow;
pub use attendance::AttendanceRecord;
pub use campus::Campus;
pub use course::Course;
pub use document::Document;
pub use lesson_plan::{LessonCell, LessonPlan, LessonPlanHead, TIME_SLOTS, TOPIC_CELLS};
pub use notification::Notification;
pub use profiles::{AdminProfile, Coordinator, Student, Teacher};
