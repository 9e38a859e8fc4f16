pub mod assignment;
pub mod attendance_entry;
pub mod attendance_record;
pub mod class_session;
pub mod class_slot;
pub mod class_student;
pub mod course;
pub mod student_submission;
pub mod submission_group;
pub mod unit;
pub mod user;

pub use assignment::Entity as Assignment;
pub use attendance_entry::Entity as AttendanceEntry;
pub use attendance_record::Entity as AttendanceRecord;
pub use class_session::Entity as ClassSession;
pub use class_slot::Entity as ClassSlot;
pub use class_student::Entity as ClassStudent;
pub use course::Entity as Course;
pub use student_submission::Entity as StudentSubmission;
pub use submission_group::Entity as SubmissionGroup;
pub use unit::Entity as Unit;
pub use user::Entity as User;
