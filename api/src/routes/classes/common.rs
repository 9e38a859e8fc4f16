use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::error::DomainError;
use db::models::{
    attendance_entry::AttendanceStatus,
    class_session,
    class_slot::{SlotSpec, Weekday},
};

#[derive(Debug, Deserialize, Validate)]
pub struct SlotRequest {
    pub day: Weekday,

    #[validate(length(min = 1, max = 64, message = "Slot time must not be empty"))]
    pub time: String,
}

impl From<SlotRequest> for SlotSpec {
    fn from(req: SlotRequest) -> Self {
        SlotSpec {
            day: req.day,
            time: req.time,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    pub unit_id: i64,
    pub teacher_id: i64,

    #[validate(length(min = 1, max = 255, message = "Class name must not be empty"))]
    pub name: String,

    #[validate(range(min = 2000, message = "Year must be a calendar year"))]
    pub year: i32,

    #[validate(range(min = 1, max = 2, message = "Semester must be 1 or 2"))]
    pub semester: i32,

    #[validate(nested)]
    pub slots: Vec<SlotRequest>,

    #[serde(default)]
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClassRequest {
    pub unit_id: Option<i64>,
    pub teacher_id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Class name must not be empty"))]
    pub name: Option<String>,

    pub year: Option<i32>,
    pub semester: Option<i32>,

    #[validate(nested)]
    pub slots: Option<Vec<SlotRequest>>,

    /// Students to enroll on top of the existing roster.
    pub student_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub day: Weekday,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct ClassResponse {
    pub id: i64,
    pub unit_id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub year: i32,
    pub semester: i32,
    pub slots: Vec<SlotResponse>,
    pub students: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl ClassResponse {
    /// Builds the full response view, pulling the class's slots and roster.
    pub async fn load(
        db: &DatabaseConnection,
        class: class_session::Model,
    ) -> Result<Self, DomainError> {
        let slots = class_session::Model::slots(db, class.id)
            .await?
            .into_iter()
            .map(|s| SlotResponse {
                day: s.day,
                time: s.time,
            })
            .collect();
        let students = class_session::Model::roster(db, class.id).await?;

        Ok(Self {
            id: class.id,
            unit_id: class.unit_id,
            teacher_id: class.teacher_id,
            name: class.name,
            year: class.year,
            semester: class.semester,
            slots,
            students,
            created_at: class.created_at.to_rfc3339(),
            updated_at: class.updated_at.to_rfc3339(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AttendanceEntryRequest {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MarkAttendanceRequest {
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 255, message = "Topic must not be empty"))]
    pub topic: String,

    pub entries: Vec<AttendanceEntryRequest>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceEntryResponse {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize)]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    pub topic: String,
    pub entries: Vec<AttendanceEntryResponse>,
}

impl AttendanceRecordResponse {
    pub fn from_pair(
        record: db::models::attendance_record::Model,
        entries: Vec<db::models::attendance_entry::Model>,
    ) -> Self {
        Self {
            id: record.id,
            class_id: record.class_id,
            date: record.date,
            topic: record.topic,
            entries: entries
                .into_iter()
                .map(|e| AttendanceEntryResponse {
                    student_id: e.student_id,
                    status: e.status,
                })
                .collect(),
        }
    }
}
