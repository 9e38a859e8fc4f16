pub mod m202508010001_create_users;
pub mod m202508010002_create_courses;
pub mod m202508010003_create_classes;
pub mod m202508010004_create_attendance;
pub mod m202508010005_create_assignments;
