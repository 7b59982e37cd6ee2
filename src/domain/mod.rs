// Domain layer - Dashboard entities and pure rules
pub mod alert;
pub mod dashboard;
pub mod device;
pub mod metric;
pub mod section;
pub mod summary;
