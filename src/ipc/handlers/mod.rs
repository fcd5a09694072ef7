pub mod backup;
pub mod exams;
pub mod settings;
pub mod views;
