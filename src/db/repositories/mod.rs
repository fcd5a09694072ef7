pub mod exams;

pub use exams::{ExamRepository, STORAGE_KEY};
