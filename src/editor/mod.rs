pub mod draft;
pub mod paste;

pub use draft::ExamDraft;
pub use paste::parse_pasted_nodes;
