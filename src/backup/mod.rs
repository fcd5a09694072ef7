//! JSON backup: export the collection and replace it from a backup file.

pub mod commands;
pub mod export;
pub mod import;

pub use export::{export_document, export_file_name, write_export, ExportDocument};
pub use import::{import_backup, ImportOutcome, ImportPlan};
