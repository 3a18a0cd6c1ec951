//! Output: console and JSON formatting, DOCX export

pub mod docx;
pub mod formatter;

pub use docx::{AcceptedChanges, DocxExporter, ExportRequest, ExportedDocument, ResumeDraft};
pub use formatter::{formatter_for, ConsoleFormatter, JsonFormatter, OutputFormatter};
