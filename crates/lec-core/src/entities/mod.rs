//! Entity structs for all Lectern domain records.
//!
//! Persisted entities map to tables in the libSQL database (see `lec-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and `JsonSchema`
//! for JSON roundtrip and schema validation.

mod compilation;
mod diagnostic;
mod progress;
mod source_file;
mod test_case;
mod test_result;

pub use compilation::CompilationResult;
pub use diagnostic::{Diagnostic, DiagnosticKey};
pub use progress::StudentProgress;
pub use source_file::SourceFile;
pub use test_case::{TestCase, TestSummary};
pub use test_result::TestResult;
