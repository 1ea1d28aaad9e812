//! Repository modules. Each adds methods to `LecternService`.

pub mod compilation;
pub mod progress;
pub mod source_file;
pub mod test_result;
