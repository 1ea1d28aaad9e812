pub mod key;
pub mod lesson;
pub mod limit;
