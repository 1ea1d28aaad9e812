pub mod compile;
pub mod course;
pub mod reset;
pub mod save;
pub mod status;
pub mod test_run;
