pub mod bootstrap;
pub mod compile;
pub mod dispatch;
pub mod files;
pub mod history;
pub mod reset;
pub mod resolve;
pub mod save;
pub mod shared;
pub mod status;
pub mod test;
