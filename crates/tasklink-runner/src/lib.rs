pub mod config;
pub mod dry_run;
pub mod pr;
pub mod release;
