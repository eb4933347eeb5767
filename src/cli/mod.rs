pub mod discovery;
pub mod output;
pub mod terms;
