pub mod check;
pub mod clear;
pub mod parse;
pub mod runs;
pub mod save;
mod source;
