mod execution;
mod financial;
mod ideas;
mod lists;
mod narrative;
mod normalize;
mod parser;
mod personalize;
mod pipeline;
mod questions;
mod risks;
mod sections;
mod timeline;
mod types;
#[cfg(test)]
mod tests;

pub use self::parser::ReportParser;
pub use self::pipeline::DEFAULT_MAX_IDEAS;
pub use self::types::*;
