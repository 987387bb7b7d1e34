pub mod cli;
pub mod error;
pub mod formatting;
pub mod github;
pub mod icons;
pub mod input;
pub mod model;
pub mod parser;
pub mod publish;
pub mod render;

pub use parser::parse_report;
pub use render::render_report_summary;
