pub mod model;
pub mod parser;
pub mod path;
pub mod pattern;
