pub mod input;
pub mod input_parser;
pub mod node;
pub mod tree;

pub use input::*;
pub use input_parser::*;
pub use node::*;
pub use tree::*;
