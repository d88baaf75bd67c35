pub mod graph;
pub mod node;
pub mod value;

pub use graph::*;
pub use node::*;
pub use value::*;
