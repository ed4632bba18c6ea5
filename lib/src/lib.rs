pub use columnar::*;
pub use debug::*;
pub use error::*;
pub use free_list::*;
pub use linked::*;
pub use node::*;
pub use path::*;
pub use red_black_tree::*;
pub use tree::*;
pub use utils::*;

pub mod columnar;
pub mod debug;
pub mod error;
pub mod free_list;
pub mod linked;
pub mod node;
pub mod path;
pub mod red_black_tree;
pub mod tree;
pub mod utils;
