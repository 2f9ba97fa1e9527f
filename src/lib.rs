pub mod boxes;
pub mod reader;
pub mod emit;
pub mod known_boxes;
pub mod registry;
pub mod grammars;
pub mod descriptors;
pub mod parser;

pub use boxes::{BoxHeader, BoxKey, FourCC};
pub use emit::{Emitter, Options};
pub use parser::{dissect, read_box_header, Context};
pub use registry::{default_registry, Registry};
