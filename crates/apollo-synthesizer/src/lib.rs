#![doc = include_str!("../README.md")]

#[macro_use]
mod macros;
pub mod ast;
pub mod collections;
pub mod intern;
mod name;
mod node;
pub mod schema;
pub mod synthesizer;

pub use self::intern::InternCache;
pub use self::name::InvalidNameError;
pub use self::name::Name;
pub use self::node::Node;
pub use self::schema::Schema;
pub use self::synthesizer::synthesize;
pub use self::synthesizer::FieldSelection;
pub use self::synthesizer::OperationSynthesizer;
pub use self::synthesizer::SynthesisError;
pub use self::synthesizer::SynthesisOptions;
