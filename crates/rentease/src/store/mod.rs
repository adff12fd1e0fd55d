//! Persistence gateways behind the marketplace repository traits.

pub mod documents;
pub mod memory;
pub mod mongo;

pub use documents::PropertyDocument;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
