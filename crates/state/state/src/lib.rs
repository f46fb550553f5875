pub mod error;
pub mod key;
pub mod store;
pub mod testing;
pub mod typed;

pub use error::StateError;
pub use key::Collection;
pub use store::{CasResult, Document, DocumentStore};
