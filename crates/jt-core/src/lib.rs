pub mod config;
pub mod directives;
pub mod errors;
pub mod ids;
pub mod lookup;
pub mod resolver;
pub mod types;

pub use directives::DirectiveTable;
pub use errors::TopicError;
pub use lookup::{IdentityLookup, InMemoryJobStore};
pub use resolver::TopicResolver;
pub use types::{EntityIdentity, JobCategory, TopicDirective};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
