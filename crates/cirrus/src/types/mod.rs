//! Request and response records for every service
//!
//! Response records derive `Default` so that an empty 2xx body decodes to an
//! empty record, and tolerate missing fields.

pub use auth::*;
pub use ingest::*;
pub use page::Page;
pub use prompts::*;
pub use storage::*;

pub mod auth;
pub mod ingest;
pub mod page;
pub mod prompts;
pub mod storage;
