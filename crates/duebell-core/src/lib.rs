pub mod error;
pub mod issue;
pub mod mapping;
pub mod message;
pub mod text;

pub use error::DuebellError;
pub use issue::{Assignee, Issue, ProjectRef};
pub use mapping::IdentityMapping;
pub use message::{build_message, Block, ChatMessage};
pub use text::truncate_for_error;
