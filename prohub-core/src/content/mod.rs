pub mod approval;
pub mod defaults;
pub mod resolver;

pub use approval::{approve_content, list_content, stage_content, ContentListItem, ContentSummary};
pub use defaults::{fill_template, generate_default_content, BRAND};
pub use resolver::{ContentResolver, ContentSource, ResolvedContent};
