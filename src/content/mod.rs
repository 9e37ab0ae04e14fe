pub mod parser;
pub mod record;
pub mod state;

pub use parser::{parse, MalformedDocument};
pub use record::ContentRecord;
pub use state::{ContentPhase, ContentState, Thumbnail};
