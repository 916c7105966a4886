pub mod messages;
pub mod prompt;
pub mod session;
pub mod types;
pub mod wire;

pub use prompt::*;
pub use session::*;
pub use types::*;
pub use wire::*;
