mod account;
mod assertion;
mod public_id;
mod session;

pub use account::*;
pub use assertion::*;
pub use public_id::*;
pub use session::*;
