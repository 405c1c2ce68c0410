#![forbid(unsafe_code)]

pub mod deck;
pub mod model;
pub mod session;
pub mod wheel;

pub use deck::DeckManager;
pub use session::{SessionError, SessionState};
pub use wheel::{SpinOutcome, Wheel};
