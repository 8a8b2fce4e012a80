pub mod channel;
pub mod delivery;
pub mod error;
pub mod message;

pub use channel::Channel;
pub use delivery::{ChannelKind, Delivery, Receipt};
pub use error::ChannelError;
pub use message::{Message, MessageError};
