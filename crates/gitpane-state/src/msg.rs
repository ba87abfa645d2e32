mod effect;
mod message;

pub use effect::Effect;
pub use message::{IndexAction, Msg};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreEvent {
    StateChanged,
}
