pub mod channel;
pub mod order;
