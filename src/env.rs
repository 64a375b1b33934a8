mod connect_x;

pub use connect_x::{ConnectX, Outcome, EMPTY};
