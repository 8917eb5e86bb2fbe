mod enums;
mod market;
mod order;
mod orderbook;

pub use enums::*;
pub use market::*;
pub use order::*;
pub use orderbook::*;
