//! LED model — physical LEDs, group aliases, colours and statuses.

mod color;
mod model;

pub use color::{Color, NAMED_COLORS};
pub use model::{
    Address, BINMASK_BITS, Led, LedSet, MAX_BINMASK, MAX_INTENSITY, Status, binmask_bit,
    binmask_statuses,
};
