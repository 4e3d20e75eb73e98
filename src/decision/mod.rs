pub mod break_even;

pub use break_even::{compute_break_even, BreakEven, Calculation};
