/// Alignment of prices, change points, and events onto one time axis.
pub mod align;
