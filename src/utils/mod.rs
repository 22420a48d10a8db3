pub mod constants;
pub mod text;

pub use constants::*;
pub use text::truncate_on_char_boundary;
