mod border;
mod finder;

pub use border::Border;
pub use finder::{compute_borders, shared_border, BorderFinder};
