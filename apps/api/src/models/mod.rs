pub mod idea;
pub mod rate_limit;
pub mod verdict;

pub use verdict::Verdict;
