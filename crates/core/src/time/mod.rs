//! Time expression resolution
//!
//! Turns fuzzy, possibly multilingual time expressions ("next Tuesday
//! 9:30am", "8月16日 下午5点") into UTC instants anchored to a reference
//! instant and a home timezone.

mod patterns;
mod resolver;

pub use resolver::TimeResolver;
