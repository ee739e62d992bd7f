mod dump;
mod timeit;

pub use dump::DebugDump;
