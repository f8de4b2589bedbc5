// Adapters layer: concrete implementations of the domain ports (snapshot storage, Seek parsing, heuristics).

pub mod heuristics;
pub mod seek;
pub mod storage;
