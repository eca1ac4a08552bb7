//! Calculator core of a personal-finance app: a hardened arithmetic
//! evaluator, its history, and the finance formulas shown beside it.

pub mod calculator;
pub mod config;
pub mod formulas;
pub mod history;
