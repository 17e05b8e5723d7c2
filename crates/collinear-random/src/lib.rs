//! Seeded random number generation for reproducible sampling.
//!
//! This crate provides [`SparkXorShiftRandom`], an xorshift generator that
//! produces the same uniform sequence as Spark's `XORShiftRandom`, so that
//! row partitions drawn here agree with `randomSplit` for equal seeds.

mod xorshift;

pub use xorshift::SparkXorShiftRandom;
