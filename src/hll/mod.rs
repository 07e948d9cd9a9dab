// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! HyperLogLog sketch for cardinality estimation.
//!
//! A sketch with precision `p` keeps `2^p` one-byte registers. Each incoming
//! 128-bit hash selects one register from the top `p` bits of its first word
//! and writes the maximum observed *rank* (trailing-zero run of the remaining
//! 96 bits, plus one) into it. The harmonic mean of the registers yields the
//! cardinality estimate; a linear-counting branch covers the small range where
//! many registers are still empty.
//!
//! Standard error is `1.04 / sqrt(2^p)`:
//!
//! - precision 10: 1024 registers, ~3.25%
//! - precision 12: 4096 registers, ~1.62%
//! - precision 14: 16384 registers, ~0.81%
//!
//! Sketches are mergeable. Merging two sketches of different precision folds
//! registers down to the coarser precision, so a fleet of workers can each
//! keep a private sketch and periodically combine them.

mod estimator;
mod serialization;
mod sketch;
mod union;

// Re-export public API
pub use sketch::HllSketch;
pub use union::HllUnion;

/// Smallest accepted precision.
pub const MIN_PRECISION: u8 = 1;
/// Largest accepted precision. Bounds the register array at 2 MiB.
pub const MAX_PRECISION: u8 = 21;

/// Number of low-order hash bits examined by the rank scan.
const RANK_BITS: u32 = 96;

/// Select the register for a hash: the top `precision` bits of word 0.
#[inline]
fn bucket_index(word0: u32, precision: u8) -> usize {
    (word0 >> (32 - precision)) as usize
}

/// Rank of a hash: one plus the trailing-zero run of its low 96 bits.
///
/// Words 3, 2 and 1 are scanned from the least significant bit upward, in
/// that order. An all-zero remainder is capped at the 96 bits examined, so
/// the result is always in `[1, 97]` and fits a register byte.
#[inline]
fn hash_rank(hash: [u32; 4]) -> u8 {
    let remainder = ((hash[1] as u128) << 64) | ((hash[2] as u128) << 32) | (hash[3] as u128);
    let zeros = remainder.trailing_zeros().min(RANK_BITS);
    (zeros + 1) as u8
}
