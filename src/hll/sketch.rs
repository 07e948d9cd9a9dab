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

use std::fmt;
use std::hash::Hash;

use crate::error::Error;
use crate::hash;
use crate::hll::estimator::HarmonicEstimator;
use crate::hll::serialization;
use crate::hll::{MAX_PRECISION, MIN_PRECISION, bucket_index, hash_rank};

/// A HyperLogLog sketch with `2^precision` one-byte registers.
///
/// The sketch is a plain single-owner value: updates and merges mutate it in
/// place, queries read it, and nothing inside it blocks or locks. Concurrent
/// producers should each keep their own sketch and combine them with
/// [`HllSketch::merge`] or [`crate::hll::HllUnion`].
pub struct HllSketch {
    precision: u8,
    /// Direct byte array: registers[bucket] = max observed rank
    registers: Box<[u8]>,
    /// Count of registers with value 0
    num_zeros: u32,
    /// Harmonic-sum estimator kept in lockstep with the registers
    estimator: HarmonicEstimator,
}

impl HllSketch {
    /// Create an empty sketch.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is not in `[MIN_PRECISION, MAX_PRECISION]`.
    pub fn new(precision: u8) -> Self {
        assert!(
            (MIN_PRECISION..=MAX_PRECISION).contains(&precision),
            "precision must be in [{}, {}], got {}",
            MIN_PRECISION,
            MAX_PRECISION,
            precision
        );

        let k = 1usize << precision;
        Self {
            precision,
            registers: vec![0u8; k].into_boxed_slice(),
            num_zeros: k as u32,
            estimator: HarmonicEstimator::new(precision),
        }
    }

    /// Rebuild a sketch from a register array, rescanning both aggregates.
    ///
    /// The caller has already validated the precision and array length.
    pub(crate) fn from_registers(precision: u8, registers: Box<[u8]>) -> Self {
        let num_zeros = registers.iter().filter(|&&v| v == 0).count() as u32;
        let estimator = HarmonicEstimator::from_registers(&registers);
        Self {
            precision,
            registers,
            num_zeros,
            estimator,
        }
    }

    /// Number of high-order hash bits used for register selection.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers, `2^precision`.
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Value of one register.
    #[inline]
    pub fn register(&self, bucket: usize) -> u8 {
        self.registers[bucket]
    }

    /// Count of registers still at zero.
    pub fn num_zeros(&self) -> u32 {
        self.num_zeros
    }

    /// Whether no update has touched any register yet.
    pub fn is_empty(&self) -> bool {
        self.num_zeros as usize == self.registers.len()
    }

    /// Hash an item and fold it into the sketch.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.update_hash(hash::words(item));
    }

    /// Fold a precomputed 128-bit hash into the sketch.
    ///
    /// The hash is four 32-bit words, most significant word first, and must
    /// come from a uniformly distributed hash function. Exactly one register
    /// is examined; it and the running aggregates change only when the hash
    /// carries a new maximum rank for its bucket.
    pub fn update_hash(&mut self, hash: [u32; 4]) {
        let bucket = bucket_index(hash[0], self.precision);
        let new_value = hash_rank(hash);
        let old_value = self.registers[bucket];

        if new_value > old_value {
            self.estimator.update(old_value, new_value);
            if old_value == 0 {
                self.num_zeros -= 1;
            }
            self.registers[bucket] = new_value;
        }
    }

    /// Current cardinality estimate, before rounding.
    pub fn estimate(&self) -> f64 {
        self.estimator.estimate(self.precision, self.num_zeros)
    }

    /// Current cardinality estimate, rounded to the nearest integer.
    pub fn count(&self) -> u64 {
        (self.estimate() + 0.5).floor() as u64
    }

    /// Theoretical standard error of the estimate, `1.04 / sqrt(2^precision)`.
    pub fn relative_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }

    /// Merge another sketch into this one.
    ///
    /// Afterwards this sketch is equivalent to one that observed both
    /// underlying streams. The result always has the *coarser* of the two
    /// precisions: when the other sketch is coarser, this sketch's registers
    /// are folded down (blocks of `2^diff` registers collapse into one by
    /// maximum) and its register array is replaced; when the other sketch is
    /// finer or equal, its registers fold into this one in place.
    ///
    /// Register-wise maximum is the correct union because each register holds
    /// the maximum rank observed for its bucket across either stream.
    pub fn merge(&mut self, other: &HllSketch) {
        if self.precision > other.precision {
            // Reduce to the other sketch's precision: each target register is
            // the max of the other's register and the block of this sketch's
            // registers that shares its high-order index bits.
            let block_len = 1usize << (self.precision - other.precision);
            let mut reduced = vec![0u8; other.registers.len()].into_boxed_slice();

            for ((target, block), &coarse) in reduced
                .iter_mut()
                .zip(self.registers.chunks_exact(block_len))
                .zip(other.registers.iter())
            {
                *target = block.iter().copied().fold(coarse, u8::max);
            }

            self.registers = reduced;
            self.precision = other.precision;
        } else {
            // Fold the other sketch's finer registers down into this array.
            let shift = other.precision - self.precision;
            for (source, &value) in other.registers.iter().enumerate() {
                let bucket = source >> shift;
                if value > self.registers[bucket] {
                    self.registers[bucket] = value;
                }
            }
        }

        // The number of changed registers is unbounded, so both aggregates
        // are recomputed from scratch rather than maintained incrementally.
        self.rebuild_aggregates();
    }

    /// Serialize the sketch into bytes: preamble plus raw register array.
    pub fn serialize(&self) -> Vec<u8> {
        serialization::serialize(self)
    }

    /// Reconstruct a sketch from [`HllSketch::serialize`] output.
    pub fn deserialize(bytes: &[u8]) -> Result<HllSketch, Error> {
        serialization::deserialize(bytes)
    }

    pub(crate) fn registers(&self) -> &[u8] {
        &self.registers
    }

    fn rebuild_aggregates(&mut self) {
        self.num_zeros = self.registers.iter().filter(|&&v| v == 0).count() as u32;
        self.estimator = HarmonicEstimator::from_registers(&self.registers);
    }
}

impl Clone for HllSketch {
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            registers: self.registers.clone(),
            num_zeros: self.num_zeros,
            estimator: self.estimator.clone(),
        }
    }
}

impl PartialEq for HllSketch {
    /// Sketches are equal when precision and registers match; the aggregates
    /// are derived state.
    fn eq(&self, other: &Self) -> bool {
        self.precision == other.precision && self.registers == other.registers
    }
}

impl fmt::Debug for HllSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HllSketch")
            .field("precision", &self.precision)
            .field("num_zeros", &self.num_zeros)
            .field("estimate", &self.estimate())
            .finish()
    }
}
