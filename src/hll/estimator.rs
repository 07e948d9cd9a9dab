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

//! Harmonic-mean estimator state for the HyperLogLog sketch.
//!
//! The estimator carries the running sum of inverse register powers,
//! `sum(2^-registers[i])`, updated in lockstep with every register write.
//! Keeping the sum current makes the cardinality estimate O(1) instead of
//! requiring a full register scan per query.

/// Running harmonic sum plus the bias-correction constant for the current
/// register count.
///
/// The estimator has two regimes:
/// - **Harmonic mean**: `alpha / sum_of_inverses`, the standard bias-corrected
///   estimator.
/// - **Linear counting**: `k * ln(k / zeros)`, used while registers are still
///   mostly empty and the harmonic estimate sits below `2.5 * k`.
#[derive(Debug, Clone)]
pub struct HarmonicEstimator {
    /// Bias correction, a pure function of the register count.
    alpha: f64,
    /// Running sum of 2^-value over all registers.
    sum_of_inverses: f64,
}

impl HarmonicEstimator {
    /// Create an estimator for a sketch with `2^precision` zeroed registers.
    pub fn new(precision: u8) -> Self {
        let k = 1usize << precision;
        Self {
            alpha: alpha(k),
            // All registers start at 0, contributing 2^0 = 1 each.
            sum_of_inverses: k as f64,
        }
    }

    /// Rebuild the estimator from a full register array.
    ///
    /// Used after operations that touch an unbounded number of registers,
    /// where incremental maintenance has no advantage.
    pub fn from_registers(registers: &[u8]) -> Self {
        let mut sum = 0.0;
        for &value in registers {
            sum += inv_pow2(value);
        }
        Self {
            alpha: alpha(registers.len()),
            sum_of_inverses: sum,
        }
    }

    /// Account for one register changing from `old_value` to `new_value`.
    pub fn update(&mut self, old_value: u8, new_value: u8) {
        self.sum_of_inverses += inv_pow2(new_value) - inv_pow2(old_value);
    }

    /// Current cardinality estimate, before rounding.
    ///
    /// `num_zeros` is the count of registers still at 0; it selects the
    /// linear-counting regime for small cardinalities.
    pub fn estimate(&self, precision: u8, num_zeros: u32) -> f64 {
        let k = (1usize << precision) as f64;
        let raw = self.alpha / self.sum_of_inverses;

        if num_zeros > 0 && raw < 2.5 * k {
            return k * (k / num_zeros as f64).ln();
        }

        raw
    }

    /// The running harmonic sum, for consistency checks.
    #[cfg(test)]
    pub fn sum_of_inverses(&self) -> f64 {
        self.sum_of_inverses
    }
}

/// Bias correction constant for `k` registers.
fn alpha(k: usize) -> f64 {
    let k = k as f64;
    0.7213 / (1.0 + 1.079 / k) * k * k
}

/// Compute 1 / 2^value (inverse power of 2)
#[inline]
fn inv_pow2(value: u8) -> f64 {
    if value == 0 {
        1.0
    } else if value <= 63 {
        1.0 / (1u64 << value) as f64
    } else {
        f64::exp2(-(value as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_sum_is_register_count() {
        let est = HarmonicEstimator::new(10);
        assert_eq!(est.sum_of_inverses(), 1024.0);
    }

    #[test]
    fn test_empty_estimate_is_zero() {
        // All 1024 registers at zero puts linear counting at k * ln(1) = 0.
        let est = HarmonicEstimator::new(10);
        assert_eq!(est.estimate(10, 1024), 0.0);
    }

    #[test]
    fn test_update_tracks_inverse_powers() {
        let mut est = HarmonicEstimator::new(8);
        est.update(0, 10);
        let expected = 256.0 - 1.0 + 1.0 / 1024.0;
        assert!((est.sum_of_inverses() - expected).abs() < 1e-12);

        // Raising the same register again removes the old contribution.
        est.update(10, 20);
        let expected = 256.0 - 1.0 + 1.0 / (1u64 << 20) as f64;
        assert!((est.sum_of_inverses() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_from_registers_matches_incremental() {
        let mut est = HarmonicEstimator::new(4);
        let mut registers = vec![0u8; 16];
        for (i, value) in [3u8, 7, 1, 12, 64, 97].iter().enumerate() {
            est.update(registers[i], *value);
            registers[i] = *value;
        }

        let rebuilt = HarmonicEstimator::from_registers(&registers);
        let relative = (est.sum_of_inverses() - rebuilt.sum_of_inverses()).abs()
            / rebuilt.sum_of_inverses();
        assert!(relative < 1e-9);
    }

    #[test]
    fn test_linear_counting_regime() {
        // One non-empty register out of 16: k * ln(16 / 15).
        let mut est = HarmonicEstimator::new(4);
        est.update(0, 5);
        let expected = 16.0 * (16.0f64 / 15.0).ln();
        assert!((est.estimate(4, 15) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_harmonic_regime_without_zeros() {
        // No zero registers forces the harmonic branch regardless of size.
        let registers = vec![1u8; 16];
        let est = HarmonicEstimator::from_registers(&registers);
        let expected = alpha(16) / 8.0; // sum = 16 * 0.5
        assert!((est.estimate(4, 0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_alpha_formula() {
        let k = 1024.0;
        let expected = 0.7213 / (1.0 + 1.079 / k) * k * k;
        assert!((alpha(1024) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_inv_pow2_range() {
        assert_eq!(inv_pow2(0), 1.0);
        assert_eq!(inv_pow2(1), 0.5);
        assert_eq!(inv_pow2(63), 1.0 / (1u64 << 63) as f64);
        // Beyond the shiftable range the helper stays finite and positive.
        assert!(inv_pow2(64) > 0.0);
        assert!(inv_pow2(97) > 0.0);
        assert!(inv_pow2(97) < inv_pow2(64));
    }
}
