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

//! Union accumulator for combining multiple HLL sketches.
//!
//! The union keeps an internal "gadget" sketch that absorbs every input
//! sketch. Inputs may have any precision: finer sketches fold down into the
//! gadget, coarser sketches pull the gadget down to their precision. Unlike a
//! bare [`HllSketch::merge`], the union skips empty inputs, so an unused
//! low-precision sketch cannot degrade the accumulated result.

use crate::hll::{HllSketch, MAX_PRECISION, MIN_PRECISION};

/// An accumulator over any number of sketches, yielding their union.
#[derive(Debug, Clone)]
pub struct HllUnion {
    /// Precision the gadget starts at; inputs can only lower it.
    max_precision: u8,
    /// Internal sketch that accumulates the union
    gadget: HllSketch,
}

impl HllUnion {
    /// Create an empty union whose result has at most `max_precision`.
    ///
    /// # Panics
    ///
    /// Panics if `max_precision` is not in `[MIN_PRECISION, MAX_PRECISION]`.
    pub fn new(max_precision: u8) -> Self {
        assert!(
            (MIN_PRECISION..=MAX_PRECISION).contains(&max_precision),
            "max_precision must be in [{}, {}], got {}",
            MIN_PRECISION,
            MAX_PRECISION,
            max_precision
        );

        Self {
            max_precision,
            gadget: HllSketch::new(max_precision),
        }
    }

    /// Absorb one sketch into the union.
    ///
    /// Empty sketches are ignored; a non-empty sketch coarser than the gadget
    /// reduces the gadget to its precision, and a finer one folds down into
    /// it.
    pub fn update(&mut self, sketch: &HllSketch) {
        if sketch.is_empty() {
            return;
        }
        self.gadget.merge(sketch);
    }

    /// A copy of the accumulated sketch.
    pub fn get_result(&self) -> HllSketch {
        self.gadget.clone()
    }

    /// Cardinality estimate of the union so far.
    pub fn estimate(&self) -> f64 {
        self.gadget.estimate()
    }

    /// Whether any non-empty sketch has been absorbed.
    pub fn is_empty(&self) -> bool {
        self.gadget.is_empty()
    }

    /// Current precision of the accumulated sketch.
    pub fn precision(&self) -> u8 {
        self.gadget.precision()
    }

    /// The precision this union started at.
    pub fn max_precision(&self) -> u8 {
        self.max_precision
    }

    /// Discard all accumulated state and return to `max_precision`.
    pub fn reset(&mut self) {
        self.gadget = HllSketch::new(self.max_precision);
    }
}
