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

//! A HyperLogLog sketch for approximate distinct counting.
//!
//! This crate estimates the number of distinct elements in a stream using a
//! fixed array of one-byte registers, trading a small, bounded relative error
//! for constant memory. A sketch with precision `p` holds `2^p` registers and
//! has a standard error of `1.04 / sqrt(2^p)`.
//!
//! # Example
//!
//! ```rust
//! use hllsketch::hll::HllSketch;
//!
//! let mut sketch = HllSketch::new(12);
//! for i in 0..10_000 {
//!     sketch.update(&i);
//! }
//! let estimate = sketch.count();
//! assert!(estimate > 9_000 && estimate < 11_000);
//! ```
//!
//! Sketches built from separate streams can be combined with
//! [`hll::HllSketch::merge`] or the [`hll::HllUnion`] accumulator, yielding a
//! sketch equivalent to one that observed the union of both streams.

pub mod error;
pub mod hash;
pub mod hll;
