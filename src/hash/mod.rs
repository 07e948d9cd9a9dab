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

//! Hashing of stream items into 128-bit values.
//!
//! The sketch consumes each item as an opaque 128-bit hash, represented as
//! four unsigned 32-bit words with the most significant word first. This
//! module produces such values with MurmurHash3 (x64, 128-bit), which has the
//! uniform, well-dispersed bit distribution the sketch relies on. Callers with
//! their own 128-bit hash can bypass this module entirely and feed words to
//! [`crate::hll::HllSketch::update_hash`] directly.

use std::hash::Hash;

/// Seed used when no explicit seed is supplied.
pub const DEFAULT_SEED: u32 = 9001;

/// Hash any `Hash` item into four 32-bit words using the default seed.
pub fn words<T: Hash + ?Sized>(item: &T) -> [u32; 4] {
    words_with_seed(item, DEFAULT_SEED)
}

/// Hash any `Hash` item into four 32-bit words with an explicit seed.
///
/// Sketches that are later merged must be fed from the same seed, otherwise
/// the same item maps to different registers in each sketch.
pub fn words_with_seed<T: Hash + ?Sized>(item: &T, seed: u32) -> [u32; 4] {
    let mut hasher = mur3::Hasher128::with_seed(seed);
    item.hash(&mut hasher);
    let (h1, h2) = hasher.finish128();
    split_words(h1, h2)
}

/// Hash a raw byte slice into four 32-bit words.
pub fn words_from_bytes(bytes: &[u8], seed: u32) -> [u32; 4] {
    let (h1, h2) = mur3::murmurhash3_x64_128(bytes, seed);
    split_words(h1, h2)
}

/// Split a 128-bit hash into words, most significant word first.
#[inline]
fn split_words(h1: u64, h2: u64) -> [u32; 4] {
    [(h1 >> 32) as u32, h1 as u32, (h2 >> 32) as u32, h2 as u32]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        // Reference values of MurmurHash3 x64 128 with seed 0.
        let w = words_from_bytes(b"The quick brown fox jumps over the lazy dog", 0);
        assert_eq!(w, [0xe34bbc7b, 0xbc071b6c, 0x7a433ca9, 0xc49a9347]);

        // One changed bit flips the whole output.
        let w = words_from_bytes(b"The quick brown fox jumps over the lazy eog", 0);
        assert_eq!(w, [0x36210810, 0x2c62d1c9, 0x3285cd10, 0x0292b305]);
    }

    #[test]
    fn test_word_order_most_significant_first() {
        let (h1, h2) = mur3::murmurhash3_x64_128(b"abc", 0);
        let w = words_from_bytes(b"abc", 0);
        assert_eq!(((w[0] as u64) << 32) | w[1] as u64, h1);
        assert_eq!(((w[2] as u64) << 32) | w[3] as u64, h2);
    }

    #[test]
    fn test_deterministic_per_seed() {
        assert_eq!(words(&12345u64), words(&12345u64));
        assert_eq!(words_with_seed("item", 7), words_with_seed("item", 7));
        assert_ne!(words_with_seed("item", 7), words_with_seed("item", 8));
    }

    #[test]
    fn test_default_seed_matches_explicit() {
        assert_eq!(words("key"), words_with_seed("key", DEFAULT_SEED));
    }
}
