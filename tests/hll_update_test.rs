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

use hllsketch::hll::HllSketch;

#[test]
fn test_basic_update() {
    let mut sketch = HllSketch::new(12);

    // Initially empty
    assert_eq!(sketch.count(), 0);
    assert_eq!(sketch.estimate(), 0.0);

    for i in 0..100 {
        sketch.update(&i);
    }

    let estimate = sketch.estimate();
    assert!(estimate > 0.0, "Estimate should be positive after updates");
    assert!(
        (estimate - 100.0).abs() < 20.0,
        "Estimate should be reasonably close to 100, got {}",
        estimate
    );
}

#[test]
fn test_empty_sketch_counts_zero() {
    for precision in [1, 4, 10, 14, 21] {
        let sketch = HllSketch::new(precision);
        assert_eq!(sketch.count(), 0, "precision {} should start at 0", precision);
    }
}

#[test]
fn test_duplicate_handling() {
    let mut sketch = HllSketch::new(12);

    // Add same values multiple times
    for _ in 0..10 {
        for i in 0..100 {
            sketch.update(&i);
        }
    }

    let estimate = sketch.estimate();
    assert!(
        (estimate - 100.0).abs() < 20.0,
        "Duplicates should not inflate estimate, got {}",
        estimate
    );
}

#[test]
fn test_duplicates_leave_sketch_unchanged() {
    let mut sketch = HllSketch::new(10);
    for i in 0..1_000u32 {
        sketch.update(&i);
    }

    let snapshot = sketch.clone();
    for i in 0..1_000u32 {
        sketch.update(&i);
    }

    assert_eq!(sketch, snapshot);
    assert_eq!(sketch.num_zeros(), snapshot.num_zeros());
    assert_eq!(sketch.estimate(), snapshot.estimate());
}

#[test]
fn test_different_types() {
    let mut sketch = HllSketch::new(10);

    sketch.update(&42i32);
    sketch.update("hello");
    sketch.update(&100u64);
    sketch.update(&true);
    sketch.update(&vec![1, 2, 3]);

    let count = sketch.count();
    assert!(
        (4..=6).contains(&count),
        "Should see ~5 distinct values, got {}",
        count
    );
}

#[test]
fn test_relative_error_values() {
    assert!((HllSketch::new(10).relative_error() - 0.0325).abs() < 1e-4);
    assert!((HllSketch::new(12).relative_error() - 0.01625).abs() < 1e-4);

    // The bound is a fraction in (0, 1) across the whole precision range.
    for precision in 1..=21 {
        let error = HllSketch::new(precision).relative_error();
        assert!(error > 0.0 && error < 1.0);
    }
}

#[test]
fn test_accuracy_10k_distinct_with_repeats() {
    // 100,000 inserts of 10,000 distinct values: repeats must not widen the
    // error beyond the three-sigma bound.
    let mut sketch = HllSketch::new(14);
    for _round in 0..10 {
        for i in 0..10_000u64 {
            sketch.update(&i);
        }
    }

    let estimate = sketch.estimate();
    let tolerance = 3.0 * sketch.relative_error() * 10_000.0;
    assert!(
        (estimate - 10_000.0).abs() <= tolerance,
        "Estimate {} outside {} of 10000",
        estimate,
        tolerance
    );
}

#[test]
fn test_large_cardinality() {
    let mut sketch = HllSketch::new(14);

    for i in 0..100_000 {
        sketch.update(&i);
    }

    let estimate = sketch.estimate();
    let relative_error = (estimate - 100_000.0).abs() / 100_000.0;

    // For precision 14 the standard error is ~0.81%.
    assert!(
        relative_error < 0.05,
        "Relative error should be < 5% for large cardinality, got {:.2}%",
        relative_error * 100.0
    );
}

#[test]
fn test_count_rounds_estimate() {
    let mut sketch = HllSketch::new(12);
    for i in 0..50_000u64 {
        sketch.update(&i);
    }

    let estimate = sketch.estimate();
    let count = sketch.count();
    assert_eq!(count, (estimate + 0.5).floor() as u64);
}

#[test]
fn test_serialization_roundtrip_after_updates() {
    let mut sketch1 = HllSketch::new(12);

    for i in 0..2000 {
        sketch1.update(&i);
    }

    let bytes = sketch1.serialize();
    let sketch2 = HllSketch::deserialize(&bytes).unwrap();

    assert_eq!(sketch2, sketch1);

    // Aggregates are rebuilt by rescan; the estimate must agree to rounding.
    let relative = (sketch1.estimate() - sketch2.estimate()).abs() / sketch1.estimate();
    assert!(
        relative < 1e-9,
        "Estimates should match after round-trip, got {} vs {}",
        sketch1.estimate(),
        sketch2.estimate()
    );
}
