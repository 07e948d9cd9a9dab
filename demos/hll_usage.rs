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

fn main() {
    // Create a new HLL sketch
    // precision=12 means 4096 registers, ~1.6% relative error
    let mut sketch = HllSketch::new(12);

    println!("Created HLL sketch with precision=12 (4096 registers)");
    println!("Expected standard error: {:.2}%", sketch.relative_error() * 100.0);
    println!("Initial estimate: {}", sketch.count());

    // Add some values
    println!("\nAdding 10,000 unique integers...");
    for i in 0..10_000 {
        sketch.update(&i);
    }

    let estimate = sketch.estimate();
    let actual = 10_000;
    let error = ((estimate - actual as f64) / actual as f64 * 100.0).abs();

    println!("Actual unique values: {}", actual);
    println!("Estimated unique values: {:.2}", estimate);
    println!("Relative error: {:.2}%", error);

    // Test duplicate handling
    println!("\nAdding the same 10,000 values again...");
    for i in 0..10_000 {
        sketch.update(&i);
    }
    println!("Estimate after duplicates: {} (should remain ~10,000)", sketch.count());

    // Serialize and deserialize
    println!("\nSerializing sketch...");
    let bytes = sketch.serialize();
    println!("Serialized size: {} bytes", bytes.len());

    let restored = HllSketch::deserialize(&bytes).expect("deserialize round-trip");
    println!("Restored estimate: {}", restored.count());

    // Merge a second sketch built from a disjoint stream
    println!("\nMerging a second sketch with 10,000 different values...");
    let mut other = HllSketch::new(12);
    for i in 10_000..20_000 {
        other.update(&i);
    }
    sketch.merge(&other);
    println!("Merged estimate: {} (should be ~20,000)", sketch.count());
}
