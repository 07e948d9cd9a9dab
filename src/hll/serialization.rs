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

//! Binary serialization of HLL sketches.
//!
//! The format is an 8-byte preamble followed by the raw register array:
//!
//! ```text
//! byte 0: preamble length in 32-bit ints (2)
//! byte 1: serialization version (1)
//! byte 2: family id (7 = HLL)
//! byte 3: precision
//! byte 4: flags (bit 2 = empty)
//! byte 5-7: unused
//! byte 8..: one byte per register, omitted when the empty flag is set
//! ```
//!
//! The two running aggregates are not stored; deserialization rebuilds them
//! with a full register scan.

use std::io::{Cursor, Read};

use byteorder::ReadBytesExt;

use crate::error::{Error, ErrorKind};
use crate::hll::sketch::HllSketch;
use crate::hll::{MAX_PRECISION, MIN_PRECISION, RANK_BITS};

pub(crate) const PREAMBLE_INTS: u8 = 2;
pub(crate) const SER_VER: u8 = 1;
pub(crate) const HLL_FAMILY_ID: u8 = 7;
pub(crate) const EMPTY_FLAG_MASK: u8 = 0x04;

const PREAMBLE_BYTES: usize = 4 * PREAMBLE_INTS as usize;

/// Largest value a register can legitimately hold.
const MAX_REGISTER_VALUE: u8 = RANK_BITS as u8 + 1;

pub(crate) fn serialize(sketch: &HllSketch) -> Vec<u8> {
    let empty = sketch.is_empty();
    let payload = if empty { 0 } else { sketch.num_registers() };

    let mut bytes = Vec::with_capacity(PREAMBLE_BYTES + payload);
    bytes.push(PREAMBLE_INTS);
    bytes.push(SER_VER);
    bytes.push(HLL_FAMILY_ID);
    bytes.push(sketch.precision());
    bytes.push(if empty { EMPTY_FLAG_MASK } else { 0 });
    bytes.extend_from_slice(&[0u8; 3]);

    if !empty {
        bytes.extend_from_slice(sketch.registers());
    }

    bytes
}

pub(crate) fn deserialize(bytes: &[u8]) -> Result<HllSketch, Error> {
    let mut reader = Cursor::new(bytes);

    let preamble_ints = read_preamble_byte(&mut reader)?;
    let ser_ver = read_preamble_byte(&mut reader)?;
    let family_id = read_preamble_byte(&mut reader)?;
    let precision = read_preamble_byte(&mut reader)?;
    let flags = read_preamble_byte(&mut reader)?;
    for _ in 0..3 {
        read_preamble_byte(&mut reader)?;
    }

    if preamble_ints != PREAMBLE_INTS {
        return Err(Error::new(
            ErrorKind::MalformedDeserializeData,
            "unexpected preamble length",
        )
        .with_context("preamble_ints", preamble_ints));
    }

    if ser_ver != SER_VER {
        return Err(Error::new(
            ErrorKind::MalformedDeserializeData,
            "unsupported serialization version",
        )
        .with_context("ser_ver", ser_ver));
    }

    if family_id != HLL_FAMILY_ID {
        return Err(
            Error::new(ErrorKind::MalformedDeserializeData, "not an HLL sketch")
                .with_context("family_id", family_id),
        );
    }

    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(
            Error::new(ErrorKind::ConfigInvalid, "precision out of range")
                .with_context("precision", precision),
        );
    }

    if flags & EMPTY_FLAG_MASK != 0 {
        return Ok(HllSketch::new(precision));
    }

    let mut registers = vec![0u8; 1usize << precision];
    reader.read_exact(&mut registers).map_err(|err| {
        Error::new(
            ErrorKind::MalformedDeserializeData,
            "sketch data shorter than its register array",
        )
        .with_context("precision", precision)
        .set_source(err)
    })?;

    if let Some(&value) = registers.iter().find(|&&v| v > MAX_REGISTER_VALUE) {
        return Err(
            Error::new(ErrorKind::MalformedDeserializeData, "register value out of range")
                .with_context("value", value),
        );
    }

    Ok(HllSketch::from_registers(
        precision,
        registers.into_boxed_slice(),
    ))
}

fn read_preamble_byte(reader: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    reader.read_u8().map_err(|err| {
        Error::new(
            ErrorKind::MalformedDeserializeData,
            "sketch data ended inside the preamble",
        )
        .set_source(err)
    })
}
