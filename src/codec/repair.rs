//! Repair of Facebook's double-encoded archive text.
//!
//! The exporter first generates UTF-8 JSON text with only quotes and newlines
//! escaped, then re-escapes every non-ASCII byte of that text as a faux
//! unicode escape of the form `\u00XX`. The result parses as JSON but every
//! non-ASCII character comes out as mojibake. [`restore_utf8`] undoes the
//! second, faulty encoding step before the JSON parser ever sees the bytes.

use crate::error::RepairError;

/// Restore the UTF-8 encoding of archive bytes.
///
/// Scans for runs of consecutive `\u00XX` escapes naming byte values in
/// `0x80..=0xFF`, replaces each run with the bytes it names, and checks that
/// the reassembled run is valid UTF-8. All other escapes, including `\u00XX`
/// sequences naming ASCII bytes, are left in place. An escape preceded by an
/// odd number of extra backslashes is itself escaped, i.e. literal text
/// discussing escape sequences, and is also left in place.
///
/// The transform is idempotent: repaired text contains no remaining `\u00XX`
/// runs in the repaired range, so a second pass is the identity.
pub fn restore_utf8(data: &[u8]) -> Result<Vec<u8>, RepairError> {
    let mut out = Vec::with_capacity(data.len());
    let mut index = 0;

    while index < data.len() {
        if data[index] != b'\\' {
            out.push(data[index]);
            index += 1;
            continue;
        }

        // Count the run of backslashes. Pairs encode literal backslashes; only
        // an odd count leaves a final backslash free to begin an escape.
        let mut backslashes = 0;
        while index + backslashes < data.len() && data[index + backslashes] == b'\\' {
            backslashes += 1;
        }

        if backslashes % 2 == 0 || broken_escape_byte(&data[index + backslashes..]).is_none() {
            out.extend(std::iter::repeat_n(b'\\', backslashes));
            index += backslashes;
            continue;
        }

        // The final backslash begins a mis-encoded escape. Emit the literal
        // backslash pairs, then collect the whole run of escapes.
        out.extend(std::iter::repeat_n(b'\\', backslashes - 1));
        index += backslashes - 1;

        let run_offset = index;
        let mut run = Vec::new();
        while index < data.len() && data[index] == b'\\' {
            match broken_escape_byte(&data[index + 1..]) {
                Some(byte) => {
                    run.push(byte);
                    index += 6;
                }
                None => break,
            }
        }

        if std::str::from_utf8(&run).is_err() {
            return Err(RepairError { offset: run_offset, bytes: run });
        }
        out.extend_from_slice(&run);
    }

    Ok(out)
}

/// Decode `u00XX` at the start of `data`, returning the named byte if it is
/// a non-ASCII byte value, i.e. part of a mis-encoded multi-byte character.
fn broken_escape_byte(data: &[u8]) -> Option<u8> {
    if data.len() < 5 || data[0] != b'u' || data[1] != b'0' || data[2] != b'0' {
        return None;
    }
    let high = hex_digit(data[3])?;
    let low = hex_digit(data[4])?;
    let byte = high << 4 | low;
    (byte >= 0x80).then_some(byte)
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
