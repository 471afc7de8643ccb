//! Code-point scanning over raw string bytes
//!
//! Strings are stored as bytes that are usually, but not necessarily, valid
//! UTF-8. Scanning never rejects input: a lead byte swallows the
//! continuation bytes that follow it, and a stray continuation byte counts
//! as one character on its own. Every function stays inside the slice.

#[inline(always)]
fn is_lead(b: u8) -> bool {
    b & 0xC0 == 0xC0
}

#[inline(always)]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Byte offset of the code point following the one at `pos`.
///
/// Returns `bytes.len()` when `pos` is at or past the end.
#[inline]
pub fn next_boundary(bytes: &[u8], pos: usize) -> usize {
    if pos >= bytes.len() {
        return bytes.len();
    }
    let b = bytes[pos];
    if b < 0x80 || !is_lead(b) {
        return pos + 1;
    }
    let mut p = pos + 1;
    while p < bytes.len() && is_continuation(bytes[p]) {
        p += 1;
    }
    p
}

/// Number of code points in `bytes`
pub fn count_code_points(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        pos = next_boundary(bytes, pos);
        count += 1;
    }
    count
}

/// Byte offset of code point `n` (0-based); `bytes.len()` if there are
/// fewer than `n` code points.
pub fn byte_offset(bytes: &[u8], n: usize) -> usize {
    let mut pos = 0;
    for _ in 0..n {
        if pos >= bytes.len() {
            break;
        }
        pos = next_boundary(bytes, pos);
    }
    pos
}

/// Byte range covering code points `first..=last` (1-based, inclusive).
///
/// Callers clamp `first`/`last` to the string's code-point count; an empty
/// range comes back when `last < first`.
pub fn code_point_range(bytes: &[u8], first: usize, last: usize) -> std::ops::Range<usize> {
    if first == 0 || last < first {
        return 0..0;
    }
    let start = byte_offset(bytes, first - 1);
    let mut end = start;
    for _ in first..=last {
        end = next_boundary(bytes, end);
    }
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_ascii() {
        assert_eq!(count_code_points(b""), 0);
        assert_eq!(count_code_points(b"hello"), 5);
    }

    #[test]
    fn test_count_multibyte() {
        assert_eq!(count_code_points("a€b".as_bytes()), 3);
        assert_eq!(count_code_points("日本語".as_bytes()), 3);
        assert_eq!(count_code_points("🎉!".as_bytes()), 2);
    }

    #[test]
    fn test_invalid_bytes_never_overrun() {
        // lead byte with missing continuations at the end
        assert_eq!(count_code_points(&[b'a', 0xE2, 0x82]), 2);
        // stray continuation bytes step one at a time
        assert_eq!(count_code_points(&[0x80, 0x80, b'x']), 3);
        assert_eq!(next_boundary(&[0xF0], 0), 1);
        assert_eq!(next_boundary(b"ab", 5), 2);
    }

    #[test]
    fn test_code_point_range_middle() {
        let s = "a€b".as_bytes();
        let r = code_point_range(s, 2, 2);
        assert_eq!(&s[r], "€".as_bytes());
        assert_eq!(code_point_range(s, 1, 3), 0..5);
        assert_eq!(code_point_range(s, 3, 2), 0..0);
    }

    #[test]
    fn test_byte_offset_past_end() {
        assert_eq!(byte_offset(b"ab", 5), 2);
        assert_eq!(byte_offset("€x".as_bytes(), 1), 3);
    }
}
