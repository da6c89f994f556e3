//! Span decoding from guest linear memory.

use std::borrow::Cow;

/// Decodes a `(ptr, len)` span of guest memory into text.
///
/// `len == 0` means the span is zero terminated: the scan runs forward from
/// `ptr` until a zero byte or the end of the accessible slice, whichever
/// comes first. A missing terminator yields the whole remaining tail rather
/// than an error; the slice itself bounds the scan. Decoding is lossy UTF-8,
/// so this never fails.
pub fn decode_span(memory: &[u8], ptr: usize, len: usize) -> Cow<'_, str> {
    let Some(tail) = memory.get(ptr..) else {
        return Cow::Borrowed("");
    };

    let payload = if len > 0 {
        &tail[..len.min(tail.len())]
    } else {
        match tail.iter().position(|&byte| byte == 0) {
            Some(terminator) => &tail[..terminator],
            None => tail,
        }
    };

    String::from_utf8_lossy(payload)
}
