//! HTTP `Range` header handling for byte streaming.
//!
//! Only the single-range `bytes=<start>-[<end>]` form is understood. Values
//! that do not match it are ignored and the whole resource is served, which
//! is what browsers expect from a server without multi-range support.

/// Inclusive byte span within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered (`end - start + 1`).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for this span, e.g. `bytes 0-499/1000000`.
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// What to serve for a request against a resource of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable `Range` header: serve everything with 200.
    Full,
    /// Serve the span with 206.
    Partial(ByteRange),
    /// The span lies outside the resource: answer 416.
    Unsatisfiable,
}

/// `Content-Range` value for a 416 response.
pub fn unsatisfied_content_range(total: u64) -> String {
    format!("bytes */{total}")
}

/// Parse a `Range: bytes=START-END` header value.
/// Returns `(start, optional_end)`.
pub fn parse_range_header(range: &str) -> Option<(u64, Option<u64>)> {
    let range = range.trim().strip_prefix("bytes=")?;
    let (start, end) = range.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = match end.trim() {
        "" => None,
        e => Some(e.parse::<u64>().ok()?),
    };
    Some((start, end))
}

/// Decide what to serve for an optional `Range` header against `total` bytes.
///
/// A missing end means "to the last byte"; an end past the last byte is
/// clamped to it.
pub fn resolve_range(header: Option<&str>, total: u64) -> RangeRequest {
    let Some((start, end)) = header.and_then(parse_range_header) else {
        return RangeRequest::Full;
    };

    if total == 0 || start >= total {
        return RangeRequest::Unsatisfiable;
    }

    let last = total - 1;
    let end = end.map_or(last, |e| e.min(last));
    if start > end {
        return RangeRequest::Unsatisfiable;
    }

    RangeRequest::Partial(ByteRange { start, end })
}
