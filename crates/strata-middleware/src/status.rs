//! Status-code range sets.
//!
//! Middleware that reacts to a reply's status code is configured with a
//! [`StatusRanges`]: an ordered set of half-open `u16` ranges. The named
//! classes cover the conventional HTTP families, and `|` unions two sets.

use http::StatusCode;
use std::ops::{BitOr, Range};

/// An ordered set of half-open status-code ranges.
///
/// # Example
///
/// ```
/// use strata_middleware::StatusRanges;
///
/// let ranges = StatusRanges::client_error() | StatusRanges::single(500);
/// assert!(ranges.contains(404));
/// assert!(ranges.contains(500));
/// assert!(!ranges.contains(501));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusRanges {
    ranges: Vec<Range<u16>>,
}

impl StatusRanges {
    /// Creates a set from explicit ranges.
    #[must_use]
    pub fn new(ranges: Vec<Range<u16>>) -> Self {
        Self { ranges }
    }

    /// Creates a set covering one contiguous range.
    #[must_use]
    pub fn span(range: Range<u16>) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    /// Creates a set containing a single code.
    #[must_use]
    pub fn single(code: u16) -> Self {
        Self::span(code..code + 1)
    }

    /// Creates a set containing exactly the given codes.
    #[must_use]
    pub fn of(codes: &[u16]) -> Self {
        Self {
            ranges: codes.iter().map(|&code| code..code + 1).collect(),
        }
    }

    /// `100..200`.
    #[must_use]
    pub fn informational() -> Self {
        Self::span(100..200)
    }

    /// `200..300`.
    #[must_use]
    pub fn successful() -> Self {
        Self::span(200..300)
    }

    /// `300..400`.
    #[must_use]
    pub fn redirection() -> Self {
        Self::span(300..400)
    }

    /// `400..500`.
    #[must_use]
    pub fn client_error() -> Self {
        Self::span(400..500)
    }

    /// `500..600`.
    #[must_use]
    pub fn server_error() -> Self {
        Self::span(500..600)
    }

    /// `100..400`: every non-error class.
    #[must_use]
    pub fn good() -> Self {
        Self::span(100..400)
    }

    /// `400..600`: both error classes.
    #[must_use]
    pub fn error() -> Self {
        Self::span(400..600)
    }

    /// `100..600`: every status code.
    #[must_use]
    pub fn all() -> Self {
        Self::span(100..600)
    }

    /// Returns `true` if `code` falls in any of the ranges.
    #[must_use]
    pub fn contains(&self, code: u16) -> bool {
        self.ranges.iter().any(|range| range.contains(&code))
    }

    /// Returns `true` if `status` falls in any of the ranges.
    #[must_use]
    pub fn contains_status(&self, status: StatusCode) -> bool {
        self.contains(status.as_u16())
    }

    /// Returns the underlying ranges, in configuration order.
    #[must_use]
    pub fn ranges(&self) -> &[Range<u16>] {
        &self.ranges
    }
}

impl BitOr for StatusRanges {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        self.ranges.extend(rhs.ranges);
        self
    }
}

impl From<StatusCode> for StatusRanges {
    fn from(status: StatusCode) -> Self {
        Self::single(status.as_u16())
    }
}

impl From<Range<u16>> for StatusRanges {
    fn from(range: Range<u16>) -> Self {
        Self::span(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_classes_cover_their_family() {
        assert!(StatusRanges::informational().contains(100));
        assert!(StatusRanges::informational().contains(199));
        assert!(!StatusRanges::informational().contains(200));

        assert!(StatusRanges::successful().contains(204));
        assert!(StatusRanges::redirection().contains(302));
        assert!(StatusRanges::client_error().contains(404));
        assert!(!StatusRanges::client_error().contains(500));
        assert!(StatusRanges::server_error().contains(503));
    }

    #[test]
    fn test_aggregate_classes() {
        assert!(StatusRanges::good().contains(200));
        assert!(StatusRanges::good().contains(301));
        assert!(!StatusRanges::good().contains(400));

        assert!(StatusRanges::error().contains(400));
        assert!(StatusRanges::error().contains(599));
        assert!(!StatusRanges::error().contains(399));

        assert!(StatusRanges::all().contains(100));
        assert!(StatusRanges::all().contains(599));
    }

    #[test]
    fn test_union_concatenates_ranges() {
        let ranges = StatusRanges::of(&[301, 302]) | StatusRanges::single(418);
        assert!(ranges.contains(301));
        assert!(ranges.contains(302));
        assert!(ranges.contains(418));
        assert!(!ranges.contains(303));
        assert_eq!(ranges.ranges().len(), 3);
    }

    #[test]
    fn test_contains_status() {
        let ranges = StatusRanges::client_error();
        assert!(ranges.contains_status(StatusCode::NOT_FOUND));
        assert!(!ranges.contains_status(StatusCode::OK));
    }

    #[test]
    fn test_conversions() {
        let from_status: StatusRanges = StatusCode::IM_A_TEAPOT.into();
        assert!(from_status.contains(418));

        let from_range: StatusRanges = (400..404).into();
        assert!(from_range.contains(403));
        assert!(!from_range.contains(404));
    }
}
