//! Choice-site identification (§3, §4.3).

use std::borrow::Cow;
use std::fmt;

/// A lexical identifier supplied by the execution substrate. Structurally
/// similar choices (e.g. the same call site in a loop) share one `StaticId`.
///
/// Backed by `Cow<'static, str>` so the overwhelmingly common case — a
/// literal lexical id baked into the program's source — needs no
/// allocation, while a dynamically-built id (e.g. `format!("loop[{i}]")`)
/// still works.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaticId(Cow<'static, str>);

impl StaticId {
    /// Build a `StaticId` from a `'static` literal, at no allocation cost.
    pub const fn new(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Build a `StaticId` from an owned, dynamically-constructed string.
    pub fn owned(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for StaticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for StaticId {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// `(static_id, occurrence_index)` — uniquely locates a random choice within
/// one run. `occurrence_index` disambiguates repeated invocations of the
/// same lexical choice point (e.g. a sample inside a loop).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId {
    pub static_id: StaticId,
    pub occurrence: u32,
}

impl SiteId {
    /// Computes the site id for `static_id` given the occurrences already
    /// recorded in `trace` (§4.3): the occurrence index is the count of
    /// prior trace entries sharing this `static_id`.
    pub fn next<V>(static_id: StaticId, trace: &crate::trace::Trace<V>) -> Self {
        let occurrence = trace.occurrences_of(&static_id) as u32;
        Self {
            static_id,
            occurrence,
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.static_id, self.occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Trace;

    #[test]
    fn repeated_static_id_gets_distinct_occurrences() {
        let mut trace: Trace<u32> = Trace::new();
        let sid = StaticId::new("coin");

        let first = SiteId::next(sid.clone(), &trace);
        assert_eq!(first.occurrence, 0);
        trace.push(first.clone(), 0u32, 0.0);

        let second = SiteId::next(sid.clone(), &trace);
        assert_eq!(second.occurrence, 1);
        trace.push(second.clone(), 1u32, 0.0);

        let third = SiteId::next(sid, &trace);
        assert_eq!(third.occurrence, 2);

        assert_ne!(first, second);
        assert_ne!(second, third);
    }
}
