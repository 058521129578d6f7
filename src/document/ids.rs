use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::error::{Error, Result};

/// Length of an object id: 24 uppercase hex digits, 96 bits.
pub const ID_LEN: usize = 24;

/// Candidates drawn before giving up with [`Error::AllocationExhausted`].
const MAX_ATTEMPTS: usize = 1024;

/// Produces candidate ids. Candidates are checked for uniqueness by the
/// allocator, so a source is free to repeat itself.
pub trait IdSource {
    fn candidate(&mut self) -> String;
}

/// 96 random bits taken from a v4 UUID, skipping its fixed version and
/// variant bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn candidate(&mut self) -> String {
        let bits = Uuid::new_v4().as_u128();
        let high = (bits >> 80) & ((1 << 48) - 1);
        let mid = (bits >> 64) & 0xFFF;
        let low = bits & ((1 << 36) - 1);
        format!("{:024X}", (high << 48) | (mid << 36) | low)
    }
}

/// Hands out ids that appear nowhere in the document text and were never
/// handed out before in this session.
pub struct IdAllocator {
    source: Box<dyn IdSource>,
    issued: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::with_source(RandomIds)
    }

    pub fn with_source(source: impl IdSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            issued: HashSet::new(),
        }
    }

    /// Allocate an id unique against `text` and against earlier allocations.
    pub fn allocate(&mut self, text: &str) -> Result<String> {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = self.source.candidate();
            if !is_valid_id(&candidate)
                || self.issued.contains(&candidate)
                || text.contains(&candidate)
            {
                continue;
            }
            self.issued.insert(candidate.clone());
            return Ok(candidate);
        }
        Err(Error::AllocationExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdAllocator")
            .field("issued", &self.issued.len())
            .finish()
    }
}

pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(Vec<&'static str>);

    impl IdSource for Scripted {
        fn candidate(&mut self) -> String {
            if self.0.len() > 1 {
                self.0.remove(0).to_string()
            } else {
                self.0[0].to_string()
            }
        }
    }

    #[test]
    fn test_random_ids_are_well_formed() {
        let mut source = RandomIds;
        for _ in 0..100 {
            assert!(is_valid_id(&source.candidate()));
        }
    }

    #[test]
    fn test_skips_ids_present_in_text() {
        let text = "AAAAAAAAAAAAAAAAAAAAAAAA /* App.swift */";
        let mut ids = IdAllocator::with_source(Scripted(vec![
            "AAAAAAAAAAAAAAAAAAAAAAAA",
            "BBBBBBBBBBBBBBBBBBBBBBBB",
        ]));
        assert_eq!(ids.allocate(text).unwrap(), "BBBBBBBBBBBBBBBBBBBBBBBB");
    }

    #[test]
    fn test_never_reissues_within_session() {
        let mut ids = IdAllocator::with_source(Scripted(vec![
            "CCCCCCCCCCCCCCCCCCCCCCCC",
            "CCCCCCCCCCCCCCCCCCCCCCCC",
            "DDDDDDDDDDDDDDDDDDDDDDDD",
        ]));
        assert_eq!(ids.allocate("").unwrap(), "CCCCCCCCCCCCCCCCCCCCCCCC");
        assert_eq!(ids.allocate("").unwrap(), "DDDDDDDDDDDDDDDDDDDDDDDD");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_rejects_malformed_candidates() {
        let mut ids = IdAllocator::with_source(Scripted(vec![
            "abc",
            "0123456789abcdef01234567",
            "0123456789ABCDEF01234567",
        ]));
        assert_eq!(ids.allocate("").unwrap(), "0123456789ABCDEF01234567");
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let text = "EEEEEEEEEEEEEEEEEEEEEEEE";
        let mut ids = IdAllocator::with_source(Scripted(vec!["EEEEEEEEEEEEEEEEEEEEEEEE"]));
        assert!(matches!(
            ids.allocate(text),
            Err(Error::AllocationExhausted { .. })
        ));
    }

    #[test]
    fn test_thousands_of_allocations_stay_unique() {
        let mut ids = IdAllocator::new();
        let mut text = String::new();
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let id = ids.allocate(&text).unwrap();
            assert!(seen.insert(id.clone()));
            text.push_str(&id);
            text.push('\n');
        }
    }
}
