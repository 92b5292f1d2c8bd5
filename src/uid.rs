// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Utilities for deriving stable dashboard uids from user-supplied titles.
//!
//! Uids produced by this module contain only lowercase ASCII alphanumeric
//! characters separated by single hyphens and never exceed the destination
//! platform's 40-character uid limit. Deriving the uid from the title keeps
//! repeated conversions of the same document byte-identical.

/// Maximum uid length accepted by the destination platform.
const MAX_UID_LENGTH: usize = 40;

/// Builder for uid strings derived from dashboard titles.
#[derive(Debug, Clone, Copy,)]
pub struct UidStrategy<'input,>
{
    source: &'input str,
}

impl<'input,> UidStrategy<'input,>
{
    /// Creates a new uid builder for the provided string slice.
    ///
    /// The builder retains a borrowed view of the source to avoid allocations
    /// until [`build`](Self::build) is invoked.
    pub fn builder(source: &'input str,) -> Self
    {
        Self {
            source,
        }
    }

    /// Builds a uid from the provided source string. The uid contains only
    /// lowercase ASCII alphanumeric characters and single hyphen separators,
    /// truncated to the platform limit. Returns `None` when the input does
    /// not contain any uid-worthy characters after normalization.
    ///
    /// # Examples
    ///
    /// ```
    /// use dagr::UidStrategy;
    ///
    /// let uid = UidStrategy::builder(" Cluster Overview  ",).build();
    /// assert_eq!(uid.as_deref(), Some("cluster-overview"));
    /// ```
    pub fn build(self,) -> Option<String,>
    {
        let trimmed = self.source.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut uid = String::with_capacity(trimmed.len().min(MAX_UID_LENGTH,),);
        let mut previous_hyphen = false;

        for candidate in trimmed.chars() {
            if uid.len() >= MAX_UID_LENGTH {
                break;
            }
            match candidate {
                'A'..='Z' => {
                    uid.push(candidate.to_ascii_lowercase(),);
                    previous_hyphen = false;
                }
                'a'..='z' | '0'..='9' => {
                    uid.push(candidate,);
                    previous_hyphen = false;
                }
                _ => {
                    if !previous_hyphen && !uid.is_empty() {
                        uid.push('-',);
                        previous_hyphen = true;
                    }
                }
            }
        }

        while uid.ends_with('-',) {
            uid.pop();
        }

        if uid.is_empty() { None } else { Some(uid,) }
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{MAX_UID_LENGTH, UidStrategy};

    proptest! {
        #[test]
        fn uid_contains_only_allowed_characters(input in "[A-Za-z0-9._/ -]{1,64}") {
            let builder = UidStrategy::builder(&input);
            let uid = builder.build();
            let uid_is_valid = uid.is_none_or(|value| {
                value.len() <= MAX_UID_LENGTH
                    && value.chars().all(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '-'))
            });
            prop_assert!(uid_is_valid);
        }
    }

    #[test]
    fn builder_discards_invalid_and_duplicate_separators()
    {
        let uid = UidStrategy::builder("  Cluster -- CPU__Usage  ",)
            .build()
            .expect("expected uid to be derived",);
        assert_eq!(uid, "cluster-cpu-usage");
    }

    #[test]
    fn builder_returns_none_for_empty_input()
    {
        assert!(UidStrategy::builder("   ").build().is_none());
        assert!(UidStrategy::builder("***").build().is_none());
    }

    #[test]
    fn builder_truncates_to_platform_limit()
    {
        let input = "a".repeat(80,);
        let uid = UidStrategy::builder(&input,).build().expect("expected uid",);
        assert_eq!(uid.len(), MAX_UID_LENGTH);
    }

    #[test]
    fn builder_trims_hyphen_left_by_truncation()
    {
        let input = format!("{} tail", "a".repeat(MAX_UID_LENGTH - 1,));
        let uid = UidStrategy::builder(&input,).build().expect("expected uid",);
        assert!(!uid.ends_with('-'));
    }

    #[test]
    fn builder_handles_unicode_characters()
    {
        let uid = UidStrategy::builder("cluster-世界-overview",).build();
        assert_eq!(uid.as_deref(), Some("cluster-overview"));
    }

    #[test]
    fn builder_is_deterministic()
    {
        let first = UidStrategy::builder("Same Title",).build();
        let second = UidStrategy::builder("Same Title",).build();
        assert_eq!(first, second);
    }
}
