//! Typestate markers for builders whose required fields are checked at
//! compile time.
//!
//! A builder starts with every required field [`Unset`] and only exposes
//! `build` once all of them are [`Set`]. Forgetting a field is a type error
//! rather than a runtime one.

use std::marker::PhantomData;

/// A required field that has not been provided yet.
///
/// Carries no value, only the type the field will eventually hold.
pub struct Unset<T> {
    _value: PhantomData<T>,
}

impl<T> Default for Unset<T> {
    fn default() -> Self {
        Self {
            _value: PhantomData,
        }
    }
}

impl<T> Unset<T> {
    /// Marks a field as still missing.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A required field holding its value.
#[derive(Clone)]
pub struct Set<T> {
    value: T,
}

impl<T> Set<T> {
    /// Marks a field as provided.
    ///
    /// # Parameters
    /// * `value` - The value the builder will hand to the built type
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Unwraps the field once the builder is consumed.
    ///
    /// # Returns
    /// The provided value
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Borrows the field while the builder is still being assembled, e.g. to
    /// derive one field from another.
    ///
    /// # Returns
    /// A reference to the provided value
    pub fn as_ref_inner(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair<A, B> {
        first: A,
        second: B,
    }

    impl<B> Pair<Unset<u32>, B> {
        fn first(self, value: u32) -> Pair<Set<u32>, B> {
            Pair {
                first: Set::new(value),
                second: self.second,
            }
        }
    }

    impl<A> Pair<A, Unset<String>> {
        fn second(self, value: &str) -> Pair<A, Set<String>> {
            Pair {
                first: self.first,
                second: Set::new(value.to_string()),
            }
        }
    }

    impl Pair<Set<u32>, Set<String>> {
        fn build(self) -> (u32, String) {
            (self.first.into_inner(), self.second.into_inner())
        }
    }

    #[test]
    fn it_builds_once_every_field_is_set_in_any_order() {
        let pair = Pair {
            first: Unset::new(),
            second: Unset::new(),
        };

        assert_eq!(pair.second("b").first(7).build(), (7, "b".to_string()));
    }

    #[test]
    fn it_exposes_set_values_by_reference() {
        let set = Set::new(vec![1, 2, 3]);
        assert_eq!(set.as_ref_inner().len(), 3);
        assert_eq!(set.clone().into_inner(), vec![1, 2, 3]);
    }
}
