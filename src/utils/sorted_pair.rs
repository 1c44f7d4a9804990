use std::cmp::PartialOrd;
use std::ops::Deref;

/// A pair of elements sorted in increasing order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SortedPair<T: PartialOrd>((T, T));

impl<T: PartialOrd> SortedPair<T> {
    /// Sorts two elements in increasing order into a new pair.
    pub fn new(element1: T, element2: T) -> Self {
        if element1 > element2 {
            SortedPair((element2, element1))
        } else {
            SortedPair((element1, element2))
        }
    }
}

impl<T: PartialOrd> Deref for SortedPair<T> {
    type Target = (T, T);

    fn deref(&self) -> &(T, T) {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::SortedPair;

    #[test]
    fn sorted_pair_is_order_independent() {
        assert_eq!(SortedPair::new(3, 1), SortedPair::new(1, 3));
        assert_eq!(*SortedPair::new("b", "a"), ("a", "b"));
    }
}
