use std::collections::BTreeSet;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes under the relation. Classes are kept sorted
/// by their least element, which makes the partition canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<I: Ord>(Vec<BTreeSet<I>>);

impl<I: Ord> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Ord> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Ord> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators which yield
    /// elements of type `I`. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        let mut classes: Vec<BTreeSet<I>> = iter
            .into_iter()
            .map(|it| it.into_iter().collect::<BTreeSet<_>>())
            .filter(|class| !class.is_empty())
            .collect();
        classes.sort_by(|l, r| l.first().cmp(&r.first()));
        Self(classes)
    }

    /// Returns the class that contains `element`, if it exists.
    pub fn class_of(&self, element: &I) -> Option<&BTreeSet<I>> {
        self.0.iter().find(|class| class.contains(element))
    }
}
