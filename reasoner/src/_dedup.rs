use std::collections::BTreeSet;

pub trait IteratorDedupBy: Iterator + Sized {
    /// Skip every item whose key was already produced by an earlier item.
    fn dedup_by_key<K, F>(self, key: F) -> DedupBy<Self, K, F>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        DedupBy {
            inner: self,
            key,
            seen: BTreeSet::new(),
        }
    }
}
impl<I: Iterator> IteratorDedupBy for I {}

pub struct DedupBy<I, K, F> {
    inner: I,
    key: F,
    seen: BTreeSet<K>,
}

impl<I, K, F> Iterator for DedupBy<I, K, F>
where
    I: Iterator,
    K: Ord,
    F: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cand = self.inner.next()?;
            if self.seen.insert((self.key)(&cand)) {
                return Some(cand);
            }
        }
    }
}
