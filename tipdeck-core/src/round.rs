//! Round construction for the tips carousel.
//!
//! A round is one pass over every catalog item. Items are grouped into
//! per-category buckets, each bucket is shuffled, and the round is drained
//! greedily from the largest buckets while steering away from the category
//! that was appended last. Picking uniformly among buckets within one item
//! of the largest keeps the interleaving from repeating run to run.
//!
//! The greedy walk alone can paint itself into a corner (three equal buckets
//! can end in `.. C C`), so a top-tier pick that would leave the remaining
//! pool impossible to lay out without a repeat is skipped whenever another
//! top-tier pick keeps it possible.

use rand::Rng;
use rand::seq::SliceRandom;
use tipdeck_model::{Catalog, CategoryKey};
use tracing::trace;

use crate::error::{CoreError, Result};

/// One full pass through the catalog, as a permutation of item indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    order: Vec<usize>,
}

impl Round {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Item index shown at `position`.
    pub fn get(&self, position: usize) -> Option<usize> {
        self.order.get(position).copied()
    }

    pub fn first(&self) -> Option<usize> {
        self.order.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.order.last().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }
}

/// Not-yet-placed indices of one category, alive for a single build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: CategoryKey,
    pub indices: Vec<usize>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Group item indices by category, keeping first-appearance order so seeded
/// builds are reproducible.
pub fn partition(keys: &[CategoryKey]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for (index, key) in keys.iter().enumerate() {
        match buckets.iter_mut().find(|bucket| &bucket.key == key) {
            Some(bucket) => bucket.indices.push(index),
            None => buckets.push(Bucket {
                key: key.clone(),
                indices: vec![index],
            }),
        }
    }
    buckets
}

/// Fisher-Yates shuffle of every bucket.
pub fn shuffle_buckets<R: Rng + ?Sized>(buckets: &mut [Bucket], rng: &mut R) {
    for bucket in buckets.iter_mut() {
        bucket.indices.shuffle(rng);
    }
}

/// Buckets eligible for the next pick, as positions into `buckets`.
///
/// Non-empty buckets whose key differs from `last` are preferred; when every
/// remaining item shares `last`, all non-empty buckets are considered. Of
/// those, buckets holding at least `max - 1` items form the tier.
pub fn top_tier(buckets: &[Bucket], last: Option<&CategoryKey>) -> Vec<usize> {
    let available: Vec<usize> = buckets
        .iter()
        .enumerate()
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(i, _)| i)
        .collect();

    let preferred: Vec<usize> = available
        .iter()
        .copied()
        .filter(|&i| Some(&buckets[i].key) != last)
        .collect();
    let pool = if preferred.is_empty() {
        available
    } else {
        preferred
    };

    let Some(max) = pool.iter().map(|&i| buckets[i].len()).max() else {
        return Vec::new();
    };
    pool.into_iter()
        .filter(|&i| buckets[i].len() + 1 >= max)
        .collect()
}

/// Whether taking one item from `buckets[picked]` leaves a pool that can
/// still be laid out with no two neighbours sharing a category.
///
/// A pool is arrangeable when no bucket outnumbers the rest of the pool by
/// more than one, and the bucket just drawn from does not outnumber the rest
/// at all since it cannot lead.
pub fn is_arrangeable_after(buckets: &[Bucket], picked: usize) -> bool {
    let remaining: usize = buckets.iter().map(Bucket::len).sum::<usize>() - 1;
    buckets.iter().enumerate().all(|(i, bucket)| {
        let count = if i == picked {
            bucket.len() - 1
        } else {
            bucket.len()
        };
        let others = remaining - count;
        if i == picked {
            count <= others
        } else {
            count <= others + 1
        }
    })
}

/// Choose the bucket to draw from next, or `None` once every bucket is empty.
pub fn pick_bucket<R: Rng + ?Sized>(
    buckets: &[Bucket],
    last: Option<&CategoryKey>,
    rng: &mut R,
) -> Option<usize> {
    let tier = top_tier(buckets, last);
    if tier.is_empty() {
        return None;
    }

    let safe: Vec<usize> = tier
        .iter()
        .copied()
        .filter(|&i| is_arrangeable_after(buckets, i))
        .collect();
    let candidates = if safe.is_empty() { &tier } else { &safe };

    Some(candidates[rng.random_range(0..candidates.len())])
}

/// Builds rounds for a fixed catalog.
#[derive(Debug, Clone)]
pub struct RoundBuilder {
    keys: Vec<CategoryKey>,
}

impl RoundBuilder {
    /// Fails fast on an empty key list; an empty round is never produced.
    pub fn new(keys: Vec<CategoryKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        Ok(Self { keys })
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            keys: catalog.iter().map(|item| item.category_key()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn category(&self, index: usize) -> Option<&CategoryKey> {
        self.keys.get(index)
    }

    /// Build one round. `last` is the category shown right before the round
    /// starts; the first pick avoids it whenever another category exists.
    pub fn build<R: Rng + ?Sized>(
        &self,
        last: Option<&CategoryKey>,
        rng: &mut R,
    ) -> Round {
        let mut buckets = partition(&self.keys);
        shuffle_buckets(&mut buckets, rng);

        let mut order = Vec::with_capacity(self.keys.len());
        let mut last = last.cloned();
        while let Some(chosen) = pick_bucket(&buckets, last.as_ref(), rng) {
            let bucket = &mut buckets[chosen];
            let Some(index) = bucket.indices.pop() else {
                break;
            };
            order.push(index);
            last = Some(bucket.key.clone());
        }

        debug_assert_eq!(order.len(), self.keys.len());
        trace!(len = order.len(), "built carousel round");
        Round { order }
    }
}
