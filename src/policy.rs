//! Table policies: probe sequences, range hashing, and rehash control.
//!
//! Every policy is a zero-sized type whose behavior lives in associated
//! functions, so picking a policy is a type-level decision with no runtime
//! branching at the call sites inside the table engine.

/// Produces the sequence of candidate buckets examined after a collision.
///
/// For a fixed `start`, the sequence `next(start, 1, n), next(start, 2, n), ...`
/// must eventually visit enough distinct indices to reach any vacant slot
/// whenever the table is not full. The engine keeps bucket counts as powers of
/// two, and implementations may rely on that.
pub trait ProbeSequence {
    /// Returns the bucket to examine at probe number `step` (1-based) for a
    /// walk that began at `start`, in a table of `buckets` slots.
    fn next(start: usize, step: usize, buckets: usize) -> usize;
}

/// Linear probing: each step advances one slot, wrapping via mask.
///
/// Good cache locality, but runs of occupied slots tend to grow into each
/// other (primary clustering).
pub struct LinearProbing;

impl ProbeSequence for LinearProbing {
    #[inline(always)]
    fn next(start: usize, step: usize, buckets: usize) -> usize {
        start.wrapping_add(step) & (buckets - 1)
    }
}

/// Quadratic probing using triangular-number offsets.
///
/// For power-of-two bucket counts the offsets `(step² + step) / 2` visit every
/// slot exactly once before repeating, so the walk can never cycle while
/// vacant slots remain. Plain `step²` offsets would cycle through only a
/// fraction of the table. The non-power-of-two fallback exists only for
/// completeness; the engine never produces such sizes.
pub struct QuadraticProbing;

impl ProbeSequence for QuadraticProbing {
    #[inline(always)]
    fn next(start: usize, step: usize, buckets: usize) -> usize {
        if buckets.is_power_of_two() {
            let offset = step.wrapping_mul(step).wrapping_add(step) >> 1;
            start.wrapping_add(offset) & (buckets - 1)
        } else {
            start.wrapping_add(step.wrapping_mul(step)) % buckets
        }
    }
}

/// Reduces a full 64-bit hash to a bucket index for the current table size.
pub trait RangeHash {
    /// Maps `hash` into `[0, buckets)`.
    fn bucket(hash: u64, buckets: usize) -> usize;
}

/// Range hashing by bitwise mask.
///
/// Requires `buckets` to be a power of two, which is why the rehash policy
/// grows capacity strictly by doubling.
pub struct MaskRangeHashing;

impl RangeHash for MaskRangeHashing {
    #[inline(always)]
    fn bucket(hash: u64, buckets: usize) -> usize {
        hash as usize & (buckets - 1)
    }
}

/// Decides when the table grows, and by how much.
pub trait RehashPolicy {
    /// Upper bound on `len / bucket_count` the policy maintains.
    fn max_load_factor() -> f32;

    /// Returns `true` if a table of `buckets` slots must grow before holding
    /// `occupied` entries.
    fn needs_rehash(occupied: usize, buckets: usize) -> bool;

    /// Bucket count to request for an expected `expected` entries.
    fn buckets_for(expected: usize) -> usize;

    /// Grows `current` until it can serve a request for `desired` buckets.
    /// Never shrinks.
    fn grow(desired: usize, current: usize) -> usize;
}

/// Doubling growth with a maximum load factor of one half.
///
/// Half-full is a deliberately conservative bound: open addressing degrades
/// sharply as the load factor approaches one, and staying at or below 0.5
/// keeps expected probe lengths short for both probe sequences.
pub struct Power2Rehash;

/// Smallest bucket count [`Power2Rehash`] will allocate.
const MIN_BUCKETS: usize = 64;

impl RehashPolicy for Power2Rehash {
    #[inline(always)]
    fn max_load_factor() -> f32 {
        0.5
    }

    #[inline(always)]
    fn needs_rehash(occupied: usize, buckets: usize) -> bool {
        occupied > buckets >> 1
    }

    #[inline(always)]
    fn buckets_for(expected: usize) -> usize {
        expected << 1
    }

    #[inline(always)]
    fn grow(desired: usize, current: usize) -> usize {
        let mut buckets = current.max(MIN_BUCKETS);
        while buckets < desired {
            buckets <<= 1;
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn linear_probing_wraps() {
        assert_eq!(LinearProbing::next(0, 1, 64), 1);
        assert_eq!(LinearProbing::next(63, 1, 64), 0);
        assert_eq!(LinearProbing::next(60, 10, 64), 6);
    }

    #[test]
    fn linear_probing_covers_all_slots() {
        let buckets = 64;
        let mut seen = [false; 64];
        for step in 0..buckets {
            seen[LinearProbing::next(17, step, buckets)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn quadratic_probing_is_a_permutation_for_power_of_two() {
        // The triangular sequence must visit every slot once per `buckets`
        // steps, otherwise the probe walk could spin forever on a table that
        // still has vacancies.
        for buckets in [2usize, 8, 64, 256, 1024] {
            let mut seen = vec![false; buckets];
            for step in 0..buckets {
                seen[QuadraticProbing::next(5, step, buckets)] = true;
            }
            assert!(
                seen.iter().all(|&s| s),
                "incomplete coverage for {buckets} buckets"
            );
        }
    }

    #[test]
    fn quadratic_probing_non_power_of_two_fallback() {
        let pos = QuadraticProbing::next(3, 4, 10);
        assert_eq!(pos, (3 + 16) % 10);
    }

    #[test]
    fn mask_range_hashing_stays_in_range() {
        assert_eq!(MaskRangeHashing::bucket(0, 64), 0);
        assert_eq!(MaskRangeHashing::bucket(u64::MAX, 64), 63);
        assert_eq!(MaskRangeHashing::bucket(0x1_0040, 64), 0);
    }

    #[test]
    fn power2_rehash_thresholds() {
        assert!(!Power2Rehash::needs_rehash(32, 64));
        assert!(Power2Rehash::needs_rehash(33, 64));
        assert_eq!(Power2Rehash::max_load_factor(), 0.5);
    }

    #[test]
    fn power2_rehash_growth() {
        // Empty construction lands on the baseline.
        assert_eq!(Power2Rehash::grow(Power2Rehash::buckets_for(0), 0), 64);
        // Sized construction doubles until 2n fits.
        assert_eq!(Power2Rehash::grow(Power2Rehash::buckets_for(100), 0), 256);
        // Growth from an existing table doubles the current size.
        assert_eq!(Power2Rehash::grow(65, 64), 128);
        assert_eq!(Power2Rehash::grow(64, 64), 64);
    }
}
