use bucketmap::container::hash_function::HashFunction;

#[cfg(test)]
mod tests {
    use super::HashFunction;

    #[test]
    fn test_hash_function() {
        let hash_function = HashFunction::<[u8]>::new();
        let key = b"test_key";
        let hash = hash_function.get_hash(key);
        assert_ne!(hash, 0);
    }

    #[test]
    fn test_same_seed_same_hash_across_instances() {
        let first = HashFunction::<str>::new();
        let second = HashFunction::<str>::new();
        for key in ["", "0.0", "a", "2.2", "a longer key with spaces"] {
            assert_eq!(first.get_hash(key), second.get_hash(key));
        }
    }

    #[test]
    fn test_seed_changes_hash() {
        let default = HashFunction::<str>::new();
        let seeded = HashFunction::<str>::with_seed(42);
        assert_eq!(seeded.seed(), 42);
        assert_ne!(default.get_hash("key"), seeded.get_hash("key"));
    }

    #[test]
    fn test_bucket_index_in_range() {
        let hash_function = HashFunction::<u64>::new();
        for bucket_count in [1usize, 2, 3, 16, 1000] {
            for key in 0..500u64 {
                assert!(hash_function.bucket_index(&key, bucket_count) < bucket_count);
            }
        }
    }

    #[test]
    fn test_sequential_keys_spread_over_buckets() {
        const BUCKETS: usize = 64;
        const KEYS: u64 = 10_000;

        let hash_function = HashFunction::<u64>::new();
        let mut counts = [0usize; BUCKETS];
        for key in 0..KEYS {
            counts[hash_function.bucket_index(&key, BUCKETS)] += 1;
        }

        // Expected ~156 per bucket
        let min = counts.iter().min().copied().unwrap_or(0);
        let max = counts.iter().max().copied().unwrap_or(0);
        assert!(min > 80, "emptiest bucket only got {} keys", min);
        assert!(max < 250, "fullest bucket got {} keys", max);
    }
}
