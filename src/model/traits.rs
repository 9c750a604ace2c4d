//! Hashing collaborators plugged into tree construction

use super::Hash;
use std::fmt::Debug;

/// Bound satisfied by every usable node hash type
///
/// Hashes are compared for equality and stored in a hash set during a
/// diff, so the type must be `Eq + Hash`. Blanket implemented.
pub trait HashValue: Clone + Eq + std::hash::Hash + Debug {}

impl<H: Clone + Eq + std::hash::Hash + Debug> HashValue for H {}

/// An item that can produce its own leaf hash
///
/// Must be deterministic: equal items always hash the same. Tree diffing
/// treats equal hashes as equal items, so the hash should have negligible
/// collision probability for the data at hand.
pub trait Hashable<H> {
    fn hash(&self) -> H;
}

/// Combines the ordered hashes of one or two children into a parent hash
///
/// Implementations must be deterministic and order-sensitive. The tree never
/// passes a placeholder for a missing right child: a single-child node is
/// combined from a one-element slice.
pub trait HashCombiner<H> {
    fn combine(&self, hashes: &[H]) -> H;
}

impl<H, F> HashCombiner<H> for F
where
    F: Fn(&[H]) -> H,
{
    fn combine(&self, hashes: &[H]) -> H {
        self(hashes)
    }
}

/// BLAKE3 over the concatenated child digests
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3;

impl HashCombiner<Hash> for Blake3 {
    fn combine(&self, hashes: &[Hash]) -> Hash {
        Hash::digest_many(hashes)
    }
}

impl Hashable<Hash> for [u8] {
    fn hash(&self) -> Hash {
        Hash::digest(self)
    }
}

impl Hashable<Hash> for Vec<u8> {
    fn hash(&self) -> Hash {
        Hash::digest(self)
    }
}

impl Hashable<Hash> for str {
    fn hash(&self) -> Hash {
        Hash::digest(self.as_bytes())
    }
}

impl Hashable<Hash> for String {
    fn hash(&self) -> Hash {
        Hash::digest(self.as_bytes())
    }
}

impl<H, T: Hashable<H> + ?Sized> Hashable<H> for &T {
    fn hash(&self) -> H {
        (**self).hash()
    }
}

macro_rules! impl_hashable_int {
    ($($ty:ty),*) => {
        $(
            impl Hashable<Hash> for $ty {
                fn hash(&self) -> Hash {
                    Hash::digest(&self.to_be_bytes())
                }
            }
        )*
    };
}

impl_hashable_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_str_hash_alike() {
        let owned = String::from("hello");
        assert_eq!(owned.hash(), "hello".hash());
        assert_eq!("hello".hash(), b"hello"[..].hash());
    }

    #[test]
    fn test_integers_hash_big_endian() {
        assert_eq!(7u32.hash(), Hash::digest(&[0, 0, 0, 7]));
        assert_ne!(7u32.hash(), 7u64.hash());
    }

    #[test]
    fn test_closure_combiner() {
        let xor = |hashes: &[u8]| hashes.iter().fold(0u8, |acc, h| acc ^ h);
        assert_eq!(xor.combine(&[0b1100, 0b1010]), 0b0110);
    }

    #[test]
    fn test_blake3_combiner_matches_digest_many() {
        let a = "a".hash();
        let b = "b".hash();
        assert_eq!(Blake3.combine(&[a, b]), Hash::digest_many(&[a, b]));
        assert_ne!(Blake3.combine(&[a, b]), Blake3.combine(&[b, a]));
    }
}
