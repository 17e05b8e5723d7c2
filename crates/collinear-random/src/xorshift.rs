//! Spark-compatible xorshift generator.
//!
//! Mirrors `org.apache.spark.util.random.XORShiftRandom`: the user seed is
//! scrambled with Scala's `MurmurHash3.bytesHash` and the state advances with
//! the (21, 35, 4) xorshift triple.

use rand::rand_core::impls::fill_bytes_via_next;
use rand::{RngCore, SeedableRng};

/// `scala.util.hashing.MurmurHash3.arraySeed`
const ARRAY_SEED: u32 = 0x3c07_4a61;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// A seedable xorshift generator producing Spark's uniform sequence.
///
/// [`RngCore::next_u64`] packs the 53 bits of Java's `nextDouble` into the
/// high bits of the word, so `rng.random::<f64>()` yields exactly the values
/// Spark draws in `randomSplit` and `rand(seed)`. The low 11 bits are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkXorShiftRandom {
    state: i64,
}

impl SparkXorShiftRandom {
    pub fn new(seed: i64) -> Self {
        Self {
            state: scramble_seed(seed),
        }
    }

    /// Advances the state and returns its low `bits` bits (Java's `Random.next`).
    fn next_bits(&mut self, bits: u32) -> u64 {
        let mut x = self.state ^ (self.state << 21);
        x ^= ((x as u64) >> 35) as i64;
        x ^= x << 4;
        self.state = x;
        (x as u64) & ((1u64 << bits) - 1)
    }

    /// A uniform value in `[0, 1)` (Java's `Random.nextDouble`).
    pub fn next_double(&mut self) -> f64 {
        self.next_mantissa() as f64 / (1u64 << 53) as f64
    }

    fn next_mantissa(&mut self) -> u64 {
        let high = self.next_bits(26);
        let low = self.next_bits(27);
        (high << 27) + low
    }
}

impl RngCore for SparkXorShiftRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_bits(32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_mantissa() << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for SparkXorShiftRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as i64)
    }
}

/// `XORShiftRandom.hashSeed`: hashes the big-endian seed bytes twice and
/// joins the two 32-bit results into the initial state.
fn scramble_seed(seed: i64) -> i64 {
    let bytes = seed.to_be_bytes();
    let low = murmur3_bytes_hash(&bytes, ARRAY_SEED);
    let high = murmur3_bytes_hash(&bytes, low);
    (i64::from(high) << 32) | i64::from(low)
}

fn murmur3_bytes_hash(data: &[u8], seed: u32) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut h = seed;
    for chunk in &mut chunks {
        let k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        h = (h ^ scramble_block(k)).rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }
    let tail = chunks.remainder();
    if !tail.is_empty() {
        let k = tail
            .iter()
            .enumerate()
            .fold(0u32, |k, (i, b)| k ^ (u32::from(*b) << (8 * i)));
        h ^= scramble_block(k);
    }
    finalize(h ^ data.len() as u32)
}

fn scramble_block(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

fn finalize(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}
