use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A row of the `customer` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
}

impl Customer {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

/// Builds `n` customers with ids `1..=n`.
pub fn create_entities(n: usize) -> Vec<Customer> {
    (1..=n as i64).map(Customer::new).collect()
}

/// Deterministic permutation of `entities` for the given seed.
pub fn shuffle_entities(entities: &mut [Customer], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    entities.shuffle(&mut rng);
}
