mod customer;

pub use customer::{Customer, create_entities, shuffle_entities};
