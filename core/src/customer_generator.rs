use crate::{
    calendar::joining_epoch,
    records::{Customer, Gender, Region},
    rng::StreamRng,
    types::IdSequence,
};
use chrono::NaiveDate;

pub const PREMIUM_RATE: f64 = 0.20;

pub struct CustomerGenerator {
    count: usize,
    first_joining_date: NaiveDate,
}

impl CustomerGenerator {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            first_joining_date: joining_epoch(),
        }
    }

    /// Generate the full customer master. Ids are dense and sequential,
    /// joining dates advance one day per customer in id order.
    pub fn generate(&self, rng: &mut StreamRng, ids: &mut IdSequence) -> Vec<Customer> {
        let customers: Vec<Customer> = self
            .first_joining_date
            .iter_days()
            .take(self.count)
            .map(|joining_date| Customer {
                customer_id: ids.next_id(),
                gender: rng.pick_weighted(&Gender::WEIGHTS),
                region: rng.pick_weighted(&Region::WEIGHTS),
                joining_date,
                is_premium: rng.chance(PREMIUM_RATE),
            })
            .collect();

        log::info!("customer: generated {} customers", customers.len());
        customers
    }
}
