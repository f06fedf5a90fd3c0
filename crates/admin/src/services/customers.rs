//! Customer registry.
//!
//! Owns the in-memory customer list and answers the customer table's
//! search, pagination and CRUD calls. The registry itself is not
//! synchronized; shared access goes through the lock in [`crate::state`].

use std::collections::HashSet;

use thiserror::Error;
use tracing::instrument;

use zhunan_crm_core::{Customer, CustomerId, CustomerUpdate, NewCustomer, Page, total_pages};

/// Errors from keeping customer IDs unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No ID above the current maximum is left to hand out.
    #[error("customer ids exhausted after {0}")]
    IdsExhausted(CustomerId),

    /// Two seeded records share an ID.
    #[error("duplicate customer id {0}")]
    DuplicateId(CustomerId),
}

/// The authoritative customer collection, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
}

impl CustomerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            customers: Vec::new(),
        }
    }

    /// Create a registry holding `customers` in the given order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateId` if two records share an ID.
    pub fn with_customers(customers: Vec<Customer>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(customers.len());
        if let Some(dup) = customers.iter().find(|c| !seen.insert(c.id)) {
            return Err(RegistryError::DuplicateId(dup.id));
        }
        Ok(Self { customers })
    }

    /// All customers, in stored order.
    #[must_use]
    pub fn all(&self) -> &[Customer] {
        &self.customers
    }

    /// Number of stored customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Returns true if no customers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Look up a customer by ID.
    #[must_use]
    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// The ID the next `add` will assign: one past the largest stored ID.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::IdsExhausted` once the largest ID is `i32::MAX`.
    pub fn next_id(&self) -> Result<CustomerId, RegistryError> {
        match self.customers.iter().map(|c| c.id).max() {
            None => Ok(CustomerId::FIRST),
            Some(max) => max.next().ok_or(RegistryError::IdsExhausted(max)),
        }
    }

    /// Customers matching `term`, in stored order.
    ///
    /// An absent or empty term matches everything. Otherwise a customer
    /// matches when the case-folded term occurs in its name, phone, email
    /// or LINE ID.
    #[must_use]
    pub fn search(&self, term: Option<&str>) -> Vec<&Customer> {
        match term.filter(|t| !t.is_empty()) {
            None => self.customers.iter().collect(),
            Some(term) => {
                let needle = term.to_lowercase();
                self.customers
                    .iter()
                    .filter(|c| matches_search(c, &needle))
                    .collect()
            }
        }
    }

    /// One page of the customers matching `term`.
    ///
    /// Pages are 1-based. A page outside `1..=total_pages` comes back empty.
    /// A `page_size` of zero is treated as one.
    #[must_use]
    pub fn paginate(&self, page: usize, page_size: usize, term: Option<&str>) -> Page<Customer> {
        let page_size = page_size.max(1);
        let matches = self.search(term);
        let total_items = matches.len();

        let items = match page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) {
            Some(start) => matches
                .into_iter()
                .skip(start)
                .take(page_size)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Page {
            items,
            page,
            page_size,
            total_items,
            total_pages: total_pages(total_items, page_size),
        }
    }

    /// Append a new customer under the next free ID and return it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::IdsExhausted` when no higher ID is left; the
    /// collection is unchanged.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn add(&mut self, new: NewCustomer) -> Result<Customer, RegistryError> {
        let customer = Customer::from_new(self.next_id()?, new);
        tracing::debug!(id = %customer.id, "Customer added");
        self.customers.push(customer.clone());
        Ok(customer)
    }

    /// Merge `update` into the customer with `id`, keeping its position.
    ///
    /// Returns the updated record, or `None` if no customer has that ID.
    #[instrument(skip(self, update))]
    pub fn update(&mut self, id: CustomerId, update: CustomerUpdate) -> Option<Customer> {
        let customer = self.customers.iter_mut().find(|c| c.id == id)?;
        customer.apply(update);
        tracing::debug!("Customer updated");
        Some(customer.clone())
    }

    /// Remove the customer with `id`.
    ///
    /// Returns `true` if a customer was removed. The remaining customers keep
    /// their relative order.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: CustomerId) -> bool {
        let Some(index) = self.customers.iter().position(|c| c.id == id) else {
            return false;
        };
        self.customers.remove(index);
        tracing::debug!("Customer deleted");
        true
    }
}

/// `needle` must already be lower-cased.
fn matches_search(customer: &Customer, needle: &str) -> bool {
    let folded_contains =
        |field: Option<&str>| field.is_some_and(|value| value.to_lowercase().contains(needle));

    folded_contains(Some(customer.name.as_str()))
        || customer.phone.contains(needle)
        || folded_contains(customer.email.as_deref())
        || folded_contains(customer.line_id.as_deref())
}
