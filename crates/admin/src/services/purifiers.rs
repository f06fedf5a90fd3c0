//! Water purifiers per customer and the filter replacement schedule.
//!
//! Callers check that the customer exists; this registry only keys by ID.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use zhunan_crm_core::validation::validate_replacement;
use zhunan_crm_core::{
    ConsumableKind, ConsumableReplacement, ConsumableStatus, CustomerId, NewPurifier,
    ValidationError, WaterPurifier,
};

/// Purifier operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurifierError {
    #[error("找不到此淨水器")]
    NotFound(String),

    #[error("此水機號碼已存在")]
    DuplicateSerial(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A consumable that is overdue or falls due inside the reminder window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementDue {
    pub customer_id: CustomerId,
    pub serial_number: String,
    pub model: String,
    pub kind: ConsumableKind,
    pub label: &'static str,
    pub due_on: NaiveDate,
    pub status: ConsumableStatus,
}

/// Installed purifiers, grouped by customer in installation order.
#[derive(Debug, Clone, Default)]
pub struct PurifierRegistry {
    by_customer: BTreeMap<CustomerId, Vec<WaterPurifier>>,
}

impl PurifierRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_customer: BTreeMap::new(),
        }
    }

    /// Purifiers installed at `customer`; empty when there are none.
    #[must_use]
    pub fn for_customer(&self, customer: CustomerId) -> &[WaterPurifier] {
        self.by_customer
            .get(&customer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn serial_taken(&self, serial_number: &str) -> bool {
        self.by_customer
            .values()
            .flatten()
            .any(|p| p.serial_number == serial_number)
    }

    /// Install a purifier at `customer` with a fresh set of consumables.
    ///
    /// # Errors
    ///
    /// Returns `PurifierError::DuplicateSerial` if any customer already has a
    /// purifier with this machine number, or `PurifierError::Invalid` for a
    /// missing installation date or a schedule past the calendar range.
    #[instrument(skip(self, new), fields(serial = %new.serial_number))]
    pub fn install(
        &mut self,
        customer: CustomerId,
        new: NewPurifier,
    ) -> Result<WaterPurifier, PurifierError> {
        let date = new
            .installation_date
            .ok_or(ValidationError::InstallationDateRequired)?;
        let serial_number = new.serial_number.trim().to_string();
        if self.serial_taken(&serial_number) {
            return Err(PurifierError::DuplicateSerial(serial_number));
        }

        let purifier = WaterPurifier::install(
            serial_number,
            new.model.trim().to_string(),
            date,
            new.installation_person.trim().to_string(),
            new.location,
        )
        .ok_or(ValidationError::DateOutOfRange)?;

        tracing::debug!("Purifier installed");
        self.by_customer
            .entry(customer)
            .or_default()
            .push(purifier.clone());
        Ok(purifier)
    }

    /// Record a consumable replacement visit on one of `customer`'s purifiers.
    ///
    /// # Errors
    ///
    /// Returns `PurifierError::NotFound` if the customer has no purifier with
    /// `serial_number`, or `PurifierError::Invalid` for an empty item list or
    /// a schedule past the calendar range.
    #[instrument(skip(self, replacement))]
    pub fn record_replacement(
        &mut self,
        customer: CustomerId,
        serial_number: &str,
        replacement: ConsumableReplacement,
    ) -> Result<WaterPurifier, PurifierError> {
        validate_replacement(&replacement)?;

        let purifier = self
            .by_customer
            .get_mut(&customer)
            .and_then(|list| list.iter_mut().find(|p| p.serial_number == serial_number))
            .ok_or_else(|| PurifierError::NotFound(serial_number.to_string()))?;

        purifier
            .replace(&replacement.items, replacement.date, replacement.notes)
            .ok_or(ValidationError::DateOutOfRange)?;

        tracing::debug!(items = replacement.items.len(), "Replacement recorded");
        Ok(purifier.clone())
    }

    /// Drop every purifier of a removed customer. Returns how many were dropped.
    pub fn remove_customer(&mut self, customer: CustomerId) -> usize {
        self.by_customer.remove(&customer).map_or(0, |list| list.len())
    }

    /// Consumables due on or before `today + within_days`, soonest first.
    #[must_use]
    pub fn due_replacements(&self, today: NaiveDate, within_days: u32) -> Vec<ReplacementDue> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(within_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut due: Vec<ReplacementDue> = self
            .by_customer
            .iter()
            .flat_map(|(&customer_id, list)| list.iter().map(move |p| (customer_id, p)))
            .flat_map(|(customer_id, purifier)| {
                purifier
                    .consumables
                    .iter()
                    .filter(|c| c.next_replacement_at <= horizon)
                    .map(move |c| ReplacementDue {
                        customer_id,
                        serial_number: purifier.serial_number.clone(),
                        model: purifier.model.clone(),
                        kind: c.kind,
                        label: c.kind.label(),
                        due_on: c.next_replacement_at,
                        status: c.status(today),
                    })
            })
            .collect();

        due.sort_by(|a, b| {
            (a.due_on, a.customer_id, &a.serial_number, a.kind)
                .cmp(&(b.due_on, b.customer_id, &b.serial_number, b.kind))
        });
        due
    }
}
