//! Water purifiers installed at customers and their filter schedule.
//!
//! Every purifier carries the same eight consumables. Each one is due for
//! replacement a fixed lifespan after it was last installed; replacing a
//! consumable restarts its clock and is kept as a maintenance record.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Unit of a consumable lifespan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifespanUnit {
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "m")]
    Month,
    #[serde(rename = "y")]
    Year,
}

/// How long a consumable lasts once installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifespan {
    pub value: u32,
    pub unit: LifespanUnit,
}

impl Lifespan {
    #[must_use]
    pub const fn months(value: u32) -> Self {
        Self {
            value,
            unit: LifespanUnit::Month,
        }
    }

    #[must_use]
    pub const fn years(value: u32) -> Self {
        Self {
            value,
            unit: LifespanUnit::Year,
        }
    }

    /// The date this lifespan ends when started on `from`.
    ///
    /// Month arithmetic clamps to the end of shorter months (Jan 31 plus one
    /// month is Feb 28 or 29). Returns `None` past the calendar range.
    #[must_use]
    pub fn ends_after(self, from: NaiveDate) -> Option<NaiveDate> {
        match self.unit {
            LifespanUnit::Day => from.checked_add_days(Days::new(u64::from(self.value))),
            LifespanUnit::Month => from.checked_add_months(Months::new(self.value)),
            LifespanUnit::Year => from.checked_add_months(Months::new(self.value.checked_mul(12)?)),
        }
    }
}

/// The eight filter stages of a purifier, in cabinet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableKind {
    Filter1,
    Filter2,
    Filter3,
    FilterRo,
    Filter4,
    Filter5,
    Filter6,
    Filter7,
}

impl ConsumableKind {
    /// Every stage, in cabinet order.
    pub const ALL: [Self; 8] = [
        Self::Filter1,
        Self::Filter2,
        Self::Filter3,
        Self::FilterRo,
        Self::Filter4,
        Self::Filter5,
        Self::Filter6,
        Self::Filter7,
    ];

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Filter1 => "濾芯 1 號",
            Self::Filter2 => "濾芯 2 號",
            Self::Filter3 => "濾芯 3 號",
            Self::FilterRo => "濾芯 RO 膜",
            Self::Filter4 => "濾芯 4 號",
            Self::Filter5 => "濾芯 5 號",
            Self::Filter6 => "濾芯 6 號",
            Self::Filter7 => "濾芯 7 號",
        }
    }

    /// Recommended replacement interval.
    #[must_use]
    pub const fn lifespan(self) -> Lifespan {
        match self {
            Self::Filter1 | Self::Filter2 | Self::Filter3 => Lifespan::months(6),
            Self::FilterRo => Lifespan::years(2),
            Self::Filter4 => Lifespan::years(9),
            Self::Filter5 => Lifespan::years(4),
            // 2.5 and 1.75 years
            Self::Filter6 => Lifespan::months(30),
            Self::Filter7 => Lifespan::months(21),
        }
    }
}

/// Whether a consumable is still within its lifespan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableStatus {
    Active,
    NeedsReplacement,
}

/// One installed consumable and when it is next due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub kind: ConsumableKind,
    pub lifespan: Lifespan,
    pub installed_at: NaiveDate,
    pub next_replacement_at: NaiveDate,
}

impl Consumable {
    /// A fresh consumable of `kind` installed on `on`.
    ///
    /// Returns `None` if the replacement date falls past the calendar range.
    #[must_use]
    pub fn installed(kind: ConsumableKind, on: NaiveDate) -> Option<Self> {
        let lifespan = kind.lifespan();
        Some(Self {
            kind,
            lifespan,
            installed_at: on,
            next_replacement_at: lifespan.ends_after(on)?,
        })
    }

    /// Status as of `today`; due on the replacement date itself.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> ConsumableStatus {
        if today >= self.next_replacement_at {
            ConsumableStatus::NeedsReplacement
        } else {
            ConsumableStatus::Active
        }
    }
}

/// A completed consumable replacement visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub date: NaiveDate,
    pub items: Vec<ConsumableKind>,
    pub notes: Option<String>,
}

/// A purifier installed at a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterPurifier {
    /// Machine number; unique across all customers.
    pub serial_number: String,
    pub model: String,
    pub installation_date: NaiveDate,
    pub installation_person: String,
    pub location: Option<String>,
    pub consumables: Vec<Consumable>,
    pub maintenance_records: Vec<MaintenanceRecord>,
}

impl WaterPurifier {
    /// A purifier installed on `date` with a fresh set of every consumable.
    ///
    /// Returns `None` if a replacement date falls past the calendar range.
    #[must_use]
    pub fn install(
        serial_number: String,
        model: String,
        date: NaiveDate,
        installation_person: String,
        location: Option<String>,
    ) -> Option<Self> {
        let consumables = ConsumableKind::ALL
            .into_iter()
            .map(|kind| Consumable::installed(kind, date))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            serial_number,
            model,
            installation_date: date,
            installation_person,
            location: location.filter(|l| !l.trim().is_empty()),
            consumables,
            maintenance_records: Vec::new(),
        })
    }

    /// Install fresh `items` on `date` and log the visit.
    ///
    /// Returns `None`, leaving the purifier unchanged, if a replacement date
    /// falls past the calendar range.
    pub fn replace(
        &mut self,
        items: &[ConsumableKind],
        date: NaiveDate,
        notes: Option<String>,
    ) -> Option<()> {
        let fresh = items
            .iter()
            .map(|&kind| Consumable::installed(kind, date))
            .collect::<Option<Vec<_>>>()?;

        for consumable in fresh {
            match self.consumables.iter_mut().find(|c| c.kind == consumable.kind) {
                Some(slot) => *slot = consumable,
                None => self.consumables.push(consumable),
            }
        }
        self.maintenance_records.push(MaintenanceRecord {
            date,
            items: items.to_vec(),
            notes: notes.filter(|n| !n.trim().is_empty()),
        });
        Some(())
    }
}

/// Fields of the add-purifier form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPurifier {
    pub serial_number: String,
    pub model: String,
    pub installation_date: Option<NaiveDate>,
    pub installation_person: String,
    pub location: Option<String>,
}

/// Fields of the record-replacement form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableReplacement {
    pub items: Vec<ConsumableKind>,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn purifier(on: NaiveDate) -> WaterPurifier {
        WaterPurifier::install(
            "SN-001".to_string(),
            "RO-500".to_string(),
            on,
            "阿明".to_string(),
            Some("廚房".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_default_schedule() {
        let p = purifier(date(2024, 1, 15));
        let due: Vec<(ConsumableKind, NaiveDate)> = p
            .consumables
            .iter()
            .map(|c| (c.kind, c.next_replacement_at))
            .collect();

        assert_eq!(
            due,
            vec![
                (ConsumableKind::Filter1, date(2024, 7, 15)),
                (ConsumableKind::Filter2, date(2024, 7, 15)),
                (ConsumableKind::Filter3, date(2024, 7, 15)),
                (ConsumableKind::FilterRo, date(2026, 1, 15)),
                (ConsumableKind::Filter4, date(2033, 1, 15)),
                (ConsumableKind::Filter5, date(2028, 1, 15)),
                (ConsumableKind::Filter6, date(2026, 7, 15)),
                (ConsumableKind::Filter7, date(2025, 10, 15)),
            ]
        );
    }

    #[test]
    fn test_month_end_clamps() {
        assert_eq!(
            Lifespan::months(1).ends_after(date(2024, 1, 31)),
            Some(date(2024, 2, 29))
        );
        let days = Lifespan {
            value: 10,
            unit: LifespanUnit::Day,
        };
        assert_eq!(days.ends_after(date(2024, 12, 25)), Some(date(2025, 1, 4)));
    }

    #[test]
    fn test_lifespan_past_calendar_range() {
        assert_eq!(Lifespan::years(u32::MAX).ends_after(date(2024, 1, 1)), None);
    }

    #[test]
    fn test_status_turns_on_due_date() {
        let p = purifier(date(2024, 1, 15));
        let first = &p.consumables[0];
        assert_eq!(first.status(date(2024, 7, 14)), ConsumableStatus::Active);
        assert_eq!(
            first.status(date(2024, 7, 15)),
            ConsumableStatus::NeedsReplacement
        );
    }

    #[test]
    fn test_replace_restarts_clock_and_logs_visit() {
        let mut p = purifier(date(2024, 1, 15));
        p.replace(
            &[ConsumableKind::Filter1, ConsumableKind::FilterRo],
            date(2024, 8, 1),
            Some("定期保養".to_string()),
        )
        .unwrap();

        let filter1 = &p.consumables[0];
        assert_eq!(filter1.installed_at, date(2024, 8, 1));
        assert_eq!(filter1.next_replacement_at, date(2025, 2, 1));
        assert_eq!(p.consumables[1].installed_at, date(2024, 1, 15));
        assert_eq!(p.consumables[3].next_replacement_at, date(2026, 8, 1));
        assert_eq!(p.consumables.len(), 8);

        assert_eq!(
            p.maintenance_records,
            vec![MaintenanceRecord {
                date: date(2024, 8, 1),
                items: vec![ConsumableKind::Filter1, ConsumableKind::FilterRo],
                notes: Some("定期保養".to_string()),
            }]
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_value(Consumable::installed(
            ConsumableKind::FilterRo,
            date(2024, 1, 1),
        ))
        .unwrap();
        assert_eq!(json["kind"], "filter_ro");
        assert_eq!(json["lifespan"]["unit"], "y");
        assert_eq!(json["next_replacement_at"], "2026-01-01");
    }
}
