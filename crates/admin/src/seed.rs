//! Startup data.
//!
//! The customer registry starts from randomly generated records on every
//! process start; pass a seeded RNG for reproducible output. The inventory
//! starts from the store's fixed filter catalog.

use rand::Rng;
use rand::seq::IndexedRandom;

use zhunan_crm_core::{Gender, InventoryItem, InventoryItemId, NewCustomer};

use crate::services::customers::{CustomerRegistry, RegistryError};
use crate::services::inventory::InventoryRegistry;

/// Filter catalog: name, item code, unit, NTD price, opening stock.
const CATALOG: &[(&str, &str, &str, u32, u32)] = &[
    ("前置三道(123)", "E009", "1組", 1680, 10),
    ("前置三道", "Y100(五代)", "1組", 1680, 7),
    ("1-1U抗菌折疊式PP", "E008 TW型", "1支", 760, 5),
    ("1-1U抗菌折疊式PP", "Y001(五代)", "1支", 760, 10),
    ("2-精選椰殼", "E001-1-1 TW型", "1支", 520, 10),
    ("2-精選椰殼", "Y002(五代)", "1支", 520, 8),
    ("3-特選壓縮", "E001-2-2 TW型", "1支", 520, 9),
    ("3-特選壓縮", "Y003(五代)", "1支", 520, 100),
    ("R-RO膜 (立地型)贈廢水比", "Y009(400G)/Z013-4廢水比1200", "1支", 3440, 100),
    ("R-RO膜 (立地型)贈廢水比", "Y010(200G)/Z013-4廢水比1200", "1支", 3020, 100),
    ("R-RO膜 贈廢水比", "Y008(五代)/Z013-1廢水比400", "1支", 2250, 100),
    ("4-共享-NO.4濾芯", "E003-1 TW型", "1支", 4180, 100),
    ("4-共享-NO.4濾芯", "Y004(五代)", "1支", 4180, 100),
    ("5-共享-NO.5濾芯", "E004-1 TW型", "1支", 4580, 100),
    ("5-共享-NO.5濾芯", "Y005(五代)", "1支", 4580, 100),
    ("6-共享-NO.6濾芯", "E005-1 TW型", "1支", 4580, 100),
    ("6-共享-NO.6濾芯", "Y006(五代)", "1支", 4580, 100),
    ("7-共享-NO.7濾芯", "E006-1 TW型", "1支", 1680, 100),
    ("7-共享-NO.7濾芯", "Y007(五代)", "1支", 1680, 100),
];

const SURNAMES: &[&str] = &["王", "李", "張", "劉", "陳", "楊", "黃"];
const MIDDLE_NAMES: &[&str] = &["小", "大", "志", "明", "俊", "文", "建"];
const GIVEN_NAMES: &[&str] = &["明", "華", "強", "玲", "美", "麗", "娟"];

const CITIES: &[&str] = &["台北市", "新北市", "桃園市", "新竹市", "台中市"];
const DISTRICTS: &[&str] = &["中正區", "信義區", "大安區", "中山區", "板橋區"];
const ROADS: &[&str] = &["中正路", "信義路", "中山路", "民生路", "和平路"];

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Generate one sample customer; `n` numbers its email and LINE ID.
pub fn sample_customer<R: Rng + ?Sized>(n: usize, rng: &mut R) -> NewCustomer {
    let name = format!(
        "{}{}{}",
        pick(rng, SURNAMES),
        pick(rng, MIDDLE_NAMES),
        pick(rng, GIVEN_NAMES)
    );
    let gender = if rng.random_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let phone = format!("09{}", rng.random_range(10_000_000..=99_999_999_u32));
    let address = format!(
        "{}{}{}{}號",
        pick(rng, CITIES),
        pick(rng, DISTRICTS),
        pick(rng, ROADS),
        rng.random_range(1..=999_u32)
    );
    let member_id = rng
        .random_bool(0.5)
        .then(|| format!("M{}", rng.random_range(1000..=9999_u32)));

    NewCustomer {
        name,
        gender,
        phone,
        address,
        member_id,
        email: Some(format!("user{n}@example.com")),
        line_id: Some(format!("line{n}")),
    }
}

/// Generate `count` sample customers numbered from 1.
pub fn sample_customers<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<NewCustomer> {
    (1..=count).map(|n| sample_customer(n, rng)).collect()
}

/// A registry holding `count` sample customers with IDs `1..=count`.
///
/// # Errors
///
/// Returns `RegistryError::IdsExhausted` if `count` exceeds the ID range.
pub fn sample_registry<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Result<CustomerRegistry, RegistryError> {
    let mut registry = CustomerRegistry::new();
    for customer in sample_customers(count, rng) {
        registry.add(customer)?;
    }
    tracing::debug!(count, "Generated sample customers");
    Ok(registry)
}

/// The filter catalog with its opening stock, IDs numbered from 1.
#[must_use]
pub fn inventory_catalog() -> InventoryRegistry {
    let items = (1..)
        .zip(CATALOG)
        .map(
            |(id, &(name, item_code, specification, price, stock_quantity))| InventoryItem {
                id: InventoryItemId::new(id),
                name: name.to_string(),
                item_code: item_code.to_string(),
                specification: specification.to_string(),
                price,
                stock_quantity,
            },
        )
        .collect();
    InventoryRegistry::with_items(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use zhunan_crm_core::validation::{validate_new_customer, validate_phone};

    #[test]
    fn test_sample_registry_ids_and_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let registry = sample_registry(33, &mut rng).unwrap();

        assert_eq!(registry.len(), 33);
        let ids: Vec<i32> = registry.all().iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, (1..=33).collect::<Vec<_>>());
        assert_eq!(registry.paginate(1, 10, None).total_pages, 4);
    }

    #[test]
    fn test_sample_customer_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for (i, customer) in sample_customers(50, &mut rng).iter().enumerate() {
            let n = i + 1;
            assert_eq!(customer.name.chars().count(), 3);
            assert!(customer.phone.starts_with("09"));
            assert_eq!(customer.phone.len(), 10);
            assert!(validate_phone(&customer.phone).is_ok());
            assert!(customer.address.ends_with('號'));
            assert_eq!(customer.email.as_deref(), Some(format!("user{n}@example.com").as_str()));
            assert_eq!(customer.line_id.as_deref(), Some(format!("line{n}").as_str()));
            if let Some(member_id) = &customer.member_id {
                assert!(member_id.starts_with('M'));
                assert_eq!(member_id.len(), 5);
            }
            assert!(matches!(customer.gender, Gender::Male | Gender::Female));
            assert!(validate_new_customer(customer).is_ok());
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = sample_customers(5, &mut StdRng::seed_from_u64(1));
        let b = sample_customers(5, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(
            sample_registry(0, &mut StdRng::seed_from_u64(0))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_inventory_catalog() {
        let inventory = inventory_catalog();
        assert_eq!(inventory.all().len(), 19);

        let first = inventory.get(InventoryItemId::new(1)).unwrap();
        assert_eq!(first.item_code, "E009");
        assert_eq!(first.price, 1680);

        let last = inventory.get(InventoryItemId::new(19)).unwrap();
        assert_eq!(last.item_code, "Y007(五代)");
        assert_eq!(inventory.search(Some("五代")).len(), 9);
    }
}
