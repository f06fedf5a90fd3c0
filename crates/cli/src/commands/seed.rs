//! Sample customer generation.
//!
//! Writes the same kind of records the server seeds its registry with, as a
//! JSON array of customers with IDs starting at 1.

use std::io::Write;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use zhunan_crm_admin::seed::sample_registry;

/// Generate `count` sample customers as pretty-printed JSON.
///
/// The same `seed` always yields the same records.
///
/// # Errors
///
/// Returns an error if `count` exceeds the customer ID range or
/// serialization fails.
pub fn customers_json(
    count: usize,
    seed: Option<u64>,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let registry = sample_registry(count, &mut rng)?;
    Ok(serde_json::to_string_pretty(registry.all())?)
}

/// Generate sample customers and write them to `output`, or to `out` when no
/// path is given.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn customers(
    count: usize,
    seed: Option<u64>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = customers_json(count, seed)?;

    if let Some(path) = output {
        std::fs::write(path, json)?;
        tracing::info!(count, path = %path.display(), "Wrote sample customers");
    } else {
        writeln!(out, "{json}")?;
    }
    Ok(())
}
