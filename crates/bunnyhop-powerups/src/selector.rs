use bunnyhop_core::powerup::PowerUpKind;
use rand::Rng;

use crate::catalog::Catalog;

/// Draw a kind with probability proportional to its catalog weight.
pub fn choose_kind<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> PowerUpKind {
    kind_for_sample(catalog, rng.random::<f64>())
}

/// Map a uniform sample in `[0, 1)` onto the weighted catalog.
///
/// Walks definitions in canonical order subtracting weights; the first kind
/// that drives the remainder to zero or below wins. Floating-point residue
/// past the last entry falls back to [`Catalog::fallback_kind`].
pub fn kind_for_sample(catalog: &Catalog, unit: f64) -> PowerUpKind {
    let mut remaining = unit * catalog.total_weight();
    for def in catalog.iter() {
        remaining -= def.weight;
        if remaining <= 0.0 {
            return def.kind;
        }
    }
    catalog.fallback_kind()
}
