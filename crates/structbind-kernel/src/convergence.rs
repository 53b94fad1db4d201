//! Convergence: reduce a type list to its most-derived members.
//!
//! Given types drawn from a single-rooted hierarchy, the converging set keeps
//! every type that no other listed type strictly extends. Survivors are
//! mutually incomparable. Two unrelated leaves both survive; deciding
//! whether that is ambiguous is left to the caller.

use crate::schema::{SchemaProvider, TypeId};

/// The maximal elements of `items` under `is_strict_subtype`, in
/// first-occurrence order with duplicates collapsed.
///
/// `is_strict_subtype(a, b)` must answer whether `a` strictly refines `b`.
pub fn converge_by<T, F>(items: &[T], is_strict_subtype: F) -> Vec<T>
where
    T: Clone + PartialEq,
    F: Fn(&T, &T) -> bool,
{
    let mut distinct: Vec<&T> = Vec::with_capacity(items.len());
    for item in items {
        if !distinct.contains(&item) {
            distinct.push(item);
        }
    }

    let mut survivors = Vec::with_capacity(distinct.len());
    for (index, &candidate) in distinct.iter().enumerate() {
        let refined = distinct
            .iter()
            .enumerate()
            .any(|(other_index, &other)| other_index != index && is_strict_subtype(other, candidate));
        if !refined {
            survivors.push(candidate.clone());
        }
    }
    survivors
}

/// `findConvergingTypes` over the hierarchy reported by `provider`.
pub fn find_converging_types<P>(types: &[TypeId], provider: &P) -> Vec<TypeId>
where
    P: SchemaProvider + ?Sized,
{
    converge_by(types, |sub, sup| provider.is_strict_subtype_of(sub, sup))
}
