//! Attaching eagerly loaded relations to already fetched rows.

use crate::model::{DbId, Product, ProductType, ProductVariant};
use std::collections::{BTreeSet, HashMap};

/// Distinct keys, sorted.
pub(crate) fn keys<T>(items: &[T], key: impl Fn(&T) -> DbId) -> Vec<DbId> {
    items
        .iter()
        .map(key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub(crate) fn attach_product(variants: &mut [ProductVariant], products: &[Product]) {
    let by_id: HashMap<DbId, &Product> = products.iter().map(|p| (p.id, p)).collect();
    for v in variants.iter_mut() {
        v.product = by_id.get(&v.product_id).map(|p| (*p).clone());
    }
}

pub(crate) fn attach_product_type(products: &mut [Product], types: &[ProductType]) {
    let by_id: HashMap<DbId, &ProductType> = types.iter().map(|t| (t.id, t)).collect();
    for p in products.iter_mut() {
        p.product_type = by_id.get(&p.product_type_id).map(|t| (*t).clone());
    }
}

/// Every type gets a list, empty when it owns no products.
pub(crate) fn attach_products(types: &mut [ProductType], products: &[Product]) {
    let mut grouped: HashMap<DbId, Vec<Product>> = HashMap::new();
    for p in products {
        grouped.entry(p.product_type_id).or_default().push(p.clone());
    }
    for t in types.iter_mut() {
        t.products = Some(grouped.remove(&t.id).unwrap_or_default());
    }
}

/// Every product gets a list, empty when it has no variants.
pub(crate) fn attach_variants(products: &mut [Product], variants: &[ProductVariant]) {
    let mut grouped: HashMap<DbId, Vec<ProductVariant>> = HashMap::new();
    for v in variants {
        grouped.entry(v.product_id).or_default().push(v.clone());
    }
    for p in products.iter_mut() {
        p.variants = Some(grouped.remove(&p.id).unwrap_or_default());
    }
}
