//! SKU synthesis for generated variations.
//!
//! A SKU is built from lower-cased, non-alphanumeric-stripped fragments of
//! the product name, size code, and frame name, hyphen-joined. Global
//! uniqueness is checked against storage; collisions get an incrementing
//! numeric suffix, and after 999 collisions a nanosecond timestamp suffix
//! guarantees termination.

use std::future::Future;

use chrono::Utc;

const PRODUCT_FRAGMENT_MAX: usize = 8;
const FRAME_FRAGMENT_MAX: usize = 8;
const MAX_NUMERIC_SUFFIX: u32 = 999;

/// Lower-cases and strips everything but ASCII alphanumerics.
fn sanitize_fragment(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The collision-free base SKU for a (product, size, frame) triple, e.g.
/// `"Acrylic Painting" / "small" / "Black Wood"` → `"acrylicp-small-blackwoo"`.
///
/// The product and frame fragments are truncated to eight characters; the
/// size code is already short (see the lookup-table code derivation).
/// Fragments that sanitize to nothing are dropped rather than leaving
/// doubled hyphens; a fully empty result falls back to `"sku"`.
#[must_use]
pub fn base_sku(product_name: &str, size_code: &str, frame_name: &str) -> String {
    let mut product = sanitize_fragment(product_name);
    product.truncate(PRODUCT_FRAGMENT_MAX);
    let size = sanitize_fragment(size_code);
    let mut frame = sanitize_fragment(frame_name);
    frame.truncate(FRAME_FRAGMENT_MAX);

    let joined: Vec<String> = [product, size, frame]
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect();
    if joined.is_empty() {
        return "sku".to_string();
    }
    joined.join("-")
}

/// Generates a globally unique SKU, querying `sku_exists` for each
/// candidate.
///
/// The base SKU is tried first, then `base-1` … `base-999`; if all of those
/// collide, a nanosecond timestamp suffix is appended without a further
/// check — uniqueness at that point is as good as the clock, and the loop
/// must terminate.
///
/// # Errors
///
/// Propagates the first error returned by `sku_exists`.
pub async fn generate_unique_sku<E, F, Fut>(
    product_name: &str,
    size_code: &str,
    frame_name: &str,
    mut sku_exists: F,
) -> Result<String, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let base = base_sku(product_name, size_code, frame_name);
    if !sku_exists(base.clone()).await? {
        return Ok(base);
    }

    for suffix in 1..=MAX_NUMERIC_SUFFIX {
        let candidate = format!("{base}-{suffix}");
        if !sku_exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros());
    Ok(format!("{base}-{nanos}"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::convert::Infallible;

    use super::*;

    #[test]
    fn base_sku_sanitizes_and_truncates() {
        assert_eq!(
            base_sku("Acrylic Painting", "small", "Black Wood"),
            "acrylicp-small-blackwoo"
        );
    }

    #[test]
    fn base_sku_drops_empty_fragments() {
        assert_eq!(base_sku("Painting", "", "Black"), "painting-black");
        assert_eq!(base_sku("***", "***", "***"), "sku");
    }

    #[test]
    fn base_sku_strips_punctuation() {
        assert_eq!(base_sku("Où-est 1?", "a4", "Oak!"), "oest1-a4-oak");
    }

    #[tokio::test]
    async fn unique_sku_returns_base_when_free() {
        let sku = generate_unique_sku("Painting", "small", "Black", |_| async {
            Ok::<bool, Infallible>(false)
        })
        .await
        .unwrap();
        assert_eq!(sku, "painting-small-black");
    }

    #[tokio::test]
    async fn unique_sku_appends_incrementing_suffix_on_collision() {
        let taken: HashSet<String> = ["painting-small-black", "painting-small-black-1"]
            .into_iter()
            .map(ToString::to_string)
            .collect();
        let sku = generate_unique_sku("Painting", "small", "Black", |candidate| {
            let hit = taken.contains(&candidate);
            async move { Ok::<bool, Infallible>(hit) }
        })
        .await
        .unwrap();
        assert_eq!(sku, "painting-small-black-2");
    }

    #[tokio::test]
    async fn unique_sku_falls_back_to_timestamp_after_999_collisions() {
        let calls = RefCell::new(0u32);
        let sku = generate_unique_sku("Painting", "small", "Black", |_| {
            *calls.borrow_mut() += 1;
            async { Ok::<bool, Infallible>(true) }
        })
        .await
        .unwrap();

        // base + 999 suffixed candidates were all checked and taken.
        assert_eq!(*calls.borrow(), 1000);
        let tail = sku
            .strip_prefix("painting-small-black-")
            .expect("timestamp suffix expected");
        assert!(tail.parse::<i64>().is_ok(), "suffix should be numeric: {sku}");
        assert!(tail.len() > 3, "timestamp suffix should outsize the numeric range");
    }

    #[tokio::test]
    async fn unique_sku_propagates_lookup_errors() {
        let result = generate_unique_sku("Painting", "small", "Black", |_| async {
            Err::<bool, &str>("connection reset")
        })
        .await;
        assert_eq!(result.unwrap_err(), "connection reset");
    }

    #[tokio::test]
    async fn skus_unique_within_a_run_for_identical_inputs() {
        // Simulates the batch path: each generated SKU is committed before
        // the next lookup, so later records see earlier ones.
        let taken = RefCell::new(HashSet::<String>::new());
        let mut generated = Vec::new();
        for _ in 0..3 {
            let sku = generate_unique_sku("Painting", "small", "Black", |candidate| {
                let hit = taken.borrow().contains(&candidate);
                async move { Ok::<bool, Infallible>(hit) }
            })
            .await
            .unwrap();
            taken.borrow_mut().insert(sku.clone());
            generated.push(sku);
        }
        assert_eq!(
            generated,
            vec![
                "painting-small-black",
                "painting-small-black-1",
                "painting-small-black-2",
            ]
        );
    }
}
