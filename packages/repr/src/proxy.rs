//! Proxy representations: a domain type persisted through another
//! persistible type.

use std::collections::BTreeMap;
use std::sync::Arc;

use duokv_substrate::{KeyValueStore, Primitive};

use crate::Representation;

/// Persists a `V` by encoding it through the value type of a base
/// representation.
///
/// Both directions are partial:
///
/// - `to` returning `None` means the value cannot be represented; the write
///   is dropped in its entirety (never a partial or corrupt write).
/// - `from` returning `None` means the stored proxy value is unmapped; the
///   decode yields nothing.
///
/// For supported values the pair must satisfy `from(to(v)) == v`.
///
/// Proxy chains compose by nesting: a `ProxyRepr` over another `ProxyRepr`
/// short-circuits on failure at either stage. Chains are acyclic and must
/// terminate at a [`PrimitiveRepr`](crate::PrimitiveRepr).
///
/// # Example
///
/// ```rust
/// use duokv_repr::{PrimitiveRepr, ReprExt};
///
/// // An enum-with-raw-value persisted through its integer raw value.
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Theme { Light, Dark }
///
/// let repr = PrimitiveRepr::<i64>::new().proxied(
///     |theme: &Theme| Some(match theme { Theme::Light => 0, Theme::Dark => 1 }),
///     |raw| match raw { 0 => Some(Theme::Light), 1 => Some(Theme::Dark), _ => None },
/// );
/// # let _ = repr;
/// ```
pub struct ProxyRepr<B: Representation, V> {
    base: B,
    to: Arc<dyn Fn(&V) -> Option<B::Value> + Send + Sync>,
    from: Arc<dyn Fn(B::Value) -> Option<V> + Send + Sync>,
}

impl<B: Representation, V> ProxyRepr<B, V> {
    /// Build a proxy representation from partial conversion functions.
    pub fn new<T, F>(base: B, to: T, from: F) -> Self
    where
        T: Fn(&V) -> Option<B::Value> + Send + Sync + 'static,
        F: Fn(B::Value) -> Option<V> + Send + Sync + 'static,
    {
        ProxyRepr {
            base,
            to: Arc::new(to),
            from: Arc::new(from),
        }
    }

    /// Build a proxy representation from total conversion functions.
    pub fn infallible<T, F>(base: B, to: T, from: F) -> Self
    where
        T: Fn(&V) -> B::Value + Send + Sync + 'static,
        F: Fn(B::Value) -> V + Send + Sync + 'static,
    {
        ProxyRepr {
            base,
            to: Arc::new(move |v| Some(to(v))),
            from: Arc::new(move |p| Some(from(p))),
        }
    }
}

impl<B: Representation + Clone, V> Clone for ProxyRepr<B, V> {
    fn clone(&self) -> Self {
        ProxyRepr {
            base: self.base.clone(),
            to: self.to.clone(),
            from: self.from.clone(),
        }
    }
}

impl<B: Representation, V> Representation for ProxyRepr<B, V> {
    type Value = V;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<V> {
        self.base
            .get_from_array(index, array)
            .and_then(|proxy| (self.from)(proxy))
    }

    fn append_to_array(&self, value: &V, array: &mut Vec<Primitive>) {
        match (self.to)(value) {
            Some(proxy) => self.base.append_to_array(&proxy, array),
            None => log::debug!("proxy encode failed; array element dropped"),
        }
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<V> {
        self.base
            .get_from_map(key, map)
            .and_then(|proxy| (self.from)(proxy))
    }

    fn set_in_map(&self, key: &str, value: &V, map: &mut BTreeMap<String, Primitive>) {
        match (self.to)(value) {
            Some(proxy) => self.base.set_in_map(key, &proxy, map),
            None => log::debug!("proxy encode failed; map entry {key:?} unchanged"),
        }
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<V> {
        self.base
            .get_from_store(id, store)
            .and_then(|proxy| (self.from)(proxy))
    }

    fn set_in_store(&self, id: &str, value: &V, store: &dyn KeyValueStore) {
        match (self.to)(value) {
            Some(proxy) => self.base.set_in_store(id, &proxy, store),
            None => log::debug!("proxy encode failed; store slot {id:?} unchanged"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestStore;
    use crate::{PrimitiveRepr, ReprExt};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Channel {
        Stable,
        Beta,
    }

    fn channel_repr() -> ProxyRepr<PrimitiveRepr<String>, Channel> {
        PrimitiveRepr::<String>::new().proxied(
            |c: &Channel| {
                Some(match c {
                    Channel::Stable => "stable".to_string(),
                    Channel::Beta => "beta".to_string(),
                })
            },
            |raw| match raw.as_str() {
                "stable" => Some(Channel::Stable),
                "beta" => Some(Channel::Beta),
                _ => None,
            },
        )
    }

    #[test]
    fn roundtrip_through_text() {
        let store = TestStore::default();
        let repr = channel_repr();

        repr.set_in_store("channel", &Channel::Beta, &store);
        assert_eq!(store.get("channel"), Some(Primitive::Text("beta".into())));
        assert_eq!(repr.get_from_store("channel", &store), Some(Channel::Beta));
    }

    #[test]
    fn unmapped_stored_value_decodes_to_none() {
        let store = TestStore::default();
        store.set("channel", Primitive::Text("nightly".into()));

        assert_eq!(channel_repr().get_from_store("channel", &store), None);
    }

    #[test]
    fn failed_encode_leaves_prior_value() {
        let store = TestStore::default();
        let picky = PrimitiveRepr::<i64>::new().proxied(
            |v: &i64| (*v >= 0).then_some(*v),
            |raw| Some(raw),
        );

        picky.set_in_store("n", &7, &store);
        picky.set_in_store("n", &-1, &store);

        // The failed write is a no-op; the prior value remains.
        assert_eq!(store.get("n"), Some(Primitive::Integer(7)));
    }

    #[test]
    fn chained_proxies_match_single_stage() {
        // A↔B↔C: minutes ↔ seconds ↔ integer substrate.
        let chained = PrimitiveRepr::<i64>::new()
            .proxied(
                |seconds: &i64| Some(*seconds),
                |raw: i64| Some(raw),
            )
            .proxied(
                |minutes: &i64| Some(minutes * 60),
                |seconds: i64| (seconds % 60 == 0).then_some(seconds / 60),
            );
        let single = PrimitiveRepr::<i64>::new().proxied(
            |minutes: &i64| Some(minutes * 60),
            |seconds: i64| (seconds % 60 == 0).then_some(seconds / 60),
        );

        let store_a = TestStore::default();
        let store_b = TestStore::default();
        chained.set_in_store("t", &3, &store_a);
        single.set_in_store("t", &3, &store_b);

        assert_eq!(store_a.get("t"), store_b.get("t"));
        assert_eq!(store_a.get("t"), Some(Primitive::Integer(180)));
        assert_eq!(chained.get_from_store("t", &store_a), Some(3));
    }

    #[test]
    fn chain_short_circuits_on_either_stage() {
        let store = TestStore::default();
        store.set("t", Primitive::Integer(90));

        let chained = PrimitiveRepr::<i64>::new()
            .proxied(|s: &i64| Some(*s), |raw: i64| Some(raw))
            .proxied(
                |minutes: &i64| Some(minutes * 60),
                |seconds: i64| (seconds % 60 == 0).then_some(seconds / 60),
            );

        // 90 seconds is not a whole number of minutes.
        assert_eq!(chained.get_from_store("t", &store), None);
    }

    #[test]
    fn infallible_constructor_roundtrips() {
        let store = TestStore::default();
        let repr = ProxyRepr::infallible(
            PrimitiveRepr::<i64>::new(),
            |v: &u8| i64::from(*v),
            |raw| raw as u8,
        );

        repr.set_in_store("small", &200u8, &store);
        assert_eq!(repr.get_from_store("small", &store), Some(200u8));
    }
}
