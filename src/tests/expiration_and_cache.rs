#[cfg(test)]
mod test {

    use crate::cache::memory::MemoryStore;
    use crate::cache::token_cache::{CredentialKind, TokenCache};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn entry_expires_after_ttl() {
        let cache = TokenCache::new(Arc::new(MemoryStore::new()), "wechat");
        let key = cache.key(CredentialKind::AccessToken, "A1");
        let ttl = 1;

        let stored = cache.set(&key, "short-val", ttl).await.unwrap();
        assert_eq!(stored, "short-val");

        let got = cache.get(&key).await.unwrap();
        assert_eq!(got.as_deref(), Some("short-val"));

        tokio::time::sleep(Duration::from_millis(ttl * 1000 + 100)).await;
        let got2 = cache.get(&key).await.unwrap();

        assert!(got2.is_none());
    }

    #[tokio::test]
    async fn very_long_expires_in_is_still_stored() {
        let cache = TokenCache::new(Arc::new(MemoryStore::new()), "wechat");
        let key = cache.key(CredentialKind::AccessToken, "A1");

        let stored = cache.set(&key, "v", 10_000_000_000_000_000).await.unwrap();
        assert_eq!(stored, "v");
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn refresh_after_expiry_replaces_value() {
        let cache = TokenCache::new(Arc::new(MemoryStore::new()), "wechat");
        let key = cache.key(CredentialKind::JsapiTicket, "A1");

        cache.set(&key, "first", 1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(cache.get(&key).await.unwrap().is_none());

        assert_eq!(cache.set(&key, "second", 60).await.unwrap(), "second");
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("second"));
    }
}
