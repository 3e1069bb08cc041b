use brigade_domain::config::{ApiConfig, DatabaseConfig, ServerConfig, VendorConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4710);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "brigade");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_some());

    let vendors = VendorConfig::default();
    assert!(vendors.stripe.base_url.starts_with("https://api.stripe.com"));
    assert!(vendors.stripe.secret_key.is_empty());
    assert!(vendors.square.webhook_secret.is_empty());
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "mem://", "namespace": "n", "database": "d", "credentials": null },
        "vendors": {
            "square": { "webhook_secret": "sq-secret" },
            "openrouter": { "base_url": "https://openrouter.ai/api/v1", "api_key": "k", "model": "m" }
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert!(cfg.database.credentials.is_none());
    assert_eq!(cfg.vendors.square.webhook_secret, "sq-secret");
    assert_eq!(cfg.vendors.openrouter.model, "m");
}

#[test]
fn jwt_defaults() {
    let cfg = ApiConfig::default();
    assert_eq!(cfg.security.jwt.issuer, "brigade");
    assert_eq!(cfg.security.jwt.ttl_seconds, 3600);
}
