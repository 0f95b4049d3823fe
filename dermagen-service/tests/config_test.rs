use dermagen_service::config::DermagenConfig;
use dermagen_service::models::DiseaseClass;
use serial_test::serial;
use service_core::error::AppError;

const VARS: [&str; 7] = [
    "PORT",
    "APP__PORT",
    "AI_SERVICE_URL",
    "AI_SERVICE_TIMEOUT_SECS",
    "GENERATE_MAX_COUNT",
    "IMAGES_QUERY_LIMIT",
    "CLASS_INDEX_MAP",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_apply_when_environment_is_empty() {
    clear_env();

    let config = DermagenConfig::load().expect("Failed to load config");

    assert_eq!(config.common.port, 5000);
    assert_eq!(config.ai_service.url, "http://localhost:8000");
    assert_eq!(config.ai_service.timeout_seconds, 60);
    assert_eq!(config.limits.max_generate_count, 20);
    assert_eq!(config.limits.images_query_limit, 50);
    assert_eq!(config.class_index_map.index_of(DiseaseClass::Nv), 2);
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    std::env::set_var("PORT", "7070");
    std::env::set_var("AI_SERVICE_URL", "http://inference:8000/generate");
    std::env::set_var("GENERATE_MAX_COUNT", "8");
    std::env::set_var("IMAGES_QUERY_LIMIT", "10");
    std::env::set_var("CLASS_INDEX_MAP", "NV:0");

    let config = DermagenConfig::load().expect("Failed to load config");
    clear_env();

    assert_eq!(config.common.port, 7070);
    assert_eq!(config.ai_service.url, "http://inference:8000/generate");
    assert_eq!(config.limits.max_generate_count, 8);
    assert_eq!(config.limits.images_query_limit, 10);
    assert_eq!(config.class_index_map.index_of(DiseaseClass::Nv), 0);
}

#[test]
#[serial]
fn invalid_values_are_configuration_errors() {
    clear_env();
    std::env::set_var("GENERATE_MAX_COUNT", "twenty");
    assert!(DermagenConfig::load().is_err());

    clear_env();
    std::env::set_var("CLASS_INDEX_MAP", "XYZ:1");
    assert!(DermagenConfig::load().is_err());

    clear_env();
}

#[test]
#[serial]
fn zero_caps_and_timeout_are_configuration_errors() {
    for var in [
        "GENERATE_MAX_COUNT",
        "AI_SERVICE_TIMEOUT_SECS",
        "IMAGES_QUERY_LIMIT",
    ] {
        clear_env();
        std::env::set_var(var, "0");

        let result = DermagenConfig::load();
        assert!(
            matches!(result, Err(AppError::ConfigError(_))),
            "{}=0 should be rejected",
            var
        );
    }

    clear_env();
}
