#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validate errors are fine; panics are not.
    let Ok(cfg) = toml::from_str::<carstate_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_ok() {
        // A validated config must either build a normalizer or fail with a typed error.
        let _ = carstate_core::CarStateNormalizer::from_config(&cfg);
    }
});
