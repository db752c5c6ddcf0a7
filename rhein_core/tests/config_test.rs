use rhein_core::config::{ModSpec, SessionConfig, WindowsConfig};
use rhein_core::error::ModError;
use rhein_core::gameplay::{Ruleset, TimingWindows, WindowsPreset};
use rhein_core::input::events::KeyCode;
use rhein_core::mods::{CustomSpeedMod, X130Mod};

#[test]
fn test_empty_config_uses_defaults() {
    let config: SessionConfig = serde_json::from_str("{}").unwrap();

    assert_eq!(config, SessionConfig::default());
    assert_eq!(config.timing_windows(), TimingWindows::DEFAULT);
    assert!(config.mod_list().is_empty());
    assert!(config.stop_when_finished);
    assert_eq!(config.offset_ms, 0);
    assert_eq!(config.ruleset().keys(), 4);
    assert_eq!(config.ruleset().binding(2), Some(KeyCode::J));
}

#[test]
fn test_full_config() {
    let config: SessionConfig = serde_json::from_value(serde_json::json!({
        "windows": "strict",
        "mods": [{ "kind": "no_fail" }, { "kind": "speed", "rate": 1.3 }],
        "bindings": [30, 31, 32, 57, 36, 37, 38],
        "offset_ms": -40,
        "stop_when_finished": false
    }))
    .unwrap();

    assert_eq!(config.windows, WindowsConfig::Preset(WindowsPreset::Strict));
    assert_eq!(config.timing_windows().miss(), 154);
    assert!(!config.stop_when_finished);

    let options = config.options();
    assert_eq!(options.offset_ms, -40);
    assert!(!options.stop_when_finished);
    assert!(options.hooks.update.is_none());

    let mods = config.mod_list();
    assert_eq!(mods.ids(), vec![0, 17]);
    assert!(mods.contains::<X130Mod>());
    assert!(!mods.ranked());

    let ruleset = config.ruleset();
    assert_eq!(ruleset.keys(), 7);
    assert_eq!(ruleset.name(), "Mania7k");
    assert_eq!(ruleset.binding(3), Some(KeyCode::SPACE));
}

#[test]
fn test_custom_windows() {
    let config: SessionConfig = serde_json::from_value(serde_json::json!({
        "windows": {
            "marvelous": 16, "perfect": 40, "great": 73,
            "good": 103, "okay": 127, "miss": 164
        }
    }))
    .unwrap();

    assert_eq!(config.timing_windows().perfect(), 40);
    assert!(!config.timing_windows().is_default());
}

#[test]
fn test_mod_spec_from_str() {
    assert_eq!("NoFail".parse::<ModSpec>(), Ok(ModSpec::NoFail));
    assert_eq!("strict".parse::<ModSpec>(), Ok(ModSpec::Strict));
    assert_eq!("x0.55".parse::<ModSpec>(), Ok(ModSpec::Speed { rate: 0.55 }));
    assert_eq!(
        "warp".parse::<ModSpec>(),
        Err(ModError::Unknown("warp".to_string()))
    );
    assert!("x".parse::<ModSpec>().is_err());
}

#[test]
fn test_speed_rates_map_to_catalogue() {
    assert_eq!(ModSpec::Speed { rate: 0.55 }.build().id(), 6);
    assert_eq!(ModSpec::Speed { rate: 2.0 }.build().id(), 24);
    assert_eq!(ModSpec::Speed { rate: 1.05 }.build().id(), CustomSpeedMod::ID);
}
