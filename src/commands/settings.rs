use crate::models::record::{merge_json, CellFormat};
use crate::models::Amount;
use crate::store::sqlite::{workspace_dir, WORKSPACE_DIR};
use chrono::{Datelike, NaiveDate};
use log::warn;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

const SETTINGS_SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum DateFormat {
    #[default]
    #[strum(serialize = "iso")]
    Iso,
    #[strum(serialize = "dd-mm-yyyy")]
    DayMonthYear,
    #[strum(serialize = "dd mon yyyy")]
    DayMonthName,
}

impl DateFormat {
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
            DateFormat::DayMonthYear => date.format("%d-%m-%Y").to_string(),
            DateFormat::DayMonthName => date.format("%d %b %Y").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub id_year: i32,
    pub export_directory: String,
    pub date_format: DateFormat,
    pub currency_symbol: String,
    pub seed_sample_data: bool,
    pub confirm_deletes: bool,
}

impl EffectiveSettings {
    pub fn export_path(&self, workspace_path: &str) -> PathBuf {
        Path::new(workspace_path).join(&self.export_directory)
    }
}

/// Listing form: grouped amounts behind `currencySymbol`, dates per `dateFormat`.
impl CellFormat for EffectiveSettings {
    fn amount(&self, amount: Amount) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    fn date(&self, date: NaiveDate) -> String {
        self.date_format.format(date)
    }
}

pub async fn get_settings(workspace_path: String) -> Result<Value, String> {
    load_settings_from_disk(&workspace_path)
}

pub async fn save_settings(workspace_path: String, settings: Value) -> Result<Value, String> {
    save_settings_to_disk(&workspace_path, settings)
}

pub fn load_effective_settings(workspace_path: &str) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(workspace_path)?;
    Ok(effective_from_value(&settings))
}

fn effective_from_value(settings: &Value) -> EffectiveSettings {
    let text = |key: &str, default: &str| {
        settings
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };
    let flag = |key: &str| settings.get(key).and_then(Value::as_bool).unwrap_or(true);

    EffectiveSettings {
        id_year: settings
            .get("idYear")
            .and_then(Value::as_u64)
            .map(|year| year as i32)
            .unwrap_or_else(current_year),
        export_directory: text("exportDirectory", "exports"),
        date_format: DateFormat::from_str(&text("dateFormat", "iso")).unwrap_or_default(),
        currency_symbol: text("currencySymbol", "₹"),
        seed_sample_data: flag("seedSampleData"),
        confirm_deletes: flag("confirmDeletes"),
    }
}

pub fn load_settings_from_disk(workspace_path: &str) -> Result<Value, String> {
    let path = settings_path(workspace_path);
    ensure_workspace_dir(workspace_path)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            warn!("settings.json is not valid JSON ({e}); falling back to defaults");
            json!({})
        })
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(workspace_path: &str, settings: Value) -> Result<Value, String> {
    let path = settings_path(workspace_path);
    ensure_workspace_dir(workspace_path)?;

    let mut merged = load_settings_from_disk(workspace_path).unwrap_or_else(|_| default_settings());
    merge_json(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

fn settings_path(workspace_path: &str) -> PathBuf {
    workspace_dir(workspace_path).join("settings.json")
}

fn ensure_workspace_dir(workspace_path: &str) -> Result<(), String> {
    fs::create_dir_all(workspace_dir(workspace_path))
        .map_err(|e| format!("Failed to create {WORKSPACE_DIR} directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        // Unversioned files spelled the export folder `exportDir`.
        rename_key(&mut out, "exportDir", "exportDirectory");
    }

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "idYear": current_year(),
        "exportDirectory": "exports",
        "dateFormat": "iso",
        "currencySymbol": "₹",
        "seedSampleData": true,
        "confirmDeletes": true
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn rename_key(target: &mut Value, from: &str, to: &str) {
    let Some(obj) = target.as_object_mut() else {
        return;
    };
    if let Some(value) = obj.remove(from) {
        obj.entry(to.to_string()).or_insert(value);
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "idYear", 2000, 2100, current_year() as u64);

    sanitize_enum(obj, "dateFormat", &["iso", "dd-mm-yyyy", "dd mon yyyy"], "iso");

    ensure_text(obj, "exportDirectory", "exports");
    ensure_text(obj, "currencySymbol", "₹");

    ensure_bool(obj, "seedSampleData", true);
    ensure_bool(obj, "confirmDeletes", true);
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    let clamped = raw.clamp(min, max);
    if clamped != raw {
        warn!("setting {key}={raw} out of range, using {clamped}");
    }
    map.insert(key.to_string(), json!(clamped));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

fn ensure_text(map: &mut Map<String, Value>, key: &str, default: &str) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string();
    map.insert(key.to_string(), json!(value));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
