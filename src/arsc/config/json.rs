//! JSON mirror of a configuration.
//!
//! Only set fields are emitted, so the default config maps to `{}`.
//! `unknown_bytes` and `config_size` appear together, and only when the
//! tail past the known layout holds data.

use serde::{Deserialize, Serialize};

use crate::arsc::types::error::{ArscError, Result};
use super::flags::{Density, QualifierFlag};
use super::{ResConfig, SIZE_64};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcc: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnc: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touchscreen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_flags_keys_hidden: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_flags_nav_hidden: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "screenWidth", default, skip_serializing_if = "Option::is_none")]
    pub screen_width: Option<u16>,
    #[serde(rename = "screenHeight", default, skip_serializing_if = "Option::is_none")]
    pub screen_height: Option<u16>,
    #[serde(rename = "sdkVersion", default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<u16>,
    #[serde(rename = "minorVersion", default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_layout_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_layout_long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_layout_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_mode_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_mode_night: Option<String>,
    #[serde(rename = "smallestScreenWidthDp", default, skip_serializing_if = "Option::is_none")]
    pub smallest_screen_width_dp: Option<u16>,
    #[serde(rename = "screenWidthDp", default, skip_serializing_if = "Option::is_none")]
    pub screen_width_dp: Option<u16>,
    #[serde(rename = "screenHeightDp", default, skip_serializing_if = "Option::is_none")]
    pub screen_height_dp: Option<u16>,
    #[serde(rename = "localeScript", default, skip_serializing_if = "Option::is_none")]
    pub locale_script: Option<String>,
    #[serde(rename = "localeVariant", default, skip_serializing_if = "Option::is_none")]
    pub locale_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_layout_round: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode_wide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode_hdr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_size: Option<u32>,
}

fn non_zero(value: u16) -> Option<u16> {
    (value != 0).then_some(value)
}

fn flag_name<F: QualifierFlag>(flag: Option<F>) -> Option<String> {
    flag.map(|flag| flag.name().to_string())
}

fn parse_flag<F: QualifierFlag>(field: &str, name: Option<&str>) -> Result<Option<F>> {
    match name {
        None => Ok(None),
        Some(name) => F::from_name(name)
            .map(Some)
            .ok_or_else(|| ArscError::InvalidFormat(format!("Unknown {}: {}", field, name))),
    }
}

impl ResConfig {
    pub fn to_json(&self) -> ConfigJson {
        if self.is_default() {
            return ConfigJson::default();
        }
        let unknown_bytes = self.unknown_bytes_hex(None);
        let config_size = unknown_bytes.as_ref().map(|_| self.config_size());
        ConfigJson {
            mcc: non_zero(self.mcc()),
            mnc: non_zero(self.mnc()),
            language: self.language(),
            region: self.region(),
            orientation: flag_name(self.orientation()),
            touchscreen: flag_name(self.touchscreen()),
            density: self.density().map(|density| density.to_string()),
            keyboard: flag_name(self.keyboard()),
            navigation: flag_name(self.navigation()),
            input_flags_keys_hidden: flag_name(self.keys_hidden()),
            input_flags_nav_hidden: flag_name(self.nav_hidden()),
            gender: flag_name(self.gender()),
            screen_width: non_zero(self.screen_width()),
            screen_height: non_zero(self.screen_height()),
            sdk_version: non_zero(self.sdk_version()),
            minor_version: non_zero(self.minor_version()),
            screen_layout_size: flag_name(self.screen_layout_size()),
            screen_layout_long: flag_name(self.screen_layout_long()),
            screen_layout_dir: flag_name(self.screen_layout_dir()),
            ui_mode_type: flag_name(self.ui_mode_type()),
            ui_mode_night: flag_name(self.ui_mode_night()),
            smallest_screen_width_dp: non_zero(self.smallest_screen_width_dp()),
            screen_width_dp: non_zero(self.screen_width_dp()),
            screen_height_dp: non_zero(self.screen_height_dp()),
            locale_script: self.locale_script_raw(),
            locale_variant: self.locale_variant_raw(),
            screen_layout_round: flag_name(self.screen_layout_round()),
            color_mode_wide: flag_name(self.color_mode_wide()),
            color_mode_hdr: flag_name(self.color_mode_hdr()),
            unknown_bytes,
            config_size,
        }
    }

    /// Replaces every field with the values of `json`. On error the config
    /// is left unchanged.
    ///
    /// # Errors
    /// - [`ArscError::InvalidFormat`] for an unknown flag or density name
    /// - [`ArscError::InvalidConfigSize`] for a `config_size` off the ladder
    pub fn from_json(&mut self, json: &ConfigJson) -> Result<()> {
        if *json == ConfigJson::default() {
            self.reset();
            return Ok(());
        }
        let size = json.config_size.filter(|&size| size != 0).unwrap_or(SIZE_64);
        let mut config = ResConfig::with_size(size)?;

        let density = match json.density.as_deref() {
            None => None,
            Some(name) => Some(
                Density::from_name(name)
                    .ok_or_else(|| ArscError::InvalidFormat(format!("Unknown density: {}", name)))?,
            ),
        };

        config.set_mcc(json.mcc.unwrap_or(0));
        config.set_mnc(json.mnc.unwrap_or(0));
        config.set_language(json.language.as_deref());
        config.set_region(json.region.as_deref());
        config.set_orientation(parse_flag("orientation", json.orientation.as_deref())?);
        config.set_touchscreen(parse_flag("touchscreen", json.touchscreen.as_deref())?);
        config.set_density(density);
        config.set_keyboard(parse_flag("keyboard", json.keyboard.as_deref())?);
        config.set_navigation(parse_flag("navigation", json.navigation.as_deref())?);
        config.set_keys_hidden(parse_flag("keys hidden", json.input_flags_keys_hidden.as_deref())?);
        config.set_nav_hidden(parse_flag("nav hidden", json.input_flags_nav_hidden.as_deref())?);
        config.set_gender(parse_flag("gender", json.gender.as_deref())?);
        config.set_screen_width(json.screen_width.unwrap_or(0));
        config.set_screen_height(json.screen_height.unwrap_or(0));
        config.set_sdk_version(json.sdk_version.unwrap_or(0));
        config.set_minor_version(json.minor_version.unwrap_or(0));
        config.set_screen_layout_size(parse_flag("screen layout size", json.screen_layout_size.as_deref())?);
        config.set_screen_layout_long(parse_flag("screen layout long", json.screen_layout_long.as_deref())?);
        config.set_screen_layout_dir(parse_flag("screen layout dir", json.screen_layout_dir.as_deref())?);
        config.set_ui_mode_type(parse_flag("ui mode type", json.ui_mode_type.as_deref())?);
        config.set_ui_mode_night(parse_flag("ui mode night", json.ui_mode_night.as_deref())?);
        config.set_smallest_screen_width_dp(json.smallest_screen_width_dp.unwrap_or(0));
        config.set_screen_width_dp(json.screen_width_dp.unwrap_or(0));
        config.set_screen_height_dp(json.screen_height_dp.unwrap_or(0));
        config.set_locale_script(json.locale_script.as_deref());
        config.set_locale_variant_raw(json.locale_variant.as_deref());
        config.set_screen_layout_round(parse_flag("screen layout round", json.screen_layout_round.as_deref())?);
        config.set_color_mode_wide(parse_flag("color mode wide", json.color_mode_wide.as_deref())?);
        config.set_color_mode_hdr(parse_flag("color mode hdr", json.color_mode_hdr.as_deref())?);
        if let Some(hex) = json.unknown_bytes.as_deref() {
            config.set_unknown_bytes(hex);
        }
        *self = config;
        Ok(())
    }

    /// Serializes [`ResConfig::to_json`] as a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: ConfigJson = serde_json::from_str(text)?;
        let mut config = ResConfig::default();
        config.from_json(&json)?;
        Ok(config)
    }
}
