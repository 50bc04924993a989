//! Qualifier string builder and parser.
//!
//! The builder emits one dash-separated token per non-default field in a
//! fixed order. The parser is order-insensitive: it runs the tokens through
//! a sequence of phases, each claiming the tokens it recognizes. Locale
//! phases run last because bare alphabetic tokens (`en`, `car`, `land`)
//! would otherwise be ambiguous. Tokens no phase claims are reported back.

use std::sync::OnceLock;
use log::{debug, warn};
use regex::Regex;

use crate::arsc::utils::parse_u16;
use super::flags::{
    ColorModeHdr, ColorModeWide, Density, Gender, KeysHidden, Keyboard, NavHidden, Navigation,
    Orientation, QualifierFlag, ScreenLayoutDir, ScreenLayoutLong, ScreenLayoutRound,
    ScreenLayoutSize, Touchscreen, UiModeNight, UiModeType,
};
use super::{ResConfig, SIZE_64};

/// Prefix of the hex token carrying bytes past the known layout.
pub const UNKNOWN_BYTES_PREFIX: &str = "unknown_bytes";

/// Unknown bytes rendered into a qualifier string, at most.
const UNKNOWN_BYTES_LIMIT: usize = 8;

static PREFIX_NUMBER: OnceLock<Regex> = OnceLock::new();
static DP: OnceLock<Regex> = OnceLock::new();
static WIDTH_HEIGHT: OnceLock<Regex> = OnceLock::new();
static NUMBERING_SYSTEM: OnceLock<Regex> = OnceLock::new();
static LOCALE_SCRIPT_VARIANT: OnceLock<Regex> = OnceLock::new();

fn prefix_number_regex() -> &'static Regex {
    PREFIX_NUMBER.get_or_init(|| Regex::new(r"^([mcnv]+)([0-9]+)$").expect("Invalid prefixed number regex"))
}

fn dp_regex() -> &'static Regex {
    DP.get_or_init(|| Regex::new(r"^([swh]+)([0-9]+)dp$").expect("Invalid dp regex"))
}

fn width_height_regex() -> &'static Regex {
    WIDTH_HEIGHT.get_or_init(|| Regex::new(r"^([0-9]+)[xX]([0-9]+)$").expect("Invalid width/height regex"))
}

fn numbering_system_regex() -> &'static Regex {
    NUMBERING_SYSTEM.get_or_init(|| Regex::new(r"^u\+nu\+(.{1,8})$").expect("Invalid numbering system regex"))
}

/// `b+lang[+region][+Script][+VARIANT]`; the region may carry an `r` prefix.
fn locale_script_variant_regex() -> &'static Regex {
    LOCALE_SCRIPT_VARIANT.get_or_init(|| {
        Regex::new(r"^b(\+[a-z]{2,3})?(\+r?[A-Z0-9]{2,3})?(\+[A-Z][a-z]{3})?(\+[A-Z0-9#]{2,8})?$")
            .expect("Invalid locale regex")
    })
}

/// Outcome of a qualifier parse. Recognized fields are applied even when
/// some tokens are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifierParse {
    pub rejected: Vec<String>,
}

impl QualifierParse {
    pub fn is_ok(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Builds the qualifier string of `config`, without a leading dash.
pub(crate) fn build(config: &ResConfig) -> String {
    if config.is_default() {
        return String::new();
    }
    let mut tokens: Vec<String> = Vec::new();
    push_number(&mut tokens, "mcc", config.mcc());
    push_number(&mut tokens, "mnc", config.mnc());

    push_locale(&mut tokens, config);

    push_flag(&mut tokens, config.gender());

    push_flag(&mut tokens, config.screen_layout_dir());
    push_dp(&mut tokens, "sw", config.smallest_screen_width_dp());
    push_dp(&mut tokens, "w", config.screen_width_dp());
    push_dp(&mut tokens, "h", config.screen_height_dp());

    push_flag(&mut tokens, config.screen_layout_size());
    push_flag(&mut tokens, config.screen_layout_long());
    push_flag(&mut tokens, config.screen_layout_round());

    push_flag(&mut tokens, config.color_mode_wide());
    push_flag(&mut tokens, config.color_mode_hdr());

    push_flag(&mut tokens, config.orientation());
    push_flag(&mut tokens, config.ui_mode_type());
    push_flag(&mut tokens, config.ui_mode_night());

    if let Some(density) = config.density() {
        tokens.push(density.to_string());
    }

    push_flag(&mut tokens, config.touchscreen());
    push_flag(&mut tokens, config.keys_hidden());
    push_flag(&mut tokens, config.keyboard());
    push_flag(&mut tokens, config.nav_hidden());
    push_flag(&mut tokens, config.navigation());

    let (width, height) = (config.screen_width(), config.screen_height());
    if width != 0 || height != 0 {
        tokens.push(format!("{}x{}", width, height));
    }

    push_number(&mut tokens, "v", config.sdk_version());

    if let Some(hex) = config.unknown_bytes_hex(Some(UNKNOWN_BYTES_LIMIT)) {
        tokens.push(format!("{}{}", UNKNOWN_BYTES_PREFIX, hex));
    }
    tokens.join("-")
}

fn push_number(tokens: &mut Vec<String>, prefix: &str, value: u16) {
    if value != 0 {
        tokens.push(format!("{}{}", prefix, value));
    }
}

fn push_dp(tokens: &mut Vec<String>, prefix: &str, value: u16) {
    if value != 0 {
        tokens.push(format!("{}{}dp", prefix, value));
    }
}

fn push_flag<F: QualifierFlag>(tokens: &mut Vec<String>, flag: Option<F>) {
    if let Some(flag) = flag {
        tokens.push(flag.name().to_string());
    }
}

/// `en-rUS`, or `b+sr+Latn` when a script, a variant or a numeric region
/// needs the BCP 47 form.
fn push_locale(tokens: &mut Vec<String>, config: &ResConfig) {
    let language = config.language();
    let region = config.region();
    if language.is_none() && region.is_none() {
        return;
    }
    let script = config.locale_script();
    let variant = config.locale_variant();
    let region = region.map(|region| {
        if region.len() == 2 {
            format!("r{}", region)
        } else {
            region
        }
    });
    let bcp47 = script.is_some()
        || variant.is_some()
        || region.as_deref().is_some_and(|region| !region.starts_with('r'));
    if bcp47 {
        let mut token = String::from("b");
        for part in [language, region, script, variant].into_iter().flatten() {
            token.push('+');
            token.push_str(&part);
        }
        tokens.push(token);
    } else {
        tokens.extend([language, region].into_iter().flatten());
    }
}

/// Token list being consumed by the parser phases.
struct Tokens {
    slots: Vec<Option<String>>,
}

impl Tokens {
    fn split(text: &str) -> Self {
        let slots = text
            .split('-')
            .map(|token| Some(token.to_string()).filter(|token| !token.is_empty()))
            .collect();
        Self { slots }
    }

    fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Offers every remaining token to `claim`; claimed tokens are cleared.
    fn claim_all(&mut self, mut claim: impl FnMut(&str) -> bool) {
        for slot in self.slots.iter_mut() {
            if slot.as_deref().is_some_and(&mut claim) {
                *slot = None;
            }
        }
    }

    /// Like [`Tokens::claim_all`] but stops after the first claimed token.
    fn claim_first(&mut self, mut claim: impl FnMut(&str) -> bool) -> bool {
        for slot in self.slots.iter_mut() {
            if slot.as_deref().is_some_and(&mut claim) {
                *slot = None;
                return true;
            }
        }
        false
    }

    fn take_flag<F: QualifierFlag>(&mut self) -> Option<F> {
        F::take_from(&mut self.slots)
    }

    fn into_rejected(self) -> Vec<String> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Parses `text` into `config`.
///
/// The config is widened to 64 bytes while parsing, then trimmed back to its
/// original size when the parsed values allow.
pub(crate) fn parse(config: &mut ResConfig, text: &str) -> QualifierParse {
    let preferred = config.config_size();
    let mut tokens = Tokens::split(text);
    if !tokens.is_empty() {
        config.ensure_size(SIZE_64);
        parse_phases(config, &mut tokens);
    }
    config.trim_to_size(preferred);
    finish(tokens)
}

fn parse_phases(config: &mut ResConfig, tokens: &mut Tokens) {
    tokens.claim_all(|token| parse_prefixed_number(config, token));
    tokens.claim_all(|token| parse_dp(config, token));
    tokens.claim_first(|token| parse_width_height(config, token));
    tokens.claim_first(|token| {
        let matched = numbering_system_regex().is_match(token);
        if matched {
            debug!("Qualifier {} names a numbering system, not stored", token);
        }
        matched
    });
    tokens.claim_first(|token| match token.strip_prefix(UNKNOWN_BYTES_PREFIX) {
        Some(hex) => {
            config.set_unknown_bytes(hex);
            true
        }
        None => false,
    });

    config.set_orientation(tokens.take_flag::<Orientation>());
    config.set_touchscreen(tokens.take_flag::<Touchscreen>());
    config.set_density(Density::take_from(&mut tokens.slots));
    config.set_keyboard(tokens.take_flag::<Keyboard>());
    config.set_navigation(tokens.take_flag::<Navigation>());

    config.set_keys_hidden(tokens.take_flag::<KeysHidden>());
    config.set_nav_hidden(tokens.take_flag::<NavHidden>());
    config.set_gender(tokens.take_flag::<Gender>());
    // A lone `normal` is claimed here, ahead of the ui-mode type.
    config.set_screen_layout_size(tokens.take_flag::<ScreenLayoutSize>());
    config.set_screen_layout_long(tokens.take_flag::<ScreenLayoutLong>());
    config.set_screen_layout_dir(tokens.take_flag::<ScreenLayoutDir>());

    config.set_ui_mode_type(tokens.take_flag::<UiModeType>());
    config.set_ui_mode_night(tokens.take_flag::<UiModeNight>());
    config.set_screen_layout_round(tokens.take_flag::<ScreenLayoutRound>());
    config.set_color_mode_wide(tokens.take_flag::<ColorModeWide>());
    config.set_color_mode_hdr(tokens.take_flag::<ColorModeHdr>());

    if tokens.claim_first(|token| parse_locale_script_variant(config, token)) {
        return;
    }
    tokens.claim_first(|token| {
        let matched = is_language(token);
        if matched {
            config.set_language(Some(token));
        }
        matched
    });
    tokens.claim_first(|token| {
        let matched = is_region(token);
        if matched {
            config.set_region(Some(token));
        }
        matched
    });
}

/// Parses a `language-region-script` locale string into `config`.
///
/// An empty string clears language, region and script.
pub(crate) fn parse_locale(config: &mut ResConfig, text: &str) -> QualifierParse {
    let mut tokens = Tokens::split(text);
    if tokens.is_empty() {
        config.set_language(None);
        config.set_region(None);
        config.set_locale_script(None);
        return QualifierParse::default();
    }
    tokens.claim_first(|token| {
        let matched = is_language(token);
        if matched {
            config.set_language(Some(token));
        }
        matched
    });
    tokens.claim_first(|token| {
        let matched = is_locale_region(token);
        if matched {
            config.set_region(Some(token));
        }
        matched
    });
    let mut script = None;
    tokens.claim_first(|token| {
        let matched = token.len() >= 2;
        if matched {
            script = Some(token.to_string());
        }
        matched
    });
    config.set_locale_script(script.as_deref());
    finish(tokens)
}

fn finish(tokens: Tokens) -> QualifierParse {
    let rejected = tokens.into_rejected();
    if !rejected.is_empty() {
        warn!("Unrecognized qualifiers: {}", rejected.join("-"));
    }
    QualifierParse { rejected }
}

fn parse_prefixed_number(config: &mut ResConfig, token: &str) -> bool {
    let Some(caps) = prefix_number_regex().captures(token) else {
        return false;
    };
    let Some(value) = parse_u16(&caps[2]) else {
        return false;
    };
    match &caps[1] {
        "mcc" => config.set_mcc(value),
        "mnc" => config.set_mnc(value),
        "v" => config.set_sdk_version(value),
        _ => return false,
    }
    true
}

fn parse_dp(config: &mut ResConfig, token: &str) -> bool {
    let Some(caps) = dp_regex().captures(token) else {
        return false;
    };
    let Some(value) = parse_u16(&caps[2]) else {
        return false;
    };
    match &caps[1] {
        "sw" => config.set_smallest_screen_width_dp(value),
        "w" => config.set_screen_width_dp(value),
        "h" => config.set_screen_height_dp(value),
        _ => return false,
    }
    true
}

fn parse_width_height(config: &mut ResConfig, token: &str) -> bool {
    let Some(caps) = width_height_regex().captures(token) else {
        return false;
    };
    match (parse_u16(&caps[1]), parse_u16(&caps[2])) {
        (Some(width), Some(height)) => {
            config.set_screen_size(width, height);
            true
        }
        _ => false,
    }
}

fn parse_locale_script_variant(config: &mut ResConfig, token: &str) -> bool {
    if token.len() < 4 || !token.starts_with("b+") {
        return false;
    }
    let Some(caps) = locale_script_variant_regex().captures(token) else {
        return false;
    };
    let part = |index: usize| caps.get(index).map(|m| m.as_str().trim_start_matches('+'));
    config.set_language(part(1));
    config.set_region(part(2));
    config.set_locale_script(part(3));
    config.set_locale_variant(part(4));
    true
}

/// Two or three lowercase letters.
fn is_language(token: &str) -> bool {
    matches!(token.len(), 2 | 3) && token.bytes().all(|b| b.is_ascii_lowercase())
}

/// `rUS` or three digits.
fn is_region(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() != 3 {
        return false;
    }
    if bytes[0] == b'r' {
        return bytes[1..].iter().all(u8::is_ascii_uppercase);
    }
    bytes.iter().all(u8::is_ascii_digit)
}

/// `US` or three digits, as written in a locale string.
fn is_locale_region(token: &str) -> bool {
    match token.len() {
        2 => token.bytes().all(|b| b.is_ascii_uppercase()),
        3 => token.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}
