//! Named qualifier values packed into the bit fields of a configuration.
//!
//! Each group owns a mask inside one config byte (or short, for density).
//! Writing a group clears its masked bits and ORs the new value in, so groups
//! sharing a byte do not disturb each other.

use std::fmt;

/// A named value inside a masked bit field.
pub trait QualifierFlag: Copy + PartialEq + 'static {
    const MASK: u32;
    const VALUES: &'static [Self];

    fn flag(self) -> u32;

    fn name(self) -> &'static str;

    /// The group value held by `field`, `None` when its bits are unset or unknown.
    fn from_value(field: u32) -> Option<Self> {
        let masked = field & Self::MASK;
        Self::VALUES.iter().copied().find(|flag| flag.flag() == masked)
    }

    /// Case-insensitive lookup; a single leading `-` is ignored.
    fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('-').unwrap_or(name);
        if name.is_empty() {
            return None;
        }
        let name = name.to_ascii_lowercase();
        Self::VALUES.iter().copied().find(|flag| flag.name() == name)
    }

    /// Takes the first token naming a value of this group and clears it.
    fn take_from(tokens: &mut [Option<String>]) -> Option<Self> {
        for slot in tokens.iter_mut() {
            let found = slot.as_deref().and_then(Self::from_name);
            if found.is_some() {
                *slot = None;
                return found;
            }
        }
        None
    }
}

/// Replaces the masked bits of `field` with `flag`, clearing them for `None`.
pub fn update_field(mask: u32, flag: Option<u32>, field: u32) -> u32 {
    let keep = !mask & 0xff;
    (field & keep) | flag.unwrap_or(0)
}

macro_rules! qualifier_flag {
    ($(#[$meta:meta])* $name:ident, mask = $mask:expr, { $($variant:ident = ($text:expr, $value:expr)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl QualifierFlag for $name {
            const MASK: u32 = $mask;
            const VALUES: &'static [Self] = &[$($name::$variant),+];

            fn flag(self) -> u32 {
                match self {
                    $($name::$variant => $value),+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

qualifier_flag!(Orientation, mask = 0x0f, {
    Port = ("port", 0x01),
    Land = ("land", 0x02),
    Square = ("square", 0x03),
});

qualifier_flag!(Touchscreen, mask = 0x0f, {
    NoTouch = ("notouch", 0x01),
    Stylus = ("stylus", 0x02),
    Finger = ("finger", 0x03),
});

qualifier_flag!(Keyboard, mask = 0x0f, {
    NoKeys = ("nokeys", 0x01),
    Qwerty = ("qwerty", 0x02),
    TwelveKey = ("12key", 0x03),
});

qualifier_flag!(Navigation, mask = 0x0f, {
    NoNav = ("nonav", 0x01),
    Dpad = ("dpad", 0x02),
    Trackball = ("trackball", 0x03),
    Wheel = ("wheel", 0x04),
});

qualifier_flag!(
    /// Low two bits of the input flags byte.
    KeysHidden, mask = 0x03, {
    KeysExposed = ("keysexposed", 0x01),
    KeysHidden = ("keyshidden", 0x02),
    KeysSoft = ("keyssoft", 0x03),
});

qualifier_flag!(
    /// Bits 2..3 of the input flags byte.
    NavHidden, mask = 0x0c, {
    NavExposed = ("navexposed", 0x04),
    NavHidden = ("navhidden", 0x08),
});

qualifier_flag!(
    /// Grammatical gender.
    Gender, mask = 0x03, {
    Neuter = ("neuter", 0x01),
    Feminine = ("feminine", 0x02),
    Masculine = ("masculine", 0x03),
});

qualifier_flag!(
    /// UI mode type. `normal` is also a screen-layout size name; the parser
    /// gives a bare `normal` to the size, so a config whose only ui-mode
    /// qualifier is `normal` does not survive a string round trip.
    UiModeType, mask = 0x0f, {
    Normal = ("normal", 0x01),
    Desk = ("desk", 0x02),
    Car = ("car", 0x03),
    Television = ("television", 0x04),
    Appliance = ("appliance", 0x05),
    Watch = ("watch", 0x06),
    VrHeadset = ("vrheadset", 0x07),
    GodzillaUi = ("godzillaui", 0x0b),
    SmallUi = ("smallui", 0x0c),
    MediumUi = ("mediumui", 0x0d),
    LargeUi = ("largeui", 0x0e),
    HugeUi = ("hugeui", 0x0f),
});

qualifier_flag!(UiModeNight, mask = 0x30, {
    NotNight = ("notnight", 0x10),
    Night = ("night", 0x20),
});

qualifier_flag!(ScreenLayoutSize, mask = 0x0f, {
    Small = ("small", 0x01),
    Normal = ("normal", 0x02),
    Large = ("large", 0x03),
    XLarge = ("xlarge", 0x04),
});

qualifier_flag!(ScreenLayoutLong, mask = 0x30, {
    NotLong = ("notlong", 0x10),
    Long = ("long", 0x20),
});

qualifier_flag!(ScreenLayoutDir, mask = 0xc0, {
    Ltr = ("ldltr", 0x40),
    Rtl = ("ldrtl", 0x80),
});

qualifier_flag!(
    /// Lives in the second screen layout byte.
    ScreenLayoutRound, mask = 0x03, {
    NotRound = ("notround", 0x01),
    Round = ("round", 0x02),
});

qualifier_flag!(ColorModeWide, mask = 0x03, {
    NoWideCg = ("nowidecg", 0x01),
    WideCg = ("widecg", 0x02),
});

qualifier_flag!(ColorModeHdr, mask = 0x0c, {
    LowDr = ("lowdr", 0x04),
    HighDr = ("highdr", 0x08),
});

/// Screen density in dpi. Unlisted values render as `"<n>dpi"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Density(pub u16);

impl Density {
    pub const MASK: u32 = 0xffff;

    pub const LDPI: Density = Density(120);
    pub const MDPI: Density = Density(160);
    pub const TVDPI: Density = Density(213);
    pub const HDPI: Density = Density(240);
    pub const XHDPI: Density = Density(320);
    pub const XXHDPI: Density = Density(480);
    pub const XXXHDPI: Density = Density(640);
    pub const ANYDPI: Density = Density(0xfffe);
    pub const NODPI: Density = Density(0xffff);

    const NAMED: [(Density, &'static str); 9] = [
        (Density::LDPI, "ldpi"),
        (Density::MDPI, "mdpi"),
        (Density::TVDPI, "tvdpi"),
        (Density::HDPI, "hdpi"),
        (Density::XHDPI, "xhdpi"),
        (Density::XXHDPI, "xxhdpi"),
        (Density::XXXHDPI, "xxxhdpi"),
        (Density::ANYDPI, "anydpi"),
        (Density::NODPI, "nodpi"),
    ];

    /// `None` for 0, the unset density.
    pub fn from_value(value: u32) -> Option<Density> {
        let value = (value & Self::MASK) as u16;
        if value == 0 {
            return None;
        }
        Some(Density(value))
    }

    /// Accepts the named buckets and `"<n>dpi"`.
    pub fn from_name(name: &str) -> Option<Density> {
        let name = name.strip_prefix('-').unwrap_or(name);
        if name.len() < 4 {
            return None;
        }
        let name = name.to_ascii_lowercase();
        if let Some((density, _)) = Self::NAMED.iter().find(|(_, text)| *text == name) {
            return Some(*density);
        }
        let digits = name.strip_suffix("dpi")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u16>().ok().filter(|&dpi| dpi != 0).map(Density)
    }

    pub fn take_from(tokens: &mut [Option<String>]) -> Option<Density> {
        for slot in tokens.iter_mut() {
            let found = slot.as_deref().and_then(Density::from_name);
            if found.is_some() {
                *slot = None;
                return found;
            }
        }
        None
    }

    pub fn dpi(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::NAMED.iter().find(|(density, _)| density == self) {
            Some((_, name)) => f.write_str(name),
            None => write!(f, "{}dpi", self.0),
        }
    }
}
