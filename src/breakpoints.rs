use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::{Error, Result};

pub const MOBILE: &str = "mobile";
pub const TABLET: &str = "tablet";
pub const DESKTOP: &str = "desktop";

const DEFAULTS: [(&str, u32); 3] = [(MOBILE, 768), (TABLET, 1024), (DESKTOP, 1440)];

/// Upper bound of the tablet tier.
///
/// With `UntilTablet` widths in `[tablet, desktop)` are neither tablet nor
/// desktop and classify as [`Tier::Unclassified`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TabletRange {
    #[default]
    UntilTablet,
    UntilDesktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Mobile,
    Tablet,
    Desktop,
    Unclassified,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Mobile => MOBILE,
            Tier::Tablet => TABLET,
            Tier::Desktop => DESKTOP,
            Tier::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// Named width thresholds, always holding `mobile`, `tablet` and `desktop`.
///
/// Thresholds are not required to be ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    thresholds: BTreeMap<String, u32>,
    tablet_range: TabletRange,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            thresholds: DEFAULTS
                .iter()
                .map(|(name, width)| (name.to_string(), *width))
                .collect(),
            tablet_range: TabletRange::default(),
        }
    }
}

impl Breakpoints {
    /// Defaults overlaid with `overrides`, later entries win.
    pub fn with_overrides<K, I>(overrides: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u32)>,
    {
        overrides
            .into_iter()
            .fold(Self::default(), |bp, (name, width)| bp.with(name, width))
    }

    pub fn with(mut self, name: impl Into<String>, width: u32) -> Self {
        self.thresholds.insert(name.into(), width);
        self
    }

    pub fn with_tablet_range(mut self, range: TabletRange) -> Self {
        self.tablet_range = range;
        self
    }

    pub fn tablet_range(&self) -> TabletRange {
        self.tablet_range
    }

    pub fn get(&self, name: &str) -> Result<u32> {
        self.thresholds
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownBreakpoint(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.thresholds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn threshold(&self, name: &str) -> u32 {
        // The three tier names can't be removed, only overridden
        self.thresholds[name]
    }

    pub fn is_mobile(&self, width: u32) -> bool {
        width < self.threshold(MOBILE)
    }

    pub fn is_tablet(&self, width: u32) -> bool {
        let upper = match self.tablet_range {
            TabletRange::UntilTablet => self.threshold(TABLET),
            TabletRange::UntilDesktop => self.threshold(DESKTOP),
        };
        width >= self.threshold(MOBILE) && width < upper
    }

    pub fn is_desktop(&self, width: u32) -> bool {
        width >= self.threshold(DESKTOP)
    }

    /// Checked in mobile, tablet, desktop order, so overlapping thresholds favour the smaller tier.
    pub fn tier(&self, width: u32) -> Tier {
        if self.is_mobile(width) {
            Tier::Mobile
        } else if self.is_tablet(width) {
            Tier::Tablet
        } else if self.is_desktop(width) {
            Tier::Desktop
        } else {
            Tier::Unclassified
        }
    }
}

/// Parses `name=width` pairs separated by commas, applied over the defaults.
impl FromStr for Breakpoints {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut breakpoints = Self::default();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || Error::InvalidOverride(entry.to_string());
            let (name, width) = entry.split_once('=').ok_or_else(invalid)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid());
            }
            let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
            breakpoints = breakpoints.with(name, width);
        }
        Ok(breakpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let bp = Breakpoints::default();
        assert_eq!(bp.get(MOBILE).unwrap(), 768);
        assert_eq!(bp.get(TABLET).unwrap(), 1024);
        assert_eq!(bp.get(DESKTOP).unwrap(), 1440);
        assert_eq!(bp.iter().count(), 3);
        assert_eq!(bp.tablet_range(), TabletRange::UntilTablet);
    }

    #[test]
    fn test_overrides_win_per_key() {
        let bp = Breakpoints::with_overrides([("tablet", 900), ("wide", 1920)]);
        assert_eq!(bp.get(MOBILE).unwrap(), 768);
        assert_eq!(bp.get(TABLET).unwrap(), 900);
        assert_eq!(bp.get(DESKTOP).unwrap(), 1440);
        assert_eq!(bp.get("wide").unwrap(), 1920);

        let bp = Breakpoints::with_overrides([("mobile", 500), ("mobile", 600)]);
        assert_eq!(bp.get(MOBILE).unwrap(), 600, "last override wins");
    }

    #[test]
    fn test_unknown_name() {
        let err = Breakpoints::default().get("watch").unwrap_err();
        assert!(matches!(err, Error::UnknownBreakpoint(ref n) if n == "watch"));
        assert_eq!(err.to_string(), "unknown breakpoint `watch`");
    }

    #[test]
    fn test_tiers_with_defaults() {
        let bp = Breakpoints::default();
        for (width, mobile, tablet, desktop) in [
            (0, true, false, false),
            (767, true, false, false),
            (768, false, true, false),
            (1023, false, true, false),
            (1024, false, false, false),
            (1439, false, false, false),
            (1440, false, false, true),
        ] {
            assert_eq!(bp.is_mobile(width), mobile, "is_mobile({width})");
            assert_eq!(bp.is_tablet(width), tablet, "is_tablet({width})");
            assert_eq!(bp.is_desktop(width), desktop, "is_desktop({width})");
        }
        assert_eq!(bp.tier(1200), Tier::Unclassified);
    }

    #[test]
    fn test_tablet_until_desktop_closes_gap() {
        let bp = Breakpoints::default().with_tablet_range(TabletRange::UntilDesktop);
        assert!(bp.is_tablet(1024));
        assert!(bp.is_tablet(1439));
        assert!(!bp.is_tablet(1440));
        assert_eq!(bp.tier(1200), Tier::Tablet);
        assert_eq!(bp.tier(1440), Tier::Desktop);
    }

    #[test]
    fn test_parse_overrides() {
        let bp: Breakpoints = " mobile = 600, wide=1920 ".parse().unwrap();
        assert_eq!(bp.get(MOBILE).unwrap(), 600);
        assert_eq!(bp.get("wide").unwrap(), 1920);
        assert_eq!(bp.get(TABLET).unwrap(), 1024);

        assert_eq!("".parse::<Breakpoints>().unwrap(), Breakpoints::default());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["mobile", "=600", "mobile=wide", "mobile=-1"] {
            let err = input.parse::<Breakpoints>().unwrap_err();
            assert!(
                matches!(err, Error::InvalidOverride(ref e) if e == input),
                "{input}: {err}"
            );
        }
    }
}
