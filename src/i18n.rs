//! English/German labels for buttons, markers and the readout
//!
//! Draw output only ever carries a [`LabelKey`] or a [`ReadoutLine`]; the
//! strings are resolved here. Units are never converted, only labelled.

use serde::{Deserialize, Serialize};

use crate::ms_to_kmh;

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    /// Parse a language tag such as `de`, `DE` or `de-AT`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        match primary.trim().to_lowercase().as_str() {
            "en" => Some(Locale::En),
            "de" => Some(Locale::De),
            _ => None,
        }
    }

    /// Map a page path to a locale: `/de` and `/de/...` are German,
    /// everything else (including `/`) is English
    pub fn from_route(path: &str) -> Self {
        path.split('/')
            .find(|segment| !segment.is_empty())
            .and_then(Self::from_tag)
            .unwrap_or_default()
    }
}

/// Every user-visible string the simulation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKey {
    StartButton,
    BrakeButton,
    RestartButton,
    BrakeStart,
    CarStopped,
    Speed,
    Position,
    Friction,
    Mass,
    BrakingDistance,
    UnitMs,
    UnitKmh,
    UnitM,
    UnitKg,
}

/// One line of the text readout, carrying raw SI values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadoutLine {
    /// Speed in m/s (km/h is derived when formatting)
    Speed(f64),
    Position(f64),
    Friction(f64),
    Mass(f64),
    BrakingDistance(f64),
}

/// Label table for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    locale: Locale,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn get(&self, key: LabelKey) -> &'static str {
        use LabelKey::*;
        match (self.locale, key) {
            (Locale::En, StartButton) => "Start Simulation",
            (Locale::De, StartButton) => "Simulation starten",
            (Locale::En, BrakeButton) => "Brake Now!",
            (Locale::De, BrakeButton) => "Jetzt bremsen!",
            (Locale::En, RestartButton) => "Restart Simulation",
            (Locale::De, RestartButton) => "Simulation neu starten",
            (Locale::En, BrakeStart) => "Brake Start",
            (Locale::De, BrakeStart) => "Bremsbeginn",
            (Locale::En, CarStopped) => "Car Stopped",
            (Locale::De, CarStopped) => "Auto steht",
            (Locale::En, Speed) => "Speed",
            (Locale::De, Speed) => "Geschwindigkeit",
            (_, Position) => "Position",
            (Locale::En, Friction) => "μ (friction)",
            (Locale::De, Friction) => "μ (Reibung)",
            (Locale::En, Mass) => "Mass",
            (Locale::De, Mass) => "Masse",
            (Locale::En, BrakingDistance) => "Braking Dist",
            (Locale::De, BrakingDistance) => "Bremsweg",
            (_, UnitMs) => "m/s",
            (_, UnitKmh) => "km/h",
            (_, UnitM) => "m",
            (_, UnitKg) => "kg",
        }
    }

    /// Render a readout line as display text
    pub fn format_readout(&self, line: &ReadoutLine) -> String {
        use LabelKey::*;
        match *line {
            ReadoutLine::Speed(ms) => format!(
                "{}: {:.2} {} ({:.1} {})",
                self.get(Speed),
                ms,
                self.get(UnitMs),
                ms_to_kmh(ms),
                self.get(UnitKmh)
            ),
            ReadoutLine::Position(m) => {
                format!("{}: {:.2} {}", self.get(Position), m, self.get(UnitM))
            }
            ReadoutLine::Friction(mu) => format!("{}: {}", self.get(Friction), mu),
            ReadoutLine::Mass(kg) => format!("{}: {} {}", self.get(Mass), kg, self.get(UnitKg)),
            ReadoutLine::BrakingDistance(m) => format!(
                "{}: {:.2} {}",
                self.get(BrakingDistance),
                m,
                self.get(UnitM)
            ),
        }
    }
}
