//! Closed-set answers offered by the intake forms.
//!
//! Each option travels as its display label, so a value outside the set
//! fails to deserialize instead of reaching the validator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not one of the offered options")]
pub struct UnknownOption(pub String);

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == s)
                    .ok_or_else(|| UnknownOption(s.to_string()))
            }
        }
    };
}

closed_set! {
    /// Where the business is struggling most.
    pub enum Struggle {
        Traffic => "Traffic",
        Conversions => "Conversions",
        Both => "Both",
        NotSure => "Not Sure",
    }
}

closed_set! {
    /// Whether the business has run digital ads before.
    pub enum AdExperience {
        Yes => "Yes",
        No => "No",
        NotSure => "Not Sure",
    }
}

closed_set! {
    /// Consultation start times, in day order.
    pub enum TimeSlot {
        NineAm => "09:00 AM",
        TenThirtyAm => "10:30 AM",
        OnePm => "01:00 PM",
        TwoThirtyPm => "02:30 PM",
        FourPm => "04:00 PM",
    }
}

impl Default for Struggle {
    fn default() -> Self {
        Struggle::NotSure
    }
}

impl Default for AdExperience {
    fn default() -> Self {
        AdExperience::NotSure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_not_sure() {
        assert_eq!(Struggle::default(), Struggle::NotSure);
        assert_eq!(AdExperience::default(), AdExperience::NotSure);
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!("Not Sure".parse::<Struggle>(), Ok(Struggle::NotSure));
        assert_eq!("02:30 PM".parse::<TimeSlot>(), Ok(TimeSlot::TwoThirtyPm));
        assert_eq!(
            "Maybe".parse::<AdExperience>(),
            Err(UnknownOption("Maybe".to_string()))
        );
    }

    #[test]
    fn out_of_set_values_do_not_deserialize() {
        assert!(serde_json::from_str::<Struggle>("\"Everything\"").is_err());
        assert!(serde_json::from_str::<TimeSlot>("\"11:00 AM\"").is_err());
        let slot: TimeSlot = serde_json::from_str("\"09:00 AM\"").unwrap();
        assert_eq!(slot, TimeSlot::NineAm);
    }

    #[test]
    fn slots_are_listed_in_day_order() {
        let labels: Vec<_> = TimeSlot::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["09:00 AM", "10:30 AM", "01:00 PM", "02:30 PM", "04:00 PM"]
        );
    }
}
