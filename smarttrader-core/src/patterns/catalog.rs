//! The pattern catalog — every formation the scanner knows, in rule order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unknown pattern label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pattern label '{0}'")]
pub struct UnknownPattern(pub String);

/// Directional bias of a pattern, as read from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Bullish,
    Bearish,
}

macro_rules! pattern_catalog {
    ($($variant:ident => $label:literal,)+) => {
        /// A named candlestick or chart formation.
        ///
        /// Declaration order is rule order: when several patterns fire on the
        /// same bar they are emitted in this order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Pattern {
            $($variant,)+
        }

        impl Pattern {
            /// Every pattern, in rule order.
            pub const ALL: &'static [Pattern] = &[$(Pattern::$variant,)+];

            /// Human-readable label, as shown in reasons and reports.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Pattern::$variant => $label,)+
                }
            }

            /// Look a pattern up by its exact label.
            pub fn from_label(label: &str) -> Result<Self, UnknownPattern> {
                match label {
                    $($label => Ok(Pattern::$variant),)+
                    other => Err(UnknownPattern(other.to_string())),
                }
            }
        }
    };
}

pattern_catalog! {
    Hammer => "Hammer",
    HangingMan => "Hanging Man",
    InvertedHammer => "Inverted Hammer",
    ShootingStar => "Shooting Star",
    BullishEngulfing => "Bullish Engulfing",
    BearishEngulfing => "Bearish Engulfing",
    MorningStar => "Morning Star",
    EveningStar => "Evening Star",
    Doji => "Doji",
    ThreeWhiteSoldiers => "Three White Soldiers",
    ThreeBlackCrows => "Three Black Crows",
    PiercingLine => "Piercing Line",
    DarkCloudCover => "Dark Cloud Cover",
    BullishHarami => "Bullish Harami",
    BearishHarami => "Bearish Harami",
    RisingThreeMethods => "Rising Three Methods",
    FallingThreeMethods => "Falling Three Methods",
    BullishBeltHold => "Bullish Belt Hold",
    BearishBeltHold => "Bearish Belt Hold",
    TweezerBottom => "Tweezer Bottom",
    TweezerTop => "Tweezer Top",
    BullishMarubozu => "Bullish Marubozu",
    BearishMarubozu => "Bearish Marubozu",
    LongLeggedDoji => "Long Legged Doji",
    DragonflyDoji => "Dragonfly Doji",
    GravestoneDoji => "Gravestone Doji",
    MatHold => "Mat Hold",
    HomingPigeon => "Homing Pigeon",
    MatchingLow => "Matching Low",
    OnNeckLine => "On Neck Line",
    InNeckLine => "In Neck Line",
    ThrustingLine => "Thrusting Line",
    DeliberationLine => "Deliberation Line",
    AdvanceBlock => "Advance Block",
    EveningDojiStar => "Evening Doji Star",
    MorningDojiStar => "Morning Doji Star",
    BullishKicker => "Bullish Kicker",
    BearishKicker => "Bearish Kicker",
    UpsideGapTwoCrows => "Upside Gap Two Crows",
    DownsideGapThreeMethods => "Downside Gap Three Methods",
    BearishSeparatingLines => "Bearish Separating Lines",
    BullishSeparatingLines => "Bullish Separating Lines",
    StickSandwich => "Stick Sandwich",
    TasukiGap => "Tasuki Gap",
    AbandonedBaby => "Abandoned Baby",
    KickingBullish => "Kicking (Bullish)",
    KickingBearish => "Kicking (Bearish)",
    LongBlackCandle => "Long Black Candle",
    LongWhiteCandle => "Long White Candle",
    SpinningTop => "Spinning Top",
}

impl Pattern {
    /// Polarity by label: "Bullish" or "Bearish" anywhere in the label.
    ///
    /// Patterns whose label names neither (Hammer, Doji, Three White
    /// Soldiers, ...) have no polarity, whatever their textbook reading.
    pub fn polarity(&self) -> Option<Polarity> {
        let label = self.label();
        if label.contains("Bullish") {
            Some(Polarity::Bullish)
        } else if label.contains("Bearish") {
            Some(Polarity::Bearish)
        } else {
            None
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.label().to_string()
    }
}

impl TryFrom<String> for Pattern {
    type Error = UnknownPattern;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Pattern::from_label(&label)
    }
}
