//! The rule table: one geometric predicate per pattern.
//!
//! Every rule reads only the OHLC window it is handed and never the outcome
//! of another rule. `b0` is the current bar, `b1` the bar before it, and so
//! on up to `b5`.

use super::catalog::Pattern;
use super::window::Window;

/// A pattern and the predicate that detects it.
#[derive(Clone, Copy)]
pub struct PatternRule {
    pub pattern: Pattern,
    pub detect: fn(&Window<'_>) -> bool,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

macro_rules! rules {
    ($($pattern:ident => $detect:ident,)+) => {
        /// All rules, in emission order.
        pub static PATTERN_RULES: &[PatternRule] = &[
            $(PatternRule { pattern: Pattern::$pattern, detect: $detect },)+
        ];
    };
}

rules! {
    Hammer => hammer,
    HangingMan => hanging_man,
    InvertedHammer => inverted_hammer,
    ShootingStar => shooting_star,
    BullishEngulfing => bullish_engulfing,
    BearishEngulfing => bearish_engulfing,
    MorningStar => morning_star,
    EveningStar => evening_star,
    Doji => doji,
    ThreeWhiteSoldiers => three_white_soldiers,
    ThreeBlackCrows => three_black_crows,
    PiercingLine => piercing_line,
    DarkCloudCover => dark_cloud_cover,
    BullishHarami => bullish_harami,
    BearishHarami => bearish_harami,
    RisingThreeMethods => rising_three_methods,
    FallingThreeMethods => falling_three_methods,
    BullishBeltHold => bullish_belt_hold,
    BearishBeltHold => bearish_belt_hold,
    TweezerBottom => tweezer_bottom,
    TweezerTop => tweezer_top,
    BullishMarubozu => bullish_marubozu,
    BearishMarubozu => bearish_marubozu,
    LongLeggedDoji => long_legged_doji,
    DragonflyDoji => dragonfly_doji,
    GravestoneDoji => gravestone_doji,
    MatHold => mat_hold,
    HomingPigeon => homing_pigeon,
    MatchingLow => matching_low,
    OnNeckLine => on_neck_line,
    InNeckLine => in_neck_line,
    ThrustingLine => thrusting_line,
    DeliberationLine => deliberation_line,
    AdvanceBlock => advance_block,
    EveningDojiStar => evening_doji_star,
    MorningDojiStar => morning_doji_star,
    BullishKicker => bullish_kicker,
    BearishKicker => bearish_kicker,
    UpsideGapTwoCrows => upside_gap_two_crows,
    DownsideGapThreeMethods => downside_gap_three_methods,
    BearishSeparatingLines => bearish_separating_lines,
    BullishSeparatingLines => bullish_separating_lines,
    StickSandwich => stick_sandwich,
    TasukiGap => tasuki_gap,
    AbandonedBaby => abandoned_baby,
    KickingBullish => kicking_bullish,
    KickingBearish => kicking_bearish,
    LongBlackCandle => long_black_candle,
    LongWhiteCandle => long_white_candle,
    SpinningTop => spinning_top,
}

// ── Single-bar shadows ───────────────────────────────────────────────

/// Long lower shadow, almost no upper shadow.
fn hammer_shape(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    let body = b0.body();
    body > 0.0 && b0.lower_shadow() > 2.0 * body && b0.upper_shadow() < 0.1 * body
}

/// Long upper shadow, almost no lower shadow.
fn inverted_shape(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    let body = b0.body();
    body > 0.0 && b0.upper_shadow() > 2.0 * body && b0.lower_shadow() < 0.1 * body
}

fn hammer(w: &Window<'_>) -> bool {
    hammer_shape(w) && w.is_bullish(0)
}

fn hanging_man(w: &Window<'_>) -> bool {
    hammer_shape(w) && w.is_bearish(0)
}

fn inverted_hammer(w: &Window<'_>) -> bool {
    inverted_shape(w) && w.is_bullish(0)
}

fn shooting_star(w: &Window<'_>) -> bool {
    inverted_shape(w) && w.is_bearish(0)
}

// ── Two-bar reversals ────────────────────────────────────────────────

fn bullish_engulfing(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(1) && w.is_bullish(0) && b0.open < b1.close && b0.close > b1.open
}

fn bearish_engulfing(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bullish(1) && w.is_bearish(0) && b0.open > b1.close && b0.close < b1.open
}

fn piercing_line(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(1) && w.is_bullish(0) && b0.close > b1.body_midpoint() && b0.open < b1.close
}

fn dark_cloud_cover(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bullish(1) && w.is_bearish(0) && b0.close < b1.body_midpoint() && b0.open > b1.close
}

fn bullish_harami(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(1) && w.is_bullish(0) && b0.open > b1.close && b0.close < b1.open
}

fn bearish_harami(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bullish(1) && w.is_bearish(0) && b0.open < b1.close && b0.close > b1.open
}

fn tweezer_bottom(w: &Window<'_>) -> bool {
    w.same(w.bar(0).low, w.bar(1).low) && w.is_bearish(1) && w.is_bullish(0)
}

fn tweezer_top(w: &Window<'_>) -> bool {
    w.same(w.bar(0).high, w.bar(1).high) && w.is_bullish(1) && w.is_bearish(0)
}

fn homing_pigeon(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(1) && w.is_bearish(0) && b0.open > b1.open && b0.close < b1.close
}

fn matching_low(w: &Window<'_>) -> bool {
    w.same(w.bar(0).low, w.bar(1).low)
}

fn on_neck_line(w: &Window<'_>) -> bool {
    let (c, l1) = (w.bar(0).close, w.bar(1).low);
    w.is_bearish(1) && w.is_bearish(0) && c > l1 && (c - l1).abs() < 0.001 * c
}

fn in_neck_line(w: &Window<'_>) -> bool {
    let (c, l1) = (w.bar(0).close, w.bar(1).low);
    w.is_bearish(1) && w.is_bearish(0) && c < l1 && c > l1 * 0.99
}

fn thrusting_line(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(1) && w.is_bullish(0) && b0.close > b1.close && b0.close < b1.open
}

fn bullish_kicker(w: &Window<'_>) -> bool {
    w.is_bearish(1) && w.is_bullish(0) && w.bar(0).open > w.bar(1).close
}

fn bearish_kicker(w: &Window<'_>) -> bool {
    w.is_bullish(1) && w.is_bearish(0) && w.bar(0).open < w.bar(1).close
}

fn bearish_separating_lines(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(0) && w.is_bearish(1) && w.same(b0.open, b1.open) && b0.close < b1.close
}

fn bullish_separating_lines(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bullish(0) && w.is_bullish(1) && w.same(b0.open, b1.open) && b0.close > b1.close
}

fn kicking_bullish(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bearish(1) && w.is_bullish(0) && b0.open > b1.close && w.same(b1.open, b1.high)
}

fn kicking_bearish(w: &Window<'_>) -> bool {
    let (b0, b1) = (w.bar(0), w.bar(1));
    w.is_bullish(1) && w.is_bearish(0) && b0.open < b1.close && w.same(b1.open, b1.low)
}

// ── Stars and three-bar formations ───────────────────────────────────

fn morning_star(w: &Window<'_>) -> bool {
    w.is_bearish(2)
        && w.body(1) < w.body(2) * 0.5
        && w.is_bullish(0)
        && w.bar(0).close > w.bar(2).body_midpoint()
}

fn evening_star(w: &Window<'_>) -> bool {
    w.is_bullish(2)
        && w.body(1) < w.body(2) * 0.5
        && w.is_bearish(0)
        && w.bar(0).close < w.bar(2).body_midpoint()
}

fn morning_doji_star(w: &Window<'_>) -> bool {
    w.is_bearish(2)
        && w.is_doji(1)
        && w.is_bullish(0)
        && w.bar(0).close > w.bar(2).body_midpoint()
}

fn evening_doji_star(w: &Window<'_>) -> bool {
    w.is_bullish(2)
        && w.is_doji(1)
        && w.is_bearish(0)
        && w.bar(0).close < w.bar(2).body_midpoint()
}

fn three_white_soldiers(w: &Window<'_>) -> bool {
    (0..=2).all(|k| w.is_bullish(k))
        && w.bar(2).close < w.bar(1).close
        && w.bar(1).close < w.bar(0).close
}

fn three_black_crows(w: &Window<'_>) -> bool {
    (0..=2).all(|k| w.is_bearish(k))
        && w.bar(2).close > w.bar(1).close
        && w.bar(1).close > w.bar(0).close
}

fn advance_block(w: &Window<'_>) -> bool {
    (0..=2).all(|k| w.is_bullish(k))
        && w.bar(1).close < w.bar(2).close
        && w.bar(0).close < w.bar(1).close
}

fn deliberation_line(w: &Window<'_>) -> bool {
    let (b0, b2) = (w.bar(0), w.bar(2));
    w.is_bearish(2) && w.is_bearish(1) && w.is_bullish(0) && b0.open > b2.close && b0.close < b2.open
}

/// Never fires: it asks for a bearish current bar that also closes above its
/// open. Kept as declared so rule numbering and output order stay stable.
fn upside_gap_two_crows(w: &Window<'_>) -> bool {
    let (b0, b1, b2) = (w.bar(0), w.bar(1), w.bar(2));
    w.is_bearish(2)
        && w.is_bullish(1)
        && w.is_bearish(0)
        && b1.open > b2.high
        && b0.open < b1.close
        && b0.close > b0.open
}

fn stick_sandwich(w: &Window<'_>) -> bool {
    let (c, c1, c2) = (w.bar(0).close, w.bar(1).close, w.bar(2).close);
    w.is_bearish(2)
        && w.is_bullish(1)
        && w.is_bearish(0)
        && (c2 - c).abs() <= 0.001 * c
        && c1 < c2
        && c1 < c
}

fn tasuki_gap(w: &Window<'_>) -> bool {
    let (b0, b1, b2) = (w.bar(0), w.bar(1), w.bar(2));
    w.is_bullish(2)
        && w.is_bullish(1)
        && w.is_bearish(0)
        && b0.open < b1.close
        && b1.open > b2.close
        && b0.close > b1.open
}

fn abandoned_baby(w: &Window<'_>) -> bool {
    let (b0, b1, b2) = (w.bar(0), w.bar(1), w.bar(2));
    w.is_bearish(2) && w.is_doji(1) && w.is_bullish(0) && b1.low > b2.high && b0.open > b1.close
}

// ── Continuation formations ──────────────────────────────────────────

fn rising_three_methods(w: &Window<'_>) -> bool {
    let b5 = w.bar(5);
    w.is_bullish(5)
        && (2..=4).all(|k| w.is_bearish(k))
        && (2..=4).all(|k| w.bar(k).close > b5.open && w.bar(k).open < b5.close)
        && w.is_bullish(0)
        && w.bar(0).close > b5.close
}

fn falling_three_methods(w: &Window<'_>) -> bool {
    let b5 = w.bar(5);
    w.is_bearish(5)
        && (2..=4).all(|k| w.is_bullish(k))
        && (2..=4).all(|k| w.bar(k).close < b5.open && w.bar(k).open > b5.close)
        && w.is_bearish(0)
        && w.bar(0).close < b5.close
}

fn downside_gap_three_methods(w: &Window<'_>) -> bool {
    let b4 = w.bar(4);
    w.is_bearish(4)
        && (2..=3).all(|k| w.is_bullish(k))
        && w.is_bearish(0)
        && (2..=3).all(|k| w.bar(k).close < b4.open && w.bar(k).open > b4.close)
}

fn mat_hold(w: &Window<'_>) -> bool {
    let leader = w.body(5);
    [5, 1, 0].iter().all(|&k| w.is_bullish(k))
        && (2..=4).all(|k| w.is_bearish(k) && w.body(k) < leader * 0.5)
}

// ── Single-bar body shapes ───────────────────────────────────────────

fn doji(w: &Window<'_>) -> bool {
    w.is_doji(0)
}

fn long_legged_doji(w: &Window<'_>) -> bool {
    w.is_doji(0) && w.bar(0).range() > 3.0 * w.body(0)
}

fn dragonfly_doji(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    w.is_doji(0) && w.same(b0.low, b0.open) && w.same(b0.open, b0.close)
}

fn gravestone_doji(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    w.is_doji(0) && w.same(b0.high, b0.open) && w.same(b0.open, b0.close)
}

fn bullish_belt_hold(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    w.is_bullish(0)
        && w.same(b0.open, b0.low)
        && b0.close > b0.open
        && (b0.high - b0.close) < 0.1 * b0.body()
}

fn bearish_belt_hold(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    w.is_bearish(0)
        && w.same(b0.open, b0.high)
        && b0.close < b0.open
        && (b0.close - b0.low) < 0.1 * b0.body()
}

fn bullish_marubozu(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    w.same(b0.open, b0.low) && w.same(b0.close, b0.high) && w.is_bullish(0)
}

fn bearish_marubozu(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    w.same(b0.open, b0.high) && w.same(b0.close, b0.low) && w.is_bearish(0)
}

fn long_black_candle(w: &Window<'_>) -> bool {
    w.is_bearish(0) && w.body(0) > 1.5 * w.mean_prior_body()
}

fn long_white_candle(w: &Window<'_>) -> bool {
    w.is_bullish(0) && w.body(0) > 1.5 * w.mean_prior_body()
}

fn spinning_top(w: &Window<'_>) -> bool {
    let b0 = w.bar(0);
    let range = b0.range();
    b0.body() <= 0.3 * range && b0.lower_shadow() > 0.3 * range && b0.upper_shadow() > 0.3 * range
}
