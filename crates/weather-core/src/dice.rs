//! Dice notation parsing and evaluation.
//!
//! Accepted forms (whitespace is ignored):
//!   - `""` or `"None"`        → 0
//!   - `"7"`, `"-3"`           → integer literal
//!   - `"3d6+2"`, `"d20-1"`    → standard form, count defaults to 1
//!   - `"1/2d4"`               → fraction of a single die, floored
//!
//! A leading `-` negates the whole result (`"-d20"` ∈ [-20, -1]).
//! Expressions whose ceiling does not fit an `i32` are rejected.
//!
//! Table strings are parsed once when the generator is built, so a typo in a
//! table fails fast instead of silently rolling 0.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

// ── Rollers ───────────────────────────────────────────────────────────────────

/// Source of uniform die rolls. Every random decision in the pipeline goes
/// through one of these, in a fixed order, so a seeded roller reproduces a
/// whole day's weather.
pub trait DiceRoller {
    /// Uniform integer in `[1, sides]`. `sides` is at least 1.
    fn roll(&mut self, sides: u32) -> u32;

    /// Shorthand for a d100 (percentile) roll.
    fn percentile(&mut self) -> u32 {
        self.roll(100)
    }
}

/// [`DiceRoller`] over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomRoller<R> {
    rng: R,
}

impl<R: Rng> RandomRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomRoller<StdRng> {
    /// Reproducible roller: the same seed yields the same roll sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> DiceRoller for RandomRoller<R> {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return sides;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Replays a fixed list of rolls, then falls back to a seeded generator.
///
/// Scripted values are clamped into `[1, sides]` of the die they are
/// consumed by. Used to force specific outcomes (a record-temperature roll
/// of 1, a given precipitation row) without depending on generator internals.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    script: VecDeque<u32>,
    fallback: RandomRoller<StdRng>,
}

impl ScriptedRoller {
    pub fn new(script: impl IntoIterator<Item = u32>, fallback_seed: u64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: RandomRoller::seeded(fallback_seed),
        }
    }

    /// Number of scripted rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        match self.script.pop_front() {
            Some(v) => v.clamp(1, sides.max(1)),
            None => self.fallback.roll(sides),
        }
    }
}

// ── Expressions ───────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{input}`: {reason}")]
pub struct DiceParseError {
    pub input: String,
    pub reason: &'static str,
}

impl DiceParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self { input: input.to_string(), reason }
    }
}

/// Whether to roll the dice or take their ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollMode {
    Sample,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Literal(i32),
    Standard { count: u32, sides: u32, modifier: i32 },
    /// `numerator/denominator` of one die of `sides`.
    Fraction { numerator: u32, denominator: u32, sides: u32 },
}

/// A parsed dice expression. Immutable and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    negative: bool,
    form: Form,
}

impl DiceExpr {
    pub const ZERO: DiceExpr = DiceExpr { negative: false, form: Form::Literal(0) };

    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() || compact.eq_ignore_ascii_case("none") {
            return Ok(Self::ZERO);
        }

        let (negative, body) = match compact.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, compact.as_str()),
        };
        if body.is_empty() {
            return Err(DiceParseError::new(input, "sign without a value"));
        }

        let form = match body.find(['d', 'D']) {
            None => Form::Literal(parse_i32(input, body)?),
            Some(pos) => {
                let (head, tail) = (&body[..pos], &body[pos + 1..]);
                if let Some((num, den)) = head.split_once('/') {
                    let numerator = parse_number(input, num)?;
                    let denominator = parse_number(input, den)?;
                    if denominator == 0 {
                        return Err(DiceParseError::new(input, "zero denominator"));
                    }
                    let sides = parse_sides(input, tail)?;
                    if fraction_of(sides, numerator, denominator).is_none() {
                        return Err(DiceParseError::new(input, "number out of range"));
                    }
                    Form::Fraction { numerator, denominator, sides }
                } else {
                    let count = if head.is_empty() { 1 } else { parse_number(input, head)? };
                    let (sides_str, modifier) = split_modifier(input, tail)?;
                    let sides = parse_sides(input, sides_str)?;
                    if standard_max(count, sides, modifier).is_none() {
                        return Err(DiceParseError::new(input, "number out of range"));
                    }
                    Form::Standard { count, sides, modifier }
                }
            }
        };

        Ok(Self { negative, form })
    }

    /// Roll the expression.
    pub fn sample(&self, roller: &mut dyn DiceRoller) -> i32 {
        let value = match self.form {
            Form::Literal(v) => v,
            Form::Standard { count, sides, modifier } => {
                let total: i64 = (0..count).map(|_| i64::from(roller.roll(sides).min(sides))).sum();
                saturate(total + i64::from(modifier))
            }
            Form::Fraction { numerator, denominator, sides } => {
                fraction_of(roller.roll(sides).min(sides), numerator, denominator).unwrap_or(i32::MAX)
            }
        };
        self.signed(value)
    }

    /// Ceiling of the expression: every die shows its highest face.
    pub fn max(&self) -> i32 {
        let value = match self.form {
            Form::Literal(v) => v,
            Form::Standard { count, sides, modifier } => standard_max(count, sides, modifier).unwrap_or(i32::MAX),
            Form::Fraction { numerator, denominator, sides } => {
                fraction_of(sides, numerator, denominator).unwrap_or(i32::MAX)
            }
        };
        self.signed(value)
    }

    pub fn evaluate(&self, mode: RollMode, roller: &mut dyn DiceRoller) -> i32 {
        match mode {
            RollMode::Sample => self.sample(roller),
            RollMode::Max => self.max(),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.form, Form::Literal(0))
    }

    fn signed(&self, value: i32) -> i32 {
        if self.negative { -value } else { value }
    }
}

impl FromStr for DiceExpr {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        match self.form {
            Form::Literal(v) => write!(f, "{v}"),
            Form::Standard { count, sides, modifier } => {
                write!(f, "{count}d{sides}")?;
                match modifier {
                    0 => Ok(()),
                    m if m > 0 => write!(f, "+{m}"),
                    m => write!(f, "{m}"),
                }
            }
            Form::Fraction { numerator, denominator, sides } => {
                write!(f, "{numerator}/{denominator}d{sides}")
            }
        }
    }
}

/// Parse and evaluate in one step.
pub fn evaluate(expr: &str, mode: RollMode, roller: &mut dyn DiceRoller) -> Result<i32, DiceParseError> {
    Ok(DiceExpr::parse(expr)?.evaluate(mode, roller))
}

fn fraction_of(face: u32, numerator: u32, denominator: u32) -> Option<i32> {
    // Non-negative operands, so integer division is the floor.
    i32::try_from(u64::from(face) * u64::from(numerator) / u64::from(denominator)).ok()
}

/// `count * sides + modifier`, if it fits.
fn standard_max(count: u32, sides: u32, modifier: i32) -> Option<i32> {
    let dice = i32::try_from(count.checked_mul(sides)?).ok()?;
    dice.checked_add(modifier)
}

/// Bounded by [`standard_max`] at parse time, so this never clips.
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn parse_i32(input: &str, s: &str) -> Result<i32, DiceParseError> {
    i32::try_from(parse_number(input, s)?).map_err(|_| DiceParseError::new(input, "number out of range"))
}

fn parse_number(input: &str, s: &str) -> Result<u32, DiceParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DiceParseError::new(input, "expected a non-negative integer"));
    }
    s.parse::<u32>()
        .map_err(|_| DiceParseError::new(input, "number out of range"))
}

fn parse_sides(input: &str, s: &str) -> Result<u32, DiceParseError> {
    match parse_number(input, s)? {
        0 => Err(DiceParseError::new(input, "a die needs at least one side")),
        n => Ok(n),
    }
}

fn split_modifier<'a>(input: &str, tail: &'a str) -> Result<(&'a str, i32), DiceParseError> {
    match tail.find(['+', '-']) {
        None => Ok((tail, 0)),
        Some(pos) => {
            let magnitude = parse_i32(input, &tail[pos + 1..])?;
            let modifier = if tail.as_bytes()[pos] == b'-' { -magnitude } else { magnitude };
            Ok((&tail[..pos], modifier))
        }
    }
}
