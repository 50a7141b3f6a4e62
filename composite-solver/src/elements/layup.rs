//! Stacking sequence codes such as `[45/90/-45]s` or `[0/90]2s`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MAX_PLIES;
use crate::error::{CompositeError, CompositeResult};
use crate::math::Angle;

/// An expanded stacking sequence, bottom ply first.
///
/// Accepted forms:
/// - `0/90/45` or `[0/90/45]`: plies as listed
/// - `[0/90]3`: base repeated 3 times
/// - `[0/90]s`: base followed by its mirror image
/// - `[0/90]2s`: base repeated twice, then mirrored
/// - `[0/90]s2`: mirrored sequence repeated twice
/// - `[0/90]2s3`: both of the above
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayupSequence {
    code: String,
    angles: Vec<Angle>,
}

impl LayupSequence {
    /// Sequence from explicit angles in degrees
    pub fn from_angles(angles: &[f64]) -> CompositeResult<Self> {
        let code = format!(
            "[{}]",
            angles
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join("/")
        );
        code.parse()
    }

    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// True if the sequence reads the same from either face
    pub fn is_symmetric(&self) -> bool {
        self.angles.iter().eq(self.angles.iter().rev())
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

fn invalid(code: &str, reason: &str) -> CompositeError {
    CompositeError::InvalidLayup(format!("'{code}': {reason}"))
}

fn parse_count(code: &str, digits: &str) -> CompositeResult<usize> {
    if digits.is_empty() {
        return Ok(1);
    }
    match digits.parse::<usize>() {
        Ok(0) => Err(invalid(code, "repeat count must be at least 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(code, &format!("bad repeat count '{digits}'"))),
    }
}

/// Parse `<n>`, `s`, `<n>s`, `s<m>` or `<n>s<m>` into (repeat, mirror, mirrored repeat)
fn parse_suffix(code: &str, suffix: &str) -> CompositeResult<(usize, bool, usize)> {
    let suffix = suffix.trim();
    let lower = suffix.to_ascii_lowercase();
    match lower.split_once('s') {
        Some((before, after)) => Ok((
            parse_count(code, before.trim())?,
            true,
            parse_count(code, after.trim())?,
        )),
        None => Ok((parse_count(code, &lower)?, false, 1)),
    }
}

/// Multiply without exceeding the ply limit
fn bounded(code: &str, count: usize, factor: usize) -> CompositeResult<usize> {
    match count.checked_mul(factor) {
        Some(n) if n <= MAX_PLIES => Ok(n),
        _ => Err(CompositeError::InvalidInput(format!(
            "layup '{code}' expands to more than {MAX_PLIES} plies"
        ))),
    }
}

impl FromStr for LayupSequence {
    type Err = CompositeError;

    fn from_str(code: &str) -> CompositeResult<Self> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(invalid(code, "empty layup code"));
        }

        let (body, suffix) = match trimmed.strip_prefix('[') {
            Some(rest) => rest
                .split_once(']')
                .ok_or_else(|| invalid(code, "missing closing ']'"))?,
            None => (trimmed, ""),
        };

        let base = body
            .split('/')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|a| a.is_finite())
                    .map(Angle::degrees)
                    .ok_or_else(|| invalid(code, &format!("bad ply angle '{token}'")))
            })
            .collect::<CompositeResult<Vec<_>>>()?;

        let (repeat, mirror, mirrored_repeat) = parse_suffix(code, suffix)?;

        let mut count = bounded(code, base.len(), repeat)?;
        if mirror {
            count = bounded(code, count, 2)?;
        }
        bounded(code, count, mirrored_repeat)?;

        let mut angles: Vec<Angle> = base
            .iter()
            .copied()
            .cycle()
            .take(base.len() * repeat)
            .collect();
        if mirror {
            let mirrored: Vec<Angle> = angles.iter().rev().copied().collect();
            angles.extend(mirrored);
            let unit = angles.len();
            angles = angles.into_iter().cycle().take(unit * mirrored_repeat).collect();
        }

        Ok(Self {
            code: trimmed.to_string(),
            angles,
        })
    }
}

impl TryFrom<String> for LayupSequence {
    type Error = CompositeError;

    fn try_from(code: String) -> CompositeResult<Self> {
        code.parse()
    }
}

impl From<LayupSequence> for String {
    fn from(layup: LayupSequence) -> String {
        layup.code
    }
}

impl fmt::Display for LayupSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
