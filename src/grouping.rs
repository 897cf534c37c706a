//! Position grouping: the active set partitioned by screen position.
//!
//! [`PositionGroups`] is derived, never stored. Every declared [`Position`] is
//! present, possibly empty, so a renderer can address a fixed set of stacks
//! without existence checks.

use std::collections::BTreeMap;
use std::fmt;

use crate::toast::{Position, Toast};

/// Toasts bucketed by position, each bucket newest-first.
#[derive(Debug, Clone)]
pub struct PositionGroups {
    groups: BTreeMap<Position, Vec<Toast>>,
}

impl PositionGroups {
    /// Partition `toasts` (newest-first) by position, preserving relative
    /// order within each bucket.
    pub fn from_toasts<'a>(toasts: impl IntoIterator<Item = &'a Toast>) -> Self {
        let mut groups: BTreeMap<Position, Vec<Toast>> =
            Position::ALL.iter().map(|&p| (p, Vec::new())).collect();
        for toast in toasts {
            groups.entry(toast.position).or_default().push(toast.clone());
        }
        Self { groups }
    }

    /// The stack at `position`. Empty when nothing targets it.
    pub fn get(&self, position: Position) -> &[Toast] {
        self.groups.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate every position with its stack, in [`Position::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Toast])> {
        self.groups.iter().map(|(&p, toasts)| (p, toasts.as_slice()))
    }

    /// Total number of toasts across all positions.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

impl Default for PositionGroups {
    fn default() -> Self {
        Self::from_toasts(std::iter::empty())
    }
}

/// One line per position: `top-right: b, a`, or `top-right: -` when empty.
impl fmt::Display for PositionGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (position, toasts)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{position}: ")?;
            if toasts.is_empty() {
                f.write_str("-")?;
                continue;
            }
            for (j, toast) in toasts.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", toast.id)?;
            }
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
