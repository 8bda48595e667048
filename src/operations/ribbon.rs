use std::collections::{BTreeMap, BTreeSet};

use crate::error::{OperationError, Result};
use crate::geometry::curve::Curve;
use crate::topology::{Segment, SegmentCurve, SegmentId, SegmentInput, SegmentLabel};

/// Smallest subdivision a ribbon piece is given.
const MIN_RIBBON_SUBDIVISION: usize = 5;

/// Ribbon membership of the segments, grouped per rod family.
///
/// A ribbon is a physical rod spanning several joints. A new ribbon starts
/// at every segment whose in-ribbon index is 0, so the segments of one
/// ribbon must appear consecutively. Unlabelled segments are not grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RibbonLayout {
    family_a: BTreeMap<usize, BTreeSet<SegmentId>>,
    family_b: BTreeMap<usize, BTreeSet<SegmentId>>,
    ribbon_of: Vec<Option<usize>>,
}

impl RibbonLayout {
    /// Groups segments by ribbon index.
    #[must_use]
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut layout = Self {
            ribbon_of: vec![None; segments.len()],
            ..Self::default()
        };
        let mut current: Option<usize> = None;

        for (i, s) in segments.iter().enumerate() {
            let Some(index) = s.index_in_ribbon else {
                continue;
            };
            let ribbon = match current {
                Some(r) if index != 0 => r,
                Some(r) => r + 1,
                None => {
                    if index != 0 {
                        tracing::warn!(
                            segment = i,
                            index,
                            "ribbon does not start at index 0"
                        );
                    }
                    0
                }
            };
            current = Some(ribbon);
            layout.ribbon_of[i] = Some(ribbon);

            match s.label {
                SegmentLabel::RodA => {
                    layout.family_a.entry(ribbon).or_default().insert(i);
                }
                SegmentLabel::RodB => {
                    layout.family_b.entry(ribbon).or_default().insert(i);
                }
                SegmentLabel::Undefined => {}
            }
        }

        layout
    }

    /// Ribbons of family A, keyed by ribbon index.
    #[must_use]
    pub fn family_a(&self) -> &BTreeMap<usize, BTreeSet<SegmentId>> {
        &self.family_a
    }

    /// Ribbons of family B, keyed by ribbon index.
    #[must_use]
    pub fn family_b(&self) -> &BTreeMap<usize, BTreeSet<SegmentId>> {
        &self.family_b
    }

    /// Ribbon index of a segment, if it belongs to one.
    #[must_use]
    pub fn ribbon_of(&self, segment: SegmentId) -> Option<usize> {
        self.ribbon_of.get(segment).copied().flatten()
    }

    /// Are both families populated?
    #[must_use]
    pub fn contains_layout_data(&self) -> bool {
        !self.family_a.is_empty() && !self.family_b.is_empty()
    }
}

/// Splits one ribbon curve into consecutively numbered input segments.
#[derive(Debug)]
pub struct SplitRibbon {
    curve: SegmentCurve,
    parameters: Vec<f64>,
    subdivisions: Vec<usize>,
    label: SegmentLabel,
    min_length: f64,
}

impl SplitRibbon {
    /// Creates a new `SplitRibbon` operation cutting `curve` at `parameters`.
    #[must_use]
    pub fn new(curve: impl Into<SegmentCurve>, parameters: Vec<f64>, label: SegmentLabel) -> Self {
        Self {
            curve: curve.into(),
            parameters,
            subdivisions: vec![10],
            label,
            min_length: 0.01,
        }
    }

    /// Sets the subdivision per piece, or a single value used for all pieces.
    #[must_use]
    pub fn with_subdivisions(mut self, subdivisions: Vec<usize>) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Pieces shorter than this are dropped.
    #[must_use]
    pub fn with_min_length(mut self, min_length: f64) -> Self {
        self.min_length = min_length;
        self
    }

    /// Executes the split.
    ///
    /// Parameters outside the open curve domain are ignored. Subdivisions
    /// are raised to at least 5.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if no subdivision is given.
    pub fn execute(&self) -> Result<Vec<SegmentInput>> {
        let Some(&fallback) = self.subdivisions.first() else {
            return Err(OperationError::InvalidInput("no ribbon subdivision given".into()).into());
        };

        let domain = self.curve.domain();
        let mut cuts: Vec<f64> = self
            .parameters
            .iter()
            .copied()
            .filter(|&t| t > domain.t_min && t < domain.t_max)
            .collect();
        cuts.sort_by(f64::total_cmp);
        cuts.dedup();

        let mut bounds = Vec::with_capacity(cuts.len() + 2);
        bounds.push(domain.t_min);
        bounds.extend(cuts);
        bounds.push(domain.t_max);
        let pieces = bounds.len() - 1;

        let mut out = Vec::with_capacity(pieces);
        for (i, w) in bounds.windows(2).enumerate() {
            if self.curve.length_between(w[0], w[1]) <= self.min_length {
                continue;
            }
            let subdivision = if self.subdivisions.len() == pieces {
                self.subdivisions[i]
            } else {
                fallback
            };
            let piece = self.curve.trim(w[0], w[1])?;
            let index = out.len();
            out.push(
                SegmentInput::new(piece, subdivision.max(MIN_RIBBON_SUBDIVISION))
                    .with_ribbon(self.label, index),
            );
        }

        Ok(out)
    }
}
