use crate::error::{OperationError, Result};
use crate::math::{z_axis, Point3, Vector3};
use crate::operations::ResolvedGraph;
use crate::topology::{Joint, JointFamily};

/// Flattened joint record.
#[derive(Debug, Clone, PartialEq)]
pub struct JointArrays {
    pub position: [f64; 3],
    pub normal: [f64; 3],
    pub edge_a: [f64; 3],
    pub edge_b: [f64; 3],
    /// Segment indices of family A; `-1` marks an empty slot.
    pub segments_a: [i32; 2],
    pub segments_b: [i32; 2],
    pub is_start_a: [bool; 2],
    pub is_start_b: [bool; 2],
    pub num_a: i32,
    pub num_b: i32,
}

/// Flattened segment record.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentArrays {
    pub rest_length: f64,
    pub subdivision: i32,
    /// Joint at the start node, or `-1` for a free end.
    pub start_joint: i32,
    pub end_joint: i32,
    /// `3 * (subdivision + 1)` coordinates.
    pub centerline: Vec<f64>,
}

/// Order-preserving numeric arrays describing a resolved linkage.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverArrays {
    /// `3 * N` node coordinates.
    pub node_coords: Vec<f64>,
    /// `3 * N` node normals.
    pub node_normals: Vec<f64>,
    /// `2 * M` node indices, start then end, per segment.
    pub edge_index_pairs: Vec<i32>,
    pub joints: Vec<JointArrays>,
    pub segments: Vec<SegmentArrays>,
}

impl SolverArrays {
    /// Flattens a resolved linkage.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if an index does not fit in `i32`.
    pub fn from_resolved(resolved: &ResolvedGraph) -> Result<Self> {
        let graph = resolved.graph();

        let mut node_coords = Vec::with_capacity(3 * graph.num_nodes());
        let mut node_normals = Vec::with_capacity(3 * graph.num_nodes());
        for n in graph.nodes() {
            node_coords.extend_from_slice(&point(&n.point));
            node_normals.extend_from_slice(&vector(&n.normal.unwrap_or_else(z_axis)));
        }

        let mut edge_index_pairs = Vec::with_capacity(2 * graph.num_segments());
        for s in graph.segments() {
            edge_index_pairs.push(index(Some(s.nodes[0]))?);
            edge_index_pairs.push(index(Some(s.nodes[1]))?);
        }

        let joints = resolved
            .joints()
            .iter()
            .map(joint_arrays)
            .collect::<Result<Vec<_>>>()?;

        let mut segments = Vec::with_capacity(graph.num_segments());
        for ((s, links), pts) in graph
            .segments()
            .iter()
            .zip(resolved.links())
            .zip(resolved.centerlines())
        {
            segments.push(SegmentArrays {
                rest_length: s.rest_length,
                subdivision: index(Some(s.subdivision))?,
                start_joint: index(links.start)?,
                end_joint: index(links.end)?,
                centerline: pts.iter().flat_map(point).collect(),
            });
        }

        Ok(Self {
            node_coords,
            node_normals,
            edge_index_pairs,
            joints,
            segments,
        })
    }
}

fn joint_arrays(j: &Joint) -> Result<JointArrays> {
    let slots = |f: &JointFamily| -> Result<[i32; 2]> {
        Ok([index(f.segments[0])?, index(f.segments[1])?])
    };
    Ok(JointArrays {
        position: point(&j.position),
        normal: vector(&j.normal),
        edge_a: vector(&j.edge_a()),
        edge_b: vector(&j.edge_b()),
        segments_a: slots(&j.family_a)?,
        segments_b: slots(&j.family_b)?,
        is_start_a: j.family_a.is_start,
        is_start_b: j.family_b.is_start,
        num_a: index(Some(j.num_a()))?,
        num_b: index(Some(j.num_b()))?,
    })
}

fn index(i: Option<usize>) -> Result<i32> {
    match i {
        None => Ok(-1),
        Some(i) => i32::try_from(i).map_err(|_| {
            OperationError::InvalidInput(format!("index {i} does not fit in i32")).into()
        }),
    }
}

fn point(p: &Point3) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn vector(v: &Vector3) -> [f64; 3] {
    [v.x, v.y, v.z]
}
