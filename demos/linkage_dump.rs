//! Rodlink linkage dump: builds a small grid linkage and prints its joints.
//!
//! Usage:
//! ```text
//! cargo run --example linkage_dump            # 4x4 grid
//! cargo run --example linkage_dump -- 6       # 6x6 grid
//! RUST_LOG=rodlink=trace cargo run --example linkage_dump
//! ```

use rodlink::geometry::Line;
use rodlink::math::{Point3, Vector3};
use rodlink::topology::{NormalHint, SegmentInput, SegmentLabel};
use rodlink::{BuildLinkage, RodlinkError, SolverArrays};

/// Grid lines along X (family A) and Y (family B), one segment per cell edge.
fn grid(n: u32) -> Result<Vec<SegmentInput>, RodlinkError> {
    let mut inputs = Vec::new();
    for i in 0..n {
        for j in 0..n - 1 {
            let (a, b) = (f64::from(i), f64::from(j));
            let idx = usize::try_from(j).unwrap_or_default();
            let along_x = Line::from_points(Point3::new(b, a, 0.0), Point3::new(b + 1.0, a, 0.0))?;
            inputs.push(SegmentInput::new(along_x, 8).with_ribbon(SegmentLabel::RodA, idx));
        }
    }
    for i in 0..n {
        for j in 0..n - 1 {
            let (a, b) = (f64::from(i), f64::from(j));
            let idx = usize::try_from(j).unwrap_or_default();
            let along_y = Line::from_points(Point3::new(a, b, 0.0), Point3::new(a, b + 1.0, 0.0))?;
            inputs.push(SegmentInput::new(along_y, 8).with_ribbon(SegmentLabel::RodB, idx));
        }
    }
    Ok(inputs)
}

fn main() -> Result<(), RodlinkError> {
    // Default: WARN for everything, INFO for rodlink.
    // Override with RUST_LOG env var (e.g. RUST_LOG=rodlink=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("rodlink=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let n = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(4_u32)
        .max(2);

    let resolved = BuildLinkage::new(grid(n)?, vec![NormalHint::global(Vector3::z())]).execute()?;
    let arrays = SolverArrays::from_resolved(&resolved)?;

    println!(
        "{} nodes, {} segments, {} joints",
        resolved.graph().num_nodes(),
        resolved.graph().num_segments(),
        arrays.joints.len()
    );
    for (i, j) in arrays.joints.iter().enumerate() {
        println!(
            "joint {i:>3} at ({:6.2}, {:6.2}, {:6.2})  A {:?}  B {:?}",
            j.position[0], j.position[1], j.position[2], j.segments_a, j.segments_b
        );
    }
    let reversed = resolved.orientation().iter().filter(|k| !**k).count();
    println!("{reversed} segments reversed");
    Ok(())
}
