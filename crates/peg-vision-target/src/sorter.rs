//! Area ordering of raw contours.

use nalgebra::Point2;
use peg_vision_core::{ContourGeometry, PointSequence};
use std::cmp::Ordering;

/// A raw contour paired with its enclosed area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourRecord<'a> {
    pub shape: &'a [Point2<i32>],
    pub area: f64,
}

/// Records for `contours`, largest area first.
///
/// The sort is stable: contours with equal area keep their extraction order.
pub fn sort_by_area<'a, G>(geometry: &G, contours: &'a [PointSequence]) -> Vec<ContourRecord<'a>>
where
    G: ContourGeometry + ?Sized,
{
    let mut records: Vec<ContourRecord<'a>> = contours
        .iter()
        .map(|c| ContourRecord {
            shape: c,
            area: geometry.contour_area(c),
        })
        .collect();
    records.sort_by(|a, b| b.area.partial_cmp(&a.area).unwrap_or(Ordering::Equal));
    records
}
