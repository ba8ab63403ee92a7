//! Operation results and ordered polygon collections.

use super::core::{Polygon, UserData};
use std::ops::{Deref, DerefMut, Index};

/// How an operation's answer relates to its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolygonResult {
    /// New polygons were produced.
    NewPolygons,
    /// The result is empty.
    EmptyPolygon,
    /// The result is the receiver, unchanged.
    ResultSameAsThis,
    /// The result is the first parameter, unchanged.
    ResultSameAsFirstParameter,
    /// The result is the receiver and the parameter side by side.
    ResultThisAndParameter,
}

/// An ordered collection of polygons.
///
/// # Example
///
/// ```
/// use regpoly::polygon::PolygonSet;
/// use regpoly::{Point2, Polygon};
///
/// let a: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)).unwrap();
/// let b: Polygon = Polygon::rectangle(Point2::new(2.0, 0.0), Point2::new(4.0, 1.0)).unwrap();
/// let set = PolygonSet::from(vec![a, b]);
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.area(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSet<U: UserData = ()>(pub Vec<Polygon<U>>);

impl<U: UserData> PolygonSet<U> {
    /// An empty set.
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Total filled area.
    pub fn area(&self) -> f64 {
        self.0.iter().map(Polygon::area).sum()
    }

    /// Total vertex count.
    pub fn vertex_count(&self) -> usize {
        self.0.iter().map(Polygon::vertex_count).sum()
    }

    /// Unwraps into the polygons.
    #[inline]
    pub fn into_vec(self) -> Vec<Polygon<U>> {
        self.0
    }
}

impl<U: UserData> Default for PolygonSet<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UserData> From<Vec<Polygon<U>>> for PolygonSet<U> {
    fn from(v: Vec<Polygon<U>>) -> Self {
        Self(v)
    }
}

impl<U: UserData> FromIterator<Polygon<U>> for PolygonSet<U> {
    fn from_iter<I: IntoIterator<Item = Polygon<U>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<U: UserData> IntoIterator for PolygonSet<U> {
    type Item = Polygon<U>;
    type IntoIter = std::vec::IntoIter<Polygon<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, U: UserData> IntoIterator for &'a PolygonSet<U> {
    type Item = &'a Polygon<U>;
    type IntoIter = std::slice::Iter<'a, Polygon<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<U: UserData> Deref for PolygonSet<U> {
    type Target = Vec<Polygon<U>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<U: UserData> DerefMut for PolygonSet<U> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<U: UserData> Index<usize> for PolygonSet<U> {
    type Output = Polygon<U>;

    fn index(&self, i: usize) -> &Polygon<U> {
        &self.0[i]
    }
}

/// The answer of a polygon operation.
///
/// For the "same as" kinds `polygons` still holds a copy of the answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonOutput<U: UserData = ()> {
    /// How the answer relates to the inputs.
    pub result: PolygonResult,
    /// The answer.
    pub polygons: PolygonSet<U>,
}

impl<U: UserData> PolygonOutput<U> {
    /// Builds an output, mapping an empty list of new polygons to
    /// [`PolygonResult::EmptyPolygon`].
    pub fn new(result: PolygonResult, polygons: Vec<Polygon<U>>) -> Self {
        let result = match result {
            PolygonResult::NewPolygons if polygons.is_empty() => PolygonResult::EmptyPolygon,
            r => r,
        };
        Self {
            result,
            polygons: PolygonSet(polygons),
        }
    }

    /// An empty answer.
    pub fn empty() -> Self {
        Self::new(PolygonResult::EmptyPolygon, Vec::new())
    }

    /// The receiver, unchanged.
    pub fn same_as(this: &Polygon<U>) -> Self {
        Self::new(PolygonResult::ResultSameAsThis, vec![this.clone()])
    }

    /// Returns `true` if the answer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.result == PolygonResult::EmptyPolygon
    }

    /// Total area of the answer.
    #[inline]
    pub fn area(&self) -> f64 {
        self.polygons.area()
    }

    /// Unwraps into the polygons.
    #[inline]
    pub fn into_polygons(self) -> Vec<Polygon<U>> {
        self.polygons.0
    }
}
