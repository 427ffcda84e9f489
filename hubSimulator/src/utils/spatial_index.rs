use crate::data::poi::Coordinate;
use std::fmt;

// Points held by a leaf before it subdivides
const NODE_CAPACITY: usize = 8;
// Stop subdividing below this depth; coincident hubs stay in one leaf
const MAX_DEPTH: usize = 24;

#[derive(Clone, Debug)]
pub struct QuadTreeNode {
    boundary: Boundary,
    children: Option<Box<[QuadTreeNode; 4]>>,
    points: Vec<Coordinate>,
    depth: usize,
}

#[derive(Clone, Debug)]
pub struct Boundary {
    center: Coordinate,
    half_width: f64,
    half_height: f64,
}

impl Boundary {
    fn contains(&self, point: &Coordinate) -> bool {
        point.x >= self.center.x - self.half_width &&
        point.x <= self.center.x + self.half_width &&
        point.y >= self.center.y - self.half_height &&
        point.y <= self.center.y + self.half_height
    }

    /// Squared distance from `point` to the closest point of this rectangle.
    fn squared_distance_to(&self, point: &Coordinate) -> f64 {
        let dx = ((point.x - self.center.x).abs() - self.half_width).max(0.0);
        let dy = ((point.y - self.center.y).abs() - self.half_height).max(0.0);
        dx * dx + dy * dy
    }
}

impl QuadTreeNode {
    pub fn new(center: Coordinate, half_width: f64, half_height: f64, depth: usize) -> Self {
        Self {
            boundary: Boundary {
                center,
                half_width,
                half_height,
            },
            children: None,
            points: Vec::new(),
            depth,
        }
    }

    pub fn subdivide(&mut self) {
        let x = self.boundary.center.x;
        let y = self.boundary.center.y;
        let hw = self.boundary.half_width / 2.0;
        let hh = self.boundary.half_height / 2.0;
        let depth = self.depth + 1;

        let children = Box::new([
            // Northwest
            QuadTreeNode::new(Coordinate::new(x - hw, y + hh), hw, hh, depth),
            // Northeast
            QuadTreeNode::new(Coordinate::new(x + hw, y + hh), hw, hh, depth),
            // Southwest
            QuadTreeNode::new(Coordinate::new(x - hw, y - hh), hw, hh, depth),
            // Southeast
            QuadTreeNode::new(Coordinate::new(x + hw, y - hh), hw, hh, depth),
        ]);

        self.children = Some(children);

        // Push held points down
        for point in std::mem::take(&mut self.points) {
            self.insert(point);
        }
    }

    pub fn contains_point(&self, point: &Coordinate) -> bool {
        self.boundary.contains(point)
    }

    fn insert(&mut self, point: Coordinate) {
        if let Some(children) = &mut self.children {
            if let Some(child) = children.iter_mut().find(|child| child.contains_point(&point)) {
                child.insert(point);
                return;
            }
            // Outside every child only through rounding at the outer edge
            self.points.push(point);
            return;
        }

        self.points.push(point);
        if self.points.len() > NODE_CAPACITY && self.depth < MAX_DEPTH {
            self.subdivide();
        }
    }

    pub fn intersects_circle(&self, center: &Coordinate, radius: f64) -> bool {
        self.boundary.squared_distance_to(center) <= radius * radius
    }

    fn any_within(&self, center: &Coordinate, radius: f64) -> bool {
        if !self.intersects_circle(center, radius) {
            return false;
        }
        if self.points.iter().any(|point| point.distance_to(center) <= radius) {
            return true;
        }
        match &self.children {
            Some(children) => children.iter().any(|child| child.any_within(center, radius)),
            None => false,
        }
    }
}

/// Point quadtree over hub locations, answering inclusive radius queries.
#[derive(Clone)]
pub struct SpatialIndex {
    root: QuadTreeNode,
    len: usize,
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

impl SpatialIndex {
    pub fn new(points: &[Coordinate]) -> Self {
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        );

        let root = if points.is_empty() {
            QuadTreeNode::new(Coordinate::new(0.0, 0.0), 1.0, 1.0, 0)
        } else {
            // Pad so points on the bounding box edge sit strictly inside
            let half_width = ((max_x - min_x) / 2.0).max(1.0) * 1.01;
            let half_height = ((max_y - min_y) / 2.0).max(1.0) * 1.01;
            QuadTreeNode::new(
                Coordinate::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
                half_width,
                half_height,
                0,
            )
        };

        let mut index = Self { root, len: 0 };
        for point in points {
            index.root.insert(*point);
            index.len += 1;
        }
        index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when some indexed point lies within `radius` of `center` (inclusive).
    pub fn any_within(&self, center: &Coordinate, radius: f64) -> bool {
        self.root.any_within(center, radius)
    }
}
