use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: std::ops::Add<Output = T> + Copy> Rect<T> {
    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl<T: std::ops::Sub<Output = T> + Copy> Rect<T> {
    pub fn from_min_max(min: Vec2<T>, max: Vec2<T>) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }
}

impl<T: std::ops::Add<Output = T> + std::ops::Sub<Output = T> + PartialOrd + Copy> Rect<T> {
    pub fn intersects(&self, other: Rect<T>) -> bool {
        let self_max = self.max();
        let other_max = other.max();
        self.origin.x < other_max.x
            && other.origin.x < self_max.x
            && self.origin.y < other_max.y
            && other.origin.y < self_max.y
    }

    pub fn intersection(&self, other: Rect<T>) -> Option<Rect<T>> {
        if !self.intersects(other) {
            return None;
        }
        let self_max = self.max();
        let other_max = other.max();
        let pick_max = |a: T, b: T| if a > b { a } else { b };
        let pick_min = |a: T, b: T| if a < b { a } else { b };
        Some(Rect::from_min_max(
            Vec2::new(
                pick_max(self.origin.x, other.origin.x),
                pick_max(self.origin.y, other.origin.y),
            ),
            Vec2::new(
                pick_min(self_max.x, other_max.x),
                pick_min(self_max.y, other_max.y),
            ),
        ))
    }
}

impl Rect<f32> {
    /// Build a rectangle from a center point and a size, as detector heads emit them.
    pub fn from_center(center: Vec2<f32>, size: Vec2<f32>) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    pub fn center(&self) -> Vec2<f32> {
        self.origin + self.size / 2.0
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Intersection over union. Zero-area or disjoint boxes give 0.0.
    pub fn iou(&self, other: &Rect<f32>) -> f32 {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0
        {
            return 0.0;
        }
        let intersection = self.intersection(*other).map(|r| r.area()).unwrap_or(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}
