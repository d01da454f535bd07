use crate::types::{EPSILON, PlacedPiece, Rect, SheetStock};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub rect: Rect,
}

impl FreeRect {
    fn right(&self) -> f64 {
        self.x + self.rect.w
    }

    fn bottom(&self) -> f64 {
        self.y + self.rect.h
    }

    fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// One sheet being filled. Free rectangles are kept in creation order.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    kerf: f64,
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<PlacedPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub free_idx: usize,
    pub rotated: bool,
}

impl GuillotineBin {
    pub fn new(stock: &SheetStock) -> Self {
        Self {
            kerf: stock.kerf,
            free_rects: vec![FreeRect {
                x: 0.0,
                y: 0.0,
                rect: stock.usable(),
            }],
            placements: Vec::new(),
        }
    }

    /// First free rectangle, in creation order, that takes the piece.
    pub fn find_first(&self, piece: Rect, allow_rotate: bool) -> Option<Fit> {
        self.free_rects
            .iter()
            .enumerate()
            .find_map(|(idx, free)| {
                self.orientation(piece, allow_rotate, free)
                    .map(|rotated| Fit {
                        free_idx: idx,
                        rotated,
                    })
            })
    }

    /// Orientation for `piece` in `free`, preferring the one whose split
    /// leaves the larger single leftover rectangle. Ties keep the piece as is.
    fn orientation(&self, piece: Rect, allow_rotate: bool, free: &FreeRect) -> Option<bool> {
        let normal = piece
            .fits_in(&free.rect)
            .then(|| self.largest_leftover(*free, piece));
        let rotated = (allow_rotate && !approx_eq(piece.w, piece.h))
            .then(|| piece.rotated())
            .filter(|r| r.fits_in(&free.rect))
            .map(|r| self.largest_leftover(*free, r));

        match (normal, rotated) {
            (Some(n), Some(r)) => Some(r > n + EPSILON),
            (Some(_), None) => Some(false),
            (None, Some(_)) => Some(true),
            (None, None) => None,
        }
    }

    fn largest_leftover(&self, free: FreeRect, placed: Rect) -> f64 {
        self.split(free, placed)
            .iter()
            .flatten()
            .map(|f| f.rect.area())
            .fold(0.0, f64::max)
    }

    pub fn place(&mut self, fit: Fit, piece: Rect, label: &str, piece_index: usize) -> PlacedPiece {
        let free = self.free_rects[fit.free_idx];
        let placed = if fit.rotated { piece.rotated() } else { piece };

        let placement = PlacedPiece {
            label: label.to_string(),
            piece_index,
            rect: placed,
            x: free.x,
            y: free.y,
            rotated: fit.rotated,
        };

        // Remove the used free rect and split
        self.free_rects.remove(fit.free_idx);
        let remainders = self.split(free, placed);
        self.free_rects.extend(remainders.into_iter().flatten());
        self.placements.push(placement.clone());
        self.merge_free_rects();
        self.prune_contained();

        placement
    }

    /// Guillotine split of `free` after `placed` goes in its corner. Each
    /// remainder starts one kerf past the piece.
    fn split(&self, free: FreeRect, placed: Rect) -> [Option<FreeRect>; 2] {
        let right_w = free.rect.w - placed.w - self.kerf;
        let bottom_h = free.rect.h - placed.h - self.kerf;
        let right_x = free.x + placed.w + self.kerf;
        let bottom_y = free.y + placed.h + self.kerf;

        let right = |h: f64| FreeRect {
            x: right_x,
            y: free.y,
            rect: Rect::new(right_w, h),
        };
        let bottom = |w: f64| FreeRect {
            x: free.x,
            y: bottom_y,
            rect: Rect::new(w, bottom_h),
        };

        match (right_w > EPSILON, bottom_h > EPSILON) {
            // Cut along the shorter leftover axis
            (true, true) if free.rect.w - placed.w < free.rect.h - placed.h => {
                [Some(right(placed.h)), Some(bottom(free.rect.w))]
            }
            (true, true) => [Some(right(free.rect.h)), Some(bottom(placed.w))],
            (true, false) => [Some(right(free.rect.h)), None],
            (false, true) => [None, Some(bottom(free.rect.w))],
            (false, false) => [None, None],
        }
    }

    fn merge_free_rects(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.free_rects.len() {
                for j in (i + 1)..self.free_rects.len() {
                    if let Some(m) = Self::try_merge(self.free_rects[i], self.free_rects[j]) {
                        self.free_rects[i] = m;
                        self.free_rects.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }

    fn try_merge(a: FreeRect, b: FreeRect) -> Option<FreeRect> {
        // Merge horizontally: same y, same height, adjacent x
        if approx_eq(a.y, b.y) && approx_eq(a.rect.h, b.rect.h) {
            if approx_eq(a.right(), b.x) || approx_eq(b.right(), a.x) {
                return Some(FreeRect {
                    x: a.x.min(b.x),
                    y: a.y,
                    rect: Rect::new(a.rect.w + b.rect.w, a.rect.h),
                });
            }
        }
        // Merge vertically: same x, same width, adjacent y
        if approx_eq(a.x, b.x) && approx_eq(a.rect.w, b.rect.w) {
            if approx_eq(a.bottom(), b.y) || approx_eq(b.bottom(), a.y) {
                return Some(FreeRect {
                    x: a.x,
                    y: a.y.min(b.y),
                    rect: Rect::new(a.rect.w, a.rect.h + b.rect.h),
                });
            }
        }
        None
    }

    /// Drop free rects that lie entirely inside another one.
    fn prune_contained(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let candidate = self.free_rects[i];
            let covered = self
                .free_rects
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.contains(&candidate) && (j < i || !candidate.contains(other)));
            if covered {
                self.free_rects.remove(i);
            } else {
                i += 1;
            }
        }
    }
}
