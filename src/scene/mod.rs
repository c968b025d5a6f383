//! Renderer-agnostic scene types.
//!
//! The visualizer composes each frame out of small scene nodes:
//! - a node carries a local transform, a fill color, a z order, and an
//!   optional triangle mesh
//! - a camera maps world coordinates (pt) into clip space (-1..1)
//! - renderers consume a flattened list of draw items
//!
//! Everything here is CPU-side and deterministic; the whole scene is rebuilt
//! from the current lesson inputs on every interaction, so nodes have no
//! identity across frames.

/// 2D affine transform stored as a 3x3 column-major matrix.
///
/// Convention:
/// - column vectors (x, y, 1)
/// - `world_from_local = parent * local`; composition order matters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub m: [[f32; 3]; 3],
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [tx, ty, 1.0]],
        }
    }

    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    #[inline]
    pub fn rotate(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        Self {
            m: [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// `self * rhs`: rhs applies first, then self.
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        let a = self.m;
        let b = rhs.m;
        let mut out = [[0.0f32; 3]; 3];
        for col in 0..3 {
            for row in 0..3 {
                out[col][row] =
                    a[0][row] * b[col][0] + a[1][row] * b[col][1] + a[2][row] * b[col][2];
            }
        }
        Self { m: out }
    }

    #[inline]
    pub fn transform_point(self, x: f32, y: f32) -> (f32, f32) {
        let nx = self.m[0][0] * x + self.m[1][0] * y + self.m[2][0];
        let ny = self.m[0][1] * x + self.m[1][1] * y + self.m[2][1];
        (nx, ny)
    }

    /// Embed into a column-major 4x4 for GPU use (z untouched, w = 1).
    #[inline]
    pub fn to_mat4(self) -> [[f32; 4]; 4] {
        let m = self.m;
        [
            [m[0][0], m[0][1], 0.0, m[0][2]],
            [m[1][0], m[1][1], 0.0, m[1][2]],
            [0.0, 0.0, 1.0, 0.0],
            [m[2][0], m[2][1], 0.0, m[2][2]],
        ]
    }
}

/// Axis-aligned bounding box in world (pt) space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Aabb2 {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Aabb2 {
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY, f32::INFINITY],
            max: [f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    #[inline]
    pub fn include_point(&mut self, p: [f32; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    #[inline]
    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    #[inline]
    pub fn size(&self) -> [f32; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }
}

/// RGBA color, components in 0..1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);

    // Palette matching the reference figure (CSS color names).
    pub const MEDIUM_SEA_GREEN: Self = Self::opaque(0.235, 0.702, 0.443);
    pub const CORNFLOWER_BLUE: Self = Self::opaque(0.392, 0.584, 0.929);
    pub const SALMON: Self = Self::opaque(0.980, 0.502, 0.447);
    pub const LIGHT_GRAY: Self = Self::opaque(0.827, 0.827, 0.827);
    pub const GRAY: Self = Self::opaque(0.502, 0.502, 0.502);

    #[inline]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// A CPU-side triangle mesh: 2D positions plus u32 indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh2D {
    pub positions: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh2D {
    #[inline]
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Append `other` into `self`, offsetting its indices.
    pub fn append(&mut self, other: &Mesh2D) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|&i| base + i));
    }

    /// Bounds of all positions (empty box for an empty mesh).
    pub fn bounds(&self) -> Aabb2 {
        let mut b = Aabb2::empty();
        for &p in &self.positions {
            b.include_point(p);
        }
        b
    }
}

/// One flattened draw call: mesh + fill + fully composed transform + z order.
///
/// Higher `z` draws later (painter's order); the renderer sorts by it.
#[derive(Debug, Clone)]
pub struct DrawItem2D {
    pub mesh: Mesh2D,
    pub fill: Rgba,
    pub world_from_local: Affine2,
    pub z: i32,
}

/// A scene-graph node: local transform, z, fill, optional mesh, children.
#[derive(Debug, Clone)]
pub struct Node2D {
    pub name: String,
    pub local_from_parent: Affine2,
    pub z: i32,
    pub fill: Rgba,
    pub mesh: Option<Mesh2D>,
    pub children: Vec<Node2D>,
}

impl Default for Node2D {
    fn default() -> Self {
        Self {
            name: "node".to_string(),
            local_from_parent: Affine2::IDENTITY,
            z: 0,
            fill: Rgba::WHITE,
            mesh: None,
            children: Vec::new(),
        }
    }
}

impl Node2D {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_mesh(mut self, mesh: Mesh2D) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[inline]
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    #[inline]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    #[inline]
    pub fn with_transform(mut self, local_from_parent: Affine2) -> Self {
        self.local_from_parent = local_from_parent;
        self
    }

    #[inline]
    pub fn add_child(&mut self, child: Node2D) {
        self.children.push(child);
    }

    /// Conservative local-space bounds of the mesh and all children.
    ///
    /// Child boxes are transformed corner-by-corner into this node's space.
    pub fn compute_local_bounds(&self) -> Aabb2 {
        let mut bounds = Aabb2::empty();

        if let Some(mesh) = &self.mesh {
            bounds = bounds.union(mesh.bounds());
        }

        for child in &self.children {
            let cb = child.compute_local_bounds();
            if cb.is_empty() {
                continue;
            }
            let corners = [
                [cb.min[0], cb.min[1]],
                [cb.max[0], cb.min[1]],
                [cb.max[0], cb.max[1]],
                [cb.min[0], cb.max[1]],
            ];
            for c in corners {
                let (x, y) = child.local_from_parent.transform_point(c[0], c[1]);
                bounds.include_point([x, y]);
            }
        }

        bounds
    }

    /// Flatten this subtree into draw items, composing transforms.
    pub fn flatten(&self, parent_from_world: Affine2, out: &mut Vec<DrawItem2D>) {
        let world_from_local = parent_from_world.mul(self.local_from_parent);

        if let Some(mesh) = &self.mesh {
            out.push(DrawItem2D {
                mesh: mesh.clone(),
                fill: self.fill,
                world_from_local,
                z: self.z,
            });
        }

        for child in &self.children {
            child.flatten(world_from_local, out);
        }
    }
}

/// A 2D camera mapping world pt coordinates into clip space.
///
/// - `center_pt` maps to the viewport center
/// - `zoom` scales world pt into NDC
/// - aspect correction keeps the zoom isotropic in world space
#[derive(Debug, Copy, Clone)]
pub struct Camera2D {
    pub center_pt: [f32; 2],
    pub zoom: f32,
    pub viewport_aspect: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            center_pt: [0.0, 0.0],
            zoom: 1.0,
            viewport_aspect: 1.0,
        }
    }
}

impl Camera2D {
    #[inline]
    pub fn set_viewport_px(&mut self, width: u32, height: u32) {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        self.viewport_aspect = w / h;
    }

    #[inline]
    fn aspect_scale(&self) -> (f32, f32) {
        if self.viewport_aspect > 1.0 {
            (1.0 / self.viewport_aspect, 1.0)
        } else {
            (1.0, self.viewport_aspect)
        }
    }

    /// World(pt) -> clip transform, suitable for embedding into a 4x4 MVP.
    pub fn clip_from_world(&self) -> Affine2 {
        let t = Affine2::translate(-self.center_pt[0], -self.center_pt[1]);
        let (ax, ay) = self.aspect_scale();
        let s = Affine2::scale(self.zoom * ax, self.zoom * ay);
        s.mul(t)
    }

    /// Frame the given world bounds into the viewport.
    ///
    /// - `padding_pt`: margin added around the bounds (world units)
    /// - `fill_ratio`: fraction of the viewport to occupy, e.g. 0.9
    pub fn frame_bounds(&mut self, bounds: Aabb2, padding_pt: f32, fill_ratio: f32) {
        if bounds.is_empty() {
            return;
        }

        let mut b = bounds;
        b.min[0] -= padding_pt;
        b.min[1] -= padding_pt;
        b.max[0] += padding_pt;
        b.max[1] += padding_pt;

        let size = b.size();
        let size_x = size[0].max(1e-3);
        let size_y = size[1].max(1e-3);

        self.center_pt = b.center();

        // Pick the zoom so the padded box maps into clip space (2.0 units),
        // honoring the same aspect correction as `clip_from_world`.
        let fill = fill_ratio.clamp(0.05, 0.98);
        let (ax, ay) = self.aspect_scale();
        let zoom_x = (2.0 * fill) / (size_x * ax);
        let zoom_y = (2.0 * fill) / (size_y * ay);
        self.zoom = zoom_x.min(zoom_y);
    }
}

/// A top-level scene: camera plus root nodes.
#[derive(Debug, Default)]
pub struct Scene2D {
    pub camera: Camera2D,
    pub roots: Vec<Node2D>,
}

impl Scene2D {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, node: Node2D) {
        self.roots.push(node);
    }

    pub fn get(&self, name: &str) -> Option<&Node2D> {
        self.roots.iter().find(|n| n.name == name)
    }

    /// World-space bounds of every root subtree.
    pub fn bounds(&self) -> Aabb2 {
        let mut b = Aabb2::empty();
        for root in &self.roots {
            let rb = root.compute_local_bounds();
            if rb.is_empty() {
                continue;
            }
            let corners = [
                [rb.min[0], rb.min[1]],
                [rb.max[0], rb.min[1]],
                [rb.max[0], rb.max[1]],
                [rb.min[0], rb.max[1]],
            ];
            for c in corners {
                let (x, y) = root.local_from_parent.transform_point(c[0], c[1]);
                b.include_point([x, y]);
            }
        }
        b
    }

    /// Flatten the full scene into draw items (unsorted; renderers sort by z).
    pub fn flatten(&self) -> Vec<DrawItem2D> {
        let mut items = Vec::new();
        for root in &self.roots {
            root.flatten(Affine2::IDENTITY, &mut items);
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_composition_applies_rhs_first() {
        // Scale by 2, then translate by (10, 0).
        let xf = Affine2::translate(10.0, 0.0).mul(Affine2::scale(2.0, 2.0));
        let (x, y) = xf.transform_point(1.0, 1.0);
        assert_eq!((x, y), (12.0, 2.0));
    }

    #[test]
    fn affine_rotate_quarter_turn() {
        let xf = Affine2::rotate(std::f32::consts::FRAC_PI_2);
        let (x, y) = xf.transform_point(1.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mesh_append_offsets_indices() {
        let tri = Mesh2D {
            positions: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            indices: vec![0, 1, 2],
        };
        let mut merged = tri.clone();
        merged.append(&tri);
        assert_eq!(merged.positions.len(), 6);
        assert_eq!(merged.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn node_bounds_cover_transformed_children() {
        let mut root = Node2D::new("root");
        let child = Node2D::new("child")
            .with_mesh(Mesh2D {
                positions: vec![[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0]],
                indices: vec![0, 1, 2],
            })
            .with_transform(Affine2::translate(10.0, 0.0));
        root.add_child(child);

        let b = root.compute_local_bounds();
        assert_eq!(b.min, [9.0, -1.0]);
        assert_eq!(b.max, [11.0, 1.0]);
    }

    #[test]
    fn camera_framing_contains_bounds() {
        let mut cam = Camera2D::default();
        cam.set_viewport_px(1280, 720);

        let bounds = Aabb2 {
            min: [-300.0, -200.0],
            max: [300.0, 200.0],
        };
        cam.frame_bounds(bounds, 20.0, 0.9);

        let clip = cam.clip_from_world();
        for corner in [
            [bounds.min[0], bounds.min[1]],
            [bounds.max[0], bounds.max[1]],
        ] {
            let (x, y) = clip.transform_point(corner[0], corner[1]);
            assert!(x.abs() <= 1.0, "x out of clip: {x}");
            assert!(y.abs() <= 1.0, "y out of clip: {y}");
        }
    }
}
