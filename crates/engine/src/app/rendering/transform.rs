/// 2D affine transform: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
///
/// Builder methods append an operation, so `Transform2D::IDENTITY.scale(2.0, 2.0).translate(5.0, 0.0)`
/// scales first and translates the scaled result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self::IDENTITY.translate(dx, dy)
    }

    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..self
        }
    }

    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.then(Transform2D {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        })
    }

    pub fn rotate(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        self.then(Transform2D {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        })
    }

    /// Applies `self`, then `next`.
    pub fn then(self, next: Transform2D) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    pub fn inverse(&self) -> Option<Transform2D> {
        let det = self.a * self.d - self.b * self.c;
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            return None;
        }
        let inv = det.recip();
        Some(Transform2D {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.c * self.ty - self.d * self.tx) * inv,
            ty: (self.b * self.tx - self.a * self.ty) * inv,
        })
    }
}

/// Placement and opacity for a single `draw_image` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub transform: Transform2D,
    pub alpha: f32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            transform: Transform2D::IDENTITY,
            alpha: 1.0,
        }
    }
}

impl DrawParams {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            transform: Transform2D::translation(x, y),
            alpha: 1.0,
        }
    }

    pub fn with_transform(transform: Transform2D) -> Self {
        Self {
            transform,
            alpha: 1.0,
        }
    }

    /// Multiplies the current alpha, mirroring a colour-scale on the draw call.
    pub fn scale_alpha(mut self, alpha: f32) -> Self {
        self.alpha *= alpha.clamp(0.0, 1.0);
        self
    }
}
