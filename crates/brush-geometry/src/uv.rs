//! Texture axis projection for brush sides.

use std::str::FromStr;

use log::warn;
use nalgebra::{Point3, Vector3, Vector4};

use crate::plane::parse_floats;
use crate::{Error, Result};

/// One texture axis of a side: a projection vector and a scale divisor.
///
/// The first three components of `axis` are dotted with a vertex position;
/// the fourth is the texture shift in texels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    pub axis: Vector4<f32>,
    pub scale: f32,
}

impl UvTransform {
    pub fn new(axis: Vector4<f32>, scale: f32) -> Self {
        Self { axis, scale }
    }

    /// Parses `"[x y z w] scale"`, falling back to a zero axis with zero
    /// scale when the input is malformed.
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_else(|err| {
            warn!("{err}; using a zero uv axis");
            Self::new(Vector4::zeros(), 0.0)
        })
    }

    /// The projection direction (the `xyz` part of the axis).
    #[inline]
    pub fn direction(&self) -> Vector3<f32> {
        self.axis.xyz()
    }

    /// The texture shift in texels.
    #[inline]
    pub fn shift(&self) -> f32 {
        self.axis.w
    }

    /// Projects `point` onto this axis and normalizes by the texture size,
    /// giving a texture coordinate where `1.0` spans one texture repeat.
    ///
    /// A zero or non-finite scale is treated as `1.0`.
    pub fn project(&self, point: Point3<f32>, texture_size: f32, apply_shift: bool) -> f32 {
        let scale = if self.scale.is_finite() && self.scale != 0.0 {
            self.scale
        } else {
            1.0
        };

        let mut texels = self.direction().dot(&point.coords) / scale;
        if apply_shift {
            texels += self.shift();
        }
        texels / texture_size
    }
}

impl FromStr for UvTransform {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let malformed = || Error::MalformedUvTransform {
            input: input.to_owned(),
        };

        let (body, tail) = input
            .trim()
            .strip_prefix('[')
            .and_then(|inner| inner.split_once(']'))
            .ok_or_else(malformed)?;
        let [x, y, z, w] = parse_floats(body).ok_or_else(malformed)?;
        let [scale] = parse_floats(tail).ok_or_else(malformed)?;

        Ok(Self::new(Vector4::new(x, y, z, w), scale))
    }
}
