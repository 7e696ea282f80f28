// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Deterministic badge colours.
//!
//! A module identifier is hashed and the hash seeds a generator local to the
//! call. The generator samples the HCL colour space in a saturated,
//! mid-to-light band and rejects samples that fall outside the sRGB gamut, so
//! the same identifier always maps to the same colour without any shared
//! random state.

use std::{fmt, hash::Hasher};

use fxhash::FxHasher64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound on gamut rejections before the last sample is clamped.
const MAX_SAMPLES: usize = 64;

/// D65 reference white.
const WHITE_REFERENCE: [f64; 3] = [0.950_47, 1.000_00, 1.088_83,];

/// An sRGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash,)]
pub struct Colour
{
    /// Red channel.
    pub red:   u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue:  u8,
}

impl Colour
{
    /// Returns the channels as an `(r, g, b)` triple.
    pub const fn rgb(self,) -> (u8, u8, u8,)
    {
        (self.red, self.green, self.blue,)
    }

    /// Returns the lowercase hexadecimal form without a leading `#`.
    ///
    /// # Examples
    ///
    /// ```
    /// use modbadge::Colour;
    ///
    /// let colour = Colour { red: 0x1f, green: 0xa2, blue: 0x07 };
    /// assert_eq!(colour.hex(), "1fa207");
    /// ```
    pub fn hex(self,) -> String
    {
        format!("{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Colour
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(&self.hex(),)
    }
}

/// Derives a stable, saturated colour for `identifier`.
///
/// The result depends only on the bytes of `identifier`; the empty string is
/// accepted like any other input.
///
/// # Examples
///
/// ```
/// use modbadge::colour_for;
///
/// let first = colour_for("github.com/example/mod");
/// let second = colour_for("github.com/example/mod");
/// assert_eq!(first, second);
/// assert_eq!(first.hex().len(), 6);
/// ```
pub fn colour_for(identifier: &str,) -> Colour
{
    let mut rng = ChaCha8Rng::seed_from_u64(identifier_hash(identifier,),);

    let mut last = [0.0; 3];
    for _ in 0..MAX_SAMPLES {
        let hue = rng.r#gen::<f64,>() * 360.0;
        let chroma = 0.5 + rng.r#gen::<f64,>() * 0.3;
        let luminance = 0.5 + rng.r#gen::<f64,>() * 0.3;

        last = hcl_to_srgb(hue, chroma, luminance,);
        if last.iter().all(|channel| (0.0..=1.0).contains(channel,),) {
            break;
        }
    }

    let [red, green, blue,] = last.map(to_channel,);
    Colour {
        red,
        green,
        blue,
    }
}

/// FxHash64 over little-endian words, so the seed is the same on every host.
fn identifier_hash(identifier: &str,) -> u64
{
    let mut hasher = FxHasher64::default();
    let mut words = identifier.as_bytes().chunks_exact(8,);
    for word in &mut words {
        hasher.write_u64(word.iter().rev().fold(0, |acc, &byte| acc << 8 | u64::from(byte,),),);
    }
    for &byte in words.remainder() {
        hasher.write_u8(byte,);
    }
    hasher.finish()
}

fn to_channel(value: f64,) -> u8
{
    // Clamped to [0, 255] before the cast.
    (value.clamp(0.0, 1.0,) * 255.0 + 0.5) as u8
}

fn hcl_to_srgb(hue: f64, chroma: f64, luminance: f64,) -> [f64; 3]
{
    let radians = hue.to_radians();
    let a = chroma * radians.cos();
    let b = chroma * radians.sin();

    let [x, y, z,] = lab_to_xyz(luminance, a, b,);
    let [r, g, bl,] = xyz_to_linear_rgb(x, y, z,);

    [delinearize(r,), delinearize(g,), delinearize(bl,),]
}

fn lab_to_xyz(l: f64, a: f64, b: f64,) -> [f64; 3]
{
    let l2 = (l + 0.16) / 1.16;
    [
        WHITE_REFERENCE[0] * lab_finv(l2 + a / 5.0,),
        WHITE_REFERENCE[1] * lab_finv(l2,),
        WHITE_REFERENCE[2] * lab_finv(l2 - b / 2.0,),
    ]
}

fn lab_finv(t: f64,) -> f64
{
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA { t * t * t } else { 3.0 * DELTA * DELTA * (t - 4.0 / 29.0) }
}

fn xyz_to_linear_rgb(x: f64, y: f64, z: f64,) -> [f64; 3]
{
    [
        3.240_969_941_904_521 * x - 1.537_383_177_570_093_5 * y - 0.498_610_760_293_003_3 * z,
        -0.969_243_636_280_879_8 * x + 1.875_967_501_507_720_7 * y + 0.041_555_057_407_175_61 * z,
        0.055_630_079_696_993_61 * x - 0.203_976_958_888_976_57 * y + 1.056_971_514_242_878_6 * z,
    ]
}

fn delinearize(value: f64,) -> f64
{
    if value <= 0.003_130_8 { 12.92 * value } else { 1.055 * value.powf(1.0 / 2.4,) - 0.055 }
}
