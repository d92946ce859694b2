//! Generated-input round-trip property: `decode(encode(raster)) == raster`
//! for randomly generated rasters, exercising filter choice, run lengths,
//! and Huffman substitution in combinations the hand-picked scenarios in
//! `tests/scenarios.rs` don't enumerate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nya::pixel::{pixel4, Pixel};
use nya::{decode_bytes, encode_raster, Raster};

fn random_pixel(rng: &mut StdRng, force_opaque: bool) -> Pixel {
    let r = rng.random();
    let g = rng.random();
    let b = rng.random();
    let a = if force_opaque { 255 } else { rng.random() };
    pixel4(r, g, b, a)
}

fn random_raster(rng: &mut StdRng, max_side: usize) -> Raster {
    let width = rng.random_range(1 ..= max_side);
    let height = rng.random_range(1 ..= max_side);
    let force_opaque = rng.random_bool(0.5);

    // occasionally repeat runs of the same pixel so RLE and Huffman both see exercise
    let mut pixels = Vec::with_capacity(width * height);
    while pixels.len() < width * height {
        let value = random_pixel(rng, force_opaque);
        let run = if rng.random_bool(0.3) { rng.random_range(1 ..= 6) } else { 1 };

        for _ in 0 .. run {
            if pixels.len() == width * height {
                break;
            }
            pixels.push(value.clone());
        }
    }

    Raster::new(width, height, pixels).unwrap()
}

#[test]
fn generated_rasters_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x4E59_4121); // seeded for a reproducible test run
    let max_side = 24;

    for _ in 0 .. 200 {
        let raster = random_raster(&mut rng, max_side);
        let bytes = encode_raster(&raster).unwrap();
        let decoded = decode_bytes(&bytes).unwrap();

        assert_eq!(decoded.width, raster.width);
        assert_eq!(decoded.height, raster.height);
        assert_eq!(decoded.pixels(), raster.pixels());
    }
}
