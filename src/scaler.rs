use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source pixel for every destination pixel.
pub struct StretchLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl StretchLut {
    pub fn empty() -> Self {
        Self { src_x: Vec::new(), src_y: Vec::new() }
    }

    #[inline]
    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.src_x.len() == dst_w && self.src_y.len() == dst_h
    }
}

pub fn build_stretch_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> StretchLut {
    let sx = src_w as f32 / dst_w as f32;
    let sy = src_h as f32 / dst_h as f32;
    StretchLut {
        src_x: (0..dst_w).map(|x| ((x as f32 * sx) as usize).min(src_w - 1)).collect(),
        src_y: (0..dst_h).map(|y| ((y as f32 * sy) as usize).min(src_h - 1)).collect(),
    }
}

/// Nearest-neighbor stretch of the internal framebuffer onto the window
/// surface. Rows are processed in parallel for cache friendly writes.
pub fn blit_stretch(dst: &mut [u32], dst_w: usize, src: &[u32], src_w: usize, lut: &StretchLut) {
    dst.par_chunks_mut(dst_w).enumerate().for_each(|(y, dst_row)| {
        let row = lut.src_y[y] * src_w;
        for (x, px) in dst_row.iter_mut().enumerate() {
            *px = src[row + lut.src_x[x]];
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stretch_replicates_source_pixels() {
        let src = vec![1u32, 2, 3, 4]; // 2x2
        let mut dst = vec![0u32; 16];
        let lut = build_stretch_lut(4, 4, 2, 2);
        blit_stretch(&mut dst, 4, &src, 2, &lut);

        assert_eq!(dst[0], 1);
        assert_eq!(dst[3], 2);
        assert_eq!(dst[12], 3);
        assert_eq!(dst[15], 4);
    }

    #[test]
    fn downscale_stays_in_bounds() {
        let src = vec![7u32; 8 * 8];
        let mut dst = vec![0u32; 3 * 3];
        let lut = build_stretch_lut(3, 3, 8, 8);
        blit_stretch(&mut dst, 3, &src, 8, &lut);
        assert!(dst.iter().all(|&p| p == 7));
    }
}
