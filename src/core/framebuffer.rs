use atomic_float::AtomicF32;
use nalgebra::Vector3;
use std::sync::atomic::{AtomicU32, Ordering};

/// Colour and depth storage for one render target.
///
/// The internal buffers are `sample_count` times larger than the output in
/// each dimension (SSAA). Depth is stored as atomic f32 bits and colour as
/// three atomic channels, so rows can be shaded in parallel without locks.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    color_buffer: Vec<[AtomicF32; 3]>,
    depth_buffer: Vec<AtomicU32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        let inf_bits = f32::INFINITY.to_bits();
        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: (0..size)
                .map(|_| [AtomicF32::new(0.0), AtomicF32::new(0.0), AtomicF32::new(0.0)])
                .collect(),
            depth_buffer: (0..size).map(|_| AtomicU32::new(inf_bits)).collect(),
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Resets every sample to `color` and `depth`.
    pub fn clear(&mut self, color: Vector3<f32>, depth: f32) {
        let depth_bits = depth.to_bits();
        for (rgb, d) in self.color_buffer.iter_mut().zip(self.depth_buffer.iter_mut()) {
            *rgb[0].get_mut() = color.x;
            *rgb[1].get_mut() = color.y;
            *rgb[2].get_mut() = color.z;
            *d.get_mut() = depth_bits;
        }
    }

    /// Thread-safe depth test and update.
    ///
    /// Returns true (and stores `new_depth`) if it is closer than the current value.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth_atomic = &self.depth_buffer[self.index(x, y)];
        let new_bits = new_depth.to_bits();

        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            if new_depth >= f32::from_bits(current_bits) {
                return false;
            }
            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated_bits) => current_bits = updated_bits,
            }
        }
    }

    /// Writes a sample. Call only after `depth_test_and_update` succeeded.
    #[inline]
    pub fn set_sample(&self, x: usize, y: usize, color: Vector3<f32>) {
        if self.in_bounds(x, y) {
            let rgb = &self.color_buffer[self.index(x, y)];
            rgb[0].store(color.x, Ordering::Relaxed);
            rgb[1].store(color.y, Ordering::Relaxed);
            rgb[2].store(color.z, Ordering::Relaxed);
        }
    }

    pub fn sample(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let rgb = &self.color_buffer[self.index(x, y)];
        Some(Vector3::new(
            rgb[0].load(Ordering::Relaxed),
            rgb[1].load(Ordering::Relaxed),
            rgb[2].load(Ordering::Relaxed),
        ))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| f32::from_bits(self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed)))
    }

    /// Resolved output pixel: the box-filtered average of its samples.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let n = self.sample_count;
        let mut sum = Vector3::zeros();
        for dy in 0..n {
            for dx in 0..n {
                sum += self.sample(x * n + dx, y * n + dy)?;
            }
        }
        Some(sum / (n * n) as f32)
    }
}
