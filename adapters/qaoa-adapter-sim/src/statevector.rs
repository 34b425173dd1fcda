//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use qaoa_ir::{Instruction, InstructionKind};

/// A statevector over `num_lines` register lines.
///
/// Basis index bit `k` is the value of line `k`.
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_lines: usize,
}

impl Statevector {
    /// All lines in |0⟩.
    pub fn new(num_lines: usize) -> Self {
        let mut amplitudes = vec![Complex64::default(); 1 << num_lines];
        amplitudes[0] = Complex64::from(1.0);
        Self {
            amplitudes,
            num_lines,
        }
    }

    /// Apply an instruction to the statevector.
    ///
    /// Barriers and measurements leave the state untouched; measurement is
    /// performed by [`sample`](Self::sample).
    pub fn apply(&mut self, instruction: &Instruction) {
        let line = |k: usize| instruction.lines[k].index();
        match instruction.kind {
            InstructionKind::H => self.apply_h(line(0)),
            InstructionKind::Cx => self.apply_cx(line(0), line(1)),
            InstructionKind::Rz(theta) => self.apply_rz(line(0), theta),
            InstructionKind::Rx(theta) => self.apply_rx(line(0), theta),
            InstructionKind::Barrier | InstructionKind::Measure => {}
        }
    }

    /// Apply the 2x2 unitary `m` (row-major) to one line.
    fn apply_single(&mut self, line: usize, m: [Complex64; 4]) {
        let stride = 1 << line;
        for block in self.amplitudes.chunks_exact_mut(stride << 1) {
            let (low, high) = block.split_at_mut(stride);
            for (a0, a1) in low.iter_mut().zip(high) {
                let (x, y) = (*a0, *a1);
                *a0 = m[0] * x + m[1] * y;
                *a1 = m[2] * x + m[3] * y;
            }
        }
    }

    fn apply_h(&mut self, line: usize) {
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        self.apply_single(line, [h, h, h, -h]);
    }

    fn apply_rx(&mut self, line: usize, theta: f64) {
        let half = theta / 2.0;
        let cos = Complex64::new(half.cos(), 0.0);
        let sin = Complex64::new(0.0, -half.sin());
        self.apply_single(line, [cos, sin, sin, cos]);
    }

    fn apply_rz(&mut self, line: usize, theta: f64) {
        let mask = 1 << line;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let (c, t) = (1 << control, 1 << target);
        (0..self.amplitudes.len())
            .filter(|i| i & c != 0 && i & t == 0)
            .for_each(|i| self.amplitudes.swap(i, i | t));
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Draw one basis index from the Born distribution.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let mut remaining: f64 = rng.r#gen();
        self.amplitudes
            .iter()
            .position(|amp| {
                remaining -= amp.norm_sqr();
                remaining < 0.0
            })
            // rounding can leave the total just below 1
            .unwrap_or(self.amplitudes.len() - 1)
    }

    /// Render a basis index with line 0 as the rightmost character.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        if self.num_lines == 0 {
            return String::new();
        }
        format!("{:0width$b}", outcome, width = self.num_lines)
    }
}
