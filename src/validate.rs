//! Host-side input generation and result checking

use std::fmt;

/// `[0.0, 1.0, 2.0, ...]` of length `len`
pub fn input_values(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32).collect()
}

/// First element whose device result differs from the host reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub observed: f32,
    pub expected: f32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Error: Element {} did not match expected output.",
            self.index
        )?;
        write!(
            f,
            "Saw {:.4}, expected {:.4}",
            self.observed, self.expected
        )
    }
}

/// Compare `output[i]` against `input[i] * input[i]` with exact equality
///
/// Stops at the first mismatch.
pub fn first_mismatch(input: &[f32], output: &[f32]) -> Option<Mismatch> {
    debug_assert_eq!(input.len(), output.len());

    input
        .iter()
        .zip(output)
        .enumerate()
        .find_map(|(index, (&x, &observed))| {
            let expected = x * x;
            (observed != expected).then_some(Mismatch {
                index,
                observed,
                expected,
            })
        })
}
