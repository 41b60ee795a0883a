//! Bjorklund's algorithm for euclidean rhythm generation.

use crate::error::ArithmeticError;

/// Distribute `pulses` onsets as evenly as possible over `steps` slots,
/// then rotate the result left by `rotation` slots.
///
/// `bjorklund(3, 8, 0)` gives the familiar `10010010`.
pub fn bjorklund(pulses: u32, steps: u32, rotation: u32) -> Result<Vec<bool>, ArithmeticError> {
    if steps == 0 {
        return Err(ArithmeticError::ZeroSteps);
    }
    let steps = steps as usize;
    let pulses = pulses as usize;

    let mut slots = if pulses == 0 {
        vec![false; steps]
    } else if pulses >= steps {
        vec![true; steps]
    } else {
        let mut head: Vec<Vec<bool>> = vec![vec![true]; pulses];
        let mut tail: Vec<Vec<bool>> = vec![vec![false]; steps - pulses];
        while tail.len() > 1 {
            let pairs = head.len().min(tail.len());
            let mut rest = if head.len() > pairs {
                head.split_off(pairs)
            } else {
                tail.split_off(pairs)
            };
            for (group, extra) in head.iter_mut().zip(tail.drain(..)) {
                group.extend(extra);
            }
            std::mem::swap(&mut tail, &mut rest);
        }
        head.extend(tail);
        head.into_iter().flatten().collect()
    };

    let shift = rotation as usize % slots.len();
    slots.rotate_left(shift);
    Ok(slots)
}
