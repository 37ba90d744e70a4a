//! Depth levelling.

use ahash::{HashMap, HashMapExt};
use tcsol_types::{Gate, InputCount, TruthTable, ValidationError};

use crate::schedule::schedule;

/// Gates sharing the same depth.
///
/// The depth of a gate is one more than the deepest of its sources, with
/// primary inputs at depth 0. The gates of a level only read inputs and
/// outputs of earlier levels, so they could be evaluated together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    depth: usize,
    gates: Vec<Gate>,
}

impl Level {
    /// Depth of the gates in this level, starting at 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The gates, in schedule order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

/// Schedules `gates` and groups them by depth.
///
/// `result[i]` holds the gates of depth `i + 1`. Fails like [`schedule`].
pub fn levels(
    n: InputCount,
    gates: &[Gate],
    inputs: &[TruthTable],
) -> Result<Vec<Level>, ValidationError> {
    let order = schedule(n, gates, inputs)?;
    Ok(levels_of_ordered(order, inputs))
}

/// Groups gates that are already in a valid order by depth.
pub fn levels_of_ordered(
    order: impl IntoIterator<Item = Gate>,
    inputs: &[TruthTable],
) -> Vec<Level> {
    let mut depths = HashMap::<TruthTable, usize>::new();
    for tt in inputs {
        depths.insert(*tt, 0);
    }

    let mut levels: Vec<Level> = Vec::new();
    for gate in order {
        let depth = gate
            .sources()
            .iter()
            .map(|s| depths.get(s).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
            + 1;

        // A table produced more than once keeps its shallowest producer.
        depths
            .entry(gate.output())
            .and_modify(|d| *d = (*d).min(depth))
            .or_insert(depth);

        while levels.len() < depth {
            levels.push(Level {
                depth: levels.len() + 1,
                gates: Vec::new(),
            });
        }
        levels[depth - 1].gates.push(gate);
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tt(v: u64) -> TruthTable {
        TruthTable::new(v)
    }

    #[test]
    fn test_xor_levels() {
        let n = InputCount::new(2).unwrap();
        let gates = vec![
            Gate::nand(tt(0b0110), tt(0b1011), tt(0b1101)),
            Gate::nand(tt(0b1101), tt(0b1100), tt(0b0111)),
            Gate::nand(tt(0b1011), tt(0b1010), tt(0b0111)),
            Gate::nand(tt(0b0111), tt(0b1010), tt(0b1100)),
        ];
        let levels = levels(n, &gates, &[tt(0b1010), tt(0b1100)]).unwrap();

        let outputs = levels
            .iter()
            .map(|l| l.gates().iter().map(|g| g.output().value()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(outputs, vec![vec![0b0111], vec![0b1101, 0b1011], vec![0b0110]]);
        assert_eq!(levels.iter().map(Level::depth).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_no_gates_no_levels() {
        assert!(levels_of_ordered(Vec::new(), &[tt(1)]).is_empty());
    }

    #[test]
    fn test_cycle_is_reported() {
        let n = InputCount::new(2).unwrap();
        let gates = vec![
            Gate::not(tt(0b0011), tt(0b1100)),
            Gate::not(tt(0b1100), tt(0b0011)),
        ];
        assert!(matches!(
            levels(n, &gates, &[]),
            Err(ValidationError::CycleDetected { .. })
        ));
    }
}
